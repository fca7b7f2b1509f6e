//! Settings, one file per category.
//!
//! [`Settings`] aggregates the categories. It is filled from LSP
//! `initializationOptions` / `didChangeConfiguration` payloads (JSON) or from
//! a `cpp-stubgen.toml` file next to the sources. Both go through the same
//! partial `*Patch` structs, so a missing key keeps its current value.

pub(crate) mod compiler;
pub(crate) mod logging;

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

pub use compiler::{CompilerSettings, DEFAULT_COMPILER_COMMAND, DEFAULT_LANGUAGE_STANDARD};
use compiler::CompilerSettingsPatch;
pub use logging::{LogLevel, LoggingSettings};
use logging::LoggingSettingsPatch;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

pub const SETTINGS_SECTION_KEY: &str = "cpp-stubgen";
pub const CONFIG_FILENAME: &str = "cpp-stubgen.toml";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub compiler: CompilerSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn from_lsp_payload(payload: Option<&Value>) -> Self {
        let mut settings = Self::default();
        if let Some(payload) = payload {
            settings = settings.merged_with_payload(payload);
        }
        settings
    }

    pub fn merged_with_payload(
        &self,
        payload: &Value,
    ) -> Self {
        let mut merged = self.clone();

        for candidate in payload_candidates(payload) {
            if let Ok(patch) = serde_json::from_value::<SettingsPatch>(candidate.clone()) {
                merged.apply_patch(patch);
            }
        }

        merged.normalize();
        merged
    }

    /// Parse the contents of a `cpp-stubgen.toml`.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let patch: SettingsPatch = toml::from_str(content)?;
        let mut settings = Self::default();
        settings.apply_patch(patch);
        settings.normalize();
        Ok(settings)
    }

    /// Settings for editing `file`: the nearest `cpp-stubgen.toml` above it,
    /// or the defaults.
    pub fn load_for(file: &Path) -> Self {
        let Some(config_path) = find_config_file(file) else {
            return Self::default();
        };
        match std::fs::read_to_string(&config_path) {
            Ok(content) => Self::from_toml_str(&content).unwrap_or_else(|error| {
                warn!("Ignoring {}: {error}", config_path.display());
                Self::default()
            }),
            Err(error) => {
                warn!("Failed to read {}: {error}", config_path.display());
                Self::default()
            },
        }
    }

    fn apply_patch(
        &mut self,
        patch: SettingsPatch,
    ) {
        if let Some(p) = patch.compiler {
            self.compiler.apply_patch(p);
        }
        if let Some(p) = patch.logging {
            self.logging.apply_patch(p);
        }
    }

    fn normalize(&mut self) {
        self.compiler.normalize();
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct SettingsPatch {
    compiler: Option<CompilerSettingsPatch>,
    logging: Option<LoggingSettingsPatch>,
    #[serde(flatten)]
    _extra: HashMap<String, Value>,
}

fn payload_candidates(payload: &Value) -> Vec<Value> {
    let mut candidates = Vec::new();
    candidates.push(payload.clone());
    if let Some(scoped) = payload.get(SETTINGS_SECTION_KEY) {
        candidates.push(scoped.clone());
    }
    candidates
}

/// Walks parent directories from `start` looking for `cpp-stubgen.toml`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_file() {
        start.parent()?
    } else {
        start
    };
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}

#[cfg(test)]
#[path = "../../tests/src/config_tests.rs"]
mod tests;
