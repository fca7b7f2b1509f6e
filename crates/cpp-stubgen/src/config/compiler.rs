use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

pub const DEFAULT_COMPILER_COMMAND: &str = "clang";
pub const DEFAULT_LANGUAGE_STANDARD: &str = "c++11";

/// How the parser is invoked.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerSettings {
    /// The clang driver executable.
    pub command: String,
    /// Value of `-std=`; empty leaves the compiler default.
    pub std: String,
    pub include_paths: Vec<String>,
    pub extra_flags: Vec<String>,
    /// Parse declarations only.
    pub skip_function_bodies: bool,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            command: DEFAULT_COMPILER_COMMAND.to_string(),
            std: DEFAULT_LANGUAGE_STANDARD.to_string(),
            include_paths: Vec::new(),
            extra_flags: Vec::new(),
            skip_function_bodies: true,
        }
    }
}

impl CompilerSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: CompilerSettingsPatch,
    ) {
        if let Some(v) = patch.command {
            self.command = v;
        }
        if let Some(v) = patch.std {
            self.std = v;
        }
        if let Some(v) = patch.include_paths {
            self.include_paths = v;
        }
        if let Some(v) = patch.extra_flags {
            self.extra_flags = v;
        }
        if let Some(v) = patch.skip_function_bodies {
            self.skip_function_bodies = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.command = self.command.trim().to_string();
        if self.command.is_empty() {
            self.command = DEFAULT_COMPILER_COMMAND.to_string();
        }
        self.std = self.std.trim().to_string();
        self.include_paths =
            self.include_paths.iter().map(|p| p.trim().to_string()).filter(|p| !p.is_empty()).collect();
        self.extra_flags = self.extra_flags.iter().map(|f| f.trim().to_string()).filter(|f| !f.is_empty()).collect();
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct CompilerSettingsPatch {
    pub(crate) command: Option<String>,
    pub(crate) std: Option<String>,
    #[serde(alias = "include_paths")]
    pub(crate) include_paths: Option<Vec<String>>,
    #[serde(alias = "extra_flags")]
    pub(crate) extra_flags: Option<Vec<String>>,
    #[serde(alias = "skip_function_bodies")]
    pub(crate) skip_function_bodies: Option<bool>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
