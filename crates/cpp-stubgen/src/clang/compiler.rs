use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    process::{Command, Output},
    sync::atomic::{AtomicU64, Ordering},
};

use serde_json::json;
use tracing::{debug, warn};

use crate::{
    clang::{UnsavedFile, tree::TranslationUnit},
    config::CompilerSettings,
};

static NEXT_AST_DUMP_ID: AtomicU64 = AtomicU64::new(1);

const SKIP_FUNCTION_BODIES: &str = "-skip-function-bodies";

/// Runs clang's JSON AST dump and turns the result into a [`TranslationUnit`].
#[derive(Debug, Clone)]
pub struct AstDumper {
    settings: CompilerSettings,
}

impl AstDumper {
    pub fn new(settings: CompilerSettings) -> Self {
        Self {
            settings,
        }
    }

    /// Parse `file` in signature-only mode, with `unsaved` buffers standing in
    /// for their on-disk contents.
    pub fn parse(
        &self,
        file: &Path,
        unsaved: &[UnsavedFile],
    ) -> Result<TranslationUnit, CompileError> {
        let json = self.dump(file, unsaved)?;
        let tu = TranslationUnit::from_json(&json, unsaved)?;
        Ok(tu)
    }

    fn dump(
        &self,
        file: &Path,
        unsaved: &[UnsavedFile],
    ) -> Result<String, CompileError> {
        let overlay = Overlay::stage(unsaved).map_err(CompileError::Overlay)?;
        let overlay_file = overlay.as_ref().map(|o| o.file.as_path());

        let skip_bodies = self.settings.skip_function_bodies;
        let output = self.run(&self.arguments(file, overlay_file, skip_bodies))?;
        let output = if skip_bodies && rejected_skip_bodies(&output) {
            warn!("[ast-dump] {} does not accept {SKIP_FUNCTION_BODIES}; parsing bodies", self.settings.command);
            self.run(&self.arguments(file, overlay_file, false))?
        } else {
            output
        };

        if !output.status.success() {
            debug!("[ast-dump] exited with {} (partial AST may still be usable)", output.status);
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if stdout.is_empty() || !stdout.starts_with('{') {
            let detail = first_error_line(&output).unwrap_or_else(|| "no output".to_string());
            warn!("[ast-dump] produced no usable JSON for {}: {detail}", file.display());
            return Err(CompileError::NoAst {
                command: self.settings.command.clone(),
                detail,
            });
        }

        debug!("[ast-dump] produced {} bytes of JSON for {}", stdout.len(), file.display());
        Ok(stdout)
    }

    /// Command-line arguments for one dump of `file`.
    pub fn arguments(
        &self,
        file: &Path,
        overlay: Option<&Path>,
        skip_bodies: bool,
    ) -> Vec<String> {
        let mut args = vec!["-x".to_string(), "c++".to_string()];
        if !self.settings.std.is_empty() {
            args.push(format!("-std={}", self.settings.std));
        }
        args.extend(
            ["-fsyntax-only", "-fno-color-diagnostics", "-Xclang", "-ast-dump=json"].into_iter().map(String::from),
        );
        if skip_bodies {
            args.push("-Xclang".to_string());
            args.push(SKIP_FUNCTION_BODIES.to_string());
        }
        for path in &self.settings.include_paths {
            args.push(format!("-I{path}"));
        }
        args.extend(self.settings.extra_flags.iter().cloned());
        if let Some(overlay) = overlay {
            args.push("-ivfsoverlay".to_string());
            args.push(overlay.display().to_string());
        }
        args.push(file.display().to_string());
        args
    }

    fn run(
        &self,
        args: &[String],
    ) -> Result<Output, CompileError> {
        let command = &self.settings.command;
        debug!("AST dump: {command} {}", args.join(" "));
        Command::new(command).args(args).output().map_err(|error| match error.kind() {
            std::io::ErrorKind::NotFound => CompileError::CommandNotFound(command.clone()),
            _ => CompileError::LaunchFailed {
                command: command.clone(),
                reason: error.to_string(),
            },
        })
    }
}

fn rejected_skip_bodies(output: &Output) -> bool {
    output.stdout.is_empty()
        && String::from_utf8_lossy(&output.stderr)
            .lines()
            .any(|line| line.contains("unknown argument") && line.contains(SKIP_FUNCTION_BODIES))
}

fn first_error_line(output: &Output) -> Option<String> {
    String::from_utf8_lossy(&output.stderr).lines().find(|line| line.contains("error:")).map(|line| line.trim().to_string())
}

/// Temp copies of unsaved buffers plus the clang VFS overlay that maps each
/// real path onto its copy. Removed on drop.
struct Overlay {
    dir: PathBuf,
    file: PathBuf,
}

impl Overlay {
    fn stage(unsaved: &[UnsavedFile]) -> std::io::Result<Option<Self>> {
        if unsaved.is_empty() {
            return Ok(None);
        }

        let id = NEXT_AST_DUMP_ID.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!("cpp-stubgen-{}-{id}", std::process::id()));
        std::fs::create_dir_all(&dir)?;
        let overlay = Self {
            file: dir.join("overlay.json"),
            dir,
        };

        // Overlay roots are directories; group the buffers by parent.
        let mut roots: BTreeMap<PathBuf, Vec<serde_json::Value>> = BTreeMap::new();
        for (index, unsaved_file) in unsaved.iter().enumerate() {
            let (Some(parent), Some(name)) = (unsaved_file.path.parent(), unsaved_file.path.file_name()) else {
                continue;
            };
            let copy = overlay.dir.join(format!("{index}-{}", name.to_string_lossy()));
            std::fs::write(&copy, &unsaved_file.contents)?;
            roots.entry(parent.to_path_buf()).or_default().push(json!({
                "type": "file",
                "name": name.to_string_lossy(),
                "external-contents": copy.display().to_string(),
            }));
        }

        let document = json!({
            "version": 0,
            "use-external-names": false,
            "roots": roots
                .into_iter()
                .map(|(dir, contents)| json!({
                    "type": "directory",
                    "name": dir.display().to_string(),
                    "contents": contents,
                }))
                .collect::<Vec<_>>(),
        });
        std::fs::write(&overlay.file, document.to_string())?;
        Ok(Some(overlay))
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("{0} is not available")]
    CommandNotFound(String),
    #[error("failed to launch {command}: {reason}")]
    LaunchFailed {
        command: String,
        reason: String,
    },
    #[error("failed to stage unsaved buffers: {0}")]
    Overlay(#[source] std::io::Error),
    #[error("{command} produced no AST: {detail}")]
    NoAst {
        command: String,
        detail: String,
    },
    #[error("failed to read AST: {0}")]
    InvalidAst(#[from] serde_json::Error),
}

#[cfg(test)]
#[path = "../../tests/src/clang/compiler_tests.rs"]
mod tests;
