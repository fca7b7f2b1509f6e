use std::fs;

use zed_extension_api::{self as zed, LanguageServerId, Result, serde_json::Value, settings::LspSettings};

const SERVER_NAME: &str = "cpp-stubgen";

struct CppStubgenExtension {
    cached_binary_path: Option<String>,
}

impl CppStubgenExtension {
    fn language_server_binary_path(
        &mut self,
        worktree: &zed::Worktree,
    ) -> Result<String> {
        let lsp_settings = LspSettings::for_worktree(SERVER_NAME, worktree).ok();

        if let Some(path) = lsp_settings.as_ref().and_then(|s| s.binary.as_ref()).and_then(|b| b.path.clone()) {
            return Ok(path);
        }

        if let Some(path) = &self.cached_binary_path
            && fs::metadata(path).is_ok_and(|stat| stat.is_file())
        {
            return Ok(path.clone());
        }

        if let Some(path) = worktree.which(SERVER_NAME) {
            self.cached_binary_path = Some(path.clone());
            return Ok(path);
        }

        Err(format!(
            "{SERVER_NAME} was not found on PATH.\n\
             Install it with:\n\
             \n\
             cargo install --path crates/cpp-stubgen\n\
             \n\
             or point `lsp.{SERVER_NAME}.binary.path` at the binary.\n"
        ))
    }

    fn language_server_arguments(
        &self,
        worktree: &zed::Worktree,
    ) -> Vec<String> {
        LspSettings::for_worktree(SERVER_NAME, worktree)
            .ok()
            .and_then(|lsp_settings| lsp_settings.binary)
            .and_then(|binary| binary.arguments)
            .unwrap_or_default()
    }
}

impl zed::Extension for CppStubgenExtension {
    fn new() -> Self {
        CppStubgenExtension {
            cached_binary_path: None,
        }
    }

    fn language_server_command(
        &mut self,
        _language_server_id: &LanguageServerId,
        worktree: &zed::Worktree,
    ) -> Result<zed::Command> {
        let binary_path = self.language_server_binary_path(worktree)?;
        let args = self.language_server_arguments(worktree);

        Ok(zed::Command {
            command: binary_path,
            args,
            env: worktree.shell_env(),
        })
    }

    fn language_server_initialization_options(
        &mut self,
        _language_server_id: &LanguageServerId,
        worktree: &zed::Worktree,
    ) -> Result<Option<Value>> {
        Ok(LspSettings::for_worktree(SERVER_NAME, worktree).ok().and_then(|settings| settings.initialization_options))
    }

    fn language_server_workspace_configuration(
        &mut self,
        _language_server_id: &LanguageServerId,
        worktree: &zed::Worktree,
    ) -> Result<Option<Value>> {
        Ok(LspSettings::for_worktree(SERVER_NAME, worktree).ok().and_then(|settings| settings.settings))
    }
}

zed::register_extension!(CppStubgenExtension);
