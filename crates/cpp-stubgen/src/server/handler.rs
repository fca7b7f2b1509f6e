use std::{panic::AssertUnwindSafe, path::PathBuf};

use futures::FutureExt;
use serde_json::Value;
use tower_lsp::{LanguageServer, jsonrpc::Result, lsp_types::*};
use tracing::{debug, info, warn};

use crate::{
    clang::AstDumper,
    config::Settings,
    document::Document,
    server::{
        lsp_host::{ClientRequest, LspHost},
        state::StubLanguageServer,
    },
    stub::{generate_under_cursor, paths::is_c_family},
};

pub const GENERATE_STUB_COMMAND: &str = "cpp-stubgen.generateStub";
const GENERATE_STUB_TITLE: &str = "Generate definition stub";
const CLIENT_NOTIFICATION_PREFIX: &str = "cpp-stubgen:";

#[tower_lsp::async_trait]
impl LanguageServer for StubLanguageServer {
    async fn initialize(
        &self,
        params: InitializeParams,
    ) -> Result<InitializeResult> {
        info!("Initializing cpp-stubgen...");

        let initial_settings = Settings::from_lsp_payload(params.initialization_options.as_ref());
        self.apply_settings(initial_settings).await;

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                text_document_sync: Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::FULL)),
                code_action_provider: Some(CodeActionProviderCapability::Simple(true)),
                execute_command_provider: Some(ExecuteCommandOptions {
                    commands: vec![GENERATE_STUB_COMMAND.to_string()],
                    work_done_progress_options: Default::default(),
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "cpp-stubgen".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(
        &self,
        _: InitializedParams,
    ) {
        let settings = self.settings_snapshot().await;
        info!("cpp-stubgen initialized (parser: {} -std={})", settings.compiler.command, settings.compiler.std);
    }

    async fn did_change_configuration(
        &self,
        params: DidChangeConfigurationParams,
    ) {
        let current = self.settings_snapshot().await;
        let merged = current.merged_with_payload(&params.settings);
        if merged == current {
            return;
        }
        self.apply_settings(merged).await;
        info!("Applied updated cpp-stubgen settings");
    }

    async fn shutdown(&self) -> Result<()> {
        info!("Shutting down cpp-stubgen");
        Ok(())
    }

    async fn did_open(
        &self,
        params: DidOpenTextDocumentParams,
    ) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        let filename = short_name(&uri);
        debug!("Opened {filename} (v{version}, {} bytes)", params.text_document.text.len());

        self.document_store.open(uri, params.text_document.text, version);

        if self.settings_snapshot().await.logging.level.allows_info() {
            let _ = AssertUnwindSafe(
                self.client.log_message(MessageType::INFO, prefixed_client_message(format!("Opened {filename}"))),
            )
            .catch_unwind()
            .await;
        }
    }

    async fn did_change(
        &self,
        params: DidChangeTextDocumentParams,
    ) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;
        self.document_store.apply_changes(&uri, params.content_changes, version);
    }

    async fn did_close(
        &self,
        params: DidCloseTextDocumentParams,
    ) {
        self.document_store.close(&params.text_document.uri);
    }

    async fn code_action(
        &self,
        params: CodeActionParams,
    ) -> Result<Option<CodeActionResponse>> {
        let uri = params.text_document.uri;
        let is_cpp = uri.to_file_path().is_ok_and(|path| is_c_family(&path));
        if !is_cpp {
            return Ok(None);
        }

        let command = Command {
            title: GENERATE_STUB_TITLE.to_string(),
            command: GENERATE_STUB_COMMAND.to_string(),
            arguments: Some(vec![serde_json::json!(uri), serde_json::json!(params.range.start)]),
        };
        Ok(Some(vec![CodeActionOrCommand::CodeAction(CodeAction {
            title: GENERATE_STUB_TITLE.to_string(),
            kind: Some(CodeActionKind::REFACTOR),
            command: Some(command),
            ..Default::default()
        })]))
    }

    async fn execute_command(
        &self,
        params: ExecuteCommandParams,
    ) -> Result<Option<Value>> {
        if params.command != GENERATE_STUB_COMMAND {
            warn!("Unknown command {}", params.command);
            return Ok(None);
        }

        let Some((uri, position)) = command_target(&params.arguments) else {
            self.show_error(format!("{GENERATE_STUB_COMMAND} expects [uri, position] arguments")).await;
            return Ok(None);
        };
        let Some((path, cursor)) = self.cursor_for(&uri, position) else {
            self.show_error(format!("Cannot read {}", short_name(&uri))).await;
            return Ok(None);
        };

        let settings = self.settings_snapshot().await;
        let documents = self.document_store.snapshot();
        debug!("Generating stub for {}:{}:{}", path.display(), cursor.0, cursor.1);

        let task = tokio::task::spawn_blocking(move || {
            let mut host = LspHost::new(path, cursor, documents);
            let dumper = AstDumper::new(settings.compiler);
            // Failures are already recorded on the host.
            let _ = generate_under_cursor(&mut host, &dumper);
            host.into_requests()
        });

        match task.await {
            Ok(requests) => self.replay(requests).await,
            Err(error) => {
                warn!("Stub generation task failed: {error}");
                self.show_error("Stub generation failed unexpectedly").await;
            },
        }
        Ok(None)
    }
}

impl StubLanguageServer {
    /// The file and 1-based cursor for an LSP position, from the open document
    /// or else from disk.
    fn cursor_for(
        &self,
        uri: &Url,
        position: Position,
    ) -> Option<(PathBuf, (usize, usize))> {
        let path = uri.to_file_path().ok()?;
        let document = match self.document_store.get(uri) {
            Some(document) => document,
            None => Document::new(uri.clone(), std::fs::read_to_string(&path).ok()?, 0),
        };
        let cursor = document.cursor_of(position)?;
        Some((path, cursor))
    }

    async fn replay(
        &self,
        requests: Vec<ClientRequest>,
    ) {
        for request in requests {
            match request {
                ClientRequest::ApplyEdit(edit) => match self.client.apply_edit(edit).await {
                    Ok(response) if response.applied => {},
                    Ok(response) => {
                        let reason = response.failure_reason.unwrap_or_else(|| "edit rejected".to_string());
                        warn!("Client did not apply the stub: {reason}");
                        self.show_error(format!("Could not insert the stub: {reason}")).await;
                        return;
                    },
                    Err(error) => {
                        warn!("workspace/applyEdit failed: {error}");
                        return;
                    },
                },
                ClientRequest::ShowDocument(params) => {
                    if let Err(error) = self.client.show_document(params).await {
                        debug!("window/showDocument failed: {error}");
                    }
                },
                ClientRequest::ShowError(message) => self.show_error(message).await,
            }
        }
    }

    async fn show_error(
        &self,
        message: impl AsRef<str>,
    ) {
        let result = AssertUnwindSafe(self.client.show_message(MessageType::ERROR, prefixed_client_message(message)))
            .catch_unwind()
            .await;
        if result.is_err() {
            warn!("show_message panicked (client may have disconnected)");
        }
    }
}

/// `[uri, position]` from the command arguments.
fn command_target(arguments: &[Value]) -> Option<(Url, Position)> {
    let [uri, position, ..] = arguments else {
        return None;
    };
    let uri = serde_json::from_value(uri.clone()).ok()?;
    let position = serde_json::from_value(position.clone()).ok()?;
    Some((uri, position))
}

fn short_name(uri: &Url) -> String {
    uri.path().rsplit('/').next().unwrap_or(uri.path()).to_owned()
}

fn prefixed_client_message(message: impl AsRef<str>) -> String {
    format!("{CLIENT_NOTIFICATION_PREFIX} {}", message.as_ref())
}

#[cfg(test)]
#[path = "../../tests/src/server/handler_tests.rs"]
mod tests;
