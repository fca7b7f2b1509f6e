use std::sync::Arc;

use tokio::sync::RwLock;
use tower_lsp::Client;

use crate::{config::Settings, document::DocumentStore};

/// The cpp-stubgen backend that implements the Language Server Protocol.
pub struct StubLanguageServer {
    /// The LSP client handle, used for edits and messages back to the editor.
    pub(crate) client: Client,

    /// Thread-safe store of all open documents.
    pub(crate) document_store: Arc<DocumentStore>,

    /// Runtime settings updated from LSP configuration.
    pub(crate) settings: Arc<RwLock<Settings>>,
}

impl StubLanguageServer {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            document_store: Arc::new(DocumentStore::new()),
            settings: Arc::new(RwLock::new(Settings::default())),
        }
    }

    pub(crate) async fn settings_snapshot(&self) -> Settings {
        self.settings.read().await.clone()
    }

    pub(crate) async fn apply_settings(
        &self,
        settings: Settings,
    ) {
        *self.settings.write().await = settings;
    }
}
