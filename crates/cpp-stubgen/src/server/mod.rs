pub(crate) mod handler;
pub(crate) mod lsp_host;
pub(crate) mod state;

pub use handler::GENERATE_STUB_COMMAND;
pub use state::StubLanguageServer;
