pub mod clang;
pub mod config;
pub mod document;
pub mod host;
pub mod server;
pub mod stub;
pub mod vfs;

#[cfg(test)]
#[path = "../tests/src/test_support.rs"]
pub(crate) mod test_support;

pub use clang::{AstDumper, CompileError, Cursor, CursorKind, TranslationUnit, UnsavedFile};
pub use config::Settings;
pub use host::{EditorHost, MemoryHost};
pub use server::StubLanguageServer;
pub use stub::{GeneratedStub, StubError, generate_under_cursor};
