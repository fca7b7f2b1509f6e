//! Parsing engine adapter: clang's JSON AST dump, reshaped into cursors.

pub(crate) mod compiler;
pub(crate) mod lexer;
pub(crate) mod nodes;
pub(crate) mod tree;

use std::path::PathBuf;

pub use compiler::{AstDumper, CompileError};
pub use lexer::{Lexer, Token, TokenKind};
pub use tree::{Cursor, CursorKind, SourceLocation, SourceRange, TranslationUnit, split_result_type};

/// Editor-resident text that the parser should see instead of the file on
/// disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsavedFile {
    pub path: PathBuf,
    pub contents: String,
}

impl UnsavedFile {
    pub fn new(
        path: impl Into<PathBuf>,
        contents: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}
