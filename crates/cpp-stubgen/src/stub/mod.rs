//! Definition stub generation: find the function under the cursor, format
//! its definition header, pick a line in the source file, splice.

pub mod classify;
pub mod generate;
pub mod header;
pub mod paths;
pub mod placement;
pub mod walker;

pub use generate::{GeneratedStub, Parser, StubError, generate_under_cursor, stub_text};
pub use placement::{InsertionTarget, resolve_placement};
