//! The generate-stub command.
//!
//! All analysis runs against a snapshot of the editor's buffers. The only
//! mutation is the final splice, so a failure leaves every buffer as it was.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    clang::{AstDumper, CompileError, Cursor, TranslationUnit, UnsavedFile},
    host::{EditorHost, find_buffer, split_lines},
    stub::{
        classify::{is_function_like, is_scope_block},
        header::make_header,
        paths::{header_path, source_path},
        placement::resolve_placement,
    },
    vfs::absolute_normalized,
};

/// Produces the translation unit for one invocation.
pub trait Parser {
    fn parse(
        &self,
        file: &Path,
        unsaved: &[UnsavedFile],
    ) -> Result<TranslationUnit, CompileError>;
}

impl Parser for AstDumper {
    fn parse(
        &self,
        file: &Path,
        unsaved: &[UnsavedFile],
    ) -> Result<TranslationUnit, CompileError> {
        AstDumper::parse(self, file, unsaved)
    }
}

impl<F> Parser for F
where
    F: Fn(&Path, &[UnsavedFile]) -> Result<TranslationUnit, CompileError>,
{
    fn parse(
        &self,
        file: &Path,
        unsaved: &[UnsavedFile],
    ) -> Result<TranslationUnit, CompileError> {
        self(file, unsaved)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StubError {
    #[error("No file is open")]
    NoFileOpen,
    #[error("Unable to find a function at the location specified")]
    NoFunctionAtCursor,
    #[error("Failed to parse {}: {source}", file.display())]
    Parse {
        file: PathBuf,
        #[source]
        source: CompileError,
    },
}

/// A stub that was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedStub {
    /// The buffer the stub went into.
    pub source: PathBuf,
    /// 0-based line of the stub's header.
    pub line: usize,
    pub header: String,
    pub text: String,
}

/// The text spliced for a stub: header, braces around one blank line, and a
/// separating line.
pub fn stub_text(header: &str) -> String {
    format!("{header}\n{{\n \n}}\n ")
}

/// Generates a definition stub for the function under the host's cursor.
///
/// Errors are reported to the host exactly once before being returned.
pub fn generate_under_cursor<H, P>(
    host: &mut H,
    parser: &P,
) -> Result<GeneratedStub, StubError>
where
    H: EditorHost + ?Sized,
    P: Parser + ?Sized,
{
    let result = plan_and_apply(host, parser);
    if let Err(error) = &result {
        host.report_error(&error.to_string());
    }
    result
}

fn plan_and_apply<H, P>(
    host: &mut H,
    parser: &P,
) -> Result<GeneratedStub, StubError>
where
    H: EditorHost + ?Sized,
    P: Parser + ?Sized,
{
    let current = absolute_normalized(&host.current_file().ok_or(StubError::NoFileOpen)?);
    let (line, column) = host.cursor();

    let header = header_path(&current);
    let source = source_path(&current);
    let unsaved = snapshot_unsaved(host, &[header.as_path(), source.as_path()]);

    let source_available = source.is_file() || find_buffer(host, &source).is_some();
    let parse_file = if source_available {
        &source
    } else {
        &header
    };
    debug!("[generate] parsing {} for {}:{line}:{column}", parse_file.display(), current.display());

    let tu = parser.parse(parse_file, &unsaved).map_err(|error| StubError::Parse {
        file: parse_file.clone(),
        source: error,
    })?;

    let function = match function_at(&tu, &current, line, column) {
        Some(function) => Some(function),
        None => current_line_text(host, &current, line)
            .and_then(|text| find_fn_name_from_line(&text))
            .and_then(|retry| {
                debug!("[generate] retrying at column {retry}");
                function_at(&tu, &current, line, retry)
            }),
    };
    let function = function.ok_or(StubError::NoFunctionAtCursor)?;

    let header_text = make_header(&function);
    let declaration_file = function.file().map_or_else(|| header.clone(), Path::to_path_buf);
    let target = resolve_placement(&tu, function, &source, &declaration_file);
    let text = stub_text(&header_text);

    host.open_or_switch(&source);
    let line_count = host.line_count(&source);
    let at = target.line.map_or(line_count, |line| line.min(line_count));
    host.splice_lines(&source, at, &split_stub(&text));
    host.set_cursor_line(at + 2);

    info!("Generated `{header_text}` in {} at line {}", source.display(), at + 1);
    Ok(GeneratedStub {
        source,
        line: at,
        header: header_text,
        text,
    })
}

fn split_stub(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

fn snapshot_unsaved<H>(
    host: &H,
    paths: &[&Path],
) -> Vec<UnsavedFile>
where
    H: EditorHost + ?Sized,
{
    let mut unsaved: Vec<UnsavedFile> = Vec::new();
    for path in paths {
        if unsaved.iter().any(|file| file.path == *path) {
            continue;
        }
        if let Some(buffer) = find_buffer(host, path) {
            unsaved.push(UnsavedFile::new(*path, buffer.text));
        }
    }
    unsaved
}

fn current_line_text<H>(
    host: &H,
    file: &Path,
    line: usize,
) -> Option<String>
where
    H: EditorHost + ?Sized,
{
    let text = match find_buffer(host, file) {
        Some(buffer) => buffer.text,
        None => std::fs::read_to_string(file).ok()?,
    };
    split_lines(&text).into_iter().nth(line.checked_sub(1)?)
}

/// The innermost function-like cursor containing the position, walking
/// lexical parents from the deepest cursor. Stops at the first scope block.
pub fn function_at<'tu>(
    tu: &'tu TranslationUnit,
    file: &Path,
    line: usize,
    column: usize,
) -> Option<Cursor<'tu>> {
    let mut cursor = Some(tu.cursor_at(file, line, column));
    while let Some(current) = cursor {
        if is_function_like(&current) {
            return Some(current);
        }
        if is_scope_block(&current) {
            return None;
        }
        cursor = current.lexical_parent();
    }
    None
}

/// Retry column for a line whose last `)` closes a parameter list: the
/// 0-based index of the matching `(` minus one, used as a 1-based column.
/// `None` when the line has no `)`, the parentheses do not balance, or the
/// column would fall before the line start.
pub fn find_fn_name_from_line(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let last = line.rfind(')')?;
    let mut depth = 0usize;
    for index in (1..=last).rev() {
        match bytes[index] {
            b')' => depth += 1,
            b'(' => depth = depth.saturating_sub(1),
            _ => {},
        }
        if depth == 0 {
            return Some(index - 1).filter(|column| *column >= 1);
        }
    }
    None
}

#[cfg(test)]
#[path = "../../tests/src/stub/generate_tests.rs"]
mod tests;
