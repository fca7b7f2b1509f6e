//! Where a new definition goes in the definition file.
//!
//! Three walks share [`walker::run`]: the function declared right after the
//! target, that function's existing definition, and the namespaces of the
//! definition file. Each walk only descends into nodes located in the file
//! it scans.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    clang::{Cursor, CursorKind, TranslationUnit},
    stub::{
        classify::is_function_like,
        walker::{self, Traversal, Visit},
    },
    vfs::normalized_path,
};

/// Where to splice a stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionTarget<'tu> {
    /// The namespace the stub is placed in when it falls back to the end of
    /// a namespace.
    pub namespace: Option<Cursor<'tu>>,
    /// 0-based line to insert before. `None` appends at the end of the buffer.
    pub line: Option<usize>,
}

/// Whether `cursor` is in `file`. Cursors without a location (the root) count
/// as in every file.
enum FileMatch {
    Inside,
    Outside,
    Unlocated,
}

fn file_match(
    cursor: &Cursor<'_>,
    file: &Path,
) -> FileMatch {
    match cursor.file() {
        Some(path) if path == file => FileMatch::Inside,
        Some(_) => FileMatch::Outside,
        None => FileMatch::Unlocated,
    }
}

/// Every namespace in a file, in document order, nested ones included.
pub struct NamespaceCollector<'tu> {
    file: PathBuf,
    namespaces: Vec<Cursor<'tu>>,
}

impl NamespaceCollector<'_> {
    pub fn new(file: &Path) -> Self {
        Self {
            file: normalized_path(file),
            namespaces: Vec::new(),
        }
    }
}

impl<'tu> Traversal<'tu> for NamespaceCollector<'tu> {
    type Output = Vec<Cursor<'tu>>;

    fn visit(
        &mut self,
        cursor: Cursor<'tu>,
        _parent: Option<Cursor<'tu>>,
    ) -> Visit {
        match file_match(&cursor, &self.file) {
            FileMatch::Outside => Visit::Prune,
            FileMatch::Inside if cursor.kind() == CursorKind::Namespace => {
                self.namespaces.push(cursor);
                Visit::Continue
            },
            _ => Visit::Continue,
        }
    }

    fn finish(self) -> Self::Output {
        self.namespaces
    }
}

/// The first function-like declaration after `target` in document order.
pub struct NextFunctionFinder<'tu> {
    file: PathBuf,
    target: Cursor<'tu>,
    seen_target: bool,
    found: Option<Cursor<'tu>>,
}

impl<'tu> NextFunctionFinder<'tu> {
    pub fn new(
        file: &Path,
        target: Cursor<'tu>,
    ) -> Self {
        Self {
            file: normalized_path(file),
            target: target.canonical(),
            seen_target: false,
            found: None,
        }
    }
}

impl<'tu> Traversal<'tu> for NextFunctionFinder<'tu> {
    type Output = Option<Cursor<'tu>>;

    fn visit(
        &mut self,
        cursor: Cursor<'tu>,
        _parent: Option<Cursor<'tu>>,
    ) -> Visit {
        if self.found.is_some() {
            return Visit::Prune;
        }
        match file_match(&cursor, &self.file) {
            FileMatch::Outside => return Visit::Prune,
            FileMatch::Inside if is_function_like(&cursor) => {
                if cursor.canonical() == self.target {
                    self.seen_target = true;
                } else if self.seen_target {
                    self.found = Some(cursor);
                    return Visit::Prune;
                }
            },
            _ => {},
        }
        Visit::Continue
    }

    fn finish(self) -> Self::Output {
        self.found
    }
}

/// A declaration in a file that is the same entity as `target`.
pub struct DefinitionFinder<'tu> {
    file: PathBuf,
    target: Cursor<'tu>,
    found: Option<Cursor<'tu>>,
}

impl<'tu> DefinitionFinder<'tu> {
    pub fn new(
        file: &Path,
        target: Cursor<'tu>,
    ) -> Self {
        Self {
            file: normalized_path(file),
            target: target.canonical(),
            found: None,
        }
    }
}

impl<'tu> Traversal<'tu> for DefinitionFinder<'tu> {
    type Output = Option<Cursor<'tu>>;

    fn visit(
        &mut self,
        cursor: Cursor<'tu>,
        _parent: Option<Cursor<'tu>>,
    ) -> Visit {
        if self.found.is_some() {
            return Visit::Prune;
        }
        match file_match(&cursor, &self.file) {
            FileMatch::Outside => Visit::Prune,
            FileMatch::Inside if is_function_like(&cursor) && cursor.canonical() == self.target => {
                self.found = Some(cursor);
                Visit::Prune
            },
            _ => Visit::Continue,
        }
    }

    fn finish(self) -> Self::Output {
        self.found
    }
}

/// Picks the insertion point for a definition of `function` in
/// `definition_file`.
///
/// Prefers the line where the definition of the function declared after
/// `function` in `declaration_file` starts, so the new stub lands just above
/// it. Otherwise the stub goes above the closing line of the last namespace
/// in `definition_file`. Otherwise at the end of the buffer.
pub fn resolve_placement<'tu>(
    tu: &'tu TranslationUnit,
    function: Cursor<'tu>,
    definition_file: &Path,
    declaration_file: &Path,
) -> InsertionTarget<'tu> {
    let scope = function.semantic_parent().unwrap_or_else(|| tu.root());
    let next = walker::run(scope, NextFunctionFinder::new(declaration_file, function));
    debug!("[placement] next declaration after {:?}: {next:?}", function.spelling());

    if let Some(next) = next
        && let Some(definition) = walker::run(tu.root(), DefinitionFinder::new(definition_file, next))
        && let Some(extent) = definition.extent()
    {
        debug!("[placement] inserting above {:?} at line {}", definition.spelling(), extent.start.line);
        return InsertionTarget {
            namespace: None,
            line: Some(extent.start.line.saturating_sub(1)),
        };
    }

    let namespace = walker::run(tu.root(), NamespaceCollector::new(definition_file)).pop();
    let line = namespace.and_then(|ns| ns.extent()).map(|extent| extent.end.line.saturating_sub(1));
    debug!("[placement] namespace fallback: {namespace:?}, line {line:?}");
    InsertionTarget {
        namespace,
        line,
    }
}

#[cfg(test)]
#[path = "../../tests/src/stub/placement_tests.rs"]
mod tests;
