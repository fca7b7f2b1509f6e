//! In-memory translation unit built from a Clang JSON AST dump.
//!
//! The dump is reshaped into an arena of declaration nodes that behaves like
//! a cursor-based parsing API: implicit declarations are gone, class and
//! function templates are single nodes, and redeclaration chains resolve to
//! one canonical node.

use std::{
    cell::OnceCell,
    collections::HashMap,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use clang_ast::Id;
use tracing::debug;

use crate::{
    clang::{
        UnsavedFile,
        lexer::{Lexer, Token, TokenKind},
        nodes::{Clang, DeclData, Node, resolve_loc},
    },
    vfs::normalized_path,
};

/// What kind of construct a [`Cursor`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorKind {
    TranslationUnit,
    Namespace,
    ClassDecl,
    StructDecl,
    UnionDecl,
    EnumDecl,
    ClassTemplate,
    ClassTemplatePartialSpecialization,
    /// Declarations without a dedicated kind, such as `extern "C" { ... }`.
    UnexposedDecl,
    FunctionDecl,
    FunctionTemplate,
    CxxMethod,
    Constructor,
    Destructor,
    ConversionFunction,
    ParmDecl,
    Other,
}

/// A position in a file: 1-based line, 1-based byte column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: Arc<str>,
    pub line: usize,
    pub column: usize,
}

/// The span of a node. `end` points at the last byte of the last token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRange {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceRange {
    pub fn contains(
        &self,
        line: usize,
        column: usize,
    ) -> bool {
        (self.start.line, self.start.column) <= (line, column) && (line, column) <= (self.end.line, self.end.column)
    }
}

struct NodeData {
    kind: CursorKind,
    templated_kind: Option<CursorKind>,
    name: String,
    qual_type: Option<String>,
    location: Option<SourceLocation>,
    extent: Option<SourceRange>,
    lexical_parent: Option<usize>,
    semantic_parent: Option<Id>,
    previous_decl: Option<Id>,
    children: Vec<usize>,
}

struct FileEntry {
    path: PathBuf,
    text: OnceCell<Option<Arc<str>>>,
}

/// One parse of one main file together with everything it includes.
pub struct TranslationUnit {
    nodes: Vec<NodeData>,
    ids: HashMap<Id, usize>,
    files: HashMap<Arc<str>, FileEntry>,
    overrides: HashMap<PathBuf, Arc<str>>,
}

impl TranslationUnit {
    /// Deserialize a `-ast-dump=json` payload and build the unit.
    pub fn from_json(
        json: &str,
        unsaved: &[UnsavedFile],
    ) -> Result<Self, serde_json::Error> {
        let root: Node = serde_json::from_str(json)?;
        Ok(Self::from_root(&root, unsaved))
    }

    pub fn from_root(
        root: &Node,
        unsaved: &[UnsavedFile],
    ) -> Self {
        let overrides = unsaved
            .iter()
            .map(|file| (normalized_path(&file.path), Arc::<str>::from(file.contents.as_str())))
            .collect();
        let mut builder = Builder {
            nodes: Vec::new(),
            ids: HashMap::new(),
            files: HashMap::new(),
        };
        builder.nodes.push(NodeData {
            kind: CursorKind::TranslationUnit,
            templated_kind: None,
            name: String::new(),
            qual_type: None,
            location: None,
            extent: None,
            lexical_parent: None,
            semantic_parent: None,
            previous_decl: None,
            children: Vec::new(),
        });
        for child in &root.inner {
            builder.add(child, 0);
        }
        debug!("[tu] built {} cursors across {} files", builder.nodes.len(), builder.files.len());

        Self {
            nodes: builder.nodes,
            ids: builder.ids,
            files: builder.files,
            overrides,
        }
    }

    pub fn root(&self) -> Cursor<'_> {
        Cursor {
            tu: self,
            index: 0,
        }
    }

    /// The most specific cursor in `file` whose extent covers the position,
    /// or the root when nothing does.
    pub fn cursor_at(
        &self,
        file: &Path,
        line: usize,
        column: usize,
    ) -> Cursor<'_> {
        let target = normalized_path(file);
        let index = self.deepest_containing(0, &target, line, column).unwrap_or(0);
        Cursor {
            tu: self,
            index,
        }
    }

    fn deepest_containing(
        &self,
        index: usize,
        target: &Path,
        line: usize,
        column: usize,
    ) -> Option<usize> {
        for &child in &self.nodes[index].children {
            match &self.nodes[child].extent {
                Some(extent) => {
                    let in_file = self.file_path(&extent.start.file).is_some_and(|p| p == target);
                    if in_file && extent.contains(line, column) {
                        return Some(self.deepest_containing(child, target, line, column).unwrap_or(child));
                    }
                },
                None => {
                    if let Some(found) = self.deepest_containing(child, target, line, column) {
                        return Some(found);
                    }
                },
            }
        }
        None
    }

    fn file_path(
        &self,
        file: &str,
    ) -> Option<&Path> {
        self.files.get(file).map(|entry| entry.path.as_path())
    }

    fn source_text(
        &self,
        file: &str,
    ) -> Option<&str> {
        let entry = self.files.get(file)?;
        entry
            .text
            .get_or_init(|| {
                if let Some(text) = self.overrides.get(&entry.path) {
                    return Some(Arc::clone(text));
                }
                std::fs::read_to_string(&entry.path).ok().map(Arc::from)
            })
            .as_deref()
    }

    fn resolve(
        &self,
        id: Option<Id>,
    ) -> Option<usize> {
        id.and_then(|id| self.ids.get(&id).copied())
    }
}

struct Builder {
    nodes: Vec<NodeData>,
    ids: HashMap<Id, usize>,
    files: HashMap<Arc<str>, FileEntry>,
}

impl Builder {
    fn add(
        &mut self,
        node: &Node,
        parent: usize,
    ) {
        if node.kind.is_implicit() {
            return;
        }

        match &node.kind {
            Clang::ClassTemplateDecl(data) => {
                let index = self.push(node, CursorKind::ClassTemplate, Some(data), parent);
                let templated = node
                    .inner
                    .iter()
                    .find(|child| matches!(child.kind, Clang::CXXRecordDecl(_) | Clang::RecordDecl(_)));
                if let Some(record) = templated {
                    self.ids.insert(record.id, index);
                    for child in &record.inner {
                        self.add(child, index);
                    }
                }
            },
            Clang::FunctionTemplateDecl(data) => {
                let templated = node.inner.iter().find_map(|child| {
                    let kind = function_kind(&child.kind)?;
                    Some((child, kind, child.kind.decl()?))
                });
                let index = self.push(node, CursorKind::FunctionTemplate, Some(data), parent);
                if let Some((function, kind, function_data)) = templated {
                    self.ids.insert(function.id, index);
                    let entry = &mut self.nodes[index];
                    entry.templated_kind = Some(kind);
                    if entry.name.is_empty() {
                        entry.name = function_data.name.clone().unwrap_or_default();
                    }
                    entry.qual_type = function_data.qual_type().map(str::to_owned);
                    entry.previous_decl = entry.previous_decl.or(function_data.previous_decl);
                    entry.semantic_parent = entry.semantic_parent.or(function_data.parent_decl_context_id);
                    for child in &function.inner {
                        self.add(child, index);
                    }
                }
            },
            other => {
                let kind = cursor_kind(other);
                let index = self.push(node, kind, other.decl(), parent);
                for child in &node.inner {
                    self.add(child, index);
                }
            },
        }
    }

    fn push(
        &mut self,
        node: &Node,
        kind: CursorKind,
        data: Option<&DeclData>,
        parent: usize,
    ) -> usize {
        let location = node.kind.loc().and_then(resolve_loc).and_then(|bare| self.location(bare, 0));
        let extent = node.kind.range().and_then(|range| {
            let start = resolve_loc(&range.begin).and_then(|bare| self.location(bare, 0))?;
            let end = resolve_loc(&range.end)
                .and_then(|bare| self.location(bare, bare.tok_len.saturating_sub(1)))
                .unwrap_or_else(|| start.clone());
            Some(SourceRange {
                start,
                end,
            })
        });

        let index = self.nodes.len();
        self.nodes.push(NodeData {
            kind,
            templated_kind: None,
            name: data.and_then(|d| d.name.clone()).unwrap_or_default(),
            qual_type: data.and_then(DeclData::qual_type).map(str::to_owned),
            location,
            extent,
            lexical_parent: Some(parent),
            semantic_parent: data.and_then(|d| d.parent_decl_context_id),
            previous_decl: data.and_then(|d| d.previous_decl),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(index);
        self.ids.insert(node.id, index);
        index
    }

    fn location(
        &mut self,
        bare: &clang_ast::BareSourceLocation,
        extra_columns: usize,
    ) -> Option<SourceLocation> {
        if bare.line == 0 || bare.file.is_empty() {
            return None;
        }
        self.files.entry(Arc::clone(&bare.file)).or_insert_with(|| FileEntry {
            path: normalized_path(Path::new(&*bare.file)),
            text: OnceCell::new(),
        });
        Some(SourceLocation {
            file: Arc::clone(&bare.file),
            line: bare.line,
            column: bare.col + extra_columns,
        })
    }
}

fn function_kind(kind: &Clang) -> Option<CursorKind> {
    match kind {
        Clang::FunctionDecl(_) => Some(CursorKind::FunctionDecl),
        Clang::CXXMethodDecl(_) => Some(CursorKind::CxxMethod),
        Clang::CXXConstructorDecl(_) => Some(CursorKind::Constructor),
        Clang::CXXDestructorDecl(_) => Some(CursorKind::Destructor),
        Clang::CXXConversionDecl(_) => Some(CursorKind::ConversionFunction),
        _ => None,
    }
}

fn cursor_kind(kind: &Clang) -> CursorKind {
    if let Some(function) = function_kind(kind) {
        return function;
    }
    match kind {
        Clang::NamespaceDecl(_) => CursorKind::Namespace,
        Clang::CXXRecordDecl(d) | Clang::RecordDecl(d) | Clang::ClassTemplateSpecializationDecl(d) => {
            match d.tag_used.as_deref() {
                Some("class") => CursorKind::ClassDecl,
                Some("union") => CursorKind::UnionDecl,
                _ => CursorKind::StructDecl,
            }
        },
        Clang::EnumDecl(_) => CursorKind::EnumDecl,
        Clang::ClassTemplateDecl(_) => CursorKind::ClassTemplate,
        Clang::ClassTemplatePartialSpecializationDecl(_) => CursorKind::ClassTemplatePartialSpecialization,
        Clang::FunctionTemplateDecl(_) => CursorKind::FunctionTemplate,
        Clang::LinkageSpecDecl(_) => CursorKind::UnexposedDecl,
        Clang::ParmVarDecl(_) => CursorKind::ParmDecl,
        _ => CursorKind::Other,
    }
}

/// A handle to one node of a [`TranslationUnit`].
///
/// Cursors borrow their unit, so a cursor can never be used with a unit other
/// than the one that produced it.
#[derive(Clone, Copy)]
pub struct Cursor<'tu> {
    tu: &'tu TranslationUnit,
    index: usize,
}

impl PartialEq for Cursor<'_> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        std::ptr::eq(self.tu, other.tu) && self.index == other.index
    }
}

impl Eq for Cursor<'_> {}

impl fmt::Debug for Cursor<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut out = f.debug_struct("Cursor");
        out.field("kind", &self.kind()).field("spelling", &self.spelling());
        if let Some(loc) = self.location() {
            out.field("at", &format_args!("{}:{}:{}", loc.file, loc.line, loc.column));
        }
        out.finish()
    }
}

impl<'tu> Cursor<'tu> {
    fn data(&self) -> &'tu NodeData {
        &self.tu.nodes[self.index]
    }

    fn at(
        &self,
        index: usize,
    ) -> Cursor<'tu> {
        Cursor {
            tu: self.tu,
            index,
        }
    }

    pub fn kind(&self) -> CursorKind {
        self.data().kind
    }

    /// For a [`CursorKind::FunctionTemplate`], the kind of the function it
    /// templates.
    pub fn templated_kind(&self) -> Option<CursorKind> {
        self.data().templated_kind
    }

    pub fn spelling(&self) -> &'tu str {
        &self.data().name
    }

    pub fn type_spelling(&self) -> Option<&'tu str> {
        self.data().qual_type.as_deref()
    }

    pub fn location(&self) -> Option<&'tu SourceLocation> {
        self.data().location.as_ref().or_else(|| self.extent().map(|e| &e.start))
    }

    pub fn extent(&self) -> Option<&'tu SourceRange> {
        self.data().extent.as_ref()
    }

    /// Normalized path of the file this cursor is located in.
    pub fn file(&self) -> Option<&'tu Path> {
        let loc = self.location()?;
        self.tu.file_path(&loc.file)
    }

    pub fn lexical_parent(&self) -> Option<Cursor<'tu>> {
        self.data().lexical_parent.map(|index| self.at(index))
    }

    pub fn semantic_parent(&self) -> Option<Cursor<'tu>> {
        self.tu.resolve(self.data().semantic_parent).map(|index| self.at(index)).or_else(|| self.lexical_parent())
    }

    pub fn children(self) -> impl Iterator<Item = Cursor<'tu>> + 'tu {
        let tu = self.tu;
        self.data().children.iter().map(move |&index| Cursor {
            tu,
            index,
        })
    }

    /// The first declaration of this entity; every redeclaration shares it.
    pub fn canonical(&self) -> Cursor<'tu> {
        let mut index = self.index;
        for _ in 0..self.tu.nodes.len() {
            match self.tu.resolve(self.tu.nodes[index].previous_decl) {
                Some(previous) if previous != index => index = previous,
                _ => break,
            }
        }
        self.at(index)
    }

    pub fn arguments(self) -> impl Iterator<Item = Cursor<'tu>> + 'tu {
        self.children().filter(|child| child.kind() == CursorKind::ParmDecl)
    }

    /// Return type of a function-like cursor, split out of its function type.
    pub fn result_type(&self) -> Option<&'tu str> {
        self.type_spelling().map(split_result_type)
    }

    /// Tokens of this cursor's declaration.
    ///
    /// Covers the extent, then runs on to the first `;` or `{` so qualifiers
    /// that fall outside a declaration's recorded extent are still seen.
    pub fn tokens(&self) -> Vec<Token<'tu>> {
        let Some(extent) = self.extent() else {
            return Vec::new();
        };
        let Some(text) = self.tu.source_text(&extent.start.file) else {
            return Vec::new();
        };
        let Some(start) = byte_offset(text, extent.start.line, extent.start.column) else {
            return Vec::new();
        };
        let end = if extent.end.file == extent.start.file {
            byte_offset(text, extent.end.line, extent.end.column).map_or(text.len(), |offset| offset + 1)
        } else {
            start
        };

        let mut tokens: Vec<Token<'tu>> = Vec::new();
        for token in Lexer::at(text, start) {
            if token.offset < end {
                tokens.push(token);
                continue;
            }
            let closed = tokens
                .last()
                .is_some_and(|last| matches!(last.kind, TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace));
            if closed {
                break;
            }
            let stop = matches!(token.kind, TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace);
            tokens.push(token);
            if stop {
                break;
            }
        }
        tokens
    }
}

/// Byte offset of a 1-based line and 1-based byte column.
fn byte_offset(
    text: &str,
    line: usize,
    column: usize,
) -> Option<usize> {
    let mut line_start = 0usize;
    for _ in 1..line {
        line_start += text[line_start..].find('\n')? + 1;
    }
    let offset = line_start + column.saturating_sub(1);
    (offset <= text.len()).then_some(offset)
}

/// The return type in a Clang function type spelling such as
/// `const Foo &(int) const`. A trailing return type, as in
/// `auto (int) const -> Foo *`, takes the place of the leading `auto`.
///
/// The parameter list opens at the first top-level `(` that follows a space,
/// `*` or `&` (or starts the string). Without one the whole spelling is
/// returned.
pub fn split_result_type(function_type: &str) -> &str {
    let Some(params) = parameter_list_start(function_type) else {
        return function_type.trim_end();
    };
    trailing_return_type(&function_type[params..]).unwrap_or_else(|| function_type[..params].trim_end())
}

fn parameter_list_start(function_type: &str) -> Option<usize> {
    let mut paren_depth = 0usize;
    let mut angle_depth = 0usize;
    let mut previous: Option<char> = None;
    for (index, ch) in function_type.char_indices() {
        match ch {
            '<' => angle_depth += 1,
            '>' if previous != Some('-') => angle_depth = angle_depth.saturating_sub(1),
            '(' => {
                let opens_params = paren_depth == 0
                    && angle_depth == 0
                    && previous.is_none_or(|p| matches!(p, ' ' | '*' | '&'));
                if opens_params {
                    return Some(index);
                }
                paren_depth += 1;
            },
            ')' => paren_depth = paren_depth.saturating_sub(1),
            _ => {},
        }
        previous = Some(ch);
    }
    None
}

/// The type after a top-level `->` that follows the parameter list opening
/// `signature`.
fn trailing_return_type(signature: &str) -> Option<&str> {
    let mut paren_depth = 0usize;
    let mut angle_depth = 0usize;
    let mut params_closed = false;
    let mut previous: Option<char> = None;
    for (index, ch) in signature.char_indices() {
        match ch {
            '(' => paren_depth += 1,
            ')' => {
                paren_depth = paren_depth.saturating_sub(1);
                if paren_depth == 0 {
                    params_closed = true;
                }
            },
            '<' => angle_depth += 1,
            '>' if previous == Some('-') => {
                if params_closed && paren_depth == 0 && angle_depth == 0 {
                    let return_type = signature[index + 1..].trim();
                    return (!return_type.is_empty()).then_some(return_type);
                }
            },
            '>' => angle_depth = angle_depth.saturating_sub(1),
            _ => {},
        }
        previous = Some(ch);
    }
    None
}

#[cfg(test)]
#[path = "../../tests/src/clang/tree_tests.rs"]
mod tests;
