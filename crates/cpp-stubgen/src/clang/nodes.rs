use clang_ast::{BareSourceLocation, Id, SourceLocation, SourceRange};
use serde::Deserialize;

pub type Node = clang_ast::Node<Clang>;

/// Typed representation of the Clang AST node kinds the stub generator
/// cares about.
///
/// Each variant corresponds to a Clang AST node `"kind"` value. Everything
/// else lands in `Other`, which still keeps its location data.
#[derive(Deserialize)]
pub enum Clang {
    // --- Functions ---
    FunctionDecl(DeclData),
    CXXMethodDecl(DeclData),
    CXXConstructorDecl(DeclData),
    CXXDestructorDecl(DeclData),
    CXXConversionDecl(DeclData),
    FunctionTemplateDecl(DeclData),

    // --- Scopes ---
    NamespaceDecl(DeclData),
    CXXRecordDecl(DeclData),
    RecordDecl(DeclData),
    EnumDecl(DeclData),
    ClassTemplateDecl(DeclData),
    ClassTemplatePartialSpecializationDecl(DeclData),
    ClassTemplateSpecializationDecl(DeclData),
    LinkageSpecDecl(DeclData),

    // --- Parameters ---
    ParmVarDecl(DeclData),

    // --- Catch-all ---
    // `loc` and `range` MUST be deserialized even here: `clang-ast` carries
    // the "current file" from one location to the next across the stream,
    // so skipping a node that switches files would misattribute every
    // location after it.
    Other {
        #[serde(default)]
        loc: Option<SourceLocation>,
        #[serde(default)]
        range: Option<SourceRange>,
        #[serde(rename = "isImplicit", default)]
        is_implicit: Option<bool>,
    },
}

/// Common data for all declaration nodes.
///
/// `ty` is Clang's `type.qualType`: `"void (int) const"` for a method,
/// `"const Foo &"` for a parameter.
#[derive(Deserialize, Debug)]
pub struct DeclData {
    pub name: Option<String>,
    pub loc: Option<SourceLocation>,
    pub range: Option<SourceRange>,
    #[serde(rename = "isImplicit")]
    pub is_implicit: Option<bool>,
    #[serde(rename = "type")]
    pub ty: Option<QualType>,
    #[serde(rename = "previousDecl")]
    pub previous_decl: Option<Id>,
    #[serde(rename = "parentDeclContextId")]
    pub parent_decl_context_id: Option<Id>,
    #[serde(rename = "tagUsed")]
    pub tag_used: Option<String>,
}

/// Clang's qualified type representation.
#[derive(Deserialize, Debug)]
pub struct QualType {
    #[serde(rename = "qualType")]
    pub qual_type: Option<String>,
}

impl DeclData {
    pub fn is_implicit(&self) -> bool {
        self.is_implicit.unwrap_or(false)
    }

    pub fn qual_type(&self) -> Option<&str> {
        self.ty.as_ref().and_then(|t| t.qual_type.as_deref())
    }
}

impl Clang {
    pub fn decl(&self) -> Option<&DeclData> {
        match self {
            Clang::FunctionDecl(d)
            | Clang::CXXMethodDecl(d)
            | Clang::CXXConstructorDecl(d)
            | Clang::CXXDestructorDecl(d)
            | Clang::CXXConversionDecl(d)
            | Clang::FunctionTemplateDecl(d)
            | Clang::NamespaceDecl(d)
            | Clang::CXXRecordDecl(d)
            | Clang::RecordDecl(d)
            | Clang::EnumDecl(d)
            | Clang::ClassTemplateDecl(d)
            | Clang::ClassTemplatePartialSpecializationDecl(d)
            | Clang::ClassTemplateSpecializationDecl(d)
            | Clang::LinkageSpecDecl(d)
            | Clang::ParmVarDecl(d) => Some(d),
            Clang::Other {
                ..
            } => None,
        }
    }

    pub fn is_implicit(&self) -> bool {
        match self {
            Clang::Other {
                is_implicit,
                ..
            } => is_implicit.unwrap_or(false),
            other => other.decl().is_some_and(DeclData::is_implicit),
        }
    }

    pub fn loc(&self) -> Option<&SourceLocation> {
        match self {
            Clang::Other {
                loc,
                ..
            } => loc.as_ref(),
            other => other.decl().and_then(|d| d.loc.as_ref()),
        }
    }

    pub fn range(&self) -> Option<&SourceRange> {
        match self {
            Clang::Other {
                range,
                ..
            } => range.as_ref(),
            other => other.decl().and_then(|d| d.range.as_ref()),
        }
    }
}

/// Extract the best concrete source location from a [`SourceLocation`].
///
/// Prefers the expansion location (where a macro was invoked, i.e. the
/// position the user sees in their file) over the spelling location.
pub fn resolve_loc(loc: &SourceLocation) -> Option<&BareSourceLocation> {
    loc.expansion_loc.as_ref().or(loc.spelling_loc.as_ref())
}
