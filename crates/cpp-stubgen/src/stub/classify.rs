use crate::clang::{Cursor, CursorKind};

/// Free functions, function templates, methods, constructors and destructors.
pub fn is_function_like(cursor: &Cursor<'_>) -> bool {
    matches!(
        cursor.kind(),
        CursorKind::FunctionDecl
            | CursorKind::FunctionTemplate
            | CursorKind::CxxMethod
            | CursorKind::Destructor
            | CursorKind::Constructor
    )
}

/// Declarations that open a named scope other than a function.
pub fn is_scope_block(cursor: &Cursor<'_>) -> bool {
    matches!(
        cursor.kind(),
        CursorKind::Namespace
            | CursorKind::UnionDecl
            | CursorKind::StructDecl
            | CursorKind::EnumDecl
            | CursorKind::ClassDecl
            | CursorKind::UnexposedDecl
            | CursorKind::ClassTemplate
            | CursorKind::ClassTemplatePartialSpecialization
    )
}

/// Record scopes that qualify a member's name: classes, structs, unions and
/// class templates.
pub(crate) fn is_record_scope(cursor: &Cursor<'_>) -> bool {
    matches!(
        cursor.kind(),
        CursorKind::ClassDecl
            | CursorKind::StructDecl
            | CursorKind::UnionDecl
            | CursorKind::ClassTemplate
            | CursorKind::ClassTemplatePartialSpecialization
    )
}

/// Constructors and destructors, template ones included. These take no
/// return type.
pub(crate) fn is_structor(cursor: &Cursor<'_>) -> bool {
    let kind = match cursor.kind() {
        CursorKind::FunctionTemplate => cursor.templated_kind().unwrap_or(CursorKind::FunctionDecl),
        kind => kind,
    };
    matches!(kind, CursorKind::Constructor | CursorKind::Destructor)
}

#[cfg(test)]
#[path = "../../tests/src/stub/classify_tests.rs"]
mod tests;
