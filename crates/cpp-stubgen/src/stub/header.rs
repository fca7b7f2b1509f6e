//! Single-line definition headers built from a function declaration.

use crate::{
    clang::{Cursor, TokenKind},
    stub::classify::{is_record_scope, is_structor},
};

/// Collapses the first ` *` or ` &` to `*`/`&`.
///
/// Only the first pointer or reference marker that has a space before it is
/// touched: `char **` becomes `char**`, `Foo` is returned as is.
pub fn format_type_name(type_name: &str) -> String {
    let bytes = type_name.as_bytes();
    for (index, &byte) in bytes.iter().enumerate() {
        if matches!(byte, b'*' | b'&') && index > 0 && bytes[index - 1] == b' ' {
            return format!("{}{}", &type_name[..index - 1], &type_name[index..]);
        }
    }
    type_name.to_string()
}

/// `type name, type name, ...` for the parameters of `function`. Unnamed
/// parameters contribute their type only.
pub fn args_list(function: &Cursor<'_>) -> String {
    function
        .arguments()
        .map(|argument| {
            let type_name = format_type_name(argument.type_spelling().unwrap_or_default());
            match argument.spelling() {
                "" => type_name,
                name => format!("{type_name} {name}"),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// The enclosing record scopes of `function`, outermost first, joined with
/// `::`. `None` for a function outside any class.
pub fn member_class_name(function: &Cursor<'_>) -> Option<String> {
    let mut names = Vec::new();
    let mut scope = function.semantic_parent();
    while let Some(cursor) = scope {
        if is_record_scope(&cursor) && !cursor.spelling().is_empty() {
            names.push(cursor.spelling());
        }
        scope = cursor.semantic_parent();
    }
    if names.is_empty() {
        return None;
    }
    names.reverse();
    Some(names.join("::"))
}

/// `[<return type> ][<Class>::...]<name>(<args>)[ const][ noexcept]`
pub fn make_header(function: &Cursor<'_>) -> String {
    let mut header = String::new();

    if !is_structor(function) {
        header.push_str(&format_type_name(function.result_type().unwrap_or_default()));
        header.push(' ');
    }

    if let Some(class_name) = member_class_name(function) {
        header.push_str(&class_name);
        header.push_str("::");
    }

    header.push_str(function.spelling());
    header.push('(');
    header.push_str(&args_list(function));
    header.push(')');

    for qualifier in trailing_qualifiers(function) {
        header.push(' ');
        header.push_str(qualifier);
    }

    header
}

/// `const` and `noexcept` written after the parameter list, in token order.
/// A trailing return type ends the scan.
fn trailing_qualifiers(function: &Cursor<'_>) -> Vec<&'static str> {
    let mut qualifiers = Vec::new();
    let mut depth = 0usize;
    let mut params_closed = false;

    for token in function.tokens() {
        match token.kind {
            TokenKind::LBrace => break,
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    params_closed = true;
                }
            },
            TokenKind::Operator if depth == 0 && params_closed && token.spelling == "->" => break,
            TokenKind::Ident if depth == 0 && params_closed => {
                let qualifier = match token.spelling {
                    "const" => "const",
                    "noexcept" => "noexcept",
                    _ => continue,
                };
                if !qualifiers.contains(&qualifier) {
                    qualifiers.push(qualifier);
                }
            },
            _ => {},
        }
    }

    qualifiers
}

#[cfg(test)]
#[path = "../../tests/src/stub/header_tests.rs"]
mod tests;
