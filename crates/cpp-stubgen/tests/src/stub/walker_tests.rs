use super::*;
use crate::{
    clang::CursorKind,
    test_support::{widget_unit, shape_unit},
};

#[test]
fn visits_in_document_order() {
    let tu = widget_unit();
    let mut seen = Vec::new();
    traverse(tu.root(), |cursor, _| {
        if !cursor.spelling().is_empty() {
            seen.push(cursor.spelling());
        }
        Visit::Continue
    });
    assert_eq!(seen, vec!["ui", "Widget", "f", "g", "count", "label", "h", "ui", "f", "h"]);
}

#[test]
fn prune_skips_the_subtree() {
    let tu = widget_unit();
    let mut seen = Vec::new();
    traverse(tu.root(), |cursor, _| {
        seen.push(cursor.kind());
        if cursor.kind() == CursorKind::Namespace {
            Visit::Prune
        } else {
            Visit::Continue
        }
    });
    assert_eq!(seen, vec![CursorKind::TranslationUnit, CursorKind::Namespace, CursorKind::Namespace]);
}

#[test]
fn parents_are_lexical() {
    let tu = shape_unit();
    traverse(tu.root(), |cursor, parent| {
        assert_eq!(parent, cursor.lexical_parent());
        Visit::Continue
    });
}

struct CountFunctions(usize);

impl<'tu> Traversal<'tu> for CountFunctions {
    type Output = usize;

    fn visit(
        &mut self,
        cursor: Cursor<'tu>,
        _parent: Option<Cursor<'tu>>,
    ) -> Visit {
        if cursor.kind() == CursorKind::CxxMethod {
            self.0 += 1;
        }
        Visit::Continue
    }

    fn finish(self) -> usize {
        self.0
    }
}

#[test]
fn run_returns_the_accumulator() {
    let tu = widget_unit();
    assert_eq!(run(tu.root(), CountFunctions(0)), 5);
    let header_namespace = tu.root().children().next().unwrap();
    assert_eq!(run(header_namespace, CountFunctions(0)), 3);
}
