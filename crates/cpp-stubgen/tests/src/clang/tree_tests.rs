use std::path::Path;

use super::*;
use crate::test_support::{
    Decl, SHAPE_CPP, SHAPE_H, Source, WIDGET_CPP, WIDGET_H, dump, find_cursor as find, shape_unit, unit, widget_unit,
};

#[test]
fn implicit_declarations_are_dropped() {
    let tu = shape_unit();
    let shape = find(tu.root(), CursorKind::ClassDecl, "Shape").unwrap();
    let kinds: Vec<_> = shape.children().map(|child| child.kind()).collect();
    assert_eq!(kinds, vec![CursorKind::Other, CursorKind::CxxMethod]);
}

#[test]
fn cursor_at_returns_the_deepest_cursor() {
    let tu = widget_unit();
    let (line, column) = WIDGET_H.find("count");
    let cursor = tu.cursor_at(Path::new(WIDGET_H.path), line, column);
    assert_eq!(cursor.kind(), CursorKind::ParmDecl);
    assert_eq!(cursor.spelling(), "count");
    assert_eq!(cursor.lexical_parent().unwrap().spelling(), "g");
}

#[test]
fn cursor_at_is_scoped_to_the_file() {
    let tu = widget_unit();
    let (line, column) = WIDGET_H.find("count");
    let cursor = tu.cursor_at(Path::new(WIDGET_CPP.path), line, column);
    assert_ne!(cursor.spelling(), "count");
}

#[test]
fn cursor_at_outside_everything_is_the_root() {
    let tu = shape_unit();
    let cursor = tu.cursor_at(Path::new(SHAPE_H.path), 40, 1);
    assert_eq!(cursor.kind(), CursorKind::TranslationUnit);
    assert_eq!(cursor, tu.root());
}

#[test]
fn extent_end_covers_the_last_token() {
    let tu = shape_unit();
    let draw = find(tu.root(), CursorKind::CxxMethod, "draw").unwrap();
    let extent = draw.extent().unwrap();
    assert_eq!((extent.start.line, extent.start.column), (3, 5));
    // `const` starts at column 17 and is 5 bytes long.
    assert_eq!((extent.end.line, extent.end.column), (3, 21));
    assert!(extent.contains(3, 21));
    assert!(!extent.contains(3, 22));
}

#[test]
fn out_of_line_definitions_take_their_semantic_parent_from_the_context_id() {
    let tu = widget_unit();
    let cpp_namespace = tu.root().children().nth(1).unwrap();
    let definition = cpp_namespace.children().next().unwrap();
    assert_eq!(definition.spelling(), "f");
    assert_eq!(definition.lexical_parent().unwrap().kind(), CursorKind::Namespace);
    let semantic = definition.semantic_parent().unwrap();
    assert_eq!(semantic.kind(), CursorKind::ClassDecl);
    assert_eq!(semantic.spelling(), "Widget");
}

#[test]
fn redeclarations_share_a_canonical_cursor() {
    let tu = widget_unit();
    let widget = find(tu.root(), CursorKind::ClassDecl, "Widget").unwrap();
    let declared_f = widget.children().find(|c| c.spelling() == "f").unwrap();
    let declared_h = widget.children().find(|c| c.spelling() == "h").unwrap();
    let cpp_namespace = tu.root().children().nth(1).unwrap();
    let defined_f = cpp_namespace.children().next().unwrap();

    assert_ne!(defined_f, declared_f);
    assert_eq!(defined_f.canonical(), declared_f);
    assert_ne!(defined_f.canonical(), declared_h.canonical());
}

#[test]
fn file_is_normalized() {
    let tu = shape_unit();
    let draw = find(tu.root(), CursorKind::CxxMethod, "draw").unwrap();
    assert_eq!(draw.file(), Some(Path::new(SHAPE_H.path)));
    assert_eq!(tu.root().file(), None);
}

#[test]
fn tokens_run_on_to_the_terminator() {
    let tu = shape_unit();
    let draw = find(tu.root(), CursorKind::CxxMethod, "draw").unwrap();
    let spellings: Vec<_> = draw.tokens().into_iter().map(|token| token.spelling).collect();
    assert_eq!(spellings, vec!["void", "draw", "(", ")", "const", ";"]);
}

#[test]
fn tokens_read_unsaved_text_over_disk() {
    let edited = Source::new(SHAPE_H.path, "class Shape {\npublic:\n    void draw() const noexcept;\n};\n");
    let tu = unit(crate::test_support::shape_decls(), &[edited, SHAPE_CPP]);
    let draw = find(tu.root(), CursorKind::CxxMethod, "draw").unwrap();
    let spellings: Vec<_> = draw.tokens().into_iter().map(|token| token.spelling).collect();
    assert_eq!(spellings, vec!["void", "draw", "(", ")", "const", "noexcept", ";"]);
}

#[test]
fn arguments_and_result_type() {
    let tu = widget_unit();
    let g = find(tu.root(), CursorKind::CxxMethod, "g").unwrap();
    let arguments: Vec<_> = g.arguments().map(|arg| (arg.spelling(), arg.type_spelling().unwrap())).collect();
    assert_eq!(arguments, vec![("count", "int"), ("label", "const char *")]);
    assert_eq!(g.result_type(), Some("int"));
}

const TEMPLATES_H: Source = Source::new(
    "/stubgen-fixture/templates.h",
    "template <typename T>\nstruct Box {\n    T get() const;\n};\n\ntemplate <typename T>\nT twice(T value);\n",
);

fn template_unit() -> TranslationUnit {
    let h = TEMPLATES_H;
    let class_template = Decl::new(0x40, "ClassTemplateDecl")
        .name("Box")
        .at(h.loc("Box"))
        .range(h.loc("template"), h.loc_nth("}", 0))
        .child(Decl::new(0x41, "TemplateTypeParmDecl").name("T").at(h.loc("T")).range(h.loc("typename"), h.loc("T")))
        .child(
            Decl::new(0x42, "CXXRecordDecl")
                .name("Box")
                .tag("struct")
                .at(h.loc("Box"))
                .range(h.loc("struct"), h.loc_nth("}", 0))
                .child(Decl::new(0x43, "CXXRecordDecl").name("Box").tag("struct").implicit())
                .child(
                    Decl::new(0x44, "CXXMethodDecl")
                        .name("get")
                        .ty("T () const")
                        .at(h.loc("get"))
                        .range(h.loc_in("T get", "T"), h.loc_in("() const", "const")),
                ),
        )
        .child(Decl::new(0x45, "ClassTemplateSpecializationDecl").name("Box").tag("struct"));
    let function_template = Decl::new(0x50, "FunctionTemplateDecl")
        .name("twice")
        .at(h.loc("twice"))
        .range(h.loc_nth("template", 1), h.loc_in("value)", ")"))
        .child(
            Decl::new(0x51, "TemplateTypeParmDecl")
                .name("T")
                .at(h.loc_nth("T", 2))
                .range(h.loc_nth("typename", 1), h.loc_nth("T", 2)),
        )
        .child(
            Decl::new(0x52, "FunctionDecl")
                .name("twice")
                .ty("T (T)")
                .at(h.loc("twice"))
                .range(h.loc_in("T twice", "T"), h.loc_in("value)", ")"))
                .child(
                    Decl::new(0x53, "ParmVarDecl")
                        .name("value")
                        .ty("T")
                        .at(h.loc("value"))
                        .range(h.loc_in("T value", "T"), h.loc("value")),
                ),
        );
    unit(vec![class_template, function_template], &[h])
}

#[test]
fn class_templates_become_one_cursor() {
    let tu = template_unit();
    let top: Vec<_> = tu.root().children().map(|c| c.kind()).collect();
    assert_eq!(top, vec![CursorKind::ClassTemplate, CursorKind::FunctionTemplate]);

    let class_template = tu.root().children().next().unwrap();
    let members: Vec<_> = class_template.children().map(|c| (c.kind(), c.spelling())).collect();
    assert_eq!(members, vec![(CursorKind::CxxMethod, "get")]);
}

#[test]
fn function_templates_carry_the_templated_function() {
    let tu = template_unit();
    let twice = tu.root().children().nth(1).unwrap();
    assert_eq!(twice.kind(), CursorKind::FunctionTemplate);
    assert_eq!(twice.templated_kind(), Some(CursorKind::FunctionDecl));
    assert_eq!(twice.spelling(), "twice");
    assert_eq!(twice.result_type(), Some("T"));
    let arguments: Vec<_> = twice.arguments().map(|arg| arg.spelling()).collect();
    assert_eq!(arguments, vec!["value"]);
}

#[test]
fn record_kinds_follow_the_tag() {
    let source = Source::new("/stubgen-fixture/records.h", "union U {};\nstruct S {};\nclass C {};\n");
    let tu = unit(
        vec![
            Decl::new(0x60, "CXXRecordDecl").name("U").tag("union").at(source.loc("U")),
            Decl::new(0x61, "CXXRecordDecl").name("S").tag("struct").at(source.loc("S")),
            Decl::new(0x62, "CXXRecordDecl").name("C").tag("class").at(source.loc("C")),
            Decl::new(0x63, "LinkageSpecDecl").at(source.loc("U")),
        ],
        &[source],
    );
    let kinds: Vec<_> = tu.root().children().map(|c| c.kind()).collect();
    assert_eq!(
        kinds,
        vec![CursorKind::UnionDecl, CursorKind::StructDecl, CursorKind::ClassDecl, CursorKind::UnexposedDecl]
    );
}

#[test]
fn result_type_splitting() {
    assert_eq!(split_result_type("void ()"), "void");
    assert_eq!(split_result_type("const Foo &(int) const"), "const Foo &");
    assert_eq!(split_result_type("Foo *(Foo &)"), "Foo *");
    assert_eq!(split_result_type("std::function<void (int)> (bool)"), "std::function<void (int)>");
    assert_eq!(split_result_type("(int)"), "");
    assert_eq!(split_result_type("int"), "int");
}

#[test]
fn trailing_return_types_replace_auto() {
    assert_eq!(split_result_type("auto () -> int"), "int");
    assert_eq!(split_result_type("auto (int) const noexcept -> const char *"), "const char *");
    assert_eq!(split_result_type("auto (std::vector<int>) -> std::map<int, int>"), "std::map<int, int>");
    assert_eq!(split_result_type("auto (auto (*)() -> int) -> bool"), "bool");
    assert_eq!(split_result_type("auto ()"), "auto");
}

#[test]
fn fixture_dumps_keep_clang_key_order() {
    let text = dump(vec![Decl::new(0x2, "NamespaceDecl").child(Decl::new(0x3, "NamespaceDecl"))]);
    let kind = text.find("\"kind\"").unwrap();
    let inner = text.find("\"inner\"").unwrap();
    assert!(text.starts_with("{\"id\":\"0x1\""), "{text}");
    assert!(kind < inner, "{text}");
    assert!(text.find("\"0x2\"").unwrap() < text.rfind("\"kind\":\"NamespaceDecl\"").unwrap());
}
