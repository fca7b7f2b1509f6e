use std::path::Path;

use super::*;

#[test]
fn split_lines_drops_terminators() {
    assert_eq!(split_lines("a\nb\n"), vec!["a", "b"]);
    assert_eq!(split_lines("a\r\nb"), vec!["a", "b"]);
    assert_eq!(split_lines("a\n\n"), vec!["a", ""]);
    assert_eq!(split_lines("\n"), Vec::<String>::new());
    assert!(split_lines("").is_empty());
}

#[test]
fn find_buffer_matches_equivalent_paths() {
    let mut host = MemoryHost::new();
    host.open_with_text("/stubgen-fixture/src/shape.h", "class Shape;\n");

    let found = find_buffer(&host, Path::new("/stubgen-fixture/src/../src/./shape.h")).unwrap();
    assert_eq!(found.path, Path::new("/stubgen-fixture/src/shape.h"));
    assert_eq!(found.text, "class Shape;");
    assert!(find_buffer(&host, Path::new("/stubgen-fixture/src/shape.cpp")).is_none());
}

#[test]
fn find_buffer_through_a_trait_object() {
    let mut host = MemoryHost::new();
    host.open_with_text("/stubgen-fixture/a.cpp", "");
    let host: &dyn EditorHost = &host;
    assert!(find_buffer(host, Path::new("/stubgen-fixture/a.cpp")).is_some());
}
