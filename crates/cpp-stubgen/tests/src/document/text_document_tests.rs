use super::*;

fn document(text: &str) -> Document {
    Document::new(Url::parse("file:///project/shape.cpp").unwrap(), text.to_string(), 1)
}

#[test]
fn offsets_and_positions() {
    let doc = document("int a;\nint b;\n");
    let pos = Position::new(1, 4);
    let offset = doc.offset_of(pos).unwrap();
    assert_eq!(offset, 11);
    assert_eq!(doc.position_of(offset), pos);
    assert_eq!(doc.offset_of(Position::new(5, 0)), None);
}

#[test]
fn characters_count_utf16_units() {
    // `é` is one UTF-16 unit and two bytes; the emoji is two units and four bytes.
    let doc = document("// é😀x\n");
    assert_eq!(doc.offset_of(Position::new(0, 4)), Some(5));
    assert_eq!(doc.offset_of(Position::new(0, 6)), Some(9));
    assert_eq!(doc.position_of(9), Position::new(0, 6));
}

#[test]
fn cursor_uses_one_based_byte_columns() {
    let doc = document("namespace ui {\n// é\nvoid f();\n");
    assert_eq!(doc.cursor_of(Position::new(0, 0)), Some((1, 1)));
    assert_eq!(doc.cursor_of(Position::new(2, 5)), Some((3, 6)));
    // Past `é`, the byte column is one further than the character.
    assert_eq!(doc.cursor_of(Position::new(1, 4)), Some((2, 6)));
    assert_eq!(doc.cursor_of(Position::new(9, 0)), None);
}

#[test]
fn insertion_inside_the_text() {
    let doc = document("a\nb\nc\n");
    assert_eq!(doc.insertion_point(0), (Position::new(0, 0), ""));
    assert_eq!(doc.insertion_point(2), (Position::new(2, 0), ""));
}

#[test]
fn insertion_past_the_end() {
    assert_eq!(document("a\nb\n").insertion_point(2), (Position::new(2, 0), ""));
    assert_eq!(document("a\nb").insertion_point(2), (Position::new(1, 1), "\n"));
    assert_eq!(document("a\nb").insertion_point(40), (Position::new(1, 1), "\n"));
    assert_eq!(document("").insertion_point(0), (Position::new(0, 0), ""));
}

#[test]
fn incremental_change() {
    let mut doc = document("void draw();\n");
    doc.apply_changes(
        vec![TextDocumentContentChangeEvent {
            range: Some(Range::new(Position::new(0, 5), Position::new(0, 9))),
            range_length: None,
            text: "paint".to_string(),
        }],
        2,
    );
    assert_eq!(doc.text, "void paint();\n");
    assert_eq!(doc.version, 2);
    assert_eq!(doc.cursor_of(Position::new(1, 0)), Some((2, 1)));
}

#[test]
fn full_content_change() {
    let mut doc = document("old\n");
    doc.apply_changes(
        vec![TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: "new\ncontent".to_string(),
        }],
        3,
    );
    assert_eq!(doc.text, "new\ncontent");
    assert_eq!(doc.version, 3);
    assert_eq!(doc.insertion_point(2), (Position::new(1, 7), "\n"));
}
