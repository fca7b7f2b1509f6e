use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    Lexer::new(source).map(|token| token.kind).collect()
}

fn spellings(source: &str) -> Vec<&str> {
    Lexer::new(source).map(|token| token.spelling).collect()
}

#[test]
fn declaration_tokens() {
    assert_eq!(spellings("void draw() const;"), vec!["void", "draw", "(", ")", "const", ";"]);
    assert_eq!(
        kinds("int g(int count);"),
        vec![
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::LParen,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::RParen,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn comments_and_whitespace_are_dropped() {
    let source = "void f() /* const */ // noexcept\n  noexcept;";
    assert_eq!(spellings(source), vec!["void", "f", "(", ")", "noexcept", ";"]);
}

#[test]
fn scope_and_operators() {
    assert_eq!(spellings("a::b<c*>&"), vec!["a", "::", "b", "<", "c", "*>&"]);
    assert_eq!(kinds("x:y"), vec![TokenKind::Ident, TokenKind::Colon, TokenKind::Ident]);
}

#[test]
fn literals() {
    assert_eq!(
        kinds(r#"f("a)b", ')', 0x1F)"#),
        vec![
            TokenKind::Ident,
            TokenKind::LParen,
            TokenKind::String,
            TokenKind::Comma,
            TokenKind::Char,
            TokenKind::Comma,
            TokenKind::Number,
            TokenKind::RParen,
        ]
    );
}

#[test]
fn offsets_are_absolute_when_lexing_from_the_middle() {
    let source = "int a;\nvoid f();";
    let tokens: Vec<_> = Lexer::at(source, 7).collect();
    assert_eq!(tokens[0].spelling, "void");
    assert_eq!(tokens[0].offset, 7);
    assert_eq!(tokens[1].offset, 12);
}

#[test]
fn start_past_the_end_yields_nothing() {
    assert_eq!(Lexer::at("int a;", 100).count(), 0);
}
