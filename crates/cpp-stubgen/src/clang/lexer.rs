use logos::Logos;

/// C++ token kinds, as far as declaration scanning needs them.
///
/// Keywords are not split out: they lex as [`TokenKind::Ident`] and callers
/// compare the spelling.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(error = ())]
pub enum TokenKind {
    #[regex(r"([ \t\r\n\f]|\\\r?\n)+")]
    Whitespace,

    #[regex(r"//.*", allow_greedy = true)]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token("::")]
    ColonColon,
    #[token(":")]
    Colon,
    #[token("#")]
    Hash,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r#"'([^'\\]|\\[\s\S])*'"#)]
    Char,
    #[regex(r#""([^"\\]|\\[\s\S])*""#)]
    String,

    #[regex(r"[0-9][0-9A-Za-z_'.]*")]
    Number,

    #[regex(r"[-+*/%^&|~!=<>?.]+")]
    Operator,
}

/// A lexed token with its byte offset in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub spelling: &'a str,
    pub offset: usize,
}

/// A lexer over C++ source that yields [`Token`]s. Whitespace, comments and
/// unlexable bytes are dropped.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    base: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::at(input, 0)
    }

    /// Lex `source[start..]`, reporting offsets relative to the whole of
    /// `source`.
    pub fn at(
        source: &'a str,
        start: usize,
    ) -> Self {
        let start = floor_char_boundary(source, start.min(source.len()));
        Self {
            inner: TokenKind::lexer(&source[start..]),
            base: start,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let result = self.inner.next()?;
            let kind = match result {
                Ok(TokenKind::Whitespace | TokenKind::Comment) | Err(()) => continue,
                Ok(kind) => kind,
            };
            return Some(Token {
                kind,
                spelling: self.inner.slice(),
                offset: self.base + self.inner.span().start,
            });
        }
    }
}

fn floor_char_boundary(
    text: &str,
    mut index: usize,
) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
#[path = "../../tests/src/clang/lexer_tests.rs"]
mod tests;
