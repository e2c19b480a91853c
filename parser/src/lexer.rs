//! Tokens of the filter language.
//!
//! The lexer works on bytes: everything outside string literals is ASCII,
//! and string literals are copied through unchanged.

use crate::{ParseError, ParseResult, Span};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Int(i64),
    String(String),

    And,
    Or,
    Not,
    Has,
    Null,
    True,
    False,

    LParen,
    RParen,
    Comma,
    Dot,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    Eof,
}

impl TokenKind {
    /// How the token is named in error messages.
    pub fn name(&self) -> &'static str {
        use TokenKind::*;
        match self {
            Ident(_) => "identifier",
            Int(_) => "integer",
            String(_) => "string",
            And => "AND",
            Or => "OR",
            Not => "NOT",
            Has => "has",
            Null => "null",
            True => "true",
            False => "false",
            LParen => "'('",
            RParen => "')'",
            Comma => "','",
            Dot => "'.'",
            Eq => "'='",
            NotEq => "'!='",
            Lt => "'<'",
            LtEq => "'<='",
            Gt => "'>'",
            GtEq => "'>='",
            Eof => "end of filter",
        }
    }
}

/// Reserved words, matched without regard to case.
fn keyword(word: &str) -> Option<TokenKind> {
    const KEYWORDS: [(&str, TokenKind); 7] = [
        ("and", TokenKind::And),
        ("or", TokenKind::Or),
        ("not", TokenKind::Not),
        ("has", TokenKind::Has),
        ("null", TokenKind::Null),
        ("true", TokenKind::True),
        ("false", TokenKind::False),
    ];
    KEYWORDS
        .iter()
        .find(|(text, _)| word.eq_ignore_ascii_case(text))
        .map(|(_, kind)| kind.clone())
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Splits filter text into tokens.
pub struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    line_start: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    /// Every token of the input; the last one is always `Eof`.
    pub fn tokenize(mut self) -> ParseResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_blanks();
            let start = self.mark();
            let Some(byte) = self.peek() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    span: self.span(start),
                });
                return Ok(tokens);
            };
            let kind = self.token(byte, start)?;
            tokens.push(Token {
                kind,
                span: self.span(start),
            });
        }
    }

    fn token(&mut self, byte: u8, start: Mark) -> ParseResult<TokenKind> {
        let kind = match byte {
            b'(' => self.single(TokenKind::LParen),
            b')' => self.single(TokenKind::RParen),
            b',' => self.single(TokenKind::Comma),
            b'.' => self.single(TokenKind::Dot),
            b'=' => self.single(TokenKind::Eq),
            b'<' => self.maybe_eq(TokenKind::Lt, TokenKind::LtEq),
            b'>' => self.maybe_eq(TokenKind::Gt, TokenKind::GtEq),
            b'!' if self.peek_at(1) == Some(b'=') => {
                self.pos += 2;
                TokenKind::NotEq
            }
            b'"' => self.string(start)?,
            b'0'..=b'9' => self.integer(start)?,
            b'-' if self.peek_at(1).is_some_and(|b| b.is_ascii_digit()) => self.integer(start)?,
            b if b == b'_' || b.is_ascii_alphabetic() => self.word(),
            _ => {
                let found = self.src[self.pos..].chars().next().unwrap_or('\0');
                self.pos += found.len_utf8();
                return Err(ParseError::UnexpectedChar {
                    found,
                    span: self.span(start),
                });
            }
        };
        Ok(kind)
    }

    // ==================== Scanners ====================

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    fn maybe_eq(&mut self, bare: TokenKind, with_eq: TokenKind) -> TokenKind {
        self.pos += 1;
        if self.peek() == Some(b'=') {
            self.pos += 1;
            with_eq
        } else {
            bare
        }
    }

    fn word(&mut self) -> TokenKind {
        let begin = self.pos;
        self.eat_while(|b| b == b'_' || b.is_ascii_alphanumeric());
        let text = &self.src[begin..self.pos];
        keyword(text).unwrap_or_else(|| TokenKind::Ident(text.to_string()))
    }

    fn integer(&mut self, start: Mark) -> ParseResult<TokenKind> {
        let begin = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        self.eat_while(|b| b.is_ascii_digit());
        let text = &self.src[begin..self.pos];
        text.parse()
            .map(TokenKind::Int)
            .map_err(|_| ParseError::IntOutOfRange {
                text: text.to_string(),
                span: self.span(start),
            })
    }

    /// A double-quoted literal; `\"` and `\\` are the only escapes.
    fn string(&mut self, start: Mark) -> ParseResult<TokenKind> {
        self.pos += 1;
        let mut value = String::new();
        loop {
            let rest = &self.src[self.pos..];
            let Some(stop) = rest.find(['"', '\\', '\n']) else {
                self.pos = self.src.len();
                return Err(ParseError::UnterminatedString {
                    span: self.span(start),
                });
            };
            value.push_str(&rest[..stop]);
            self.pos += stop;
            match self.bytes()[self.pos] {
                b'"' => {
                    self.pos += 1;
                    return Ok(TokenKind::String(value));
                }
                b'\n' => {
                    return Err(ParseError::UnterminatedString {
                        span: self.span(start),
                    })
                }
                _ => {
                    self.pos += 1;
                    match self.src[self.pos..].chars().next() {
                        Some(c @ ('"' | '\\')) => {
                            value.push(c);
                            self.pos += 1;
                        }
                        Some(found) => {
                            return Err(ParseError::InvalidEscape {
                                found,
                                span: self.span(start),
                            })
                        }
                        None => {
                            return Err(ParseError::UnterminatedString {
                                span: self.span(start),
                            })
                        }
                    }
                }
            }
        }
    }

    // ==================== Cursor ====================

    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn peek_at(&self, ahead: usize) -> Option<u8> {
        self.bytes().get(self.pos + ahead).copied()
    }

    fn eat_while(&mut self, keep: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&keep) {
            self.pos += 1;
        }
    }

    fn skip_blanks(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                    self.line_start = self.pos;
                }
                b' ' | b'\t' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            column: self.src[self.line_start..self.pos].chars().count() + 1,
        }
    }

    fn span(&self, start: Mark) -> Span {
        Span::new(start.pos, self.pos, start.line, start.column)
    }
}

/// Where a token began.
#[derive(Clone, Copy)]
struct Mark {
    pos: usize,
    line: usize,
    column: usize,
}
