//! Lexer for JSON text.
//!
//! Produces span-based tokens without storing text. Consecutive characters
//! that match no token are coalesced into one `Garbage` token.

use std::ops::Range;

use logos::Logos;

/// Token kinds. Whitespace is skipped by the lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n]+")]
pub enum JsonToken {
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("null")]
    Null,

    /// String literal including both quotes.
    #[regex(r#""(?:[^"\\\x00-\x1F]|\\["\\/bfnrt]|\\u[0-9a-fA-F]{4})*""#)]
    String,

    #[regex(r"-?(?:0|[1-9][0-9]*)(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?")]
    Number,

    /// Input that matches no token.
    Garbage,
}

impl JsonToken {
    /// Human-readable name used in error messages.
    pub fn describe(self) -> &'static str {
        match self {
            Self::LBrace => "`{`",
            Self::RBrace => "`}`",
            Self::LBracket => "`[`",
            Self::RBracket => "`]`",
            Self::Colon => "`:`",
            Self::Comma => "`,`",
            Self::True => "`true`",
            Self::False => "`false`",
            Self::Null => "`null`",
            Self::String => "string",
            Self::Number => "number",
            Self::Garbage => "invalid input",
        }
    }
}

/// Zero-copy token: kind + byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: JsonToken,
    pub span: Range<usize>,
}

impl Token {
    #[inline]
    pub fn new(kind: JsonToken, span: Range<usize>) -> Self {
        Self { kind, span }
    }
}

/// Tokenizes source into span-based tokens.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = JsonToken::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(JsonToken::Garbage, start..lexer.span().start));
                }
                tokens.push(Token::new(kind, lexer.span()));
            }
            Some(Err(())) => {
                if error_start.is_none() {
                    error_start = Some(lexer.span().start);
                }
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token::new(JsonToken::Garbage, start..source.len()));
                }
                break;
            }
        }
    }

    tokens
}

/// Text of a token. O(1) slice into source.
#[inline]
pub fn token_text<'s>(source: &'s str, token: &Token) -> &'s str {
    &source[token.span.clone()]
}
