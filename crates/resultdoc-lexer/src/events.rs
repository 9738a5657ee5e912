//! Structural check of a token stream and conversion to row events.

use resultdoc_meta::{TokenEvent, TokenType};

use crate::error::{RelatedInfo, SyntaxError};
use crate::lexer::{JsonToken, Token, lex};

/// What the next token may be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Expect {
    Value,
    ValueOrEnd,
    Key,
    KeyOrEnd,
    Colon,
    CommaOrEnd,
    Done,
}

impl Expect {
    fn describe(self) -> &'static str {
        match self {
            Self::Value => "expected a value",
            Self::ValueOrEnd => "expected a value or `]`",
            Self::Key => "expected a property name",
            Self::KeyOrEnd => "expected a property name or `}`",
            Self::Colon => "expected `:`",
            Self::CommaOrEnd => "expected `,` or a closing bracket",
            Self::Done => "unexpected content after the root value",
        }
    }
}

#[derive(Clone, Debug)]
struct Open {
    is_object: bool,
    span: std::ops::Range<usize>,
}

/// Tokenize and validate `source`, returning the events of its one root
/// value. String and property events exclude the quotes; `escaped` is set
/// when the content holds a backslash.
pub fn tokenize(source: &str) -> Result<Vec<TokenEvent>, SyntaxError> {
    if u32::try_from(source.len()).is_err() {
        return Err(SyntaxError::at_offset(0, "input exceeds 4 GiB"));
    }

    let tokens = lex(source);
    let mut events = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Open> = Vec::new();
    let mut expect = Expect::Value;

    for token in &tokens {
        let unexpected = || {
            SyntaxError::new(
                token.span.clone(),
                format!("{}, found {}", expect.describe(), token.kind.describe()),
            )
        };

        expect = match (expect, token.kind) {
            (_, JsonToken::Garbage) => {
                return Err(SyntaxError::new(token.span.clone(), "invalid token"));
            }
            (Expect::Value | Expect::ValueOrEnd, JsonToken::LBrace | JsonToken::LBracket) => {
                let is_object = token.kind == JsonToken::LBrace;
                let kind = if is_object {
                    TokenType::StartObject
                } else {
                    TokenType::StartArray
                };
                events.push(TokenEvent::new(kind, token.span.start as u32, 1));
                stack.push(Open {
                    is_object,
                    span: token.span.clone(),
                });
                if is_object {
                    Expect::KeyOrEnd
                } else {
                    Expect::ValueOrEnd
                }
            }
            (
                Expect::Value | Expect::ValueOrEnd,
                JsonToken::String
                | JsonToken::Number
                | JsonToken::True
                | JsonToken::False
                | JsonToken::Null,
            ) => {
                events.push(scalar_event(source, token));
                after_value(&stack)
            }
            (Expect::Key | Expect::KeyOrEnd, JsonToken::String) => {
                let mut event = string_event(source, token);
                event.kind = TokenType::PropertyName;
                events.push(event);
                Expect::Colon
            }
            (Expect::Colon, JsonToken::Colon) => Expect::Value,
            (Expect::CommaOrEnd, JsonToken::Comma) => match stack.last() {
                Some(open) if open.is_object => Expect::Key,
                _ => Expect::Value,
            },
            (
                Expect::CommaOrEnd | Expect::ValueOrEnd | Expect::KeyOrEnd,
                JsonToken::RBrace | JsonToken::RBracket,
            ) => {
                let closes_object = token.kind == JsonToken::RBrace;
                let matches = match (expect, stack.last()) {
                    (Expect::ValueOrEnd, _) => !closes_object,
                    (Expect::KeyOrEnd, _) => closes_object,
                    (_, Some(open)) => open.is_object == closes_object,
                    (_, None) => false,
                };
                if !matches {
                    return Err(unexpected());
                }
                stack.pop();
                let kind = if closes_object {
                    TokenType::EndObject
                } else {
                    TokenType::EndArray
                };
                events.push(TokenEvent::new(kind, token.span.start as u32, 1));
                after_value(&stack)
            }
            _ => return Err(unexpected()),
        };
    }

    match (expect, stack.last()) {
        (Expect::Done, _) => Ok(events),
        (_, Some(open)) => Err(SyntaxError::with_related(
            source.len()..source.len(),
            format!("unexpected end of input, {}", expect.describe()),
            RelatedInfo::new(
                open.span.clone(),
                if open.is_object {
                    "object opened here"
                } else {
                    "array opened here"
                },
            ),
        )),
        (_, None) => Err(SyntaxError::at_offset(
            source.len(),
            format!("unexpected end of input, {}", expect.describe()),
        )),
    }
}

fn after_value(stack: &[Open]) -> Expect {
    if stack.is_empty() {
        Expect::Done
    } else {
        Expect::CommaOrEnd
    }
}

fn scalar_event(source: &str, token: &Token) -> TokenEvent {
    let kind = match token.kind {
        JsonToken::String => return string_event(source, token),
        JsonToken::Number => TokenType::Number,
        JsonToken::True => TokenType::True,
        JsonToken::False => TokenType::False,
        _ => TokenType::Null,
    };
    TokenEvent::new(kind, token.span.start as u32, token.span.len() as u32)
}

fn string_event(source: &str, token: &Token) -> TokenEvent {
    let start = token.span.start + 1;
    let end = token.span.end - 1;
    let escaped = source.as_bytes()[start..end].contains(&b'\\');
    let (offset, length) = (start as u32, (end - start) as u32);
    if escaped {
        TokenEvent::escaped(TokenType::String, offset, length)
    } else {
        TokenEvent::new(TokenType::String, offset, length)
    }
}
