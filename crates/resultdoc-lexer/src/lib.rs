//! JSON tokenizer for result documents.
//!
//! [`lex`] splits input into span-based tokens; [`tokenize`] checks the
//! token structure and produces the [`TokenEvent`] stream a
//! `SourceDocumentBuilder` consumes.
//!
//! [`TokenEvent`]: resultdoc_meta::TokenEvent

mod error;
mod events;
mod lexer;

#[cfg(test)]
mod error_tests;
#[cfg(test)]
mod events_tests;
#[cfg(test)]
mod lexer_tests;

pub use error::{RelatedInfo, SyntaxError, render_errors};
pub use events::tokenize;
pub use lexer::{JsonToken, Token, lex, token_text};
