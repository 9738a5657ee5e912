//! Streaming JSON writer.
//!
//! Writes UTF-8 JSON token by token into a [`BufferSink`] without building
//! an intermediate tree. Nesting state lives in a bit stack, so the first 64
//! levels need no heap memory.

mod error;
mod escape;
mod number;
mod options;
mod sink;
mod writer;

#[cfg(test)]
mod number_tests;

pub use error::{Result, WriteError};
pub use escape::{
    AsciiEncoder, FallbackEncoder, RelaxedEncoder, escape_ascii_run, escape_into,
    escape_to_string, first_escape_index, needs_escaping,
};
pub use number::JsonNumber;
pub use options::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_TOKEN_SIZE, Escaping, NewLine, WriterOptions};
pub use sink::BufferSink;
pub use writer::{JsonTokenType, JsonWriter, write_to_string};
