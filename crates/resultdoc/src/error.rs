//! Error types for documents, composition and value access.

use resultdoc_json::WriteError;
use resultdoc_meta::{RowIndex, SourceId, TokenType};

use crate::element::ValueKind;

/// Reading a value from an element failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: ValueKind,
    },

    #[error("number `{text}` is not representable as {target}")]
    NumberOutOfRange { text: String, target: &'static str },

    /// Malformed escape sequence; `offset` is relative to the string content.
    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },

    #[error("string content is not valid UTF-8")]
    InvalidUtf8,

    /// The value was nulled by error propagation.
    #[error("value was invalidated")]
    Invalidated,
}

/// Building a source document from token events failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// Token does not fit the open structure (stray end, mismatched end,
    /// property outside an object, value without a property name, or a
    /// container left open at the end).
    #[error("unbalanced {token:?} at byte {offset}")]
    Unbalanced { token: TokenType, offset: u32 },

    #[error("document contains no value")]
    Empty,

    #[error("value after the end of the document at byte {offset}")]
    TrailingValue { offset: u32 },

    #[error("token of {length} bytes exceeds the maximum of {max} bytes")]
    TokenTooLarge { length: u32, max: u32 },

    #[error("token at byte {offset} with length {length} lies outside the source")]
    OutOfBounds { offset: u32, length: u32 },

    #[error("source of {length} bytes exceeds the maximum of {max} bytes")]
    SourceTooLarge { length: usize, max: usize },
}

/// Composing a composite document failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    #[error("a composite document holds at most {max} sources")]
    TooManySources { max: usize },

    #[error("unknown source {}", .id.0)]
    UnknownSource { id: SourceId },

    #[error("source of {length} bytes exceeds the maximum of {max} bytes")]
    SourceTooLarge { length: usize, max: usize },

    #[error("origin at byte {offset} with length {length} lies outside its source")]
    OriginOutOfBounds { offset: u32, length: u32 },

    #[error("imported element does not belong to source {}", .id.0)]
    ForeignElement { id: SourceId },

    #[error("reference at row {} points past the last row ({})", .row.0, .target.0)]
    ReferenceOutOfRange { row: RowIndex, target: RowIndex },

    #[error("reference at row {} points to row {}, which is not a value", .row.0, .target.0)]
    ReferenceTargetNotValue { row: RowIndex, target: RowIndex },

    #[error("row {} is not a value and cannot be imported", .row.0)]
    ImportNotValue { row: RowIndex },

    #[error("reference at row {} is part of a cycle", .row.0)]
    ReferenceCycle { row: RowIndex },

    #[error(
        "reference at row {} names source {} but its target belongs to source {}",
        .row.0, .expected.0, .found.0
    )]
    SourceMismatch {
        row: RowIndex,
        expected: SourceId,
        found: SourceId,
    },

    #[error("object value written without a property name")]
    MissingPropertyName,

    #[error("property name written outside an object or twice in a row")]
    UnexpectedPropertyName,

    #[error("end does not match the open container")]
    MismatchedEnd,

    #[error("{depth} containers left open")]
    Unclosed { depth: usize },

    #[error("document already has a root")]
    DuplicateRoot,

    #[error("document has no root")]
    MissingRoot,

    #[error("token of {length} bytes exceeds the maximum of {max} bytes")]
    TokenTooLarge { length: usize, max: u32 },

    #[error("NaN and infinite numbers cannot be stored")]
    NonFiniteNumber,
}

/// Any failure of this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Value(#[from] ValueError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Compose(#[from] ComposeError),
}

pub type Result<T> = std::result::Result<T, Error>;
