//! Errors raised while writing JSON.

/// Writer failure. The writer state is unchanged when an error is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    /// Opening a container would exceed the configured nesting limit.
    #[error("maximum nesting depth of {max} exceeded")]
    DepthExceeded { max: u32 },

    #[error("token of {length} bytes exceeds the maximum of {max} bytes")]
    StringTooLarge { length: usize, max: usize },

    #[error("NaN and infinite numbers cannot be written as JSON")]
    NonFiniteNumber,

    /// A value was written inside an object without a property name.
    #[error("expected a property name before an object value")]
    PropertyNameExpected,

    /// A property name was written outside an object, or twice in a row.
    #[error("property name is not allowed here")]
    UnexpectedPropertyName,

    /// An end token does not close the innermost open container.
    #[error("end token does not match the open container")]
    MismatchedEnd,

    /// A value was written after the top-level value was complete.
    #[error("a complete top-level value was already written")]
    MultipleRootValues,

    #[error("string value is not valid UTF-8")]
    Utf8,
}

pub type Result<T> = std::result::Result<T, WriteError>;
