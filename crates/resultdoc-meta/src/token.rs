//! Structural token kinds and the events a tokenizer feeds into a document.

/// Structural kind of a row (4-bit).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[repr(u8)]
pub enum TokenType {
    #[default]
    None = 0,
    StartObject = 1,
    EndObject = 2,
    StartArray = 3,
    EndArray = 4,
    PropertyName = 5,
    String = 6,
    Number = 7,
    True = 8,
    False = 9,
    Null = 10,
    /// Indirection to another row; the row's location is the target index.
    Reference = 11,
}

impl TokenType {
    /// Decode from the 4-bit field of a packed row.
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::None,
            1 => Self::StartObject,
            2 => Self::EndObject,
            3 => Self::StartArray,
            4 => Self::EndArray,
            5 => Self::PropertyName,
            6 => Self::String,
            7 => Self::Number,
            8 => Self::True,
            9 => Self::False,
            10 => Self::Null,
            11 => Self::Reference,
            _ => panic!("invalid token type: {v}"),
        }
    }

    #[inline]
    pub fn is_start(self) -> bool {
        matches!(self, Self::StartObject | Self::StartArray)
    }

    #[inline]
    pub fn is_end(self) -> bool {
        matches!(self, Self::EndObject | Self::EndArray)
    }

    /// Scalar value tokens (strings, numbers, literals).
    #[inline]
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::String | Self::Number | Self::True | Self::False | Self::Null
        )
    }

    /// The end token closing this start token.
    pub fn closing(self) -> Option<Self> {
        match self {
            Self::StartObject => Some(Self::EndObject),
            Self::StartArray => Some(Self::EndArray),
            _ => None,
        }
    }

    /// Short mnemonic used by the row dump.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::StartObject => "obj",
            Self::EndObject => "endobj",
            Self::StartArray => "arr",
            Self::EndArray => "endarr",
            Self::PropertyName => "prop",
            Self::String => "str",
            Self::Number => "num",
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
            Self::Reference => "ref",
        }
    }
}

/// One structural event reported by an external tokenizer.
///
/// `offset`/`length` address the source buffer. For strings and property
/// names they cover the content between the quotes, and `escaped` tells
/// whether that content contains a backslash escape.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TokenEvent {
    pub kind: TokenType,
    pub offset: u32,
    pub length: u32,
    pub escaped: bool,
}

impl TokenEvent {
    pub fn new(kind: TokenType, offset: u32, length: u32) -> Self {
        Self {
            kind,
            offset,
            length,
            escaped: false,
        }
    }

    /// String or property-name event whose content contains escapes.
    pub fn escaped(kind: TokenType, offset: u32, length: u32) -> Self {
        Self {
            kind,
            offset,
            length,
            escaped: true,
        }
    }
}
