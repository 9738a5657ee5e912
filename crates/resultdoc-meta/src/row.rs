//! Packed row records.
//!
//! A row is a fixed 20-byte record (five little-endian `u32` words)
//! describing one structural event. Two layouts share the stride:
//! [`SimpleRow`](super::SimpleRow) mirrors plain JSON, and
//! [`CompositeRow`](super::CompositeRow) adds parent linkage and a
//! selection-set id at the cost of narrower fields.
//!
//! Rows are only read through accessors. Changing a row means building a
//! modified copy (`with_*`) and writing it back with `MetaDb::replace`.

use std::fmt::Debug;

use super::flags::RowFlags;
use super::ids::{RowIndex, SelectionSetId};
use super::token::TokenType;

/// Size of one row in bytes.
pub const ROW_SIZE: usize = 20;

/// Sign bit of the size/length word: "has complex children" for
/// containers, "contains escapes" for strings and property names.
pub(crate) const COMPLEX_BIT: u32 = 0x8000_0000;
pub(crate) const LENGTH_MASK: u32 = 0x7FFF_FFFF;

/// Largest size/length a row can hold.
pub const MAX_ROW_LENGTH: u32 = LENGTH_MASK;

/// Layout-neutral description of a row, validated by [`RowLayout::pack`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct RowSpec {
    pub token_type: TokenType,
    /// Byte offset into a source buffer, or the target row for references.
    pub location: u32,
    /// Element count, string length or literal length (31 bits).
    pub length: u32,
    pub complex_children: bool,
    /// Rows spanned including the row itself (0 until patched for containers).
    pub number_of_rows: u32,
    pub source_id: u16,
    pub parent: Option<RowIndex>,
    pub selection_set: Option<SelectionSetId>,
    pub flags: RowFlags,
}

impl RowSpec {
    pub fn new(token_type: TokenType) -> Self {
        Self {
            token_type,
            ..Self::default()
        }
    }

    pub fn location(mut self, location: u32) -> Self {
        self.location = location;
        self
    }

    pub fn length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    pub fn complex_children(mut self, complex: bool) -> Self {
        self.complex_children = complex;
        self
    }

    pub fn number_of_rows(mut self, rows: u32) -> Self {
        self.number_of_rows = rows;
        self
    }

    pub fn source_id(mut self, source_id: u16) -> Self {
        self.source_id = source_id;
        self
    }

    pub fn parent(mut self, parent: Option<RowIndex>) -> Self {
        self.parent = parent;
        self
    }

    pub fn selection_set(mut self, selection_set: Option<SelectionSetId>) -> Self {
        self.selection_set = selection_set;
        self
    }

    pub fn flags(mut self, flags: RowFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// A packed row encoding.
///
/// Implementations assert every field against its bit budget in `pack`;
/// a budget violation is a composer defect, not a recoverable error.
pub trait RowLayout: Copy + PartialEq + Debug {
    /// Layout name used by the row dump.
    const NAME: &'static str;

    /// Largest location the layout can hold.
    const MAX_LOCATION: u32;
    /// Largest span the layout can hold.
    const MAX_ROWS: u32;
    /// Largest source id the layout can hold.
    const MAX_SOURCE_ID: u16;

    fn pack(spec: &RowSpec) -> Self;
    fn from_bytes(bytes: &[u8; ROW_SIZE]) -> Self;
    fn to_bytes(self) -> [u8; ROW_SIZE];

    /// Decode only the token type, without materializing the row.
    fn token_type_of(bytes: &[u8; ROW_SIZE]) -> TokenType;

    fn token_type(&self) -> TokenType;
    fn location(&self) -> u32;
    /// Size/length with the sign bit masked off.
    fn length(&self) -> u32;
    fn has_complex_children(&self) -> bool;
    fn number_of_rows(&self) -> u32;
    fn source_id(&self) -> u16;
    fn flags(&self) -> RowFlags;

    fn with_number_of_rows(self, rows: u32) -> Self;
    fn with_flags(self, flags: RowFlags) -> Self;
    fn with_location(self, location: u32) -> Self;
    fn with_length(self, length: u32) -> Self;
    fn with_complex_children(self, complex: bool) -> Self;
}

#[inline]
pub(crate) fn read_words(bytes: &[u8; ROW_SIZE]) -> [u32; 5] {
    let mut words = [0u32; 5];
    for (i, word) in words.iter_mut().enumerate() {
        let at = i * 4;
        *word = u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
    }
    words
}

#[inline]
pub(crate) fn write_words(words: &[u32; 5]) -> [u8; ROW_SIZE] {
    let mut bytes = [0u8; ROW_SIZE];
    for (i, word) in words.iter().enumerate() {
        bytes[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
    }
    bytes
}

#[inline]
pub(crate) fn word(bytes: &[u8; ROW_SIZE], i: usize) -> u32 {
    let at = i * 4;
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Pack length and the complex bit into the size/length word.
#[inline]
pub(crate) fn size_word(length: u32, complex: bool) -> u32 {
    assert!(
        length <= LENGTH_MASK,
        "row length exceeds 31-bit limit: {length}"
    );
    length | if complex { COMPLEX_BIT } else { 0 }
}
