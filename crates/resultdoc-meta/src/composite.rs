//! Composite row layout: cross-document composition metadata.
//!
//! ```text
//! word 0  token type | location            4 + 28 bits
//! word 1  complex | size/length            1 + 31 bits
//! word 2  source id | number of rows       8 + 24 bits
//! word 3  reserved | parent row + 1        4 + 28 bits
//! word 4  flags | selection set + 1        8 + 24 bits
//! ```
//!
//! Parent and selection set are stored biased by one so that zero means
//! "absent".

use super::flags::RowFlags;
use super::ids::{RowIndex, SelectionSetId};
use super::row::{
    COMPLEX_BIT, LENGTH_MASK, ROW_SIZE, RowLayout, RowSpec, read_words, size_word, word,
    write_words,
};
use super::token::TokenType;

const LOCATION_MASK: u32 = 0x0FFF_FFFF;
const ROWS_MASK: u32 = 0x00FF_FFFF;
const PARENT_MASK: u32 = 0x0FFF_FFFF;
const SELECTION_MASK: u32 = 0x00FF_FFFF;
const TOKEN_SHIFT: u32 = 28;
const SOURCE_SHIFT: u32 = 24;
const FLAGS_SHIFT: u32 = 24;

/// Largest parent row index a composite row can link to.
pub const MAX_PARENT_ROW: u32 = PARENT_MASK - 1;
/// Largest selection-set id a composite row can carry.
pub const MAX_SELECTION_SET: u32 = SELECTION_MASK - 1;

/// Row of a composite document.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CompositeRow {
    words: [u32; 5],
}

impl CompositeRow {
    /// Containing row, if any.
    #[inline]
    pub fn parent(&self) -> Option<RowIndex> {
        match self.words[3] & PARENT_MASK {
            0 => None,
            biased => Some(RowIndex(biased - 1)),
        }
    }

    #[inline]
    pub fn selection_set(&self) -> Option<SelectionSetId> {
        match self.words[4] & SELECTION_MASK {
            0 => None,
            biased => Some(SelectionSetId(biased - 1)),
        }
    }

    /// Target row of a reference row.
    #[inline]
    pub fn reference_target(&self) -> Option<RowIndex> {
        (self.token_type() == TokenType::Reference).then(|| RowIndex(self.location()))
    }
}

impl RowLayout for CompositeRow {
    const NAME: &'static str = "composite";
    const MAX_LOCATION: u32 = LOCATION_MASK;
    const MAX_ROWS: u32 = ROWS_MASK;
    const MAX_SOURCE_ID: u16 = 0xFF;

    fn pack(spec: &RowSpec) -> Self {
        assert!(
            spec.location <= Self::MAX_LOCATION,
            "composite row location exceeds 28-bit limit: {}",
            spec.location
        );
        assert!(
            spec.number_of_rows <= Self::MAX_ROWS,
            "composite row span exceeds 24-bit limit: {}",
            spec.number_of_rows
        );
        assert!(
            spec.source_id <= Self::MAX_SOURCE_ID,
            "composite row source id exceeds 8-bit limit: {}",
            spec.source_id
        );
        let parent = match spec.parent {
            Some(RowIndex(p)) => {
                assert!(
                    p <= MAX_PARENT_ROW,
                    "composite row parent exceeds 28-bit limit: {p}"
                );
                p + 1
            }
            None => 0,
        };
        let selection = match spec.selection_set {
            Some(SelectionSetId(s)) => {
                assert!(
                    s <= MAX_SELECTION_SET,
                    "composite row selection set exceeds 24-bit limit: {s}"
                );
                s + 1
            }
            None => 0,
        };

        let words = [
            ((spec.token_type as u32) << TOKEN_SHIFT) | spec.location,
            size_word(spec.length, spec.complex_children),
            ((spec.source_id as u32) << SOURCE_SHIFT) | spec.number_of_rows,
            parent,
            ((spec.flags.bits() as u32) << FLAGS_SHIFT) | selection,
        ];
        Self { words }
    }

    fn from_bytes(bytes: &[u8; ROW_SIZE]) -> Self {
        Self {
            words: read_words(bytes),
        }
    }

    fn to_bytes(self) -> [u8; ROW_SIZE] {
        write_words(&self.words)
    }

    #[inline]
    fn token_type_of(bytes: &[u8; ROW_SIZE]) -> TokenType {
        TokenType::from_u8((word(bytes, 0) >> TOKEN_SHIFT) as u8)
    }

    #[inline]
    fn token_type(&self) -> TokenType {
        TokenType::from_u8((self.words[0] >> TOKEN_SHIFT) as u8)
    }

    #[inline]
    fn location(&self) -> u32 {
        self.words[0] & LOCATION_MASK
    }

    #[inline]
    fn length(&self) -> u32 {
        self.words[1] & LENGTH_MASK
    }

    #[inline]
    fn has_complex_children(&self) -> bool {
        self.words[1] & COMPLEX_BIT != 0
    }

    #[inline]
    fn number_of_rows(&self) -> u32 {
        self.words[2] & ROWS_MASK
    }

    #[inline]
    fn source_id(&self) -> u16 {
        (self.words[2] >> SOURCE_SHIFT) as u16
    }

    #[inline]
    fn flags(&self) -> RowFlags {
        RowFlags::from_bits((self.words[4] >> FLAGS_SHIFT) as u8)
    }

    fn with_number_of_rows(self, rows: u32) -> Self {
        assert!(
            rows <= Self::MAX_ROWS,
            "composite row span exceeds 24-bit limit: {rows}"
        );
        let mut words = self.words;
        words[2] = (words[2] & !ROWS_MASK) | rows;
        Self { words }
    }

    fn with_flags(self, flags: RowFlags) -> Self {
        let mut words = self.words;
        words[4] = (words[4] & SELECTION_MASK) | ((flags.bits() as u32) << FLAGS_SHIFT);
        Self { words }
    }

    fn with_location(self, location: u32) -> Self {
        assert!(
            location <= Self::MAX_LOCATION,
            "composite row location exceeds 28-bit limit: {location}"
        );
        let mut words = self.words;
        words[0] = (words[0] & !LOCATION_MASK) | location;
        Self { words }
    }

    fn with_length(self, length: u32) -> Self {
        let mut words = self.words;
        words[1] = size_word(length, words[1] & COMPLEX_BIT != 0);
        Self { words }
    }

    fn with_complex_children(self, complex: bool) -> Self {
        let mut words = self.words;
        words[1] = size_word(words[1] & LENGTH_MASK, complex);
        Self { words }
    }
}

impl std::fmt::Debug for CompositeRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeRow")
            .field("token_type", &self.token_type())
            .field("location", &self.location())
            .field("length", &self.length())
            .field("complex", &self.has_complex_children())
            .field("rows", &self.number_of_rows())
            .field("source", &self.source_id())
            .field("parent", &self.parent())
            .field("selection_set", &self.selection_set())
            .field("flags", &self.flags())
            .finish()
    }
}
