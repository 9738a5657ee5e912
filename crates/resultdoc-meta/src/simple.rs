//! Simple row layout: plain JSON mirroring for a single source buffer.
//!
//! ```text
//! word 0  location                         31 bits (bit 31 reserved)
//! word 1  complex | size/length            1 + 31 bits
//! word 2  token type | number of rows      4 + 28 bits
//! word 3  reserved | flags | source id     8 + 8 + 16 bits
//! word 4  reserved
//! ```

use super::flags::RowFlags;
use super::row::{
    COMPLEX_BIT, LENGTH_MASK, ROW_SIZE, RowLayout, RowSpec, read_words, size_word, word,
    write_words,
};
use super::token::TokenType;

const ROWS_MASK: u32 = 0x0FFF_FFFF;
const TOKEN_SHIFT: u32 = 28;
const FLAGS_SHIFT: u32 = 16;

/// Row of a single-buffer document: no parent, no selection set.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SimpleRow {
    words: [u32; 5],
}

impl RowLayout for SimpleRow {
    const NAME: &'static str = "simple";
    const MAX_LOCATION: u32 = 0x7FFF_FFFF;
    const MAX_ROWS: u32 = ROWS_MASK;
    const MAX_SOURCE_ID: u16 = u16::MAX;

    fn pack(spec: &RowSpec) -> Self {
        assert!(
            spec.location <= Self::MAX_LOCATION,
            "simple row location exceeds 31-bit limit: {}",
            spec.location
        );
        assert!(
            spec.number_of_rows <= Self::MAX_ROWS,
            "simple row span exceeds 28-bit limit: {}",
            spec.number_of_rows
        );
        assert!(
            spec.parent.is_none(),
            "simple rows carry no parent linkage"
        );
        assert!(
            spec.selection_set.is_none(),
            "simple rows carry no selection set"
        );

        let words = [
            spec.location,
            size_word(spec.length, spec.complex_children),
            ((spec.token_type as u32) << TOKEN_SHIFT) | spec.number_of_rows,
            ((spec.flags.bits() as u32) << FLAGS_SHIFT) | spec.source_id as u32,
            0,
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
        TokenType::from_u8((word(bytes, 2) >> TOKEN_SHIFT) as u8)
    }

    #[inline]
    fn token_type(&self) -> TokenType {
        TokenType::from_u8((self.words[2] >> TOKEN_SHIFT) as u8)
    }

    #[inline]
    fn location(&self) -> u32 {
        self.words[0]
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
        self.words[3] as u16
    }

    #[inline]
    fn flags(&self) -> RowFlags {
        RowFlags::from_bits((self.words[3] >> FLAGS_SHIFT) as u8)
    }

    fn with_number_of_rows(self, rows: u32) -> Self {
        assert!(
            rows <= Self::MAX_ROWS,
            "simple row span exceeds 28-bit limit: {rows}"
        );
        let mut words = self.words;
        words[2] = (words[2] & !ROWS_MASK) | rows;
        Self { words }
    }

    fn with_flags(self, flags: RowFlags) -> Self {
        let mut words = self.words;
        words[3] = (words[3] & !(0xFF << FLAGS_SHIFT)) | ((flags.bits() as u32) << FLAGS_SHIFT);
        Self { words }
    }

    fn with_location(self, location: u32) -> Self {
        assert!(
            location <= Self::MAX_LOCATION,
            "simple row location exceeds 31-bit limit: {location}"
        );
        let mut words = self.words;
        words[0] = location;
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

impl std::fmt::Debug for SimpleRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleRow")
            .field("token_type", &self.token_type())
            .field("location", &self.location())
            .field("length", &self.length())
            .field("complex", &self.has_complex_children())
            .field("rows", &self.number_of_rows())
            .field("source", &self.source_id())
            .field("flags", &self.flags())
            .finish()
    }
}
