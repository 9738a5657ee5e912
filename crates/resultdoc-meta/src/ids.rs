//! Index newtypes.

use super::row::ROW_SIZE;

/// Global index of a row in a row database.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[repr(transparent)]
pub struct RowIndex(pub u32);

impl RowIndex {
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Byte offset of the row in a flat (unchunked) table.
    #[inline]
    pub fn byte_offset(self) -> usize {
        self.0 as usize * ROW_SIZE
    }

    /// Index `n` rows further on.
    #[inline]
    pub fn offset(self, n: u32) -> Self {
        Self(self.0 + n)
    }
}

impl From<u32> for RowIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a source buffer within a document.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[repr(transparent)]
pub struct SourceId(pub u16);

impl SourceId {
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// Selection-set identifier attached to composite rows by the composition step.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(transparent)]
pub struct SelectionSetId(pub u32);
