//! Row flag set (8-bit).

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Per-row flags.
///
/// Flags are fixed when the row is appended. The only bit that may be set
/// afterwards is [`RowFlags::INVALIDATED`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct RowFlags(u8);

impl RowFlags {
    pub const NONE: Self = Self(0);
    /// Value is unusable because of a propagated error (null bubbling).
    pub const INVALIDATED: Self = Self(0x01);
    /// Value bytes live in the document-owned local buffer.
    pub const LOCAL: Self = Self(0x02);
    /// Value was written as an explicit null.
    pub const EXPLICIT_NULL: Self = Self(0x04);
    /// Slot may hold null; stops null bubbling.
    pub const NULLABLE: Self = Self(0x08);
    /// Document root.
    pub const ROOT: Self = Self(0x10);
    /// Composition helper, not part of the serialized result.
    pub const INTERNAL: Self = Self(0x20);
    /// Scalar value with no children.
    pub const LEAF: Self = Self(0x40);

    const NAMES: [(Self, &'static str); 7] = [
        (Self::INVALIDATED, "invalidated"),
        (Self::LOCAL, "local"),
        (Self::EXPLICIT_NULL, "explicit_null"),
        (Self::NULLABLE, "nullable"),
        (Self::ROOT, "root"),
        (Self::INTERNAL, "internal"),
        (Self::LEAF, "leaf"),
    ];

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Flags of `self` that are not in `other`.
    #[inline]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Flag names in bit order, for display.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMES
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl BitOr for RowFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for RowFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for RowFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("RowFlags(-)");
        }
        f.write_str("RowFlags(")?;
        for (i, name) in self.names().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            f.write_str(name)?;
        }
        f.write_str(")")
    }
}
