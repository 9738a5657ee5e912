//! Composite documents: one row table stitched from local values and
//! borrowed source buffers.

use resultdoc_meta::{
    Colors, CompositeRow, MetaDb, RowFlags, RowIndex, RowLayout, SelectionSetId, TokenType,
    dump_with,
};

use crate::element::Element;
use crate::source::preview;
use crate::view::DocumentView;

/// Upper bound on reference hops during resolution. `Composer::finish`
/// flattens chains, so a finished document needs at most one hop.
pub const MAX_REFERENCE_HOPS: u32 = 64;

/// Result tree over composite rows.
///
/// Owns its row table and the local buffer; borrows every source buffer for
/// `'s`. Created by [`Composer::finish`](crate::Composer::finish).
pub struct CompositeDocument<'s> {
    pub(crate) db: MetaDb<CompositeRow>,
    pub(crate) local: Vec<u8>,
    pub(crate) sources: Vec<&'s [u8]>,
    pub(crate) root: RowIndex,
}

impl<'s> CompositeDocument<'s> {
    pub fn len(&self) -> u32 {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    pub fn rows(&self) -> &MetaDb<CompositeRow> {
        &self.db
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Bytes held in the document-owned local buffer.
    pub fn local_len(&self) -> usize {
        self.local.len()
    }

    /// Follow reference rows from `index` to the terminal row.
    ///
    /// Panics on an out-of-range target or after [`MAX_REFERENCE_HOPS`]
    /// hops; both mean the row table is corrupt.
    pub fn resolve(&self, index: RowIndex) -> RowIndex {
        let mut current = index;
        for _ in 0..=MAX_REFERENCE_HOPS {
            let row = self.db.get(current);
            if row.token_type() != TokenType::Reference {
                return current;
            }
            let target = RowIndex(row.location());
            assert!(
                target.0 < self.db.len(),
                "reference at row {} targets row {} past the end",
                current.0,
                target.0
            );
            current = target;
        }
        panic!(
            "reference chain from row {} exceeds {} hops",
            index.0, MAX_REFERENCE_HOPS
        );
    }

    /// Row table dump with value previews.
    pub fn dump(&self, colors: Colors) -> String {
        dump_with(&self.db, colors, |_, row| {
            if row.flags().contains(RowFlags::LOCAL) {
                preview(&self.local, row)
            } else {
                preview(self.sources.get(row.source_id() as usize)?, row)
            }
        })
    }
}

impl DocumentView for CompositeDocument<'_> {
    type Row = CompositeRow;

    fn row_count(&self) -> u32 {
        self.db.len()
    }

    fn row(&self, index: RowIndex) -> CompositeRow {
        self.db.get(index)
    }

    fn token_type(&self, index: RowIndex) -> TokenType {
        self.db.token_type(index)
    }

    fn resolve(&self, index: RowIndex) -> RowIndex {
        CompositeDocument::resolve(self, index)
    }

    fn value_bytes(&self, row: &CompositeRow) -> &[u8] {
        let start = row.location() as usize;
        let end = start + row.length() as usize;
        if row.flags().contains(RowFlags::LOCAL) {
            &self.local[start..end]
        } else {
            &self.sources[row.source_id() as usize][start..end]
        }
    }

    fn root_index(&self) -> RowIndex {
        self.root
    }
}

impl<'d, 's> Element<'d, CompositeDocument<'s>> {
    /// Containing element, read from the slot row.
    pub fn parent(&self) -> Option<Element<'d, CompositeDocument<'s>>> {
        let parent = self.document().db.get(self.index()).parent()?;
        Some(Element::new(self.document(), parent))
    }

    /// Selection set of the slot row, falling back to the resolved row.
    pub fn selection_set(&self) -> Option<SelectionSetId> {
        let db = &self.document().db;
        db.get(self.index())
            .selection_set()
            .or_else(|| db.get(self.resolved_index()).selection_set())
    }
}
