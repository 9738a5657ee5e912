//! Read access shared by source and composite documents.

use resultdoc_meta::{RowIndex, RowLayout, TokenType};

use crate::element::Element;

/// A document whose rows can be navigated through [`Element`] handles.
pub trait DocumentView: Sized {
    type Row: RowLayout;

    fn row_count(&self) -> u32;

    fn row(&self, index: RowIndex) -> Self::Row;

    /// Token type of a row without decoding the rest of it.
    fn token_type(&self, index: RowIndex) -> TokenType;

    /// Follow reference rows to the terminal row. Identity for documents
    /// without references.
    fn resolve(&self, index: RowIndex) -> RowIndex;

    /// Bytes a scalar or property-name row addresses. For strings this is
    /// the content between the quotes, still escaped.
    fn value_bytes(&self, row: &Self::Row) -> &[u8];

    /// Index of the root row.
    fn root_index(&self) -> RowIndex;

    fn root(&self) -> Element<'_, Self> {
        Element::new(self, self.root_index())
    }

    /// Element at `index`, or `None` past the last row.
    fn element(&self, index: RowIndex) -> Option<Element<'_, Self>> {
        (index.0 < self.row_count()).then(|| Element::new(self, index))
    }
}
