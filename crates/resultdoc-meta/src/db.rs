//! Append-only, chunked row table.

use std::marker::PhantomData;
use std::sync::Arc;

use super::chunk::{Chunk, ChunkPool, ROWS_PER_CHUNK};
use super::ids::RowIndex;
use super::row::{ROW_SIZE, RowLayout, RowSpec};
use super::token::TokenType;

/// Minimum number of chunk slots a database starts with.
const MIN_CHUNK_SLOTS: usize = 4;

/// Row database: rows of layout `R` stored in pooled chunks.
///
/// Rows are appended once and never move; a row's index is its position.
/// Chunk slots are rented densely from slot 0, so every slot after the first
/// unrented one is unrented too.
pub struct MetaDb<R: RowLayout> {
    chunks: Vec<Chunk>,
    /// Slot currently being filled.
    current_chunk: usize,
    /// Rows written into the current chunk.
    rows_in_chunk: usize,
    len: u32,
    pool: Arc<ChunkPool>,
    disposed: bool,
    _layout: PhantomData<R>,
}

impl<R: RowLayout> MetaDb<R> {
    /// Create a database sized for about `estimated_rows` rows.
    ///
    /// Only the first chunk is rented up front.
    pub fn create_for_estimated_rows(pool: Arc<ChunkPool>, estimated_rows: usize) -> Self {
        let slots = MIN_CHUNK_SLOTS.max(estimated_rows / ROWS_PER_CHUNK + 1);
        let mut chunks = Vec::with_capacity(slots);
        chunks.resize_with(slots, Chunk::empty);
        chunks[0] = pool.rent();

        Self {
            chunks,
            current_chunk: 0,
            rows_in_chunk: 0,
            len: 0,
            pool,
            disposed: false,
            _layout: PhantomData,
        }
    }

    /// Number of rows appended.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of chunk slots (rented or not).
    pub fn chunk_slots(&self) -> usize {
        self.chunks.len()
    }

    /// Number of chunks currently rented.
    pub fn rented_chunks(&self) -> usize {
        self.chunks.iter().take_while(|c| !c.is_empty()).count()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Append a row, returning its index.
    pub fn append(&mut self, spec: &RowSpec) -> RowIndex {
        assert!(!self.disposed, "append on a disposed row database");

        if self.rows_in_chunk == ROWS_PER_CHUNK {
            self.advance_chunk();
        }

        let bytes = R::pack(spec).to_bytes();
        self.chunks[self.current_chunk].write_row(self.rows_in_chunk * ROW_SIZE, &bytes);
        self.rows_in_chunk += 1;

        let index = RowIndex(self.len);
        self.len += 1;
        index
    }

    fn advance_chunk(&mut self) {
        self.current_chunk += 1;
        if self.current_chunk == self.chunks.len() {
            let doubled = self.chunks.len() * 2;
            self.chunks.resize_with(doubled, Chunk::empty);
        }
        if self.chunks[self.current_chunk].is_empty() {
            self.chunks[self.current_chunk] = self.pool.rent();
        }
        self.rows_in_chunk = 0;
    }

    /// Overwrite a previously appended row.
    ///
    /// Used to patch metadata unknown at append time (spans, propagated
    /// flags, flattened reference targets).
    pub fn replace(&mut self, index: RowIndex, row: R) {
        let (chunk, offset) = self.locate(index);
        self.chunks[chunk].write_row(offset, &row.to_bytes());
    }

    /// Read the row at `index`.
    #[inline]
    pub fn get(&self, index: RowIndex) -> R {
        let (chunk, offset) = self.locate(index);
        R::from_bytes(self.chunks[chunk].row_bytes(offset))
    }

    /// Read only the token type of the row at `index`.
    #[inline]
    pub fn token_type(&self, index: RowIndex) -> TokenType {
        let (chunk, offset) = self.locate(index);
        R::token_type_of(self.chunks[chunk].row_bytes(offset))
    }

    /// Chunk slot and in-chunk byte offset of a row.
    #[inline]
    fn locate(&self, index: RowIndex) -> (usize, usize) {
        assert!(!self.disposed, "read from a disposed row database");
        assert!(
            index.0 < self.len,
            "row index out of range: {} (len {})",
            index.0,
            self.len
        );
        let i = index.as_usize();
        (i / ROWS_PER_CHUNK, (i % ROWS_PER_CHUNK) * ROW_SIZE)
    }

    /// Iterate all rows in index order.
    pub fn iter(&self) -> impl Iterator<Item = (RowIndex, R)> + '_ {
        (0..self.len).map(move |i| (RowIndex(i), self.get(RowIndex(i))))
    }

    /// Return every rented chunk to the pool. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for slot in self.chunks.iter_mut() {
            if slot.is_empty() {
                break;
            }
            self.pool.give_back(std::mem::replace(slot, Chunk::empty()));
        }
        self.disposed = true;
    }
}

impl<R: RowLayout> Drop for MetaDb<R> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<R: RowLayout> std::fmt::Debug for MetaDb<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaDb")
            .field("layout", &R::NAME)
            .field("len", &self.len)
            .field("chunk_slots", &self.chunks.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}
