//! Fixed-capacity row chunks and the pool they are rented from.
//!
//! A chunk is 64 KiB of 64-byte aligned storage holding a contiguous run of
//! rows. Chunks are rented lazily by the row database and returned to the
//! pool when it is disposed.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::row::ROW_SIZE;

/// Alignment of chunk storage.
pub const ALIGN: usize = 64;

/// Capacity of one chunk in bytes.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Rows that fit in one chunk.
pub const ROWS_PER_CHUNK: usize = CHUNK_SIZE / ROW_SIZE;

const BLOCKS_PER_CHUNK: usize = CHUNK_SIZE / ALIGN;

/// 64-byte aligned block.
#[repr(C, align(64))]
#[derive(Clone, Copy)]
struct Block([u8; ALIGN]);

/// Aligned byte storage for a run of rows.
///
/// An empty chunk (no blocks) marks an unrented slot in the chunk table.
pub struct Chunk {
    blocks: Vec<Block>,
}

impl Chunk {
    /// Placeholder for an unrented slot.
    pub const fn empty() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Allocate a zeroed chunk.
    fn allocate() -> Self {
        Self {
            blocks: vec![Block([0; ALIGN]); BLOCKS_PER_CHUNK],
        }
    }

    /// Whether this slot is unrented.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Capacity in bytes (0 for an unrented slot).
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len() * ALIGN
    }

    pub fn as_slice(&self) -> &[u8] {
        // SAFETY: Block is repr(C) over [u8; 64], so the blocks form one
        // contiguous, fully initialized byte region of `len()` bytes.
        unsafe { std::slice::from_raw_parts(self.blocks.as_ptr() as *const u8, self.len()) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        let len = self.len();
        // SAFETY: same layout argument as `as_slice`; the exclusive borrow of
        // `self` guarantees no other view of the blocks exists.
        unsafe { std::slice::from_raw_parts_mut(self.blocks.as_mut_ptr() as *mut u8, len) }
    }

    /// Read the row stored at `offset`.
    #[inline]
    pub(crate) fn row_bytes(&self, offset: usize) -> &[u8; ROW_SIZE] {
        self.as_slice()[offset..offset + ROW_SIZE]
            .try_into()
            .expect("row slice has ROW_SIZE bytes")
    }

    #[inline]
    pub(crate) fn write_row(&mut self, offset: usize, bytes: &[u8; ROW_SIZE]) {
        self.as_mut_slice()[offset..offset + ROW_SIZE].copy_from_slice(bytes);
    }
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("len", &self.len())
            .field(
                "aligned",
                &(self.blocks.as_ptr() as usize).is_multiple_of(ALIGN),
            )
            .finish()
    }
}

/// Default number of idle chunks a pool keeps for reuse.
pub const DEFAULT_MAX_RETAINED: usize = 32;

/// Shared pool of chunk buffers.
///
/// Rent and return never block on anything but the free-list mutex. The pool
/// is the only component meant to be shared between owners, so it carries
/// its own synchronization.
#[derive(Debug)]
pub struct ChunkPool {
    free: Mutex<Vec<Chunk>>,
    max_retained: usize,
    rented: AtomicUsize,
    returned: AtomicUsize,
}

impl ChunkPool {
    pub fn new() -> Self {
        Self::with_max_retained(DEFAULT_MAX_RETAINED)
    }

    /// Pool that keeps at most `max_retained` idle chunks.
    pub fn with_max_retained(max_retained: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            max_retained,
            rented: AtomicUsize::new(0),
            returned: AtomicUsize::new(0),
        }
    }

    /// Rent a chunk, reusing an idle one when available.
    pub fn rent(&self) -> Chunk {
        self.rented.fetch_add(1, Ordering::Relaxed);
        let reused = self
            .free
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop();
        reused.unwrap_or_else(Chunk::allocate)
    }

    /// Return a rented chunk.
    pub fn give_back(&self, chunk: Chunk) {
        assert!(!chunk.is_empty(), "returned an unrented chunk slot");
        self.returned.fetch_add(1, Ordering::Relaxed);
        let mut free = self
            .free
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if free.len() < self.max_retained {
            free.push(chunk);
        }
    }

    /// Total chunks handed out.
    pub fn rented(&self) -> usize {
        self.rented.load(Ordering::Relaxed)
    }

    /// Total chunks given back.
    pub fn returned(&self) -> usize {
        self.returned.load(Ordering::Relaxed)
    }

    /// Chunks currently rented and not yet returned.
    pub fn outstanding(&self) -> usize {
        self.rented() - self.returned()
    }

    /// Idle chunks available for reuse.
    pub fn idle(&self) -> usize {
        self.free
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl Default for ChunkPool {
    fn default() -> Self {
        Self::new()
    }
}
