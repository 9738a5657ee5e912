//! Packed row metadata for result documents.
//!
//! This crate contains:
//! - Row layouts (`SimpleRow`, `CompositeRow`) sharing a 20-byte stride
//! - The chunk pool and the append-only row database (`MetaDb`)
//! - Token kinds, row flags and index newtypes
//! - Text dump of a row table for debugging

mod chunk;
mod colors;
mod composite;
mod db;
mod dump;
mod flags;
mod ids;
mod row;
mod simple;
mod token;

#[cfg(test)]
mod chunk_tests;
#[cfg(test)]
mod db_tests;
#[cfg(test)]
mod row_tests;

pub use chunk::{ALIGN, CHUNK_SIZE, Chunk, ChunkPool, DEFAULT_MAX_RETAINED, ROWS_PER_CHUNK};
pub use colors::Colors;
pub use composite::{CompositeRow, MAX_PARENT_ROW, MAX_SELECTION_SET};
pub use db::MetaDb;
pub use dump::{DumpColumns, dump, dump_with, truncate_text, width_for_count};
pub use flags::RowFlags;
pub use ids::{RowIndex, SelectionSetId, SourceId};
pub use row::{MAX_ROW_LENGTH, ROW_SIZE, RowLayout, RowSpec};
pub use simple::SimpleRow;
pub use token::{TokenEvent, TokenType};
