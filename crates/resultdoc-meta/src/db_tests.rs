use std::sync::Arc;

use super::chunk::{ChunkPool, ROWS_PER_CHUNK};
use super::composite::CompositeRow;
use super::db::MetaDb;
use super::flags::RowFlags;
use super::ids::RowIndex;
use super::row::{RowLayout, RowSpec};
use super::simple::SimpleRow;
use super::token::TokenType;

fn number(location: u32) -> RowSpec {
    RowSpec::new(TokenType::Number)
        .location(location)
        .length(1)
        .number_of_rows(1)
}

#[test]
fn starts_with_minimum_slots_and_one_chunk() {
    let pool = Arc::new(ChunkPool::new());
    let db = MetaDb::<SimpleRow>::create_for_estimated_rows(pool.clone(), 10);

    assert_eq!(db.chunk_slots(), 4);
    assert_eq!(db.rented_chunks(), 1);
    assert_eq!(pool.outstanding(), 1);
    assert!(db.is_empty());
}

#[test]
fn estimate_sizes_slot_table() {
    let pool = Arc::new(ChunkPool::new());
    let db = MetaDb::<SimpleRow>::create_for_estimated_rows(pool, ROWS_PER_CHUNK * 10);

    assert_eq!(db.chunk_slots(), 11);
    assert_eq!(db.rented_chunks(), 1);
}

#[test]
fn append_returns_sequential_indices() {
    let pool = Arc::new(ChunkPool::new());
    let mut db = MetaDb::<SimpleRow>::create_for_estimated_rows(pool, 0);

    assert_eq!(db.append(&number(0)), RowIndex(0));
    assert_eq!(db.append(&number(2)), RowIndex(1));
    assert_eq!(db.len(), 2);
    assert_eq!(db.get(RowIndex(1)).location(), 2);
    assert_eq!(db.token_type(RowIndex(0)), TokenType::Number);
}

#[test]
fn rows_cross_chunk_boundary() {
    let pool = Arc::new(ChunkPool::new());
    let mut db = MetaDb::<SimpleRow>::create_for_estimated_rows(pool.clone(), 0);

    let total = ROWS_PER_CHUNK as u32 + 5;
    for i in 0..total {
        db.append(&number(i));
    }

    assert_eq!(db.rented_chunks(), 2);
    assert_eq!(pool.outstanding(), 2);
    let last_of_first = RowIndex(ROWS_PER_CHUNK as u32 - 1);
    let first_of_second = RowIndex(ROWS_PER_CHUNK as u32);
    assert_eq!(db.get(last_of_first).location(), ROWS_PER_CHUNK as u32 - 1);
    assert_eq!(db.get(first_of_second).location(), ROWS_PER_CHUNK as u32);
    assert_eq!(db.get(RowIndex(total - 1)).location(), total - 1);
}

#[test]
fn slot_table_doubles_when_full() {
    let pool = Arc::new(ChunkPool::new());
    let mut db = MetaDb::<SimpleRow>::create_for_estimated_rows(pool.clone(), 0);

    let total = ROWS_PER_CHUNK * 4 + 1;
    for i in 0..total {
        db.append(&number(i as u32));
    }

    assert_eq!(db.chunk_slots(), 8);
    assert_eq!(db.rented_chunks(), 5);
    assert_eq!(db.get(RowIndex(total as u32 - 1)).location(), total as u32 - 1);

    db.dispose();
    assert_eq!(pool.outstanding(), 0);
}

#[test]
fn replace_is_idempotent() {
    let pool = Arc::new(ChunkPool::new());
    let mut db = MetaDb::<CompositeRow>::create_for_estimated_rows(pool, 0);
    let start = db.append(&RowSpec::new(TokenType::StartArray));
    db.append(&RowSpec::new(TokenType::EndArray).number_of_rows(1));

    let patched = db.get(start).with_number_of_rows(2);
    db.replace(start, patched);
    db.replace(start, patched);

    assert_eq!(db.get(start), patched);
    assert_eq!(db.get(start).number_of_rows(), 2);
    assert_eq!(db.get(RowIndex(1)).token_type(), TokenType::EndArray);
}

#[test]
fn replace_sets_flags() {
    let pool = Arc::new(ChunkPool::new());
    let mut db = MetaDb::<CompositeRow>::create_for_estimated_rows(pool, 0);
    let row = db.append(&number(0));

    let flagged = db.get(row).with_flags(RowFlags::INVALIDATED);
    db.replace(row, flagged);

    assert!(db.get(row).flags().contains(RowFlags::INVALIDATED));
}

#[test]
fn dispose_returns_each_chunk_once() {
    let pool = Arc::new(ChunkPool::new());
    let mut db = MetaDb::<SimpleRow>::create_for_estimated_rows(pool.clone(), 0);
    for i in 0..(ROWS_PER_CHUNK as u32 * 2) {
        db.append(&number(i));
    }
    assert_eq!(pool.rented(), 2);

    db.dispose();
    db.dispose();
    assert!(db.is_disposed());
    assert_eq!(pool.returned(), 2);

    drop(db);
    assert_eq!(pool.returned(), 2);
    assert_eq!(pool.outstanding(), 0);
}

#[test]
fn drop_disposes() {
    let pool = Arc::new(ChunkPool::new());
    {
        let mut db = MetaDb::<SimpleRow>::create_for_estimated_rows(pool.clone(), 0);
        db.append(&number(0));
    }
    assert_eq!(pool.outstanding(), 0);
    assert_eq!(pool.idle(), 1);
}

#[test]
fn iter_yields_rows_in_order() {
    let pool = Arc::new(ChunkPool::new());
    let mut db = MetaDb::<SimpleRow>::create_for_estimated_rows(pool, 0);
    for i in 0..3 {
        db.append(&number(i * 10));
    }

    let locations: Vec<u32> = db.iter().map(|(_, row)| row.location()).collect();
    assert_eq!(locations, vec![0, 10, 20]);
}

#[test]
#[should_panic(expected = "row index out of range")]
fn read_past_end_panics() {
    let pool = Arc::new(ChunkPool::new());
    let mut db = MetaDb::<SimpleRow>::create_for_estimated_rows(pool, 0);
    db.append(&number(0));
    db.get(RowIndex(1));
}

#[test]
#[should_panic(expected = "disposed")]
fn read_after_dispose_panics() {
    let pool = Arc::new(ChunkPool::new());
    let mut db = MetaDb::<SimpleRow>::create_for_estimated_rows(pool, 0);
    db.append(&number(0));
    db.dispose();
    db.get(RowIndex(0));
}
