use super::chunk::{ALIGN, CHUNK_SIZE, Chunk, ChunkPool, ROWS_PER_CHUNK};

#[test]
fn chunk_geometry() {
    assert_eq!(CHUNK_SIZE, 65536);
    assert_eq!(ROWS_PER_CHUNK, 3276);
}

#[test]
fn rented_chunk_is_aligned_and_zeroed() {
    let pool = ChunkPool::new();
    let chunk = pool.rent();

    assert_eq!(chunk.len(), CHUNK_SIZE);
    assert_eq!(chunk.as_slice().as_ptr() as usize % ALIGN, 0);
    assert!(chunk.as_slice().iter().all(|&b| b == 0));
    pool.give_back(chunk);
}

#[test]
fn empty_chunk_marks_unrented_slot() {
    let chunk = Chunk::empty();
    assert!(chunk.is_empty());
    assert_eq!(chunk.len(), 0);
    assert!(chunk.as_slice().is_empty());
}

#[test]
fn pool_reuses_returned_chunks() {
    let pool = ChunkPool::new();
    let mut chunk = pool.rent();
    chunk.as_mut_slice()[0] = 0xAB;
    pool.give_back(chunk);
    assert_eq!(pool.idle(), 1);

    let chunk = pool.rent();
    assert_eq!(chunk.as_slice()[0], 0xAB);
    assert_eq!(pool.idle(), 0);
    assert_eq!(pool.rented(), 2);
    assert_eq!(pool.returned(), 1);
    assert_eq!(pool.outstanding(), 1);
    pool.give_back(chunk);
}

#[test]
fn pool_drops_chunks_beyond_retention() {
    let pool = ChunkPool::with_max_retained(1);
    let a = pool.rent();
    let b = pool.rent();
    pool.give_back(a);
    pool.give_back(b);

    assert_eq!(pool.idle(), 1);
    assert_eq!(pool.outstanding(), 0);
}

#[test]
#[should_panic(expected = "unrented chunk slot")]
fn giving_back_empty_slot_panics() {
    ChunkPool::new().give_back(Chunk::empty());
}
