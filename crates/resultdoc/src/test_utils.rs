use std::sync::Arc;

use resultdoc_lexer::tokenize;
use resultdoc_meta::ChunkPool;

use crate::source::SourceDocument;

pub(crate) fn pool() -> Arc<ChunkPool> {
    Arc::new(ChunkPool::new())
}

/// Parse JSON text that is known to be valid.
pub(crate) fn parse(source: &str) -> SourceDocument<'_> {
    parse_with(source, pool())
}

pub(crate) fn parse_with(source: &str, pool: Arc<ChunkPool>) -> SourceDocument<'_> {
    let events = tokenize(source).expect("test input is valid JSON");
    SourceDocument::from_events(source.as_bytes(), events, pool).expect("events are balanced")
}

pub(crate) fn row(index: u32) -> resultdoc_meta::RowIndex {
    resultdoc_meta::RowIndex(index)
}
