//! Single-buffer documents built from tokenizer events.

use std::sync::Arc;

use resultdoc_meta::{
    ChunkPool, Colors, MAX_ROW_LENGTH, MetaDb, RowFlags, RowIndex, RowLayout, RowSpec, SimpleRow,
    TokenEvent, TokenType, dump_with,
};

use crate::error::BuildError;
use crate::view::DocumentView;

/// Average source bytes per row, used to pre-size the row table.
const BYTES_PER_ROW_ESTIMATE: usize = 8;

/// JSON document over one borrowed buffer, described by simple rows.
pub struct SourceDocument<'s> {
    source: &'s [u8],
    db: MetaDb<SimpleRow>,
}

impl<'s> SourceDocument<'s> {
    /// Build a document from a complete event stream.
    pub fn from_events<I>(
        source: &'s [u8],
        events: I,
        pool: Arc<ChunkPool>,
    ) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = TokenEvent>,
    {
        let mut builder = SourceDocumentBuilder::new(source, pool)?;
        for event in events {
            builder.push(event)?;
        }
        builder.finish()
    }

    pub fn source(&self) -> &'s [u8] {
        self.source
    }

    pub fn len(&self) -> u32 {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    pub fn rows(&self) -> &MetaDb<SimpleRow> {
        &self.db
    }

    /// Row table dump with value previews.
    pub fn dump(&self, colors: Colors) -> String {
        dump_with(&self.db, colors, |_, row| preview(self.source, row))
    }
}

impl DocumentView for SourceDocument<'_> {
    type Row = SimpleRow;

    fn row_count(&self) -> u32 {
        self.db.len()
    }

    fn row(&self, index: RowIndex) -> SimpleRow {
        self.db.get(index)
    }

    fn token_type(&self, index: RowIndex) -> TokenType {
        self.db.token_type(index)
    }

    #[inline]
    fn resolve(&self, index: RowIndex) -> RowIndex {
        index
    }

    fn value_bytes(&self, row: &SimpleRow) -> &[u8] {
        let start = row.location() as usize;
        &self.source[start..start + row.length() as usize]
    }

    fn root_index(&self) -> RowIndex {
        RowIndex(0)
    }
}

/// Text shown next to scalar and property rows in a dump.
pub(crate) fn preview(bytes: &[u8], row: &impl RowLayout) -> Option<String> {
    let token = row.token_type();
    if !(token.is_scalar() || token == TokenType::PropertyName) {
        return None;
    }
    let start = row.location() as usize;
    let text = String::from_utf8_lossy(bytes.get(start..start + row.length() as usize)?);
    Some(match token {
        TokenType::String | TokenType::PropertyName => format!("\"{text}\""),
        _ => text.into_owned(),
    })
}

#[derive(Clone, Copy, Debug)]
struct OpenContainer {
    start: RowIndex,
    is_object: bool,
    children: u32,
    complex: bool,
    /// Object has a property name waiting for its value.
    awaiting_value: bool,
}

/// Incremental builder of a [`SourceDocument`].
///
/// Rows are appended in event order. Container rows get a placeholder span
/// that is patched when the matching end event arrives.
pub struct SourceDocumentBuilder<'s> {
    source: &'s [u8],
    db: MetaDb<SimpleRow>,
    stack: Vec<OpenContainer>,
    root_done: bool,
}

impl<'s> SourceDocumentBuilder<'s> {
    pub fn new(source: &'s [u8], pool: Arc<ChunkPool>) -> Result<Self, BuildError> {
        let max = SimpleRow::MAX_LOCATION as usize;
        if source.len() > max {
            return Err(BuildError::SourceTooLarge {
                length: source.len(),
                max,
            });
        }
        let db = MetaDb::create_for_estimated_rows(pool, source.len() / BYTES_PER_ROW_ESTIMATE);
        Ok(Self {
            source,
            db,
            stack: Vec::new(),
            root_done: false,
        })
    }

    /// Nesting depth of the open containers.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn push(&mut self, event: TokenEvent) -> Result<(), BuildError> {
        self.check_bounds(&event)?;
        if self.root_done {
            return Err(BuildError::TrailingValue {
                offset: event.offset,
            });
        }

        match event.kind {
            TokenType::StartObject | TokenType::StartArray => {
                let flags = self.begin_value(&event)?;
                let start = self.db.append(
                    &RowSpec::new(event.kind)
                        .location(event.offset)
                        .flags(flags),
                );
                self.stack.push(OpenContainer {
                    start,
                    is_object: event.kind == TokenType::StartObject,
                    children: 0,
                    complex: false,
                    awaiting_value: false,
                });
            }
            TokenType::EndObject | TokenType::EndArray => self.end_container(&event)?,
            TokenType::PropertyName => {
                let unbalanced = BuildError::Unbalanced {
                    token: event.kind,
                    offset: event.offset,
                };
                let top = self.stack.last_mut().ok_or(unbalanced.clone())?;
                if !top.is_object || top.awaiting_value {
                    return Err(unbalanced);
                }
                top.children += 1;
                top.awaiting_value = true;
                self.db.append(
                    &RowSpec::new(TokenType::PropertyName)
                        .location(event.offset)
                        .length(event.length)
                        .complex_children(event.escaped)
                        .number_of_rows(1),
                );
            }
            TokenType::String
            | TokenType::Number
            | TokenType::True
            | TokenType::False
            | TokenType::Null => {
                let flags = self.begin_value(&event)?;
                self.db.append(
                    &RowSpec::new(event.kind)
                        .location(event.offset)
                        .length(event.length)
                        .complex_children(event.kind == TokenType::String && event.escaped)
                        .number_of_rows(1)
                        .flags(flags | RowFlags::LEAF),
                );
                self.end_value(false);
            }
            TokenType::None | TokenType::Reference => {
                return Err(BuildError::Unbalanced {
                    token: event.kind,
                    offset: event.offset,
                });
            }
        }
        Ok(())
    }

    fn check_bounds(&self, event: &TokenEvent) -> Result<(), BuildError> {
        let max = MAX_ROW_LENGTH;
        if event.length > max {
            return Err(BuildError::TokenTooLarge {
                length: event.length,
                max,
            });
        }
        let end = event.offset as usize + event.length as usize;
        if end > self.source.len() {
            return Err(BuildError::OutOfBounds {
                offset: event.offset,
                length: event.length,
            });
        }
        Ok(())
    }

    /// Validate a value position and return the flags its row gets.
    fn begin_value(&mut self, event: &TokenEvent) -> Result<RowFlags, BuildError> {
        match self.stack.last_mut() {
            None => Ok(RowFlags::ROOT),
            Some(top) if top.is_object => {
                if !top.awaiting_value {
                    return Err(BuildError::Unbalanced {
                        token: event.kind,
                        offset: event.offset,
                    });
                }
                Ok(RowFlags::NONE)
            }
            Some(top) => {
                top.children += 1;
                Ok(RowFlags::NONE)
            }
        }
    }

    fn end_value(&mut self, complex: bool) {
        match self.stack.last_mut() {
            None => self.root_done = true,
            Some(top) => {
                top.awaiting_value = false;
                top.complex |= complex;
            }
        }
    }

    fn end_container(&mut self, event: &TokenEvent) -> Result<(), BuildError> {
        let expect_object = event.kind == TokenType::EndObject;
        let open = self
            .stack
            .last()
            .copied()
            .filter(|top| top.is_object == expect_object && !top.awaiting_value)
            .ok_or(BuildError::Unbalanced {
                token: event.kind,
                offset: event.offset,
            })?;
        self.stack.pop();

        let end = self.db.append(
            &RowSpec::new(event.kind)
                .location(event.offset)
                .number_of_rows(1),
        );
        let span = end.0 - open.start.0 + 1;
        let patched = self
            .db
            .get(open.start)
            .with_length(open.children)
            .with_complex_children(open.complex)
            .with_number_of_rows(span);
        self.db.replace(open.start, patched);
        self.end_value(true);
        Ok(())
    }

    pub fn finish(self) -> Result<SourceDocument<'s>, BuildError> {
        if let Some(open) = self.stack.first() {
            let row = self.db.get(open.start);
            return Err(BuildError::Unbalanced {
                token: row.token_type(),
                offset: row.location(),
            });
        }
        if !self.root_done {
            return Err(BuildError::Empty);
        }
        Ok(SourceDocument {
            source: self.source,
            db: self.db,
        })
    }
}
