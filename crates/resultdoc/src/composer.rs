//! Composition of result documents.
//!
//! A [`Composer`] appends composite rows for values it is handed: local
//! scalars written into the document-owned buffer, scalars that point into a
//! registered source buffer, whole subtrees imported from a
//! [`SourceDocument`], and reference rows. The first value written at depth
//! zero is the root; later depth-zero values form detached segments that
//! only references reach.

use std::sync::Arc;

use resultdoc_json::{JsonNumber, RelaxedEncoder, escape_into};
use resultdoc_meta::{
    ChunkPool, CompositeRow, MAX_ROW_LENGTH, MetaDb, RowFlags, RowIndex, RowLayout, RowSpec,
    SelectionSetId, SourceId, TokenType,
};

use crate::composite::CompositeDocument;
use crate::element::Element;
use crate::error::ComposeError;
use crate::source::SourceDocument;
use crate::trace::{NoopTracer, Tracer};
use crate::view::DocumentView;

/// Rows reserved up front unless configured otherwise.
pub const DEFAULT_ESTIMATED_ROWS: usize = 256;
/// Sources addressable by the 8-bit source id.
pub const DEFAULT_MAX_SOURCES: usize = 255;

/// Sizing and limits for a [`Composer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComposerOptions {
    pub(crate) estimated_rows: usize,
    pub(crate) max_sources: usize,
}

impl Default for ComposerOptions {
    fn default() -> Self {
        Self {
            estimated_rows: DEFAULT_ESTIMATED_ROWS,
            max_sources: DEFAULT_MAX_SOURCES,
        }
    }
}

impl ComposerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn estimated_rows(mut self, rows: usize) -> Self {
        self.estimated_rows = rows;
        self
    }

    /// Clamped to the source ids a composite row can carry.
    pub fn max_sources(mut self, max: usize) -> Self {
        self.max_sources = max.min(DEFAULT_MAX_SOURCES);
        self
    }

    pub fn get_estimated_rows(&self) -> usize {
        self.estimated_rows
    }

    pub fn get_max_sources(&self) -> usize {
        self.max_sources
    }
}

/// How a value sits in its parent: nullability and selection set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Slot {
    pub nullable: bool,
    pub selection_set: Option<SelectionSetId>,
}

impl Slot {
    /// Non-null slot; invalidating it bubbles to the parent.
    pub fn required() -> Self {
        Self::default()
    }

    /// Slot that stops null bubbling.
    pub fn nullable() -> Self {
        Self {
            nullable: true,
            selection_set: None,
        }
    }

    pub fn with_selection_set(mut self, id: SelectionSetId) -> Self {
        self.selection_set = Some(id);
        self
    }

    fn flags(self) -> RowFlags {
        if self.nullable {
            RowFlags::NULLABLE
        } else {
            RowFlags::NONE
        }
    }
}

/// Byte range inside a registered source buffer.
///
/// For strings and property names the range excludes the quotes, and
/// `escaped` records whether it contains escape sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Origin {
    pub source: SourceId,
    pub offset: u32,
    pub length: u32,
    pub escaped: bool,
}

impl Origin {
    pub fn new(source: SourceId, offset: u32, length: u32) -> Self {
        Self {
            source,
            offset,
            length,
            escaped: false,
        }
    }

    pub fn escaped(mut self, escaped: bool) -> Self {
        self.escaped = escaped;
        self
    }
}

#[derive(Clone, Copy, Debug)]
struct OpenContainer {
    start: RowIndex,
    is_object: bool,
    children: u32,
    complex: bool,
    awaiting_value: bool,
}

/// Builder of a [`CompositeDocument`].
pub struct Composer<'s, T: Tracer = NoopTracer> {
    db: MetaDb<CompositeRow>,
    local: Vec<u8>,
    sources: Vec<&'s [u8]>,
    stack: Vec<OpenContainer>,
    root: Option<RowIndex>,
    references: Vec<RowIndex>,
    options: ComposerOptions,
    tracer: T,
}

impl<'s> Composer<'s> {
    pub fn new(pool: Arc<ChunkPool>) -> Self {
        Self::with_tracer(pool, ComposerOptions::default(), NoopTracer)
    }

    pub fn with_options(pool: Arc<ChunkPool>, options: ComposerOptions) -> Self {
        Self::with_tracer(pool, options, NoopTracer)
    }
}

impl<'s, T: Tracer> Composer<'s, T> {
    pub fn with_tracer(pool: Arc<ChunkPool>, options: ComposerOptions, tracer: T) -> Self {
        Self {
            db: MetaDb::create_for_estimated_rows(pool, options.estimated_rows),
            local: Vec::new(),
            sources: Vec::new(),
            stack: Vec::new(),
            root: None,
            references: Vec::new(),
            options,
            tracer,
        }
    }

    pub fn options(&self) -> &ComposerOptions {
        &self.options
    }

    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    /// Rows appended so far.
    pub fn len(&self) -> u32 {
        self.db.len()
    }

    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn row(&self, index: RowIndex) -> CompositeRow {
        self.db.get(index)
    }

    /// Register a source buffer; values may then point into it.
    pub fn add_source(&mut self, source: &'s [u8]) -> Result<SourceId, ComposeError> {
        if self.sources.len() >= self.options.max_sources {
            return Err(ComposeError::TooManySources {
                max: self.options.max_sources,
            });
        }
        let max = CompositeRow::MAX_LOCATION as usize;
        if source.len() > max {
            return Err(ComposeError::SourceTooLarge {
                length: source.len(),
                max,
            });
        }
        let id = SourceId(self.sources.len() as u16);
        self.sources.push(source);
        Ok(id)
    }

    /// Open the root object.
    pub fn begin_root_object(
        &mut self,
        selection_set: Option<SelectionSetId>,
    ) -> Result<RowIndex, ComposeError> {
        if self.root.is_some() {
            return Err(ComposeError::DuplicateRoot);
        }
        let slot = Slot {
            nullable: false,
            selection_set,
        };
        self.begin_container(TokenType::StartObject, slot)
    }

    pub fn begin_object(&mut self, slot: Slot) -> Result<RowIndex, ComposeError> {
        self.begin_container(TokenType::StartObject, slot)
    }

    pub fn end_object(&mut self) -> Result<RowIndex, ComposeError> {
        self.end_container(TokenType::EndObject)
    }

    pub fn begin_array(&mut self, slot: Slot) -> Result<RowIndex, ComposeError> {
        self.begin_container(TokenType::StartArray, slot)
    }

    pub fn end_array(&mut self) -> Result<RowIndex, ComposeError> {
        self.end_container(TokenType::EndArray)
    }

    /// Property name stored in the local buffer.
    pub fn property(&mut self, name: &str) -> Result<RowIndex, ComposeError> {
        self.local_property(name, RowFlags::NONE)
    }

    /// Property that is skipped when the document is serialized.
    pub fn internal_property(&mut self, name: &str) -> Result<RowIndex, ComposeError> {
        self.local_property(name, RowFlags::INTERNAL)
    }

    /// Property name read from a source buffer.
    pub fn sourced_property(&mut self, origin: Origin) -> Result<RowIndex, ComposeError> {
        self.check_origin(&origin)?;
        let parent = self.begin_property()?;
        let index = self.append(
            &RowSpec::new(TokenType::PropertyName)
                .location(origin.offset)
                .length(origin.length)
                .complex_children(origin.escaped)
                .number_of_rows(1)
                .source_id(origin.source.0)
                .parent(Some(parent)),
        );
        self.end_property();
        Ok(index)
    }

    pub fn string(&mut self, value: &str, slot: Slot) -> Result<RowIndex, ComposeError> {
        let position = self.begin_value(slot)?;
        let (offset, length, escaped) = self.push_escaped(value)?;
        let spec = RowSpec::new(TokenType::String)
            .location(offset)
            .length(length)
            .complex_children(escaped);
        Ok(self.append_local(spec, position, slot))
    }

    pub fn int(&mut self, value: i64, slot: Slot) -> Result<RowIndex, ComposeError> {
        self.number(value, slot)
    }

    pub fn float(&mut self, value: f64, slot: Slot) -> Result<RowIndex, ComposeError> {
        self.number(value, slot)
    }

    pub fn boolean(&mut self, value: bool, slot: Slot) -> Result<RowIndex, ComposeError> {
        let (kind, text): (_, &[u8]) = if value {
            (TokenType::True, b"true")
        } else {
            (TokenType::False, b"false")
        };
        let position = self.begin_value(slot)?;
        let offset = self.push_local(text)?;
        let spec = RowSpec::new(kind).location(offset).length(text.len() as u32);
        Ok(self.append_local(spec, position, slot))
    }

    /// Explicit null, distinct from a null produced by invalidation.
    pub fn null(&mut self, slot: Slot) -> Result<RowIndex, ComposeError> {
        let (parent, flags) = self.begin_value(slot)?;
        let offset = self.push_local(b"null")?;
        let spec = RowSpec::new(TokenType::Null).location(offset).length(4);
        Ok(self.append_local(spec, (parent, flags | RowFlags::EXPLICIT_NULL), slot))
    }

    /// Scalar whose text lives in a source buffer.
    ///
    /// Panics if `kind` is not a scalar token.
    pub fn sourced(
        &mut self,
        kind: TokenType,
        origin: Origin,
        slot: Slot,
    ) -> Result<RowIndex, ComposeError> {
        assert!(kind.is_scalar(), "sourced value must be a scalar, got {kind:?}");
        self.check_origin(&origin)?;
        let (parent, flags) = self.begin_value(slot)?;
        let index = self.append(
            &RowSpec::new(kind)
                .location(origin.offset)
                .length(origin.length)
                .complex_children(kind == TokenType::String && origin.escaped)
                .number_of_rows(1)
                .source_id(origin.source.0)
                .parent(parent)
                .selection_set(slot.selection_set)
                .flags(flags | RowFlags::LEAF),
        );
        self.end_value(index, false);
        Ok(index)
    }

    /// Reference row pointing at `target`, which must be a value row whose
    /// bytes come from `source` (or the local buffer). Targets may be
    /// appended later; they are checked by [`finish`](Self::finish).
    pub fn reference(
        &mut self,
        target: RowIndex,
        source: SourceId,
        slot: Slot,
    ) -> Result<RowIndex, ComposeError> {
        if source.as_usize() >= self.sources.len() {
            return Err(ComposeError::UnknownSource { id: source });
        }
        if target.0 > CompositeRow::MAX_LOCATION {
            return Err(ComposeError::ReferenceOutOfRange {
                row: RowIndex(self.db.len()),
                target,
            });
        }
        let (parent, flags) = self.begin_value(slot)?;
        let index = self.append(
            &RowSpec::new(TokenType::Reference)
                .location(target.0)
                .number_of_rows(1)
                .source_id(source.0)
                .parent(parent)
                .selection_set(slot.selection_set)
                .flags(flags),
        );
        self.references.push(index);
        self.end_value(index, true);
        Ok(index)
    }

    /// Copy the subtree under `element` into this document.
    ///
    /// `source` must be the id under which the element's buffer was
    /// registered. Returns the first copied row.
    pub fn import(
        &mut self,
        element: Element<'_, SourceDocument<'_>>,
        source: SourceId,
        slot: Slot,
    ) -> Result<RowIndex, ComposeError> {
        let buffer = *self
            .sources
            .get(source.as_usize())
            .ok_or(ComposeError::UnknownSource { id: source })?;
        let document = element.document();
        if !std::ptr::eq(buffer, document.source()) {
            return Err(ComposeError::ForeignElement { id: source });
        }

        let first = element.index();
        let head = document.row(first);
        let token = head.token_type();
        if !(token.is_start() || token.is_scalar()) {
            return Err(ComposeError::ImportNotValue { row: first });
        }
        let rows = head.number_of_rows();
        if rows > CompositeRow::MAX_ROWS {
            return Err(ComposeError::TokenTooLarge {
                length: rows as usize,
                max: CompositeRow::MAX_ROWS,
            });
        }

        let (parent, slot_flags) = self.begin_value(slot)?;
        let base = RowIndex(self.db.len());
        let mut open: Vec<RowIndex> = Vec::new();
        for offset in 0..rows {
            let row = document.row(first.offset(offset));
            let token = row.token_type();
            let row_parent = if token.is_end() {
                open.pop()
            } else {
                open.last().copied().or(parent)
            };
            let mut spec = RowSpec::new(token)
                .location(row.location())
                .length(row.length())
                .complex_children(row.has_complex_children())
                .number_of_rows(row.number_of_rows())
                .source_id(source.0)
                .parent(row_parent)
                .flags(row.flags().difference(RowFlags::ROOT));
            if offset == 0 {
                spec = spec
                    .selection_set(slot.selection_set)
                    .flags(spec.flags | slot_flags);
            }
            let index = self.db.append(&spec);
            if token.is_start() {
                open.push(index);
            }
        }
        self.tracer.trace_import(base, rows, source);
        self.end_value(base, head.token_type().is_start());
        Ok(base)
    }

    /// Mark `row` invalidated and bubble up to the nearest nullable
    /// ancestor (inclusive) or the top of its tree.
    pub fn invalidate(&mut self, row: RowIndex) {
        let mut current = row;
        loop {
            let existing = self.db.get(current);
            let updated = existing.with_flags(existing.flags() | RowFlags::INVALIDATED);
            self.db.replace(current, updated);
            self.tracer.trace_invalidate(current, &updated);
            if existing.flags().contains(RowFlags::NULLABLE) {
                break;
            }
            match existing.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
    }

    /// Check structure, flatten reference chains and hand over the rows.
    pub fn finish(mut self) -> Result<CompositeDocument<'s>, ComposeError> {
        if !self.stack.is_empty() {
            return Err(ComposeError::Unclosed {
                depth: self.stack.len(),
            });
        }
        let root = self.root.ok_or(ComposeError::MissingRoot)?;

        for i in 0..self.references.len() {
            let index = self.references[i];
            let row = self.db.get(index);
            let target = RowIndex(row.location());
            let terminal = self.terminal_of(index, target)?;

            let terminal_row = self.db.get(terminal);
            if !terminal_row.flags().contains(RowFlags::LOCAL)
                && terminal_row.source_id() != row.source_id()
            {
                return Err(ComposeError::SourceMismatch {
                    row: index,
                    expected: SourceId(row.source_id()),
                    found: SourceId(terminal_row.source_id()),
                });
            }
            if terminal != target {
                self.db.replace(index, row.with_location(terminal.0));
            }
            self.tracer.trace_reference(index, target, terminal);
        }
        self.bubble_through_references();

        self.tracer.trace_finish(self.db.len(), self.local.len());
        Ok(CompositeDocument {
            db: self.db,
            local: self.local,
            sources: self.sources,
            root,
        })
    }

    /// Continue null bubbling from invalidated terminals through the
    /// references that expose them. Repeats until no reference changes, so
    /// segments reached through other segments are covered.
    fn bubble_through_references(&mut self) {
        loop {
            let mut changed = false;
            for i in 0..self.references.len() {
                let index = self.references[i];
                let row = self.db.get(index);
                if row.flags().contains(RowFlags::INVALIDATED) {
                    continue;
                }
                let terminal = self.db.get(RowIndex(row.location()));
                if terminal.flags().contains(RowFlags::INVALIDATED) {
                    self.invalidate(index);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }

    /// Follow references from `target` to a value row.
    fn terminal_of(&self, index: RowIndex, target: RowIndex) -> Result<RowIndex, ComposeError> {
        let mut current = target;
        let mut hops = 0usize;
        loop {
            if current.0 >= self.db.len() {
                return Err(ComposeError::ReferenceOutOfRange {
                    row: index,
                    target: current,
                });
            }
            let row = self.db.get(current);
            let token = row.token_type();
            if token == TokenType::Reference {
                hops += 1;
                // Every hop must land on a distinct reference row.
                if hops > self.references.len() {
                    return Err(ComposeError::ReferenceCycle { row: index });
                }
                current = RowIndex(row.location());
            } else if token.is_start() || token.is_scalar() {
                return Ok(current);
            } else {
                return Err(ComposeError::ReferenceTargetNotValue {
                    row: index,
                    target: current,
                });
            }
        }
    }

    fn append(&mut self, spec: &RowSpec) -> RowIndex {
        let index = self.db.append(spec);
        self.tracer.trace_append(index, &self.db.get(index));
        index
    }

    fn check_origin(&self, origin: &Origin) -> Result<(), ComposeError> {
        let source = self
            .sources
            .get(origin.source.as_usize())
            .ok_or(ComposeError::UnknownSource { id: origin.source })?;
        let end = origin.offset as usize + origin.length as usize;
        if end > source.len() {
            return Err(ComposeError::OriginOutOfBounds {
                offset: origin.offset,
                length: origin.length,
            });
        }
        Ok(())
    }

    /// Validate a value position; returns the parent and the flags the
    /// value row gets.
    fn begin_value(&mut self, slot: Slot) -> Result<(Option<RowIndex>, RowFlags), ComposeError> {
        let flags = slot.flags();
        match self.stack.last() {
            None if self.root.is_none() => Ok((None, flags | RowFlags::ROOT)),
            None => Ok((None, flags)),
            Some(top) if top.is_object && !top.awaiting_value => {
                Err(ComposeError::MissingPropertyName)
            }
            Some(top) => Ok((Some(top.start), flags)),
        }
    }

    fn end_value(&mut self, index: RowIndex, complex: bool) {
        match self.stack.last_mut() {
            None => {
                if self.root.is_none() {
                    self.root = Some(index);
                }
            }
            Some(top) => {
                if top.is_object {
                    top.awaiting_value = false;
                } else {
                    top.children += 1;
                }
                top.complex |= complex;
            }
        }
    }

    fn begin_container(&mut self, kind: TokenType, slot: Slot) -> Result<RowIndex, ComposeError> {
        let (parent, flags) = self.begin_value(slot)?;
        let start = self.append(
            &RowSpec::new(kind)
                .parent(parent)
                .selection_set(slot.selection_set)
                .flags(flags | RowFlags::LOCAL),
        );
        if parent.is_none() && self.root.is_none() {
            self.root = Some(start);
        }
        self.stack.push(OpenContainer {
            start,
            is_object: kind == TokenType::StartObject,
            children: 0,
            complex: false,
            awaiting_value: false,
        });
        Ok(start)
    }

    fn end_container(&mut self, kind: TokenType) -> Result<RowIndex, ComposeError> {
        let expect_object = kind == TokenType::EndObject;
        let open = self
            .stack
            .last()
            .copied()
            .filter(|top| top.is_object == expect_object && !top.awaiting_value)
            .ok_or(ComposeError::MismatchedEnd)?;
        self.stack.pop();

        let end = self.append(
            &RowSpec::new(kind)
                .number_of_rows(1)
                .parent(Some(open.start))
                .flags(RowFlags::LOCAL),
        );
        let patched = self
            .db
            .get(open.start)
            .with_length(open.children)
            .with_complex_children(open.complex)
            .with_number_of_rows(end.0 - open.start.0 + 1);
        self.db.replace(open.start, patched);
        self.tracer.trace_patch(open.start, &patched);
        self.end_value(open.start, true);
        Ok(open.start)
    }

    fn begin_property(&mut self) -> Result<RowIndex, ComposeError> {
        match self.stack.last() {
            Some(top) if top.is_object && !top.awaiting_value => Ok(top.start),
            _ => Err(ComposeError::UnexpectedPropertyName),
        }
    }

    fn end_property(&mut self) {
        if let Some(top) = self.stack.last_mut() {
            top.children += 1;
            top.awaiting_value = true;
        }
    }

    fn local_property(&mut self, name: &str, extra: RowFlags) -> Result<RowIndex, ComposeError> {
        let parent = self.begin_property()?;
        let (offset, length, escaped) = self.push_escaped(name)?;
        let index = self.append(
            &RowSpec::new(TokenType::PropertyName)
                .location(offset)
                .length(length)
                .complex_children(escaped)
                .number_of_rows(1)
                .parent(Some(parent))
                .flags(RowFlags::LOCAL | extra),
        );
        self.end_property();
        Ok(index)
    }

    /// Append a scalar whose text is already in the local buffer.
    fn append_local(
        &mut self,
        spec: RowSpec,
        (parent, flags): (Option<RowIndex>, RowFlags),
        slot: Slot,
    ) -> RowIndex {
        let index = self.append(
            &spec
                .number_of_rows(1)
                .parent(parent)
                .selection_set(slot.selection_set)
                .flags(flags | RowFlags::LOCAL | RowFlags::LEAF),
        );
        self.end_value(index, false);
        index
    }

    fn number<N: JsonNumber>(&mut self, value: N, slot: Slot) -> Result<RowIndex, ComposeError> {
        let position = self.begin_value(slot)?;
        let (offset, length) = value
            .with_json_bytes(|text| {
                let offset = self.push_local(text)?;
                Ok::<_, ComposeError>((offset, text.len() as u32))
            })
            .map_err(|_| ComposeError::NonFiniteNumber)??;
        let spec = RowSpec::new(TokenType::Number).location(offset).length(length);
        Ok(self.append_local(spec, position, slot))
    }

    /// Append raw bytes to the local buffer; returns their offset.
    fn push_local(&mut self, bytes: &[u8]) -> Result<u32, ComposeError> {
        let offset = self.local.len();
        self.check_local(offset, bytes.len())?;
        self.local.extend_from_slice(bytes);
        Ok(offset as u32)
    }

    /// Append JSON-escaped text to the local buffer; returns offset, length
    /// and whether anything was escaped.
    fn push_escaped(&mut self, text: &str) -> Result<(u32, u32, bool), ComposeError> {
        let offset = self.local.len();
        escape_into(text, &RelaxedEncoder, &mut self.local);
        let length = self.local.len() - offset;
        if let Err(err) = self.check_local(offset, length) {
            self.local.truncate(offset);
            return Err(err);
        }
        Ok((offset as u32, length as u32, length != text.len()))
    }

    fn check_local(&self, offset: usize, length: usize) -> Result<(), ComposeError> {
        let max = CompositeRow::MAX_LOCATION.min(MAX_ROW_LENGTH);
        if length > max as usize || offset + length > CompositeRow::MAX_LOCATION as usize {
            return Err(ComposeError::TokenTooLarge { length, max });
        }
        Ok(())
    }
}
