//! Element handles: typed, copyable views of one row.

use std::borrow::Cow;
use std::fmt;

use resultdoc_json::{BufferSink, JsonWriter, WriteError, WriterOptions};
use resultdoc_meta::{RowFlags, RowIndex, RowLayout, TokenType};
use serde::Serialize;

use crate::error::{Error, ValueError};
use crate::value::{parse_f64, parse_number, unescape};
use crate::view::DocumentView;

/// JSON kind of an element's value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Not a value row (end rows, property names read as values).
    Undefined,
    Object,
    Array,
    String,
    Number,
    True,
    False,
    Null,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Undefined => "undefined",
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
        })
    }
}

/// Handle to one row of a document.
///
/// The row may be a reference row of a composite document. Value accessors
/// work on the resolved row; slot flags (nullable, invalidated) are read
/// from the row itself.
pub struct Element<'d, D: DocumentView> {
    doc: &'d D,
    index: RowIndex,
}

impl<D: DocumentView> Clone for Element<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: DocumentView> Copy for Element<'_, D> {}

impl<D: DocumentView> PartialEq for Element<'_, D> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.index == other.index
    }
}

impl<D: DocumentView> fmt::Debug for Element<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("index", &self.index)
            .field("kind", &self.value_kind())
            .finish()
    }
}

impl<'d, D: DocumentView> Element<'d, D> {
    pub(crate) fn new(doc: &'d D, index: RowIndex) -> Self {
        Self { doc, index }
    }

    pub fn document(&self) -> &'d D {
        self.doc
    }

    /// Row this handle names (the slot).
    pub fn index(&self) -> RowIndex {
        self.index
    }

    /// Row holding the value after following references.
    pub fn resolved_index(&self) -> RowIndex {
        self.doc.resolve(self.index)
    }

    fn resolved_row(&self) -> D::Row {
        self.doc.row(self.resolved_index())
    }

    /// Token type of the resolved row.
    pub fn token_type(&self) -> TokenType {
        self.doc.token_type(self.resolved_index())
    }

    /// Flags of the slot row.
    pub fn flags(&self) -> RowFlags {
        self.doc.row(self.index).flags()
    }

    pub fn is_invalidated(&self) -> bool {
        self.flags().contains(RowFlags::INVALIDATED)
            || self.resolved_row().flags().contains(RowFlags::INVALIDATED)
    }

    pub fn is_nullable(&self) -> bool {
        self.flags().contains(RowFlags::NULLABLE)
    }

    pub fn value_kind(&self) -> ValueKind {
        if self.is_invalidated() {
            return ValueKind::Null;
        }
        let row = self.resolved_row();
        if row.flags().contains(RowFlags::EXPLICIT_NULL) {
            return ValueKind::Null;
        }
        match row.token_type() {
            TokenType::StartObject => ValueKind::Object,
            TokenType::StartArray => ValueKind::Array,
            TokenType::String => ValueKind::String,
            TokenType::Number => ValueKind::Number,
            TokenType::True => ValueKind::True,
            TokenType::False => ValueKind::False,
            TokenType::Null => ValueKind::Null,
            TokenType::None
            | TokenType::EndObject
            | TokenType::EndArray
            | TokenType::PropertyName
            | TokenType::Reference => ValueKind::Undefined,
        }
    }

    pub fn is_null(&self) -> bool {
        self.value_kind() == ValueKind::Null
    }

    fn wrong_type(&self, expected: &'static str) -> ValueError {
        ValueError::WrongType {
            expected,
            found: self.value_kind(),
        }
    }

    /// Resolved row if it has the given token type and is not invalidated.
    fn expect_token(
        &self,
        expected: &'static str,
        accept: &[TokenType],
    ) -> Result<D::Row, ValueError> {
        if self.is_invalidated() {
            return Err(ValueError::Invalidated);
        }
        let row = self.resolved_row();
        if !accept.contains(&row.token_type()) {
            return Err(self.wrong_type(expected));
        }
        Ok(row)
    }

    /// String value (or property name), unescaped on demand.
    pub fn get_string(&self) -> Result<Cow<'d, str>, ValueError> {
        let row = self.expect_token("string", &[TokenType::String, TokenType::PropertyName])?;
        let content = self.doc.value_bytes(&row);
        if row.has_complex_children() {
            unescape(content)
        } else {
            std::str::from_utf8(content)
                .map(Cow::Borrowed)
                .map_err(|_| ValueError::InvalidUtf8)
        }
    }

    /// Raw text of a scalar: escaped string content, number or literal.
    pub fn raw_value(&self) -> Result<&'d [u8], ValueError> {
        let row = self.expect_token(
            "scalar",
            &[
                TokenType::String,
                TokenType::Number,
                TokenType::True,
                TokenType::False,
                TokenType::Null,
            ],
        )?;
        Ok(self.doc.value_bytes(&row))
    }

    fn number_text(&self) -> Result<&'d [u8], ValueError> {
        let row = self.expect_token("number", &[TokenType::Number])?;
        Ok(self.doc.value_bytes(&row))
    }

    pub fn get_i32(&self) -> Result<i32, ValueError> {
        parse_number(self.number_text()?, "i32")
    }

    pub fn get_i64(&self) -> Result<i64, ValueError> {
        parse_number(self.number_text()?, "i64")
    }

    pub fn get_u32(&self) -> Result<u32, ValueError> {
        parse_number(self.number_text()?, "u32")
    }

    pub fn get_u64(&self) -> Result<u64, ValueError> {
        parse_number(self.number_text()?, "u64")
    }

    pub fn get_f64(&self) -> Result<f64, ValueError> {
        parse_f64(self.number_text()?)
    }

    pub fn get_boolean(&self) -> Result<bool, ValueError> {
        let row = self.expect_token("boolean", &[TokenType::True, TokenType::False])?;
        Ok(row.token_type() == TokenType::True)
    }

    pub fn array_length(&self) -> Result<u32, ValueError> {
        Ok(self.expect_token("array", &[TokenType::StartArray])?.length())
    }

    /// Number of properties, internal ones included.
    pub fn property_count(&self) -> Result<u32, ValueError> {
        Ok(self.expect_token("object", &[TokenType::StartObject])?.length())
    }

    pub fn enumerate_array(&self) -> Result<ArrayIter<'d, D>, ValueError> {
        self.expect_token("array", &[TokenType::StartArray])?;
        let (next, end) = self.child_range();
        Ok(ArrayIter {
            doc: self.doc,
            next,
            end,
        })
    }

    pub fn enumerate_object(&self) -> Result<ObjectIter<'d, D>, ValueError> {
        self.expect_token("object", &[TokenType::StartObject])?;
        let (next, end) = self.child_range();
        Ok(ObjectIter {
            doc: self.doc,
            next,
            end,
        })
    }

    /// First child row and the closing end row of the resolved container.
    fn child_range(&self) -> (RowIndex, RowIndex) {
        let start = self.resolved_index();
        let span = self.doc.row(start).number_of_rows();
        assert!(span >= 2, "container span read before it was patched");
        (start.offset(1), start.offset(span - 1))
    }

    /// Value of the first property named `name`.
    pub fn get_property(&self, name: &str) -> Result<Option<Element<'d, D>>, ValueError> {
        for property in self.enumerate_object()? {
            if property.name_matches(name)? {
                return Ok(Some(property.value));
            }
        }
        Ok(None)
    }

    pub fn get_index(&self, index: u32) -> Result<Option<Element<'d, D>>, ValueError> {
        Ok(self.enumerate_array()?.nth(index as usize))
    }

    /// Write this element as JSON.
    ///
    /// Invalidated and explicit-null elements write `null`; properties with
    /// an internal name row are skipped. The walk keeps its own stack, so
    /// nesting is limited only by the writer's depth limit.
    pub fn write_to<S: BufferSink>(&self, writer: &mut JsonWriter<'_, S>) -> Result<(), Error> {
        let mut stack: Vec<Cursor> = Vec::new();
        self.write_value(writer, &mut stack)?;

        while let Some(top) = stack.last_mut() {
            if top.next == top.end {
                let is_object = top.is_object;
                stack.pop();
                if is_object {
                    writer.write_end_object()?;
                } else {
                    writer.write_end_array()?;
                }
                continue;
            }

            if top.is_object {
                let name = top.next;
                let value = name.offset(1);
                top.next = value.offset(span_of(self.doc, value));
                let name = Element::new(self.doc, name);
                if name.flags().contains(RowFlags::INTERNAL) {
                    continue;
                }
                writer.write_property_name(&name.get_string()?)?;
                Element::new(self.doc, value).write_value(writer, &mut stack)?;
            } else {
                let item = top.next;
                top.next = item.offset(span_of(self.doc, item));
                Element::new(self.doc, item).write_value(writer, &mut stack)?;
            }
        }
        Ok(())
    }

    /// Write a scalar, or open a container and push its cursor.
    fn write_value<S: BufferSink>(
        &self,
        writer: &mut JsonWriter<'_, S>,
        stack: &mut Vec<Cursor>,
    ) -> Result<(), Error> {
        match self.value_kind() {
            ValueKind::Null => writer.write_null_value()?,
            ValueKind::True => writer.write_boolean_value(true)?,
            ValueKind::False => writer.write_boolean_value(false)?,
            ValueKind::Number => writer.write_number_raw(self.number_text()?)?,
            ValueKind::String => writer.write_string_value(&self.get_string()?)?,
            kind @ (ValueKind::Object | ValueKind::Array) => {
                let is_object = kind == ValueKind::Object;
                if is_object {
                    writer.write_start_object()?;
                } else {
                    writer.write_start_array()?;
                }
                let (next, end) = self.child_range();
                stack.push(Cursor {
                    is_object,
                    next,
                    end,
                });
            }
            ValueKind::Undefined => return Err(self.wrong_type("value").into()),
        }
        Ok(())
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self, options: WriterOptions) -> Result<String, Error> {
        let mut out = Vec::new();
        let mut writer = JsonWriter::new(&mut out, options);
        self.write_to(&mut writer)?;
        String::from_utf8(out).map_err(|_| WriteError::Utf8.into())
    }
}

/// Position inside an open container during [`Element::write_to`].
struct Cursor {
    is_object: bool,
    next: RowIndex,
    end: RowIndex,
}

fn span_of<D: DocumentView>(doc: &D, index: RowIndex) -> u32 {
    let span = doc.row(index).number_of_rows();
    assert!(span > 0, "row span read before it was patched");
    span
}

/// One property of an object: name row and value slot.
pub struct Property<'d, D: DocumentView> {
    pub name: Element<'d, D>,
    pub value: Element<'d, D>,
}

impl<D: DocumentView> Clone for Property<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: DocumentView> Copy for Property<'_, D> {}

impl<D: DocumentView> fmt::Debug for Property<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name.index())
            .field("value", &self.value)
            .finish()
    }
}

impl<'d, D: DocumentView> Property<'d, D> {
    /// Unescaped property name.
    pub fn name_str(&self) -> Result<Cow<'d, str>, ValueError> {
        self.name.get_string()
    }

    /// Composition helper not part of the serialized result.
    pub fn is_internal(&self) -> bool {
        self.name.flags().contains(RowFlags::INTERNAL)
    }

    fn name_matches(&self, name: &str) -> Result<bool, ValueError> {
        let row = self.name.resolved_row();
        if !row.has_complex_children() {
            return Ok(self.name.doc.value_bytes(&row) == name.as_bytes());
        }
        Ok(self.name_str()? == name)
    }
}

/// Items of an array, advancing by each item's span.
pub struct ArrayIter<'d, D: DocumentView> {
    doc: &'d D,
    next: RowIndex,
    end: RowIndex,
}

impl<'d, D: DocumentView> Iterator for ArrayIter<'d, D> {
    type Item = Element<'d, D>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let item = self.next;
        self.next = item.offset(span_of(self.doc, item));
        Some(Element::new(self.doc, item))
    }
}

/// Properties of an object, advancing by each value's span.
pub struct ObjectIter<'d, D: DocumentView> {
    doc: &'d D,
    next: RowIndex,
    end: RowIndex,
}

impl<'d, D: DocumentView> Iterator for ObjectIter<'d, D> {
    type Item = Property<'d, D>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let name = self.next;
        let value = name.offset(1);
        self.next = value.offset(span_of(self.doc, value));
        Some(Property {
            name: Element::new(self.doc, name),
            value: Element::new(self.doc, value),
        })
    }
}
