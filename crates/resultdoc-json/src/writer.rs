//! Forward-only JSON writer.

use super::error::{Result, WriteError};
use super::escape::{AsciiEncoder, FallbackEncoder, RelaxedEncoder, escape_into};
use super::number::JsonNumber;
use super::options::{Escaping, WriterOptions};
use super::sink::BufferSink;

/// High bit of `current_depth`: the next token needs a `,` first.
const SEPARATOR_BIT: u32 = 0x8000_0000;
const DEPTH_MASK: u32 = !SEPARATOR_BIT;

/// Last token the writer emitted.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum JsonTokenType {
    #[default]
    None,
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    PropertyName,
    String,
    Number,
    True,
    False,
    Null,
    /// Pre-formatted value copied verbatim.
    Raw,
}

/// Container kinds of the open scopes, one bit each (1 = object).
///
/// The first 64 levels live inline; deeper levels spill into `overflow`.
#[derive(Clone, Debug, Default)]
struct ContainerStack {
    inline: u64,
    overflow: Vec<u64>,
    len: u32,
}

impl ContainerStack {
    fn push(&mut self, is_object: bool) {
        let at = self.len as usize;
        if at < 64 {
            set_bit(&mut self.inline, at, is_object);
        } else {
            let word = (at - 64) / 64;
            if word == self.overflow.len() {
                self.overflow.push(0);
            }
            set_bit(&mut self.overflow[word], (at - 64) % 64, is_object);
        }
        self.len += 1;
    }

    fn peek(&self) -> Option<bool> {
        let at = self.len.checked_sub(1)? as usize;
        let bit = if at < 64 {
            self.inline >> at
        } else {
            self.overflow[(at - 64) / 64] >> ((at - 64) % 64)
        };
        Some(bit & 1 == 1)
    }

    fn pop(&mut self) -> Option<bool> {
        let top = self.peek()?;
        self.len -= 1;
        Some(top)
    }

    fn clear(&mut self) {
        self.inline = 0;
        self.overflow.clear();
        self.len = 0;
    }
}

#[inline]
fn set_bit(word: &mut u64, at: usize, value: bool) {
    if value {
        *word |= 1 << at;
    } else {
        *word &= !(1 << at);
    }
}

/// Streaming JSON writer over a borrowed sink.
///
/// Every write validates against the current state before touching the
/// sink, so a failed write leaves both unchanged.
pub struct JsonWriter<'w, S: BufferSink> {
    sink: &'w mut S,
    options: WriterOptions,
    /// Open container count, with [`SEPARATOR_BIT`] folded in.
    current_depth: u32,
    token_type: JsonTokenType,
    stack: ContainerStack,
}

impl<'w, S: BufferSink> JsonWriter<'w, S> {
    pub fn new(sink: &'w mut S, options: WriterOptions) -> Self {
        Self {
            sink,
            options,
            current_depth: 0,
            token_type: JsonTokenType::None,
            stack: ContainerStack::default(),
        }
    }

    pub fn options(&self) -> &WriterOptions {
        &self.options
    }

    /// Number of open containers.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.current_depth & DEPTH_MASK
    }

    /// Last token written.
    pub fn token_type(&self) -> JsonTokenType {
        self.token_type
    }

    /// Whether a complete top-level value has been written.
    pub fn is_complete(&self) -> bool {
        self.depth() == 0 && self.token_type != JsonTokenType::None
    }

    /// Forget all state so the sink can receive a fresh document.
    pub fn reset(&mut self) {
        self.current_depth = 0;
        self.token_type = JsonTokenType::None;
        self.stack.clear();
    }

    pub fn write_start_object(&mut self) -> Result<()> {
        self.write_start(true)
    }

    pub fn write_end_object(&mut self) -> Result<()> {
        self.write_end(true)
    }

    pub fn write_start_array(&mut self) -> Result<()> {
        self.write_start(false)
    }

    pub fn write_end_array(&mut self) -> Result<()> {
        self.write_end(false)
    }

    pub fn write_property_name(&mut self, name: &str) -> Result<()> {
        self.check_token_size(name.len())?;
        if self.stack.peek() != Some(true) || self.token_type == JsonTokenType::PropertyName {
            return Err(WriteError::UnexpectedPropertyName);
        }

        self.sink.reserve(name.len() + 4);
        if self.needs_separator() {
            self.sink.write_byte(b',');
        }
        self.write_indentation();
        self.write_quoted(name);
        self.sink.write_byte(b':');
        if self.options.indented {
            self.sink.write_byte(b' ');
        }

        self.current_depth &= DEPTH_MASK;
        self.token_type = JsonTokenType::PropertyName;
        Ok(())
    }

    pub fn write_string_value(&mut self, value: &str) -> Result<()> {
        self.check_token_size(value.len())?;
        self.begin_value()?;
        self.sink.reserve(value.len() + 2);
        self.write_quoted(value);
        self.end_value(JsonTokenType::String);
        Ok(())
    }

    /// Write a string value given as bytes, rejecting invalid UTF-8.
    pub fn write_string_value_utf8(&mut self, value: &[u8]) -> Result<()> {
        let value = std::str::from_utf8(value).map_err(|_| WriteError::Utf8)?;
        self.write_string_value(value)
    }

    pub fn write_number<N: JsonNumber>(&mut self, value: N) -> Result<()> {
        // Format first: non-finite floats fail before anything is written.
        let mut text = [0u8; 128];
        let len = value.with_json_bytes(|bytes| {
            text[..bytes.len()].copy_from_slice(bytes);
            bytes.len()
        })?;
        self.write_number_raw(&text[..len])
    }

    /// Write pre-formatted number text verbatim.
    pub fn write_number_raw(&mut self, text: &[u8]) -> Result<()> {
        self.check_token_size(text.len())?;
        self.begin_value()?;
        self.sink.write_bytes(text);
        self.end_value(JsonTokenType::Number);
        Ok(())
    }

    pub fn write_boolean_value(&mut self, value: bool) -> Result<()> {
        self.begin_value()?;
        if value {
            self.sink.write_bytes(b"true");
            self.end_value(JsonTokenType::True);
        } else {
            self.sink.write_bytes(b"false");
            self.end_value(JsonTokenType::False);
        }
        Ok(())
    }

    pub fn write_null_value(&mut self) -> Result<()> {
        self.begin_value()?;
        self.sink.write_bytes(b"null");
        self.end_value(JsonTokenType::Null);
        Ok(())
    }

    /// Write a pre-formatted JSON value verbatim. The bytes are not checked.
    pub fn write_raw_value(&mut self, json: &[u8]) -> Result<()> {
        self.check_token_size(json.len())?;
        self.begin_value()?;
        self.sink.write_bytes(json);
        self.end_value(JsonTokenType::Raw);
        Ok(())
    }

    fn write_start(&mut self, is_object: bool) -> Result<()> {
        let max = self.options.max_depth;
        if self.depth() >= max {
            return Err(WriteError::DepthExceeded { max });
        }
        self.begin_value()?;
        self.sink.write_byte(if is_object { b'{' } else { b'[' });

        self.stack.push(is_object);
        self.current_depth = self.depth() + 1;
        self.token_type = if is_object {
            JsonTokenType::StartObject
        } else {
            JsonTokenType::StartArray
        };
        Ok(())
    }

    fn write_end(&mut self, is_object: bool) -> Result<()> {
        if self.stack.peek() != Some(is_object) || self.token_type == JsonTokenType::PropertyName {
            return Err(WriteError::MismatchedEnd);
        }
        let empty = matches!(
            self.token_type,
            JsonTokenType::StartObject | JsonTokenType::StartArray
        );

        self.stack.pop();
        let depth = self.depth() - 1;
        self.current_depth = depth;
        if !empty {
            self.write_indentation();
        }
        self.sink.write_byte(if is_object { b'}' } else { b']' });

        self.current_depth |= SEPARATOR_BIT;
        self.token_type = if is_object {
            JsonTokenType::EndObject
        } else {
            JsonTokenType::EndArray
        };
        Ok(())
    }

    /// Validate the position of a value and write its separator and
    /// indentation.
    fn begin_value(&mut self) -> Result<()> {
        if self.stack.peek() == Some(true) {
            if self.token_type != JsonTokenType::PropertyName {
                return Err(WriteError::PropertyNameExpected);
            }
            return Ok(());
        }
        if self.is_complete() {
            return Err(WriteError::MultipleRootValues);
        }
        if self.needs_separator() {
            self.sink.write_byte(b',');
        }
        // The first top-level value starts at column 0 without a newline.
        if self.depth() > 0 {
            self.write_indentation();
        }
        Ok(())
    }

    #[inline]
    fn end_value(&mut self, token_type: JsonTokenType) {
        self.current_depth |= SEPARATOR_BIT;
        self.token_type = token_type;
    }

    #[inline]
    fn needs_separator(&self) -> bool {
        self.current_depth & SEPARATOR_BIT != 0 && self.depth() > 0
    }

    /// Newline plus indent for the current depth. No-op when compact.
    fn write_indentation(&mut self) {
        let depth = self.depth();
        if !self.options.indented {
            return;
        }
        self.sink.write_bytes(self.options.new_line.as_bytes());
        let width = depth as usize * self.options.indent_size as usize;
        const SPACES: [u8; 64] = [b' '; 64];
        let mut remaining = width;
        while remaining > 0 {
            let n = remaining.min(SPACES.len());
            self.sink.write_bytes(&SPACES[..n]);
            remaining -= n;
        }
    }

    fn write_quoted(&mut self, value: &str) {
        let encoder: &dyn FallbackEncoder = match self.options.escaping {
            Escaping::Relaxed => &RelaxedEncoder,
            Escaping::Ascii => &AsciiEncoder,
        };
        self.sink.write_byte(b'"');
        escape_into(value, encoder, &mut *self.sink);
        self.sink.write_byte(b'"');
    }

    #[inline]
    fn check_token_size(&self, length: usize) -> Result<()> {
        let max = self.options.max_token_size;
        if length > max {
            return Err(WriteError::StringTooLarge { length, max });
        }
        Ok(())
    }
}

impl<S: BufferSink> std::fmt::Debug for JsonWriter<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonWriter")
            .field("depth", &self.depth())
            .field("token_type", &self.token_type)
            .field("options", &self.options)
            .finish()
    }
}

/// Run `write` against a fresh writer and return the produced text.
pub fn write_to_string<F>(options: WriterOptions, write: F) -> Result<String>
where
    F: FnOnce(&mut JsonWriter<'_, Vec<u8>>) -> Result<()>,
{
    let mut out = Vec::new();
    let mut writer = JsonWriter::new(&mut out, options);
    write(&mut writer)?;
    String::from_utf8(out).map_err(|_| WriteError::Utf8)
}
