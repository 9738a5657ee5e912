//! JSON string escaping.
//!
//! ASCII goes through a 128-entry table. The first non-ASCII byte hands the
//! rest of the string to a [`FallbackEncoder`], which decides how the
//! remaining characters are written.

use super::sink::BufferSink;

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// `true` for ASCII bytes that cannot appear verbatim inside a JSON string.
static NEEDS_ESCAPE: [bool; 128] = build_table();

const fn build_table() -> [bool; 128] {
    let mut table = [false; 128];
    let mut i = 0;
    while i < 0x20 {
        table[i] = true;
        i += 1;
    }
    table[b'"' as usize] = true;
    table[b'\\' as usize] = true;
    table
}

/// Whether `byte` must be escaped or handed to the fallback encoder.
#[inline]
pub fn needs_escaping(byte: u8) -> bool {
    byte >= 0x80 || NEEDS_ESCAPE[byte as usize]
}

/// Position of the first byte that cannot be copied verbatim.
#[inline]
pub fn first_escape_index(bytes: &[u8]) -> Option<usize> {
    bytes.iter().position(|&b| needs_escaping(b))
}

/// Encodes the tail of a string starting at its first non-ASCII character.
///
/// The tail may still contain ASCII that needs escaping; implementations
/// route it through [`escape_ascii_run`].
pub trait FallbackEncoder {
    fn encode(&self, rest: &str, sink: &mut dyn BufferSink);
}

/// Copies non-ASCII characters as UTF-8.
#[derive(Clone, Copy, Debug, Default)]
pub struct RelaxedEncoder;

impl FallbackEncoder for RelaxedEncoder {
    fn encode(&self, rest: &str, sink: &mut dyn BufferSink) {
        let bytes = rest.as_bytes();
        let mut start = 0;
        for (i, &b) in bytes.iter().enumerate() {
            if b < 0x80 && NEEDS_ESCAPE[b as usize] {
                sink.write_bytes(&bytes[start..i]);
                write_escaped_ascii(b, sink);
                start = i + 1;
            }
        }
        sink.write_bytes(&bytes[start..]);
    }
}

/// Writes every non-ASCII character as `\uXXXX`, using surrogate pairs
/// above the basic multilingual plane.
#[derive(Clone, Copy, Debug, Default)]
pub struct AsciiEncoder;

impl FallbackEncoder for AsciiEncoder {
    fn encode(&self, rest: &str, sink: &mut dyn BufferSink) {
        let mut units = [0u16; 2];
        let mut run_start = 0;
        for (i, ch) in rest.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            escape_ascii_run(&rest.as_bytes()[run_start..i], sink);
            for &unit in ch.encode_utf16(&mut units).iter() {
                write_unicode_escape(unit, sink);
            }
            run_start = i + ch.len_utf8();
        }
        escape_ascii_run(&rest.as_bytes()[run_start..], sink);
    }
}

/// Escape a run of ASCII bytes.
pub fn escape_ascii_run(bytes: &[u8], sink: &mut dyn BufferSink) {
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if NEEDS_ESCAPE[b as usize] {
            sink.write_bytes(&bytes[start..i]);
            write_escaped_ascii(b, sink);
            start = i + 1;
        }
    }
    sink.write_bytes(&bytes[start..]);
}

/// Write the escape sequence for an ASCII byte flagged by the table.
fn write_escaped_ascii(byte: u8, sink: &mut dyn BufferSink) {
    match byte {
        b'"' => sink.write_bytes(b"\\\""),
        b'\\' => sink.write_bytes(b"\\\\"),
        b'\n' => sink.write_bytes(b"\\n"),
        b'\r' => sink.write_bytes(b"\\r"),
        b'\t' => sink.write_bytes(b"\\t"),
        0x08 => sink.write_bytes(b"\\b"),
        0x0C => sink.write_bytes(b"\\f"),
        other => write_unicode_escape(other as u16, sink),
    }
}

fn write_unicode_escape(unit: u16, sink: &mut dyn BufferSink) {
    sink.write_bytes(&[
        b'\\',
        b'u',
        HEX[(unit >> 12) as usize & 0xF],
        HEX[(unit >> 8) as usize & 0xF],
        HEX[(unit >> 4) as usize & 0xF],
        HEX[unit as usize & 0xF],
    ]);
}

/// Write `value` escaped, without surrounding quotes.
///
/// The prefix before the first byte needing attention is copied verbatim.
pub fn escape_into<S: BufferSink>(value: &str, encoder: &dyn FallbackEncoder, sink: &mut S) {
    let bytes = value.as_bytes();
    let Some(first) = first_escape_index(bytes) else {
        sink.write_bytes(bytes);
        return;
    };

    sink.write_bytes(&bytes[..first]);
    let mut start = first;
    for (i, &b) in bytes.iter().enumerate().skip(first) {
        if b >= 0x80 {
            sink.write_bytes(&bytes[start..i]);
            encoder.encode(&value[i..], sink);
            return;
        }
        if NEEDS_ESCAPE[b as usize] {
            sink.write_bytes(&bytes[start..i]);
            write_escaped_ascii(b, sink);
            start = i + 1;
        }
    }
    sink.write_bytes(&bytes[start..]);
}

/// Escape `value` into a new string with the given encoder.
pub fn escape_to_string(value: &str, encoder: &dyn FallbackEncoder) -> String {
    let mut out = Vec::with_capacity(value.len() + 2);
    escape_into(value, encoder, &mut out);
    // Escaping only inserts ASCII and copies whole UTF-8 sequences.
    String::from_utf8(out).expect("escaped output is UTF-8")
}
