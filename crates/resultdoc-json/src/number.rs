//! Number formatting into stack buffers.

use std::fmt::Write as _;

use super::error::{Result, WriteError};

/// A Rust number the writer can emit.
pub trait JsonNumber: Copy {
    /// Format `self` and pass the JSON text to `emit`.
    fn with_json_bytes<R>(self, emit: impl FnOnce(&[u8]) -> R) -> Result<R>;
}

/// Write the decimal digits of `v` at the end of `buf`, returning the start.
#[inline]
fn format_digits(mut v: u64, buf: &mut [u8]) -> usize {
    let mut at = buf.len();
    loop {
        at -= 1;
        buf[at] = b'0' + (v % 10) as u8;
        v /= 10;
        if v == 0 {
            return at;
        }
    }
}

impl JsonNumber for u64 {
    fn with_json_bytes<R>(self, emit: impl FnOnce(&[u8]) -> R) -> Result<R> {
        let mut buf = [0u8; 20];
        let start = format_digits(self, &mut buf);
        Ok(emit(&buf[start..]))
    }
}

impl JsonNumber for i64 {
    fn with_json_bytes<R>(self, emit: impl FnOnce(&[u8]) -> R) -> Result<R> {
        let mut buf = [0u8; 20];
        let mut start = format_digits(self.unsigned_abs(), &mut buf);
        if self < 0 {
            start -= 1;
            buf[start] = b'-';
        }
        Ok(emit(&buf[start..]))
    }
}

impl JsonNumber for u32 {
    fn with_json_bytes<R>(self, emit: impl FnOnce(&[u8]) -> R) -> Result<R> {
        let mut buf = [0u8; 10];
        let start = format_digits(self as u64, &mut buf);
        Ok(emit(&buf[start..]))
    }
}

impl JsonNumber for i32 {
    fn with_json_bytes<R>(self, emit: impl FnOnce(&[u8]) -> R) -> Result<R> {
        let mut buf = [0u8; 11];
        let mut start = format_digits(self.unsigned_abs() as u64, &mut buf);
        if self < 0 {
            start -= 1;
            buf[start] = b'-';
        }
        Ok(emit(&buf[start..]))
    }
}

impl JsonNumber for usize {
    fn with_json_bytes<R>(self, emit: impl FnOnce(&[u8]) -> R) -> Result<R> {
        (self as u64).with_json_bytes(emit)
    }
}

/// Fixed 128-byte `fmt::Write` target.
struct StackBuffer {
    buf: [u8; 128],
    len: usize,
}

impl std::fmt::Write for StackBuffer {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        let end = self.len + s.len();
        if end > self.buf.len() {
            return Err(std::fmt::Error);
        }
        self.buf[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

impl JsonNumber for f64 {
    /// Plain notation for `1e-6 <= |x| < 1e21` (and zero), exponent
    /// notation otherwise. Both round-trip.
    fn with_json_bytes<R>(self, emit: impl FnOnce(&[u8]) -> R) -> Result<R> {
        if !self.is_finite() {
            return Err(WriteError::NonFiniteNumber);
        }
        let mut out = StackBuffer {
            buf: [0u8; 128],
            len: 0,
        };
        let abs = self.abs();
        let written = if abs == 0.0 || (1e-6..1e21).contains(&abs) {
            write!(out, "{self}")
        } else {
            write!(out, "{self:e}")
        };
        // Shortest round-trip output of a finite f64 fits well under 128 bytes.
        assert!(written.is_ok(), "f64 text exceeds the number buffer");
        Ok(emit(&out.buf[..out.len]))
    }
}
