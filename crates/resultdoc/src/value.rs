//! Decoding of scalar value text: string unescaping and number parsing.

use std::borrow::Cow;
use std::str::FromStr;

use crate::error::ValueError;

/// Decode JSON string content (without quotes).
///
/// Content without a backslash is borrowed as-is.
pub fn unescape(content: &[u8]) -> Result<Cow<'_, str>, ValueError> {
    let Some(first) = content.iter().position(|&b| b == b'\\') else {
        return std::str::from_utf8(content)
            .map(Cow::Borrowed)
            .map_err(|_| ValueError::InvalidUtf8);
    };

    let mut out = Vec::with_capacity(content.len());
    out.extend_from_slice(&content[..first]);
    let mut i = first;
    while i < content.len() {
        let b = content[i];
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }

        let escape_at = i;
        let Some(&kind) = content.get(i + 1) else {
            return Err(ValueError::InvalidEscape { offset: escape_at });
        };
        i += 2;
        let simple = match kind {
            b'"' => Some(b'"'),
            b'\\' => Some(b'\\'),
            b'/' => Some(b'/'),
            b'b' => Some(0x08),
            b'f' => Some(0x0C),
            b'n' => Some(b'\n'),
            b'r' => Some(b'\r'),
            b't' => Some(b'\t'),
            b'u' => None,
            _ => return Err(ValueError::InvalidEscape { offset: escape_at }),
        };
        if let Some(byte) = simple {
            out.push(byte);
            continue;
        }

        let high = read_hex4(content, i).ok_or(ValueError::InvalidEscape { offset: escape_at })?;
        i += 4;
        let ch = match high {
            0xD800..=0xDBFF => {
                // High surrogate: a `\uDC00`..`\uDFFF` escape must follow.
                let low = (content.get(i) == Some(&b'\\') && content.get(i + 1) == Some(&b'u'))
                    .then(|| read_hex4(content, i + 2))
                    .flatten()
                    .filter(|low| (0xDC00..=0xDFFF).contains(low))
                    .ok_or(ValueError::InvalidEscape { offset: escape_at })?;
                i += 6;
                let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                char::from_u32(code)
            }
            0xDC00..=0xDFFF => None,
            code => char::from_u32(code),
        }
        .ok_or(ValueError::InvalidEscape { offset: escape_at })?;

        let mut buf = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    }

    String::from_utf8(out)
        .map(Cow::Owned)
        .map_err(|_| ValueError::InvalidUtf8)
}

fn read_hex4(content: &[u8], at: usize) -> Option<u32> {
    let digits = content.get(at..at + 4)?;
    digits.iter().try_fold(0u32, |acc, &d| {
        let v = (d as char).to_digit(16)?;
        Some(acc * 16 + v)
    })
}

/// Parse number text into `T`, reporting `target` on failure.
pub(crate) fn parse_number<T: FromStr>(text: &[u8], target: &'static str) -> Result<T, ValueError> {
    std::str::from_utf8(text)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .ok_or_else(|| ValueError::NumberOutOfRange {
            text: String::from_utf8_lossy(text).into_owned(),
            target,
        })
}

/// Parse number text as a finite `f64`.
pub(crate) fn parse_f64(text: &[u8]) -> Result<f64, ValueError> {
    let value: f64 = parse_number(text, "f64")?;
    if !value.is_finite() {
        return Err(ValueError::NumberOutOfRange {
            text: String::from_utf8_lossy(text).into_owned(),
            target: "f64",
        });
    }
    Ok(value)
}
