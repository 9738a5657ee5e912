use std::borrow::Cow;

use crate::error::ValueError;
use crate::value::{parse_f64, parse_number, unescape};

#[test]
fn plain_content_is_borrowed() {
    let out = unescape(b"hello").unwrap();
    assert!(matches!(out, Cow::Borrowed("hello")));
}

#[test]
fn simple_escapes() {
    let out = unescape(br#"a\"b\\c\/d\n\r\t\b\f"#).unwrap();
    assert_eq!(out, "a\"b\\c/d\n\r\t\u{8}\u{c}");
}

#[test]
fn unicode_escapes() {
    assert_eq!(unescape(br"\u00e9").unwrap(), "\u{e9}");
    assert_eq!(unescape(br"x\u20ACy").unwrap(), "x\u{20ac}y");
    assert_eq!(unescape(br"\uD83D\uDE00").unwrap(), "\u{1f600}");
}

#[test]
fn lone_surrogate_is_rejected() {
    assert_eq!(
        unescape(br"ab\uD83Dx"),
        Err(ValueError::InvalidEscape { offset: 2 })
    );
    assert_eq!(
        unescape(br"\uDE00"),
        Err(ValueError::InvalidEscape { offset: 0 })
    );
}

#[test]
fn malformed_escapes() {
    assert_eq!(unescape(br"\q"), Err(ValueError::InvalidEscape { offset: 0 }));
    assert_eq!(unescape(br"abc\"), Err(ValueError::InvalidEscape { offset: 3 }));
    assert_eq!(unescape(br"\u12"), Err(ValueError::InvalidEscape { offset: 0 }));
}

#[test]
fn invalid_utf8() {
    assert_eq!(unescape(&[0xff, 0xfe]), Err(ValueError::InvalidUtf8));
}

#[test]
fn numbers() {
    assert_eq!(parse_number::<i32>(b"-42", "i32"), Ok(-42));
    assert_eq!(parse_number::<u64>(b"18446744073709551615", "u64"), Ok(u64::MAX));
    assert_eq!(
        parse_number::<u32>(b"-1", "u32"),
        Err(ValueError::NumberOutOfRange {
            text: "-1".to_owned(),
            target: "u32",
        })
    );
    assert_eq!(
        parse_number::<i64>(b"1.5", "i64"),
        Err(ValueError::NumberOutOfRange {
            text: "1.5".to_owned(),
            target: "i64",
        })
    );
    assert_eq!(parse_f64(b"2.5e-3"), Ok(0.0025));
}
