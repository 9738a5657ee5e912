use super::error::WriteError;
use super::number::JsonNumber;

fn text<N: JsonNumber>(n: N) -> Result<String, WriteError> {
    n.with_json_bytes(|bytes| String::from_utf8(bytes.to_vec()).unwrap())
}

#[test]
fn integers() {
    assert_eq!(text(0i32).unwrap(), "0");
    assert_eq!(text(-7i32).unwrap(), "-7");
    assert_eq!(text(i32::MIN).unwrap(), "-2147483648");
    assert_eq!(text(i32::MAX).unwrap(), "2147483647");
    assert_eq!(text(u32::MAX).unwrap(), "4294967295");
    assert_eq!(text(i64::MIN).unwrap(), "-9223372036854775808");
    assert_eq!(text(i64::MAX).unwrap(), "9223372036854775807");
    assert_eq!(text(u64::MAX).unwrap(), "18446744073709551615");
    assert_eq!(text(42usize).unwrap(), "42");
}

#[test]
fn floats_plain_range() {
    assert_eq!(text(1.5f64).unwrap(), "1.5");
    assert_eq!(text(-0.25f64).unwrap(), "-0.25");
    assert_eq!(text(3.0f64).unwrap(), "3");
    assert_eq!(text(0.0f64).unwrap(), "0");
    assert_eq!(text(0.000001f64).unwrap(), "0.000001");
    assert_eq!(text(1e20f64).unwrap(), "100000000000000000000");
}

#[test]
fn floats_exponent_range() {
    assert_eq!(text(1e21f64).unwrap(), "1e21");
    assert_eq!(text(1.5e-7f64).unwrap(), "1.5e-7");
    assert_eq!(text(-2e300f64).unwrap(), "-2e300");
}

#[test]
fn non_finite_rejected() {
    assert_eq!(text(f64::NAN), Err(WriteError::NonFiniteNumber));
    assert_eq!(text(f64::INFINITY), Err(WriteError::NonFiniteNumber));
    assert_eq!(text(f64::NEG_INFINITY), Err(WriteError::NonFiniteNumber));
}

#[test]
fn floats_round_trip() {
    for value in [0.1, 1.0 / 3.0, 123456.789, 5e-324, f64::MAX, -1e-10, 2.5e25] {
        let parsed: f64 = text(value).unwrap().parse().unwrap();
        assert_eq!(parsed, value);
    }
}
