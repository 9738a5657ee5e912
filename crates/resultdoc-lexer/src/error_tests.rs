use crate::error::{RelatedInfo, SyntaxError, render_errors};
use crate::events::tokenize;

#[test]
fn display_with_related() {
    let err = SyntaxError::with_related(
        9..9,
        "unexpected end of input",
        RelatedInfo::new(0..1, "object opened here"),
    );
    insta::assert_snapshot!(
        err.to_string(),
        @"error at 9..9: unexpected end of input (related: object opened here at 0..1)"
    );
}

#[test]
fn serializes_ranges_as_objects() {
    let err = SyntaxError::new(2..5, "invalid token");
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "range": { "start": 2, "end": 5 },
            "message": "invalid token",
        })
    );
}

#[test]
fn render_points_at_the_error() {
    let source = "{\"a\": tru}";
    let err = tokenize(source).unwrap_err();
    let rendered = render_errors(source, &[err], Some("input.json"));
    assert!(rendered.contains("invalid token"), "{rendered}");
    assert!(rendered.contains("input.json"), "{rendered}");
    assert!(rendered.contains("^^^"), "{rendered}");
}

#[test]
fn render_includes_related_label() {
    let source = "[1, 2";
    let err = tokenize(source).unwrap_err();
    let rendered = render_errors(source, &[err], None);
    assert!(rendered.contains("array opened here"), "{rendered}");
}

#[test]
fn render_nothing() {
    assert_eq!(render_errors("[]", &[], None), "");
}
