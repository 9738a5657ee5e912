use serde_json::json;

use crate::composer::{Composer, Slot};
use crate::element::ValueKind;
use crate::test_utils::{parse, pool};
use crate::view::DocumentView;

#[test]
fn source_document_matches_serde_json() {
    let text = r#"{"a":[1,-2,18446744073709551615,2.5,1e3],"b":{"c":"dé","e":null},"f":true}"#;
    let doc = parse(text);
    let ours = serde_json::to_value(doc.root()).unwrap();
    let theirs: serde_json::Value = serde_json::from_str(text).unwrap();
    assert_eq!(ours, theirs);
}

#[test]
fn composite_document_skips_internal_and_nulls_invalidated() {
    let mut composer = Composer::new(pool());
    composer.begin_root_object(None).unwrap();
    composer.internal_property("__typename").unwrap();
    composer.string("Query", Slot::required()).unwrap();
    composer.property("user").unwrap();
    composer.begin_object(Slot::nullable()).unwrap();
    composer.property("name").unwrap();
    let name = composer.string("Alice", Slot::required()).unwrap();
    composer.end_object().unwrap();
    composer.property("count").unwrap();
    composer.int(3, Slot::required()).unwrap();
    composer.end_object().unwrap();
    composer.invalidate(name);

    let doc = composer.finish().unwrap();
    let value = serde_json::to_value(doc.root()).unwrap();
    assert_eq!(value, json!({ "user": null, "count": 3 }));
}

#[test]
fn element_serializes_inside_other_structures() {
    let doc = parse(r#"[{"x":1},"y"]"#);
    let items: Vec<_> = doc.root().enumerate_array().unwrap().collect();
    let wrapped = serde_json::to_string(&items).unwrap();
    assert_eq!(wrapped, r#"[{"x":1},"y"]"#);
}

#[test]
fn undefined_rows_fail() {
    let doc = parse("[]");
    let end = doc.element(crate::test_utils::row(1)).unwrap();
    let err = serde_json::to_string(&end).unwrap_err();
    assert!(err.to_string().contains("row 1 is not a value"));
}

#[test]
fn value_kind_names() {
    assert_eq!(serde_json::to_value(ValueKind::Object).unwrap(), json!("object"));
    assert_eq!(ValueKind::True.to_string(), "true");
}
