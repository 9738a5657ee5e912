use indoc::indoc;
use resultdoc_json::{Escaping, JsonWriter, NewLine, WriterOptions};
use resultdoc_meta::TokenType;

use crate::element::ValueKind;
use crate::error::{Error, ValueError};
use crate::test_utils::{parse, row};
use crate::view::DocumentView;

const USERS: &str = r#"{"users":[{"name":"Alice","age":30,"admin":true},{"name":"Bob","age":25,"admin":false,"note":null}],"count":2,"ratio":0.5}"#;

#[test]
fn compact_round_trip() {
    let doc = parse(r#"{"a":1,"b":[true,null]}"#);
    let json = doc.root().to_json(WriterOptions::new()).unwrap();
    assert_eq!(json, r#"{"a":1,"b":[true,null]}"#);
}

#[test]
fn indented_output() {
    let doc = parse(r#"{"a":1,"b":[true,null]}"#);
    let json = doc.root().to_json(WriterOptions::pretty()).unwrap();
    let expected = indoc! {r#"
        {
          "a": 1,
          "b": [
            true,
            null
          ]
        }"#};
    assert_eq!(json, expected);
}

#[test]
fn crlf_and_four_spaces() {
    let doc = parse(r#"[1,{}]"#);
    let options = WriterOptions::pretty()
        .indent_size(4)
        .new_line(NewLine::CrLf);
    let json = doc.root().to_json(options).unwrap();
    assert_eq!(json, "[\r\n    1,\r\n    {}\r\n]");
}

#[test]
fn structure_matches_serde_json() {
    let doc = parse(USERS);
    let json = doc.root().to_json(WriterOptions::new()).unwrap();
    let ours: serde_json::Value = serde_json::from_str(&json).unwrap();
    let theirs: serde_json::Value = serde_json::from_str(USERS).unwrap();
    assert_eq!(ours, theirs);
}

#[test]
fn navigation() {
    let doc = parse(USERS);
    let root = doc.root();
    assert_eq!(root.value_kind(), ValueKind::Object);

    let users = root.get_property("users").unwrap().unwrap();
    assert_eq!(users.array_length().unwrap(), 2);
    let bob = users.get_index(1).unwrap().unwrap();
    assert_eq!(
        bob.get_property("name").unwrap().unwrap().get_string().unwrap(),
        "Bob"
    );
    assert_eq!(bob.get_property("age").unwrap().unwrap().get_i32().unwrap(), 25);
    assert!(!bob.get_property("admin").unwrap().unwrap().get_boolean().unwrap());
    assert!(bob.get_property("note").unwrap().unwrap().is_null());
    assert_eq!(bob.get_property("missing").unwrap(), None);
    assert_eq!(users.get_index(2).unwrap(), None);

    let ratio = root.get_property("ratio").unwrap().unwrap();
    assert_eq!(ratio.get_f64().unwrap(), 0.5);
}

#[test]
fn iterators_skip_by_span() {
    let doc = parse(USERS);
    let users = doc.root().get_property("users").unwrap().unwrap();
    let names: Vec<String> = users
        .enumerate_array()
        .unwrap()
        .map(|user| {
            user.get_property("name")
                .unwrap()
                .unwrap()
                .get_string()
                .unwrap()
                .into_owned()
        })
        .collect();
    assert_eq!(names, ["Alice", "Bob"]);

    let keys: Vec<String> = doc
        .root()
        .enumerate_object()
        .unwrap()
        .map(|p| p.name_str().unwrap().into_owned())
        .collect();
    assert_eq!(keys, ["users", "count", "ratio"]);
}

#[test]
fn escaped_property_names_match() {
    let doc = parse(r#"{"a\"b":1,"tab\tkey":2}"#);
    let root = doc.root();
    assert_eq!(root.get_property("a\"b").unwrap().unwrap().get_u32().unwrap(), 1);
    assert_eq!(root.get_property("tab\tkey").unwrap().unwrap().get_u64().unwrap(), 2);
}

#[test]
fn string_values() {
    let doc = parse(r#"["plain","line\nbreak","\u00e9"]"#);
    let items: Vec<_> = doc.root().enumerate_array().unwrap().collect();
    assert_eq!(items[0].get_string().unwrap(), "plain");
    assert_eq!(items[1].get_string().unwrap(), "line\nbreak");
    assert_eq!(items[1].raw_value().unwrap(), br"line\nbreak");
    assert_eq!(items[2].get_string().unwrap(), "\u{e9}");
}

#[test]
fn escaped_strings_are_rewritten() {
    let doc = parse(r#"["\u00e9\/"]"#);
    let relaxed = doc.root().to_json(WriterOptions::new()).unwrap();
    assert_eq!(relaxed, "[\"\u{e9}/\"]");
    let ascii = doc
        .root()
        .to_json(WriterOptions::new().escaping(Escaping::Ascii))
        .unwrap();
    assert_eq!(ascii, r#"["\u00E9/"]"#);
}

#[test]
fn wrong_type_errors() {
    let doc = parse(r#"{"s":"x","n":1.5}"#);
    let s = doc.root().get_property("s").unwrap().unwrap();
    assert_eq!(
        s.get_i64(),
        Err(ValueError::WrongType {
            expected: "number",
            found: ValueKind::String,
        })
    );
    assert_eq!(
        doc.root().get_index(0),
        Err(ValueError::WrongType {
            expected: "array",
            found: ValueKind::Object,
        })
    );
    let n = doc.root().get_property("n").unwrap().unwrap();
    assert_eq!(
        n.get_i32(),
        Err(ValueError::NumberOutOfRange {
            text: "1.5".to_owned(),
            target: "i32",
        })
    );
}

#[test]
fn end_rows_are_not_values() {
    let doc = parse("[]");
    let end = doc.element(row(1)).unwrap();
    assert_eq!(end.token_type(), TokenType::EndArray);
    assert_eq!(end.value_kind(), ValueKind::Undefined);
    assert!(doc.element(row(2)).is_none());
}

#[test]
fn nested_element_serializes_alone() {
    let doc = parse(USERS);
    let alice = doc
        .root()
        .get_property("users")
        .unwrap()
        .unwrap()
        .get_index(0)
        .unwrap()
        .unwrap();
    let json = alice.to_json(WriterOptions::new()).unwrap();
    assert_eq!(json, r#"{"name":"Alice","age":30,"admin":true}"#);
}

#[test]
fn writer_depth_limit_applies() {
    let doc = parse("[[[1]]]");
    let err = doc
        .root()
        .to_json(WriterOptions::new().max_depth(2))
        .unwrap_err();
    assert_eq!(
        err,
        Error::Write(resultdoc_json::WriteError::DepthExceeded { max: 2 })
    );
}

#[test]
fn deep_document_writes_iteratively() {
    let depth = 5_000;
    let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    let doc = parse(&text);
    let json = doc
        .root()
        .to_json(WriterOptions::new().max_depth(depth as u32))
        .unwrap();
    assert_eq!(json, text);
}

#[test]
fn write_into_existing_writer() {
    let doc = parse(r#"{"k":[1,2]}"#);
    let mut out = Vec::new();
    let mut writer = JsonWriter::new(&mut out, WriterOptions::new());
    writer.write_start_array().unwrap();
    doc.root().write_to(&mut writer).unwrap();
    doc.root().get_property("k").unwrap().unwrap().write_to(&mut writer).unwrap();
    writer.write_end_array().unwrap();
    assert_eq!(out, br#"[{"k":[1,2]},[1,2]]"#);
}
