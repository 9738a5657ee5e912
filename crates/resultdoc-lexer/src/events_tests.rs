use resultdoc_meta::{TokenEvent, TokenType};

use crate::events::tokenize;

fn snapshot(input: &str) -> String {
    let events = match tokenize(input) {
        Ok(events) => events,
        Err(err) => return err.to_string(),
    };
    let mut out = String::new();
    for event in events {
        let start = event.offset as usize;
        let text = &input[start..start + event.length as usize];
        out.push_str(&format!(
            "{} @{} {:?}{}\n",
            event.kind.mnemonic(),
            event.offset,
            text,
            if event.escaped { " escaped" } else { "" }
        ));
    }
    out
}

#[test]
fn object_with_array() {
    let events = tokenize(r#"{"a":1,"b":[true,null]}"#).unwrap();
    assert_eq!(
        events,
        vec![
            TokenEvent::new(TokenType::StartObject, 0, 1),
            TokenEvent::new(TokenType::PropertyName, 2, 1),
            TokenEvent::new(TokenType::Number, 5, 1),
            TokenEvent::new(TokenType::PropertyName, 8, 1),
            TokenEvent::new(TokenType::StartArray, 11, 1),
            TokenEvent::new(TokenType::True, 12, 4),
            TokenEvent::new(TokenType::Null, 17, 4),
            TokenEvent::new(TokenType::EndArray, 21, 1),
            TokenEvent::new(TokenType::EndObject, 22, 1),
        ]
    );
}

#[test]
fn string_content_excludes_quotes() {
    let events = tokenize(r#"["ab", "c\nd", ""]"#).unwrap();
    assert_eq!(events[1], TokenEvent::new(TokenType::String, 2, 2));
    assert_eq!(events[2], TokenEvent::escaped(TokenType::String, 8, 4));
    assert_eq!(events[3], TokenEvent::new(TokenType::String, 16, 0));
}

#[test]
fn scalar_root() {
    assert_eq!(
        tokenize(" 42 ").unwrap(),
        vec![TokenEvent::new(TokenType::Number, 1, 2)]
    );
}

#[test]
fn empty_containers() {
    assert_eq!(
        tokenize("[{}, []]").unwrap(),
        vec![
            TokenEvent::new(TokenType::StartArray, 0, 1),
            TokenEvent::new(TokenType::StartObject, 1, 1),
            TokenEvent::new(TokenType::EndObject, 2, 1),
            TokenEvent::new(TokenType::StartArray, 5, 1),
            TokenEvent::new(TokenType::EndArray, 6, 1),
            TokenEvent::new(TokenType::EndArray, 7, 1),
        ]
    );
}

#[test]
fn nested_events_snapshot() {
    insta::assert_snapshot!(snapshot(r#"{"k\"":{"x":[1,"y"]}}"#), @r#"
    obj @0 "{"
    prop @2 "k\\\"" escaped
    obj @7 "{"
    prop @9 "x"
    arr @12 "["
    num @13 "1"
    str @16 "y"
    endarr @18 "]"
    endobj @19 "}"
    endobj @20 "}"
    "#);
}

#[test]
fn deep_nesting_is_iterative() {
    let depth = 10_000;
    let input = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
    let events = tokenize(&input).unwrap();
    assert_eq!(events.len(), depth * 2);
}

#[test]
fn missing_colon() {
    insta::assert_snapshot!(snapshot(r#"{"a" 1}"#), @"error at 5..6: expected `:`, found number");
}

#[test]
fn trailing_comma() {
    insta::assert_snapshot!(snapshot("[1,]"), @"error at 3..4: expected a value, found `]`");
}

#[test]
fn mismatched_bracket() {
    insta::assert_snapshot!(snapshot("[1}"), @"error at 2..3: expected `,` or a closing bracket, found `}`");
}

#[test]
fn non_string_key() {
    insta::assert_snapshot!(snapshot("{1:2}"), @"error at 1..2: expected a property name or `}`, found number");
}

#[test]
fn trailing_value() {
    insta::assert_snapshot!(snapshot("1 2"), @"error at 2..3: unexpected content after the root value, found number");
}

#[test]
fn invalid_token() {
    insta::assert_snapshot!(snapshot("[tru]"), @"error at 1..4: invalid token");
}

#[test]
fn unclosed_object() {
    insta::assert_snapshot!(snapshot(r#"{"a":[1"#), @"error at 7..7: unexpected end of input, expected `,` or a closing bracket (related: array opened here at 5..6)");
}

#[test]
fn empty_input() {
    insta::assert_snapshot!(snapshot("  "), @"error at 2..2: unexpected end of input, expected a value");
}
