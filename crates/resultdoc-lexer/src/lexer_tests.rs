use crate::lexer::{JsonToken, lex, token_text};

fn snapshot(input: &str) -> String {
    let mut out = String::new();
    for token in lex(input) {
        out.push_str(&format!(
            "{:?} {:?}\n",
            token.kind,
            token_text(input, &token)
        ));
    }
    out
}

#[test]
fn punctuation() {
    insta::assert_snapshot!(snapshot("{ } [ ] : ,"), @r#"
    LBrace "{"
    RBrace "}"
    LBracket "["
    RBracket "]"
    Colon ":"
    Comma ","
    "#);
}

#[test]
fn literals() {
    insta::assert_snapshot!(snapshot("true false null"), @r#"
    True "true"
    False "false"
    Null "null"
    "#);
}

#[test]
fn numbers() {
    insta::assert_snapshot!(snapshot("0 -1 3.25 1e10 -2.5E-3"), @r#"
    Number "0"
    Number "-1"
    Number "3.25"
    Number "1e10"
    Number "-2.5E-3"
    "#);
}

#[test]
fn strings_keep_quotes_in_span() {
    insta::assert_snapshot!(snapshot(r#""a" "" "x\"y""#), @r#"
    String "\"a\""
    String "\"\""
    String "\"x\\\"y\""
    "#);
}

#[test]
fn unicode_escape_in_string() {
    let tokens = lex(r#""\u00e9""#);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, JsonToken::String);
    assert_eq!(tokens[0].span, 0..8);
}

#[test]
fn whitespace_skipped() {
    insta::assert_snapshot!(snapshot("\t[\r\n 1 ,\n2 ]\n"), @r#"
    LBracket "["
    Number "1"
    Comma ","
    Number "2"
    RBracket "]"
    "#);
}

#[test]
fn garbage_coalesced_up_to_next_token() {
    insta::assert_snapshot!(snapshot("[@#$ 1]"), @r#"
    LBracket "["
    Garbage "@#$ "
    Number "1"
    RBracket "]"
    "#);
}

#[test]
fn trailing_garbage() {
    insta::assert_snapshot!(snapshot("1 ~~"), @r#"
    Number "1"
    Garbage "~~"
    "#);
}
