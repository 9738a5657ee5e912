use std::path::PathBuf;

use super::ColorChoice;
use super::commands::build_cli;
use super::dispatch::{DumpParams, FmtParams, GetParams, MergeParams};

fn matches(args: &[&str]) -> clap::ArgMatches {
    build_cli()
        .try_get_matches_from(args)
        .expect("arguments should parse")
}

#[test]
fn fmt_defaults() {
    let m = matches(&["resultdoc", "fmt"]);
    let (name, sub) = m.subcommand().unwrap();
    assert_eq!(name, "fmt");

    let params = FmtParams::from_matches(sub);
    assert_eq!(params.input, PathBuf::from("-"));
    assert_eq!(params.indent, None);
    assert!(!params.crlf);
    assert!(!params.ascii);
    assert_eq!(params.max_depth, 1000);
}

#[test]
fn fmt_all_options() {
    let m = matches(&[
        "resultdoc",
        "fmt",
        "data.json",
        "--indent",
        "4",
        "--crlf",
        "--ascii",
        "--max-depth",
        "8",
    ]);
    let params = FmtParams::from_matches(m.subcommand_matches("fmt").unwrap());
    assert_eq!(params.input, PathBuf::from("data.json"));
    assert_eq!(params.indent, Some(4));
    assert!(params.crlf);
    assert!(params.ascii);
    assert_eq!(params.max_depth, 8);
}

#[test]
fn fmt_rejects_oversized_indent() {
    let result = build_cli().try_get_matches_from(["resultdoc", "fmt", "--indent", "300"]);
    assert!(result.is_err());
}

#[test]
fn dump_color_choices() {
    let m = matches(&["resultdoc", "dump", "x.json", "--color", "always"]);
    let params = DumpParams::from_matches(m.subcommand_matches("dump").unwrap());
    assert_eq!(params.input, PathBuf::from("x.json"));
    assert_eq!(params.color, ColorChoice::Always);

    let m = matches(&["resultdoc", "dump", "--color", "never"]);
    let params = DumpParams::from_matches(m.subcommand_matches("dump").unwrap());
    assert_eq!(params.color, ColorChoice::Never);

    let m = matches(&["resultdoc", "dump"]);
    let params = DumpParams::from_matches(m.subcommand_matches("dump").unwrap());
    assert_eq!(params.color, ColorChoice::Auto);
}

#[test]
fn dump_rejects_unknown_color() {
    let result = build_cli().try_get_matches_from(["resultdoc", "dump", "--color", "sometimes"]);
    assert!(result.is_err());
}

#[test]
fn get_requires_input() {
    let result = build_cli().try_get_matches_from(["resultdoc", "get"]);
    assert!(result.is_err());
}

#[test]
fn get_path_and_indent() {
    let m = matches(&["resultdoc", "get", "data.json", "users.0.name", "--indent", "2"]);
    let params = GetParams::from_matches(m.subcommand_matches("get").unwrap());
    assert_eq!(params.input, PathBuf::from("data.json"));
    assert_eq!(params.path, "users.0.name");
    assert_eq!(params.indent, Some(2));
}

#[test]
fn get_path_defaults_to_root() {
    let m = matches(&["resultdoc", "get", "data.json"]);
    let params = GetParams::from_matches(m.subcommand_matches("get").unwrap());
    assert_eq!(params.path, "");
}

#[test]
fn merge_collects_inputs() {
    let m = matches(&[
        "resultdoc", "merge", "a.json", "b.json", "--trace", "--dump", "--color", "never",
    ]);
    let params = MergeParams::from_matches(m.subcommand_matches("merge").unwrap());
    assert_eq!(
        params.inputs,
        vec![PathBuf::from("a.json"), PathBuf::from("b.json")]
    );
    assert!(params.trace);
    assert!(params.dump);
    assert_eq!(params.color, ColorChoice::Never);
    assert_eq!(params.indent, None);
}

#[test]
fn merge_requires_inputs() {
    let result = build_cli().try_get_matches_from(["resultdoc", "merge"]);
    assert!(result.is_err());
}

#[test]
fn subcommand_required() {
    let result = build_cli().try_get_matches_from(["resultdoc"]);
    assert!(result.is_err());
}
