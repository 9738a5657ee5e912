//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so the same definition can be reused
//! across commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Input file (positional, `-` for stdin).
pub fn input_arg() -> Arg {
    Arg::new("input")
        .value_name("FILE")
        .default_value("-")
        .value_parser(value_parser!(PathBuf))
        .help("JSON file to read (\"-\" for stdin)")
}

/// Required input file followed by other positionals.
pub fn required_input_arg() -> Arg {
    Arg::new("input")
        .value_name("FILE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON file to read (\"-\" for stdin)")
}

/// One or more input files (positional).
pub fn inputs_arg() -> Arg {
    Arg::new("inputs")
        .value_name("FILE")
        .required(true)
        .num_args(1..)
        .value_parser(value_parser!(PathBuf))
        .help("JSON files to compose (\"-\" for stdin)")
}

/// Dot path into the document (positional).
pub fn path_arg() -> Arg {
    Arg::new("path")
        .value_name("PATH")
        .help("Dot path such as users.0.name (empty for the root)")
}

/// Indentation width (--indent).
pub fn indent_arg() -> Arg {
    Arg::new("indent")
        .long("indent")
        .value_name("N")
        .value_parser(value_parser!(u8))
        .help("Indent output by N spaces per level (compact when omitted)")
}

/// CRLF line endings (--crlf).
pub fn crlf_arg() -> Arg {
    Arg::new("crlf")
        .long("crlf")
        .action(ArgAction::SetTrue)
        .help("Use CRLF line endings when indenting")
}

/// ASCII-only output (--ascii).
pub fn ascii_arg() -> Arg {
    Arg::new("ascii")
        .long("ascii")
        .action(ArgAction::SetTrue)
        .help("Escape all non-ASCII characters")
}

/// Writer nesting limit (--max-depth).
pub fn max_depth_arg() -> Arg {
    Arg::new("max_depth")
        .long("max-depth")
        .value_name("N")
        .default_value("1000")
        .value_parser(value_parser!(u32))
        .help("Maximum nesting depth of the output")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Print composition steps (--trace).
pub fn trace_arg() -> Arg {
    Arg::new("trace")
        .long("trace")
        .action(ArgAction::SetTrue)
        .help("Print composition steps to stderr")
}

/// Print the row table instead of JSON (--dump).
pub fn dump_arg() -> Arg {
    Arg::new("dump")
        .long("dump")
        .action(ArgAction::SetTrue)
        .help("Print the composed row table instead of JSON")
}
