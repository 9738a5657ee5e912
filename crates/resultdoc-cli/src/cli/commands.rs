//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("resultdoc")
        .about("Format, inspect and compose JSON result documents")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(fmt_command())
        .subcommand(dump_command())
        .subcommand(get_command())
        .subcommand(merge_command())
}

/// Re-serialize a JSON document through the streaming writer.
pub fn fmt_command() -> Command {
    Command::new("fmt")
        .about("Re-serialize a JSON document")
        .override_usage("resultdoc fmt [FILE] [OPTIONS]")
        .after_help(
            r#"EXAMPLES:
  resultdoc fmt data.json
  resultdoc fmt --indent 2 data.json
  cat data.json | resultdoc fmt --ascii"#,
        )
        .arg(input_arg())
        .arg(indent_arg())
        .arg(crlf_arg())
        .arg(ascii_arg())
        .arg(max_depth_arg())
}

/// Show the row table of a parsed document.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Show the row table of a JSON document")
        .override_usage("resultdoc dump [FILE] [OPTIONS]")
        .after_help(
            r#"EXAMPLES:
  resultdoc dump data.json
  echo '{"a":[1,2]}' | resultdoc dump --color never"#,
        )
        .arg(input_arg())
        .arg(color_arg())
}

/// Print the value at a dot path.
pub fn get_command() -> Command {
    Command::new("get")
        .about("Print the value at a dot path")
        .override_usage("resultdoc get <FILE> [PATH] [OPTIONS]")
        .after_help(
            r#"EXAMPLES:
  resultdoc get data.json users.0.name
  resultdoc get - data.items --indent 2"#,
        )
        .arg(required_input_arg())
        .arg(path_arg())
        .arg(indent_arg())
}

/// Compose several documents into one result.
pub fn merge_command() -> Command {
    Command::new("merge")
        .about("Compose documents into one object keyed by file name")
        .override_usage("resultdoc merge <FILE>... [OPTIONS]")
        .after_help(
            r#"Each file becomes a property named after its file stem. Values are
referenced from the source buffers, not copied.

EXAMPLES:
  resultdoc merge user.json posts.json
  resultdoc merge --indent 2 --trace a.json b.json
  resultdoc merge --dump a.json b.json"#,
        )
        .arg(inputs_arg())
        .arg(indent_arg())
        .arg(trace_arg())
        .arg(dump_arg())
        .arg(color_arg())
}
