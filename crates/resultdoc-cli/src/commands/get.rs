use std::path::PathBuf;
use std::sync::Arc;

use resultdoc::{DocumentView, Element, ValueKind};
use resultdoc_json::WriterOptions;
use resultdoc_meta::ChunkPool;

use super::input::{CommandError, Input, load_input, parse};

pub struct GetArgs {
    pub input: PathBuf,
    pub path: String,
    pub indent: Option<u8>,
}

pub fn run(args: GetArgs) {
    let input = load_input(&args.input).unwrap_or_else(|e| e.exit());
    match get(&input, &args.path, args.indent) {
        Ok(output) => println!("{}", output),
        Err(e) => e.exit(),
    }
}

/// JSON text of the value at `path` in the input.
pub fn get(input: &Input, path: &str, indent: Option<u8>) -> Result<String, CommandError> {
    let document = parse(input, Arc::new(ChunkPool::new()))?;
    let element = lookup(document.root(), path)?;

    let mut options = WriterOptions::new();
    if let Some(size) = indent {
        options = options.indented(true).indent_size(size);
    }
    element
        .to_json(options)
        .map_err(|e| CommandError::Message(format!("{}: {}", input.name, e)))
}

/// Walk a dot path. Numeric segments index arrays; other segments name
/// object properties. An empty path selects `root`.
pub fn lookup<'d, D: DocumentView>(
    root: Element<'d, D>,
    path: &str,
) -> Result<Element<'d, D>, CommandError> {
    let mut current = root;
    let mut walked = String::new();

    for segment in path.split('.').filter(|s| !s.is_empty()) {
        let next = match current.value_kind() {
            ValueKind::Array => {
                let index: u32 = segment.parse().map_err(|_| {
                    CommandError::Message(format!(
                        "`{}` is an array, expected an index, found `{}`",
                        display_path(&walked),
                        segment
                    ))
                })?;
                current.get_index(index).map_err(value_error)?
            }
            ValueKind::Object => current.get_property(segment).map_err(value_error)?,
            kind => {
                return Err(CommandError::Message(format!(
                    "`{}` is {}, cannot select `{}`",
                    display_path(&walked),
                    kind,
                    segment
                )));
            }
        };

        if !walked.is_empty() {
            walked.push('.');
        }
        walked.push_str(segment);
        current = next.ok_or_else(|| {
            CommandError::Message(format!("path `{}` not found", walked))
        })?;
    }
    Ok(current)
}

fn display_path(walked: &str) -> &str {
    if walked.is_empty() { "<root>" } else { walked }
}

fn value_error(e: resultdoc::ValueError) -> CommandError {
    CommandError::Message(e.to_string())
}
