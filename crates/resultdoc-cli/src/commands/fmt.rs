use std::path::PathBuf;
use std::sync::Arc;

use resultdoc::DocumentView;
use resultdoc_json::{Escaping, NewLine, WriterOptions};
use resultdoc_meta::ChunkPool;

use super::input::{CommandError, Input, load_input, parse};

pub struct FmtArgs {
    pub input: PathBuf,
    pub indent: Option<u8>,
    pub crlf: bool,
    pub ascii: bool,
    pub max_depth: u32,
}

impl FmtArgs {
    pub fn writer_options(&self) -> WriterOptions {
        let mut options = WriterOptions::new().max_depth(self.max_depth);
        if let Some(size) = self.indent {
            options = options.indented(true).indent_size(size);
        }
        if self.crlf {
            options = options.new_line(NewLine::CrLf);
        }
        if self.ascii {
            options = options.escaping(Escaping::Ascii);
        }
        options
    }
}

pub fn run(args: FmtArgs) {
    let input = load_input(&args.input).unwrap_or_else(|e| e.exit());
    match format(&input, &args) {
        Ok(output) => println!("{}", output),
        Err(e) => e.exit(),
    }
}

pub fn format(input: &Input, args: &FmtArgs) -> Result<String, CommandError> {
    let document = parse(input, Arc::new(ChunkPool::new()))?;
    document
        .root()
        .to_json(args.writer_options())
        .map_err(|e| CommandError::Message(format!("{}: {}", input.name, e)))
}
