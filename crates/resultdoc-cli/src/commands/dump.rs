use std::path::PathBuf;
use std::sync::Arc;

use resultdoc_meta::{ChunkPool, Colors};

use super::input::{load_input, parse};

pub struct DumpArgs {
    pub input: PathBuf,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let input = load_input(&args.input).unwrap_or_else(|e| e.exit());
    let document = parse(&input, Arc::new(ChunkPool::new())).unwrap_or_else(|e| e.exit());
    print!("{}", document.dump(Colors::new(args.color)));
}
