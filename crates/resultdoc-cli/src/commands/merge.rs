use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use resultdoc::{
    Composer, ComposerOptions, CompositeDocument, DocumentView, NoopTracer, PrintTracer, Slot,
    SourceDocument, Tracer,
};
use resultdoc_json::WriterOptions;
use resultdoc_meta::{ChunkPool, Colors, RowIndex};

use super::input::{CommandError, Input, load_input, parse};

pub struct MergeArgs {
    pub inputs: Vec<PathBuf>,
    pub indent: Option<u8>,
    pub trace: bool,
    pub dump: bool,
    pub color: bool,
}

/// Composed output and, when requested, the composition trace.
#[derive(Debug)]
pub struct Merged {
    pub output: String,
    pub trace: Option<Vec<String>>,
}

pub fn run(args: MergeArgs) {
    let inputs: Vec<Input> = args
        .inputs
        .iter()
        .map(|path| load_input(path).unwrap_or_else(|e| e.exit()))
        .collect();

    match merge(&inputs, &args) {
        Ok(merged) => {
            for line in merged.trace.iter().flatten() {
                eprintln!("{}", line);
            }
            if args.dump {
                print!("{}", merged.output);
            } else {
                println!("{}", merged.output);
            }
        }
        Err(e) => e.exit(),
    }
}

/// Compose all inputs into one object keyed by file stem.
///
/// The root object holds one reference per input; each input is imported
/// after it as a detached segment, so values keep pointing into the input
/// buffers.
pub fn merge(inputs: &[Input], args: &MergeArgs) -> Result<Merged, CommandError> {
    let mut seen = HashSet::new();
    for input in inputs {
        if !seen.insert(input.stem.as_str()) {
            return Err(CommandError::Message(format!(
                "duplicate key `{}` from '{}'",
                input.stem, input.name
            )));
        }
    }

    let pool = Arc::new(ChunkPool::new());
    let documents = inputs
        .iter()
        .map(|input| parse(input, pool.clone()))
        .collect::<Result<Vec<_>, _>>()?;

    let header_rows = 2 * documents.len() + 2;
    let body_rows: usize = documents.iter().map(|d| d.len() as usize).sum();
    let options = ComposerOptions::new().estimated_rows(header_rows + body_rows);
    let colors = Colors::new(args.color);

    let (document, trace) = if args.trace {
        let mut tracer = PrintTracer::new(colors);
        let document = compose(&documents, inputs, pool, options, &mut tracer)?;
        (document, Some(tracer.lines().to_vec()))
    } else {
        (compose(&documents, inputs, pool, options, NoopTracer)?, None)
    };

    let output = if args.dump {
        document.dump(colors)
    } else {
        let mut writer = WriterOptions::new();
        if let Some(size) = args.indent {
            writer = writer.indented(true).indent_size(size);
        }
        document
            .root()
            .to_json(writer)
            .map_err(|e| CommandError::Message(e.to_string()))?
    };
    Ok(Merged { output, trace })
}

fn compose<'s, T: Tracer>(
    documents: &[SourceDocument<'s>],
    inputs: &[Input],
    pool: Arc<ChunkPool>,
    options: ComposerOptions,
    tracer: T,
) -> Result<CompositeDocument<'s>, CommandError> {
    let mut composer = Composer::with_tracer(pool, options, tracer);
    let compose_error = |e: resultdoc::ComposeError| CommandError::Message(e.to_string());

    let sources = documents
        .iter()
        .map(|d| composer.add_source(d.source()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(compose_error)?;

    // Root rows: start, a name and a reference per input, end.
    let mut target = 2 * documents.len() as u32 + 2;
    composer.begin_root_object(None).map_err(compose_error)?;
    for ((document, input), &source) in documents.iter().zip(inputs).zip(&sources) {
        composer.property(&input.stem).map_err(compose_error)?;
        composer
            .reference(RowIndex(target), source, Slot::required())
            .map_err(compose_error)?;
        target += document.len();
    }
    composer.end_object().map_err(compose_error)?;

    for (document, &source) in documents.iter().zip(&sources) {
        composer
            .import(document.root(), source, Slot::required())
            .map_err(compose_error)?;
    }
    composer.finish().map_err(compose_error)
}
