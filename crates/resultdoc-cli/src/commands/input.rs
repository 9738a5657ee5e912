//! Reading and parsing command inputs.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use resultdoc::SourceDocument;
use resultdoc_lexer::{render_errors, tokenize};
use resultdoc_meta::ChunkPool;

/// Failure of a command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Message(String),

    /// Diagnostics already rendered with source context.
    #[error("{0}")]
    Diagnostics(String),
}

impl CommandError {
    /// Print the error to stderr and exit with status 1.
    pub fn exit(self) -> ! {
        match self {
            CommandError::Message(msg) => eprintln!("error: {}", msg),
            CommandError::Diagnostics(rendered) => eprintln!("{}", rendered.trim_end()),
        }
        std::process::exit(1);
    }
}

/// Text of one input with the name used in messages.
#[derive(Debug)]
pub struct Input {
    pub name: String,
    /// Key used when the input becomes a property.
    pub stem: String,
    pub text: String,
}

impl Input {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        let name = name.into();
        let stem = if name == "<stdin>" {
            "stdin".to_string()
        } else {
            Path::new(&name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| name.clone())
        };
        Self {
            name,
            stem,
            text: text.into(),
        }
    }
}

/// Read a file, or stdin for `-`.
pub fn load_input(path: &Path) -> Result<Input, CommandError> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| CommandError::Message(format!("failed to read stdin: {}", e)))?;
        return Ok(Input::new("<stdin>", text));
    }

    let text = fs::read_to_string(path).map_err(|e| {
        CommandError::Message(format!("failed to read '{}': {}", path.display(), e))
    })?;
    Ok(Input::new(path.display().to_string(), text))
}

/// Tokenize and build a source document over the input text.
pub fn parse(input: &Input, pool: Arc<ChunkPool>) -> Result<SourceDocument<'_>, CommandError> {
    let events = tokenize(&input.text).map_err(|err| {
        CommandError::Diagnostics(render_errors(&input.text, &[err], Some(&input.name)))
    })?;
    SourceDocument::from_events(input.text.as_bytes(), events, pool)
        .map_err(|e| CommandError::Message(format!("{}: {}", input.name, e)))
}
