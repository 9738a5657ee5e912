//! Writer configuration.

/// Default nesting limit.
pub const DEFAULT_MAX_DEPTH: u32 = 1000;

/// Default limit on the byte length of a single string, property name or
/// raw value.
pub const DEFAULT_MAX_TOKEN_SIZE: usize = 166_666_666;

/// Line terminator used when indenting.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum NewLine {
    #[default]
    Lf,
    CrLf,
}

impl NewLine {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Lf => b"\n",
            Self::CrLf => b"\r\n",
        }
    }
}

/// How characters outside ASCII are written.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Escaping {
    /// Non-ASCII characters are copied as UTF-8.
    #[default]
    Relaxed,
    /// Non-ASCII characters become `\uXXXX` escapes.
    Ascii,
}

/// Writer options.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct WriterOptions {
    pub(crate) indented: bool,
    pub(crate) indent_size: u8,
    pub(crate) new_line: NewLine,
    pub(crate) max_depth: u32,
    pub(crate) max_token_size: usize,
    pub(crate) escaping: Escaping,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            indented: false,
            indent_size: 2,
            new_line: NewLine::Lf,
            max_depth: DEFAULT_MAX_DEPTH,
            max_token_size: DEFAULT_MAX_TOKEN_SIZE,
            escaping: Escaping::Relaxed,
        }
    }
}

impl WriterOptions {
    /// Compact output with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Indented output with the default indent of two spaces.
    pub fn pretty() -> Self {
        Self::default().indented(true)
    }

    pub fn indented(mut self, indented: bool) -> Self {
        self.indented = indented;
        self
    }

    /// Spaces per nesting level. Only used when indented.
    pub fn indent_size(mut self, size: u8) -> Self {
        self.indent_size = size;
        self
    }

    pub fn new_line(mut self, new_line: NewLine) -> Self {
        self.new_line = new_line;
        self
    }

    /// Set the nesting limit.
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn max_token_size(mut self, size: usize) -> Self {
        self.max_token_size = size;
        self
    }

    pub fn escaping(mut self, escaping: Escaping) -> Self {
        self.escaping = escaping;
        self
    }

    pub fn is_indented(&self) -> bool {
        self.indented
    }
    pub fn get_indent_size(&self) -> u8 {
        self.indent_size
    }
    pub fn get_new_line(&self) -> NewLine {
        self.new_line
    }
    pub fn get_max_depth(&self) -> u32 {
        self.max_depth
    }
    pub fn get_max_token_size(&self) -> usize {
        self.max_token_size
    }
    pub fn get_escaping(&self) -> Escaping {
        self.escaping
    }
}
