//! Syntax error types and rendering.

use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use serde::{Serialize, Serializer};

/// Secondary location of a syntax error, e.g. where an unclosed container
/// was opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedInfo {
    #[serde(serialize_with = "serialize_range")]
    pub range: Range<usize>,
    pub message: String,
}

impl RelatedInfo {
    pub fn new(range: Range<usize>, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

/// A syntax error with byte range and message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxError {
    #[serde(serialize_with = "serialize_range")]
    pub range: Range<usize>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<RelatedInfo>,
}

fn serialize_range<S: Serializer>(range: &Range<usize>, s: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeStruct;
    let mut state = s.serialize_struct("Range", 2)?;
    state.serialize_field("start", &range.start)?;
    state.serialize_field("end", &range.end)?;
    state.end()
}

impl SyntaxError {
    pub fn new(range: Range<usize>, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
            related: None,
        }
    }

    pub fn with_related(
        range: Range<usize>,
        message: impl Into<String>,
        related: RelatedInfo,
    ) -> Self {
        Self {
            range,
            message: message.into(),
            related: Some(related),
        }
    }

    pub fn at_offset(offset: usize, message: impl Into<String>) -> Self {
        Self::new(offset..offset, message)
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "error at {}..{}: {}",
            self.range.start, self.range.end, self.message
        )?;
        if let Some(related) = &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message, related.range.start, related.range.end
            )?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

/// Widen zero-width spans to one character so the marker is visible.
fn visible_span(range: &Range<usize>, source: &str) -> Range<usize> {
    if range.start == range.end {
        range.start..(range.start + 1).min(source.len())
    } else {
        range.clone()
    }
}

/// Render syntax errors using annotate-snippets.
pub fn render_errors(source: &str, errors: &[SyntaxError], path: Option<&str>) -> String {
    let renderer = Renderer::plain();
    let mut output = String::new();

    for (i, err) in errors.iter().enumerate() {
        let mut snippet = Snippet::source(source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(visible_span(&err.range, source))
                .label(&err.message),
        );

        if let Some(p) = path {
            snippet = snippet.path(p);
        }

        if let Some(related) = &err.related {
            snippet = snippet.annotation(
                AnnotationKind::Context
                    .span(visible_span(&related.range, source))
                    .label(&related.message),
            );
        }

        let report: Vec<Group> = vec![Level::ERROR.primary_title(&err.message).element(snippet)];

        if i > 0 {
            output.push('\n');
        }
        output.push_str(&renderer.render(&report).to_string());
    }

    output
}
