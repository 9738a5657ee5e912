//! Tracing of composition steps.
//!
//! The composer is generic over a [`Tracer`]. With [`NoopTracer`] every hook
//! is an empty `#[inline(always)]` function and compiles away; with
//! [`PrintTracer`] each step becomes one formatted line.

use std::io;

use resultdoc_meta::{Colors, CompositeRow, RowFlags, RowIndex, RowLayout, SourceId};

/// Hooks called by the composer at each metadata change.
pub trait Tracer {
    /// A row was appended.
    fn trace_append(&mut self, index: RowIndex, row: &CompositeRow);

    /// A container row got its final length and span.
    fn trace_patch(&mut self, index: RowIndex, row: &CompositeRow);

    /// A row was marked invalidated during null propagation.
    fn trace_invalidate(&mut self, index: RowIndex, row: &CompositeRow);

    /// A reference was checked at finish; `terminal` differs from `target`
    /// when a chain was flattened.
    fn trace_reference(&mut self, index: RowIndex, target: RowIndex, terminal: RowIndex);

    /// A source subtree of `rows` rows was copied starting at `first`.
    fn trace_import(&mut self, first: RowIndex, rows: u32, source: SourceId);

    /// Composition finished.
    fn trace_finish(&mut self, rows: u32, local_bytes: usize);
}

/// Tracer that does nothing.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_append(&mut self, _index: RowIndex, _row: &CompositeRow) {}

    #[inline(always)]
    fn trace_patch(&mut self, _index: RowIndex, _row: &CompositeRow) {}

    #[inline(always)]
    fn trace_invalidate(&mut self, _index: RowIndex, _row: &CompositeRow) {}

    #[inline(always)]
    fn trace_reference(&mut self, _index: RowIndex, _target: RowIndex, _terminal: RowIndex) {}

    #[inline(always)]
    fn trace_import(&mut self, _first: RowIndex, _rows: u32, _source: SourceId) {}

    #[inline(always)]
    fn trace_finish(&mut self, _rows: u32, _local_bytes: usize) {}
}

impl<T: Tracer + ?Sized> Tracer for &mut T {
    fn trace_append(&mut self, index: RowIndex, row: &CompositeRow) {
        (**self).trace_append(index, row);
    }

    fn trace_patch(&mut self, index: RowIndex, row: &CompositeRow) {
        (**self).trace_patch(index, row);
    }

    fn trace_invalidate(&mut self, index: RowIndex, row: &CompositeRow) {
        (**self).trace_invalidate(index, row);
    }

    fn trace_reference(&mut self, index: RowIndex, target: RowIndex, terminal: RowIndex) {
        (**self).trace_reference(index, target, terminal);
    }

    fn trace_import(&mut self, first: RowIndex, rows: u32, source: SourceId) {
        (**self).trace_import(first, rows, source);
    }

    fn trace_finish(&mut self, rows: u32, local_bytes: usize) {
        (**self).trace_finish(rows, local_bytes);
    }
}

/// Tracer that collects one line per composition step.
pub struct PrintTracer {
    lines: Vec<String>,
    colors: Colors,
}

impl PrintTracer {
    pub fn new(colors: Colors) -> Self {
        Self {
            lines: Vec::new(),
            colors,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn print_to(&self, out: &mut impl io::Write) -> io::Result<()> {
        for line in &self.lines {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    /// `kind @location len=n rows=n [flags]` for one row.
    fn describe(&self, row: &CompositeRow) -> String {
        let c = &self.colors;
        let kind_color = if row.flags().contains(RowFlags::INVALIDATED) {
            c.red
        } else {
            c.blue
        };
        let mut text = format!(
            "{}{}{} {}@{} len={} rows={}{}",
            kind_color,
            row.token_type().mnemonic(),
            c.reset,
            c.dim,
            row.location(),
            row.length(),
            row.number_of_rows(),
            c.reset,
        );
        let flags: Vec<&str> = row.flags().names().collect();
        if !flags.is_empty() {
            text.push_str(&format!(" {}[{}]{}", c.dim, flags.join(","), c.reset));
        }
        text
    }
}

impl Tracer for PrintTracer {
    fn trace_append(&mut self, index: RowIndex, row: &CompositeRow) {
        let line = format!("append     {:>4} {}", index.0, self.describe(row));
        self.lines.push(line);
    }

    fn trace_patch(&mut self, index: RowIndex, row: &CompositeRow) {
        let line = format!("patch      {:>4} {}", index.0, self.describe(row));
        self.lines.push(line);
    }

    fn trace_invalidate(&mut self, index: RowIndex, row: &CompositeRow) {
        let line = format!("invalidate {:>4} {}", index.0, self.describe(row));
        self.lines.push(line);
    }

    fn trace_reference(&mut self, index: RowIndex, target: RowIndex, terminal: RowIndex) {
        let line = if target == terminal {
            format!("reference  {:>4} -> {}", index.0, target.0)
        } else {
            format!(
                "reference  {:>4} -> {} (flattened to {})",
                index.0, target.0, terminal.0
            )
        };
        self.lines.push(line);
    }

    fn trace_import(&mut self, first: RowIndex, rows: u32, source: SourceId) {
        let c = &self.colors;
        let line = format!(
            "import     {:>4} {}rows={} src={}{}",
            first.0, c.dim, rows, source.0, c.reset
        );
        self.lines.push(line);
    }

    fn trace_finish(&mut self, rows: u32, local_bytes: usize) {
        let c = &self.colors;
        let line = format!(
            "{}finish{}     rows={} local={}B",
            c.green, c.reset, rows, local_bytes
        );
        self.lines.push(line);
    }
}
