//! Human-readable row table dump for debugging.
//!
//! One line per row:
//!
//! ```text
//! [rows] simple, 4 rows
//! 0  arr    @0      len=2    rows=4    src=0 [complex]
//! 1  num    @1      len=1    rows=1    src=0 [leaf]
//! ```

use std::fmt::Write as _;

use super::colors::Colors;
use super::composite::CompositeRow;
use super::db::MetaDb;
use super::flags::RowFlags;
use super::ids::RowIndex;
use super::row::RowLayout;
use super::simple::SimpleRow;

/// Layout-specific dump columns.
pub trait DumpColumns: RowLayout {
    /// Extra columns appended after the common ones.
    fn extra_columns(&self, out: &mut String);
}

impl DumpColumns for SimpleRow {
    fn extra_columns(&self, _out: &mut String) {}
}

impl DumpColumns for CompositeRow {
    fn extra_columns(&self, out: &mut String) {
        let parent = self
            .parent()
            .map_or_else(|| "-".to_owned(), |p| p.0.to_string());
        let selection = self
            .selection_set()
            .map_or_else(|| "-".to_owned(), |s| s.0.to_string());
        write!(out, " parent={parent:<4} sel={selection}").unwrap();
    }
}

/// Dump every row of `db`.
pub fn dump<R: DumpColumns>(db: &MetaDb<R>, colors: Colors) -> String {
    dump_with(db, colors, |_, _| None)
}

/// Dump every row of `db`, appending the preview text `preview` returns.
pub fn dump_with<R, F>(db: &MetaDb<R>, colors: Colors, preview: F) -> String
where
    R: DumpColumns,
    F: Fn(RowIndex, &R) -> Option<String>,
{
    let c = &colors;
    let mut out = String::new();
    let width = width_for_count(db.len() as usize);

    writeln!(
        out,
        "{}[rows]{} {}, {} rows",
        c.blue,
        c.reset,
        R::NAME,
        db.len()
    )
    .unwrap();

    for (index, row) in db.iter() {
        let kind_color = if row.flags().contains(RowFlags::INVALIDATED) {
            c.red
        } else {
            c.blue
        };
        write!(
            out,
            "{:>width$}  {}{:<6}{} {}@{:<6} len={:<4} rows={:<4} src={}{}",
            index.0,
            kind_color,
            row.token_type().mnemonic(),
            c.reset,
            c.dim,
            row.location(),
            row.length(),
            row.number_of_rows(),
            row.source_id(),
            c.reset,
        )
        .unwrap();
        row.extra_columns(&mut out);

        let mut names: Vec<&str> = Vec::new();
        if row.has_complex_children() {
            names.push("complex");
        }
        names.extend(row.flags().names());
        if !names.is_empty() {
            write!(out, " {}[{}]{}", c.dim, names.join(","), c.reset).unwrap();
        }

        if let Some(text) = preview(index, &row) {
            write!(out, "  {}{}{}", c.green, truncate_text(&text, 40), c.reset).unwrap();
        }
        out.push('\n');
    }

    out
}

/// Number of decimal digits needed to print indices below `count`.
pub fn width_for_count(count: usize) -> usize {
    if count <= 1 {
        1
    } else {
        ((count - 1) as f64).log10() as usize + 1
    }
}

/// Truncate to at most `max_chars` characters, marking the cut with `…`.
pub fn truncate_text(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_owned();
    }
    let mut out: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    out
}
