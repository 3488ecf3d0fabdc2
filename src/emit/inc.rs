//! C include fragments, one `<family>.inc` per family.
//!
//! Each row is a brace initializer meant to be `#include`d inside an array
//! definition. Rows get a trailing `// NAME` comment when both ends of the
//! range have a character name; runs carrying the fallback value never do.
use crate::family::{CompiledFamily, CompiledTable};
use crate::names::{NameLookup, range_comment};
use crate::table::CodePoint;

pub fn file_name(family: &CompiledFamily) -> String { format!("{}.inc", family.name) }

fn span(start: CodePoint, end: CodePoint) -> String { format!("0x{start:04X}, 0x{end:04X}") }

pub fn render_inc(family: &CompiledFamily, names: &dyn NameLookup) -> String {
    let rows: Vec<(String, Option<String>)> = match &family.table {
        CompiledTable::Membership { intervals } => intervals
            .iter()
            .map(|iv| (format!("{{{}}},", span(iv.start, iv.end)), range_comment(names, iv.start, iv.end)))
            .collect(),
        CompiledTable::Categorical { fallback, runs } => runs
            .iter()
            .map(|run| {
                let row = format!("{{{}, {}{}}},", span(run.start, run.end), family.tag_prefix, run.tag);
                let comment = if run.tag == *fallback { None } else { range_comment(names, run.start, run.end) };
                (row, comment)
            })
            .collect(),
        CompiledTable::Affine { runs, .. } => runs
            .iter()
            .map(|run| {
                let row = format!("{{{}, {}, {}}},", span(run.start, run.end), run.stride, run.delta);
                (row, range_comment(names, run.start, run.end))
            })
            .collect(),
    };

    let width = rows.iter().map(|(row, _)| row.len()).max().unwrap_or(0);
    let mut out = format!("// Auto-generated from {} by ucd-runs; do not edit\n", family.source);
    for (row, comment) in rows {
        let line = match comment {
            Some(comment) => format!("{row:<width$} // {comment}\n"),
            None => format!("{row}\n"),
        };
        out.push_str(&line);
    }
    out
}
