//! Character names for the comments next to emitted rows.
use crate::record::UcdRow;
use crate::table::CodePoint;

pub trait NameLookup: Sync {
    fn name(&self, cp: CodePoint) -> Option<&str>;
}

/// No names at all; every row is emitted without a comment.
pub struct NoNames;

impl NameLookup for NoNames {
    fn name(&self, _: CodePoint) -> Option<&str> { None }
}

/// Names taken from UnicodeData rows, skipping `<control>`-style placeholders.
#[derive(Debug, Clone, Default)]
pub struct UcdNames<'a> {
    names: Vec<(CodePoint, &'a str)>,
}

impl<'a> UcdNames<'a> {
    pub fn from_rows(rows: &[UcdRow<'a>]) -> Self {
        let mut names: Vec<_> = rows
            .iter()
            .filter(|row| row.has_real_name() && row.range.start == row.range.end)
            .map(|row| (row.range.start, row.name))
            .collect();
        names.sort_unstable_by_key(|&(cp, _)| cp);
        Self { names }
    }
}

impl NameLookup for UcdNames<'_> {
    fn name(&self, cp: CodePoint) -> Option<&str> {
        let idx = self.names.binary_search_by_key(&cp, |&(c, _)| c).ok()?;
        Some(self.names[idx].1)
    }
}

/// `NAME` for a single code point, `FIRST..LAST` for a range.
pub fn range_comment(names: &dyn NameLookup, start: CodePoint, end: CodePoint) -> Option<String> {
    let first = names.name(start)?;
    if start == end {
        return Some(first.to_string());
    }
    let last = names.name(end)?;
    Some(format!("{first}..{last}"))
}
