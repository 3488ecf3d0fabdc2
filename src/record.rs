//! Line-level parsing of the character database files.
//!
//! Every source is a sequence of `;`-separated rows with `#` comments. This
//! module turns one line into a `Line` and knows nothing about merging or
//! defaults. Field errors are fatal: `read_property_file` stops at the first
//! malformed row and reports its line number.
pub mod folding;
pub mod ucd;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::table::{Assignment, CodePoint, Interval, MAX_CODE_POINT};

pub use folding::{parse_case_folding_line, read_case_folding};
pub use ucd::{UcdRow, read_unicode_data};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("invalid hexadecimal field {0:?}")]
    BadHex(String),
    #[error("code point {0:#X} is outside 0..=10FFFF")]
    OutOfRange(u32),
    #[error("range {start:04X}..{end:04X} ends before it starts")]
    Reversed { start: CodePoint, end: CodePoint },
    #[error("expected at least {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("empty property value")]
    EmptyValue,
    #[error("unknown property value {0:?}")]
    UnknownValue(String),
    #[error("invalid decimal field {0:?}")]
    BadDecimal(String),
    #[error("range start {0:?} is not followed by its matching end row")]
    UnpairedRange(String),
}

/// A field error tied to the 1-based line it came from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {error}")]
pub struct RecordError {
    pub line: usize,
    pub error: FieldError,
}

/// What one raw line of a source means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Skip,
    Assignment(Assignment<&'a str>),
    Pair { code: CodePoint, mapped: CodePoint },
}

// -------------------------------- Fields ---------------------------------- //

/// Strip a trailing `#` comment. `None` for blank and comment-only lines.
pub fn data_part(line: &str) -> Option<&str> {
    let data = match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    };
    let data = data.trim();
    (!data.is_empty()).then_some(data)
}

/// Split the data part into at least `expected` trimmed fields.
pub fn fields(data: &str, expected: usize) -> Result<Vec<&str>, FieldError> {
    let fields: Vec<&str> = data.split(';').map(str::trim).collect();
    if fields.len() < expected {
        return Err(FieldError::FieldCount { expected, found: fields.len() });
    }
    Ok(fields)
}

pub fn parse_code_point(field: &str) -> Result<CodePoint, FieldError> {
    let field = field.trim();
    // from_str_radix also accepts a leading '+'
    if field.is_empty() || field.len() > 8 || !field.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FieldError::BadHex(field.to_string()));
    }
    let cp = u32::from_str_radix(field, 16).map_err(|_| FieldError::BadHex(field.to_string()))?;
    if cp > MAX_CODE_POINT {
        return Err(FieldError::OutOfRange(cp));
    }
    Ok(cp)
}

/// `XXXX` or `XXXX..YYYY`, both inclusive.
pub fn parse_range(field: &str) -> Result<Interval, FieldError> {
    let field = field.trim();
    let (start, end) = match field.split_once("..") {
        Some((a, b)) => (parse_code_point(a)?, parse_code_point(b)?),
        None => {
            let cp = parse_code_point(field)?;
            (cp, cp)
        }
    };
    if start > end {
        return Err(FieldError::Reversed { start, end });
    }
    Ok(Interval::new(start, end))
}

// ---------------------------- Property files ------------------------------ //

/// One `range ; value` line of a property file such as WordBreakProperty.txt.
pub fn parse_property_line(line: &str) -> Result<Line<'_>, FieldError> {
    let Some(data) = data_part(line) else {
        return Ok(Line::Skip);
    };
    let fields = fields(data, 2)?;
    let range = parse_range(fields[0])?;
    let tag = fields[1];
    if tag.is_empty() {
        return Err(FieldError::EmptyValue);
    }
    Ok(Line::Assignment(Assignment { range, tag }))
}

static MISSING_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*#\s*@missing:\s*([0-9A-Fa-f.]+)\s*;\s*([^;#\s]+)\s*$").expect("static regex")
});

/// A `# @missing: 0000..10FFFF; Value` directive, if `line` is one.
pub fn parse_missing_directive(line: &str) -> Option<Result<Assignment<&str>, FieldError>> {
    let caps = MISSING_DIRECTIVE.captures(line)?;
    let range = caps.get(1)?.as_str();
    let tag = caps.get(2)?.as_str();
    Some(parse_range(range).map(|range| Assignment { range, tag }))
}

/// Explicit rows plus default directives of a `range ; value` property file.
#[derive(Debug, Clone)]
pub struct PropertyFile<T> {
    pub assignments: Vec<Assignment<T>>,
    pub missing: Vec<Assignment<T>>,
}

pub fn read_property_file(text: &str) -> Result<PropertyFile<&str>, RecordError> {
    read_tagged_property_file(text, Ok)
}

/// Like `read_property_file`, converting each value with `tag` so that an
/// unknown value is reported against the line it appears on.
pub fn read_tagged_property_file<'a, T>(
    text: &'a str,
    mut tag: impl FnMut(&'a str) -> Result<T, FieldError>,
) -> Result<PropertyFile<T>, RecordError> {
    let mut file = PropertyFile { assignments: Vec::new(), missing: Vec::new() };
    for (i, line) in text.lines().enumerate() {
        let at = |error| RecordError { line: i + 1, error };
        if let Some(directive) = parse_missing_directive(line) {
            let directive = directive.map_err(at)?;
            file.missing.push(Assignment { range: directive.range, tag: tag(directive.tag).map_err(at)? });
            continue;
        }
        match parse_property_line(line).map_err(at)? {
            Line::Assignment(a) => file.assignments.push(Assignment { range: a.range, tag: tag(a.tag).map_err(at)? }),
            Line::Skip | Line::Pair { .. } => {}
        }
    }
    Ok(file)
}

// ------------------------------- Tests ------------------------------------ //
