//! CaseFolding.txt rows: `<code>; <status>; <mapping>; # <name>`.
//!
//! Only common (`C`) and simple (`S`) foldings are kept, and only when the
//! mapping is one code point. Full (`F`) and Turkic (`T`) rows are skipped.
use super::{FieldError, Line, RecordError, data_part, fields, parse_code_point};
use crate::table::CodePoint;

const RETAINED_STATUSES: [&str; 2] = ["C", "S"];

pub fn parse_case_folding_line(line: &str) -> Result<Line<'_>, FieldError> {
    let Some(data) = data_part(line) else {
        return Ok(Line::Skip);
    };
    let f = fields(data, 3)?;
    let code = parse_code_point(f[0])?;
    if !RETAINED_STATUSES.contains(&f[1]) {
        return Ok(Line::Skip);
    }
    let mut targets = f[2].split_whitespace();
    let (Some(target), None) = (targets.next(), targets.next()) else {
        // multi-code-point mapping, no affine offset exists
        return Ok(Line::Skip);
    };
    let mapped = parse_code_point(target)?;
    Ok(Line::Pair { code, mapped })
}

pub fn read_case_folding(text: &str) -> Result<Vec<(CodePoint, CodePoint)>, RecordError> {
    let mut pairs = Vec::new();
    for (i, line) in text.lines().enumerate() {
        match parse_case_folding_line(line).map_err(|error| RecordError { line: i + 1, error })? {
            Line::Pair { code, mapped } => pairs.push((code, mapped)),
            Line::Skip | Line::Assignment(_) => {}
        }
    }
    Ok(pairs)
}

// ------------------------------- Tests ------------------------------------ //
