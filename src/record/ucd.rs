//! UnicodeData.txt rows.
//!
//! Fifteen `;`-separated fields per row; only the code point, name, general
//! category, combining class and the three simple case mappings are read.
//! Large blocks are listed as `<Name, First>` / `<Name, Last>` row pairs,
//! which are folded into a single ranged row here.
use super::{FieldError, RecordError, data_part, fields, parse_code_point};
use crate::table::{CodePoint, Interval};

const FIELD_COUNT: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UcdRow<'a> {
    pub range: Interval,
    pub name: &'a str,
    pub general_category: &'a str,
    pub combining_class: u8,
    pub upper: Option<CodePoint>,
    pub lower: Option<CodePoint>,
    pub title: Option<CodePoint>,
}

impl UcdRow<'_> {
    /// Names like `<control>` or `<CJK Ideograph>` are placeholders, not names.
    pub fn has_real_name(&self) -> bool { !self.name.starts_with('<') }
}

fn optional_code_point(field: &str) -> Result<Option<CodePoint>, FieldError> {
    if field.is_empty() { Ok(None) } else { parse_code_point(field).map(Some) }
}

/// Parse a single row; `None` for blank or comment lines.
pub fn parse_unicode_data_line(line: &str) -> Result<Option<UcdRow<'_>>, FieldError> {
    let Some(data) = data_part(line) else {
        return Ok(None);
    };
    let f = fields(data, FIELD_COUNT)?;
    let cp = parse_code_point(f[0])?;
    let combining_class = f[3]
        .parse::<u8>()
        .map_err(|_| FieldError::BadDecimal(f[3].to_string()))?;
    Ok(Some(UcdRow {
        range: Interval::single(cp),
        name: f[1],
        general_category: f[2],
        combining_class,
        upper: optional_code_point(f[12])?,
        lower: optional_code_point(f[13])?,
        title: optional_code_point(f[14])?,
    }))
}

/// Parse every row of UnicodeData.txt, folding `First`/`Last` pairs.
pub fn read_unicode_data(text: &str) -> Result<Vec<UcdRow<'_>>, RecordError> {
    let mut rows = Vec::new();
    let mut pending: Option<(usize, UcdRow<'_>)> = None;

    for (i, line) in text.lines().enumerate() {
        let at = |error| RecordError { line: i + 1, error };
        let Some(row) = parse_unicode_data_line(line).map_err(at)? else {
            continue;
        };

        if let Some((start_line, mut first)) = pending.take() {
            if !row.name.ends_with(", Last>") {
                return Err(RecordError {
                    line: start_line,
                    error: FieldError::UnpairedRange(first.name.to_string()),
                });
            }
            if row.range.start < first.range.start {
                return Err(at(FieldError::Reversed { start: first.range.start, end: row.range.start }));
            }
            first.range = Interval::new(first.range.start, row.range.start);
            rows.push(first);
            continue;
        }

        if row.name.ends_with(", First>") {
            pending = Some((i + 1, row));
        } else if row.name.ends_with(", Last>") {
            return Err(at(FieldError::UnpairedRange(row.name.to_string())));
        } else {
            rows.push(row);
        }
    }

    if let Some((line, first)) = pending {
        return Err(RecordError { line, error: FieldError::UnpairedRange(first.name.to_string()) });
    }
    Ok(rows)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;
0061;LATIN SMALL LETTER A;Ll;0;L;;;;;N;;;0041;;0041
0300;COMBINING GRAVE ACCENT;Mn;230;NSM;;;;;N;NON-SPACING GRAVE;;;;
3400;<CJK Ideograph Extension A, First>;Lo;0;L;;;;;N;;;;;
4DBF;<CJK Ideograph Extension A, Last>;Lo;0;L;;;;;N;;;;;
";

    #[test]
    fn parses_case_fields() {
        let rows = read_unicode_data(SAMPLE).unwrap();
        assert_eq!(rows[0].lower, Some(0x61));
        assert_eq!(rows[0].upper, None);
        assert_eq!(rows[1].upper, Some(0x41));
        assert_eq!(rows[1].title, Some(0x41));
        assert_eq!(rows[2].combining_class, 230);
        assert_eq!(rows[2].general_category, "Mn");
    }

    #[test]
    fn folds_first_last_pairs() {
        let rows = read_unicode_data(SAMPLE).unwrap();
        assert_eq!(rows.len(), 4);
        let cjk = &rows[3];
        assert_eq!(cjk.range, Interval::new(0x3400, 0x4DBF));
        assert_eq!(cjk.name, "<CJK Ideograph Extension A, First>");
        assert!(!cjk.has_real_name());
    }

    #[test]
    fn unpaired_first_is_malformed() {
        let text = "3400;<CJK Ideograph Extension A, First>;Lo;0;L;;;;;N;;;;;\n0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;\n";
        let err = read_unicode_data(text).unwrap_err();
        assert_eq!(err.line, 1);
        assert!(matches!(err.error, FieldError::UnpairedRange(_)));
    }

    #[test]
    fn short_rows_and_bad_fields_are_malformed() {
        let err = read_unicode_data("0041;LATIN CAPITAL LETTER A;Lu;0\n").unwrap_err();
        assert_eq!(err.error, FieldError::FieldCount { expected: 15, found: 4 });

        let err = read_unicode_data("0041;A;Lu;x;L;;;;;N;;;;0061;\n").unwrap_err();
        assert_eq!(err.error, FieldError::BadDecimal("x".into()));

        let err = read_unicode_data("0041;A;Lu;0;L;;;;;N;;;;00Q1;\n").unwrap_err();
        assert_eq!(err.error, FieldError::BadHex("00Q1".into()));
    }
}
