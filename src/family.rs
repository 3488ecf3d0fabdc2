//! One property family, from raw source text to a verified table.
use serde::{Deserialize, Serialize};

use crate::affine::{CaseRelation, compress};
use crate::config::{CaseMapping, FamilyConfig, FamilyKind, MembershipPredicate, PolicyConfig};
use crate::error::CompileError;
use crate::merge::merge_intervals;
use crate::property::{EastAsianWidth, PropertyTag, WordBreak};
use crate::record::{FieldError, UcdRow, read_case_folding, read_tagged_property_file, read_unicode_data};
use crate::resolve::{DefaultPolicy, resolve};
use crate::source::Snapshot;
use crate::table::{
    AffineRun, CodePoint, Interval, InvariantViolation, Run, check_affine, check_membership, check_total,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompiledFamily {
    pub name: String,
    /// Where the data came from, e.g. `WordBreakProperty.txt`.
    pub source: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag_prefix: String,
    #[serde(flatten)]
    pub table: CompiledTable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CompiledTable {
    /// Code points that have the property.
    Membership { intervals: Vec<Interval> },
    /// Total run list; `fallback` is the value unlisted code points received.
    Categorical { fallback: String, runs: Vec<Run<String>> },
    /// `pairs` is the size of the relation before compression.
    Affine { pairs: usize, runs: Vec<AffineRun> },
}

impl CompiledTable {
    /// Number of emitted entries.
    pub fn len(&self) -> usize {
        match self {
            CompiledTable::Membership { intervals } => intervals.len(),
            CompiledTable::Categorical { runs, .. } => runs.len(),
            CompiledTable::Affine { runs, .. } => runs.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn verify(&self) -> Result<(), InvariantViolation> {
        match self {
            CompiledTable::Membership { intervals } => check_membership(intervals),
            CompiledTable::Categorical { runs, .. } => check_total(runs),
            CompiledTable::Affine { runs, .. } if runs.is_empty() => Err(InvariantViolation::Empty),
            CompiledTable::Affine { runs, .. } => check_affine(runs),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// COMPILE
// ————————————————————————————————————————————————————————————————————————————

pub fn compile(family: &FamilyConfig, snapshot: &Snapshot) -> Result<CompiledFamily, CompileError> {
    let source = snapshot.get(&family.source).ok_or_else(|| CompileError::MissingSource {
        family: family.name.clone(),
        source_name: family.source.clone(),
    })?;
    let text = source.text.as_str();

    let table = match &family.kind {
        FamilyKind::Membership { predicate } => membership(family, text, predicate)?,
        FamilyKind::WordBreak { default } => categorical::<WordBreak>(family, text, default.as_ref())?,
        FamilyKind::EastAsianWidth { default } => categorical::<EastAsianWidth>(family, text, default.as_ref())?,
        FamilyKind::Case { mapping } => case(family, text, *mapping)?,
    };

    table
        .verify()
        .map_err(|violation| CompileError::Invariant { family: family.name.clone(), violation })?;

    Ok(CompiledFamily {
        name: family.name.clone(),
        source: source.origin.clone(),
        tag_prefix: family.tag_prefix.clone(),
        table,
    })
}

fn unicode_data<'a>(family: &FamilyConfig, text: &'a str) -> Result<Vec<UcdRow<'a>>, CompileError> {
    read_unicode_data(text).map_err(|e| CompileError::malformed(&family.source, e))
}

fn membership(family: &FamilyConfig, text: &str, predicate: &MembershipPredicate) -> Result<CompiledTable, CompileError> {
    let rows = unicode_data(family, text)?;
    let selected = rows.iter().filter(|row| match predicate {
        MembershipPredicate::GeneralCategory(prefixes) => {
            prefixes.iter().any(|p| row.general_category.starts_with(p.as_str()))
        }
        MembershipPredicate::NonZeroCombiningClass => row.combining_class != 0,
    });
    let intervals = merge_intervals(selected.map(|row| row.range));
    if intervals.is_empty() {
        return Err(CompileError::empty(&family.name, &family.source));
    }
    Ok(CompiledTable::Membership { intervals })
}

fn categorical<T: PropertyTag>(
    family: &FamilyConfig,
    text: &str,
    default: Option<&PolicyConfig>,
) -> Result<CompiledTable, CompileError> {
    let file = read_tagged_property_file(text, |name| {
        T::from_name(name).ok_or_else(|| FieldError::UnknownValue(name.to_string()))
    })
    .map_err(|e| CompileError::malformed(&family.source, e))?;

    if file.assignments.is_empty() {
        return Err(CompileError::empty(&family.name, &family.source));
    }

    let policy = match default {
        Some(config) => config.to_policy().try_map(|name| match T::from_name(&name) {
            Some(tag) => Ok(tag),
            None => Err(CompileError::UnknownDefaultTag { family: family.name.clone(), tag: name }),
        })?,
        None => DefaultPolicy::from_directives(file.missing, T::BUILTIN_FALLBACK),
    };

    let explicit = file.assignments.into_iter().map(Run::from).collect();
    let runs = resolve(explicit, &policy).map_err(|o| CompileError::overlap(&family.name, o.at))?;

    Ok(CompiledTable::Categorical {
        fallback: policy.fallback.name().to_string(),
        runs: runs.into_iter().map(|r| r.map_tag(|t| t.name().to_string())).collect(),
    })
}

fn case(family: &FamilyConfig, text: &str, mapping: CaseMapping) -> Result<CompiledTable, CompileError> {
    let pairs: Vec<(CodePoint, CodePoint)> = match mapping {
        CaseMapping::Fold => read_case_folding(text).map_err(|e| CompileError::malformed(&family.source, e))?,
        CaseMapping::Upper | CaseMapping::Lower | CaseMapping::Title => unicode_data(family, text)?
            .iter()
            // folded First/Last ranges never carry simple mappings
            .filter(|row| row.range.start == row.range.end)
            .filter_map(|row| {
                let target = match mapping {
                    CaseMapping::Upper => row.upper,
                    CaseMapping::Lower => row.lower,
                    CaseMapping::Title | CaseMapping::Fold => row.title,
                };
                target.map(|t| (row.range.start, t))
            })
            .collect(),
    };

    if pairs.is_empty() {
        return Err(CompileError::empty(&family.name, &family.source));
    }
    let relation = CaseRelation::new(pairs).map_err(|o| CompileError::overlap(&family.name, o.at))?;
    Ok(CompiledTable::Affine { pairs: relation.len(), runs: compress(&relation) })
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, OverrideConfig};
    use crate::table::{MAX_CODE_POINT, lookup, lookup_affine};

    const UNICODE_DATA: &str = "\
0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;
0042;LATIN CAPITAL LETTER B;Lu;0;L;;;;;N;;;;0062;
0043;LATIN CAPITAL LETTER C;Lu;0;L;;;;;N;;;;0063;
0061;LATIN SMALL LETTER A;Ll;0;L;;;;;N;;;0041;;0041
0062;LATIN SMALL LETTER B;Ll;0;L;;;;;N;;;0042;;0042
0063;LATIN SMALL LETTER C;Ll;0;L;;;;;N;;;0043;;0043
0300;COMBINING GRAVE ACCENT;Mn;230;NSM;;;;;N;NON-SPACING GRAVE;;;;
0301;COMBINING ACUTE ACCENT;Mn;230;NSM;;;;;N;NON-SPACING ACUTE;;;;
0302;COMBINING CIRCUMFLEX ACCENT;Mn;230;NSM;;;;;N;NON-SPACING CIRCUMFLEX;;;;
0903;DEVANAGARI SIGN VISARGA;Mc;0;L;;;;;N;;;;;
0100;LATIN CAPITAL LETTER A WITH MACRON;Lu;0;L;0041 0304;;;;N;;;;0101;
0101;LATIN SMALL LETTER A WITH MACRON;Ll;0;L;0061 0304;;;;N;;;0100;;0100
0102;LATIN CAPITAL LETTER A WITH BREVE;Lu;0;L;0041 0306;;;;N;;;;0103;
0103;LATIN SMALL LETTER A WITH BREVE;Ll;0;L;0061 0306;;;;N;;;0102;;0102
";

    const WORD_BREAK: &str = "\
# @missing: 0000..10FFFF; Other
000A          ; LF # Cc       <control-000A>
000D          ; CR # Cc       <control-000D>
0041..005A    ; ALetter # L&  [26] LATIN CAPITAL LETTER A..LATIN CAPITAL LETTER Z
0061..007A    ; ALetter # L&  [26] LATIN SMALL LETTER A..LATIN SMALL LETTER Z
0030..0039    ; Numeric # Nd  [10] DIGIT ZERO..DIGIT NINE
";

    fn snapshot() -> Snapshot {
        Snapshot::from_texts([
            ("UnicodeData", UNICODE_DATA),
            ("WordBreakProperty", WORD_BREAK),
            ("EastAsianWidth", "0020..007E;Na\n3000;F\n"),
            ("CaseFolding", "0041; C; 0061;\n0042; C; 0062;\n00DF; F; 0073 0073;\n0100; C; 0101;\n"),
        ])
    }

    fn family(name: &str) -> FamilyConfig {
        Config::default().family(name).cloned().expect("default family")
    }

    #[test]
    fn combining_marks_by_category_and_by_class() {
        let marks = compile(&family("combining"), &snapshot()).unwrap();
        assert_eq!(
            marks.table,
            CompiledTable::Membership { intervals: vec![Interval::new(0x300, 0x302), Interval::single(0x903)] }
        );

        let mut by_class = family("combining");
        by_class.kind = FamilyKind::Membership { predicate: MembershipPredicate::NonZeroCombiningClass };
        let marks = compile(&by_class, &snapshot()).unwrap();
        assert_eq!(marks.table, CompiledTable::Membership { intervals: vec![Interval::new(0x300, 0x302)] });
    }

    #[test]
    fn word_break_is_total_with_directive_fallback() {
        let compiled = compile(&family("word_break"), &snapshot()).unwrap();
        let CompiledTable::Categorical { fallback, runs } = &compiled.table else {
            panic!("expected categorical table");
        };
        assert_eq!(fallback, "Other");
        assert_eq!(lookup(runs, 0x0A).map(String::as_str), Some("LF"));
        assert_eq!(lookup(runs, 0x0B).map(String::as_str), Some("Other"));
        assert_eq!(lookup(runs, 0x35).map(String::as_str), Some("Numeric"));
        assert_eq!(lookup(runs, 0x60).map(String::as_str), Some("Other"));
        assert_eq!(lookup(runs, MAX_CODE_POINT).map(String::as_str), Some("Other"));
        assert_eq!(compiled.tag_prefix, "WB_");
    }

    #[test]
    fn width_overrides_come_from_configuration() {
        let compiled = compile(&family("east_asian_width"), &snapshot()).unwrap();
        let CompiledTable::Categorical { fallback, runs } = &compiled.table else {
            panic!("expected categorical table");
        };
        assert_eq!(fallback, "N");
        assert_eq!(lookup(runs, 0x41).map(String::as_str), Some("Na"));
        assert_eq!(lookup(runs, 0x3000).map(String::as_str), Some("F"));
        assert_eq!(lookup(runs, 0x4E00).map(String::as_str), Some("W"));
        assert_eq!(lookup(runs, 0x2FFFE).map(String::as_str), Some("N"));
    }

    #[test]
    fn case_tables_from_unicode_data_and_folding() {
        let lower = compile(&family("to_lower"), &snapshot()).unwrap();
        let CompiledTable::Affine { pairs, runs } = &lower.table else { panic!("expected affine table") };
        assert_eq!(*pairs, 5);
        assert_eq!(runs[0], AffineRun { start: 0x41, end: 0x43, stride: 1, delta: 0x20 });
        assert_eq!(runs[1], AffineRun { start: 0x100, end: 0x102, stride: 2, delta: 1 });
        assert_eq!(lookup_affine(runs, 0x102), Some(0x103));
        assert_eq!(lookup_affine(runs, 0x101), None);

        let fold = compile(&family("case_fold"), &snapshot()).unwrap();
        let CompiledTable::Affine { pairs, runs } = &fold.table else { panic!("expected affine table") };
        assert_eq!(*pairs, 3);
        assert_eq!(lookup_affine(runs, 0xDF), None);
        assert_eq!(lookup_affine(runs, 0x100), Some(0x101));
    }

    #[test]
    fn unknown_tags_are_malformed_records() {
        let snapshot = Snapshot::from_texts([("WordBreakProperty", "0041;ALetter\n0042;Letter\n")]);
        let err = compile(&family("word_break"), &snapshot).unwrap_err();
        assert!(matches!(
            err,
            CompileError::MalformedRecord { line: 2, reason: FieldError::UnknownValue(ref v), .. } if v == "Letter"
        ));
    }

    #[test]
    fn malformed_hex_is_not_defaulted() {
        let snapshot = Snapshot::from_texts([("WordBreakProperty", "00ZZ;ALetter\n")]);
        let err = compile(&family("word_break"), &snapshot).unwrap_err();
        assert!(matches!(err, CompileError::MalformedRecord { line: 1, reason: FieldError::BadHex(_), .. }));
    }

    #[test]
    fn empty_and_conflicting_inputs() {
        let snapshot = Snapshot::from_texts([("WordBreakProperty", "# @missing: 0000..10FFFF; Other\n")]);
        let err = compile(&family("word_break"), &snapshot).unwrap_err();
        assert!(matches!(err, CompileError::EmptyInput { .. }));

        let snapshot = Snapshot::from_texts([("WordBreakProperty", "0041..0045;ALetter\n0043;Numeric\n")]);
        let err = compile(&family("word_break"), &snapshot).unwrap_err();
        assert!(matches!(err, CompileError::OverlapViolation { code_point: 0x43, .. }));

        let snapshot = Snapshot::from_texts([("CaseFolding", "0041; C; 0061;\n0041; S; 0062;\n")]);
        let err = compile(&family("case_fold"), &snapshot).unwrap_err();
        assert!(matches!(err, CompileError::OverlapViolation { code_point: 0x41, .. }));
    }

    #[test]
    fn membership_with_no_selected_rows_is_empty() {
        let snapshot = Snapshot::from_texts([("UnicodeData", "0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;\n")]);
        let err = compile(&family("combining"), &snapshot).unwrap_err();
        assert!(matches!(err, CompileError::EmptyInput { ref family, .. } if family == "combining"));

        let mut marks = family("combining");
        marks.kind = FamilyKind::Membership { predicate: MembershipPredicate::NonZeroCombiningClass };
        let err = compile(&marks, &snapshot).unwrap_err();
        assert!(matches!(err, CompileError::EmptyInput { .. }));
    }

    #[test]
    fn case_with_no_mappings_is_empty() {
        let snapshot = Snapshot::from_texts([
            ("UnicodeData", "0030;DIGIT ZERO;Nd;0;EN;;0;0;0;N;;;;;\n0300;COMBINING GRAVE ACCENT;Mn;230;NSM;;;;;N;;;;;\n"),
            ("CaseFolding", "00DF; F; 0073 0073;\n0130; T; 0069;\n"),
        ]);
        for name in ["to_upper", "to_lower", "to_title", "case_fold"] {
            let err = compile(&family(name), &snapshot).unwrap_err();
            assert!(matches!(err, CompileError::EmptyInput { ref family, .. } if family == name), "{name}: {err}");
        }
    }

    #[test]
    fn unknown_policy_tag_and_missing_source() {
        let mut width = family("east_asian_width");
        width.kind = FamilyKind::EastAsianWidth {
            default: Some(PolicyConfig {
                fallback: "N".into(),
                overrides: vec![OverrideConfig { range: Interval::new(0x3400, 0x4DBF), tag: "Wide".into() }],
            }),
        };
        let err = compile(&width, &snapshot()).unwrap_err();
        assert!(matches!(err, CompileError::UnknownDefaultTag { ref tag, .. } if tag == "Wide"));

        let err = compile(&family("word_break"), &Snapshot::default()).unwrap_err();
        assert!(matches!(err, CompileError::MissingSource { .. }));
    }

    #[test]
    fn verify_rejects_broken_tables() {
        let table = CompiledTable::Membership { intervals: vec![Interval::new(1, 2), Interval::new(3, 4)] };
        assert_eq!(table.verify(), Err(InvariantViolation::NotMaximal { index: 1 }));

        let table = CompiledTable::Categorical { fallback: "N".into(), runs: vec![Run::new(Interval::new(0, 10), "N".into())] };
        assert_eq!(table.verify(), Err(InvariantViolation::Gap { at: 11 }));

        let table = CompiledTable::Affine { pairs: 0, runs: vec![] };
        assert_eq!(table.verify(), Err(InvariantViolation::Empty));
    }
}
