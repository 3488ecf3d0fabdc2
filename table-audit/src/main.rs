//! Re-verify an emitted table document and look up individual code points.
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use colored::Colorize;
use once_cell::sync::Lazy;
use regex::Regex;

use ucd_runs::emit::TableSet;
use ucd_runs::report::summary;
use ucd_runs::table::{CodePoint, contains, lookup, lookup_affine};
use ucd_runs::{CompiledFamily, CompiledTable};

/// check the ordering invariants of a `ucd-runs json` document
#[derive(Parser, Debug)]
struct Audit {
    /// JSON document written by `ucd-runs json`
    input: PathBuf,

    /// look up a code point, e.g. `word_break@0041` (repeatable)
    #[arg(long = "lookup", short = 'l')]
    lookups: Vec<String>,
}

static LOOKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)@(?:U\+)?([0-9A-Fa-f]{1,6})$").expect("static regex"));

fn parse_lookup(query: &str) -> Option<(&str, CodePoint)> {
    let caps = LOOKUP.captures(query)?;
    let family = caps.get(1)?.as_str();
    let cp = CodePoint::from_str_radix(caps.get(2)?.as_str(), 16).ok()?;
    Some((family, cp))
}

fn describe(family: &CompiledFamily, cp: CodePoint) -> String {
    match &family.table {
        CompiledTable::Membership { intervals } => contains(intervals, cp).to_string(),
        CompiledTable::Categorical { runs, .. } => match lookup(runs, cp) {
            Some(tag) => format!("{}{tag}", family.tag_prefix),
            None => "<uncovered>".to_string(),
        },
        CompiledTable::Affine { runs, .. } => {
            let mapped = lookup_affine(runs, cp).unwrap_or(cp);
            format!("U+{mapped:04X}")
        }
    }
}

/// Verify every family, printing one line each. Returns the names of the
/// families that failed.
fn verify_all(set: &TableSet) -> Vec<&str> {
    let mut failed = Vec::new();
    for family in &set.families {
        match family.table.verify() {
            Ok(()) => println!("{} {} ({})", "ok".green().bold(), family.name, summary(&family.table)),
            Err(violation) => {
                failed.push(family.name.as_str());
                println!("{} {}: {violation}", "FAIL".red().bold(), family.name);
            }
        }
    }
    failed
}

fn main() -> anyhow::Result<()> {
    let audit = Audit::parse();
    let text = std::fs::read_to_string(&audit.input).with_context(|| format!("reading {}", audit.input.display()))?;
    let set = TableSet::from_json(&text).with_context(|| format!("parsing {}", audit.input.display()))?;

    let failed = verify_all(&set);

    for query in &audit.lookups {
        let Some((name, cp)) = parse_lookup(query) else {
            bail!("invalid lookup {query:?}, expected FAMILY@XXXX");
        };
        let family = set.family(name).with_context(|| format!("no family `{name}` in {}", audit.input.display()))?;
        if failed.contains(&name) {
            println!("{name} U+{cp:04X} → {}", "unverified".yellow());
        } else {
            println!("{name} U+{cp:04X} → {}", describe(family, cp));
        }
    }

    if !failed.is_empty() {
        bail!("{} of {} families failed verification", failed.len(), set.families.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ucd_runs::table::{AffineRun, Interval, Run};

    #[test]
    fn lookup_queries() {
        assert_eq!(parse_lookup("word_break@0041"), Some(("word_break", 0x41)));
        assert_eq!(parse_lookup("to_lower@U+1F600"), Some(("to_lower", 0x1F600)));
        assert_eq!(parse_lookup("word-break@0041"), None);
        assert_eq!(parse_lookup("word_break"), None);
    }

    #[test]
    fn zero_stride_family_fails_verification_without_panicking() {
        let broken = CompiledFamily {
            name: "to_lower".into(),
            source: "UnicodeData".into(),
            tag_prefix: String::new(),
            table: CompiledTable::Affine { pairs: 1, runs: vec![AffineRun { start: 65, end: 65, stride: 0, delta: 32 }] },
        };
        assert_eq!(describe(&broken, 0x41), "U+0041");

        let set = TableSet::new(vec![broken]);
        assert_eq!(verify_all(&set), vec!["to_lower"]);
    }

    #[test]
    fn describes_each_table_kind() {
        let family = |table| CompiledFamily { name: "f".into(), source: "s".into(), tag_prefix: "WB_".into(), table };

        let marks = family(CompiledTable::Membership { intervals: vec![Interval::new(0x300, 0x36F)] });
        assert_eq!(describe(&marks, 0x301), "true");

        let wb = family(CompiledTable::Categorical {
            fallback: "Other".into(),
            runs: vec![Run::new(Interval::FULL, "Other".to_string())],
        });
        assert_eq!(describe(&wb, 0x41), "WB_Other");

        let lower = family(CompiledTable::Affine {
            pairs: 26,
            runs: vec![AffineRun { start: 0x41, end: 0x5A, stride: 1, delta: 32 }],
        });
        assert_eq!(describe(&lower, 0x41), "U+0061");
        assert_eq!(describe(&lower, 0x30), "U+0030");
    }
}
