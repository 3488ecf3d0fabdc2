//! Compile configuration: where the sources live and which families to build.
//!
//! Configuration is plain data. Nothing in the compiler reads paths or
//! default tables from process-wide state; everything arrives through a
//! `Config` value, either the built-in one or a JSON file.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::path_de::{PathError, from_str_with_path};
use crate::property::{EastAsianWidth, PropertyTag, WordBreak};
use crate::resolve::DefaultPolicy;
use crate::table::Interval;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {error}", path.display())]
    Read { path: PathBuf, error: std::io::Error },
    #[error("invalid config: {0}")]
    Parse(#[from] PathError),
    #[error("{field} {value:?} is not a valid identifier")]
    BadIdentifier { field: &'static str, value: String },
    #[error("family `{0}` is declared more than once")]
    DuplicateFamily(String),
    #[error("family `{family}` reads undeclared source `{source_name}`")]
    UndeclaredSource { family: String, source_name: String },
    #[error("family `{family}`: {tag:?} is not a value of this property")]
    UnknownTag { family: String, tag: String },
    #[error("no family named `{0}` in the configuration")]
    UnknownFamily(String),
}

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Logical source name → path (or glob) relative to the database root.
    pub sources: IndexMap<String, String>,
    pub families: Vec<FamilyConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyConfig {
    pub name: String,
    pub source: String,
    /// Prepended to tag names in C output, e.g. `WB_` gives `WB_ALetter`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tag_prefix: String,
    #[serde(flatten)]
    pub kind: FamilyKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FamilyKind {
    Membership {
        #[serde(default)]
        predicate: MembershipPredicate,
    },
    WordBreak {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<PolicyConfig>,
    },
    EastAsianWidth {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        default: Option<PolicyConfig>,
    },
    Case {
        mapping: CaseMapping,
    },
}

/// Which UnicodeData rows belong to a membership family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MembershipPredicate {
    /// General category starts with any of the listed prefixes.
    GeneralCategory(Vec<String>),
    /// Canonical combining class is not zero.
    NonZeroCombiningClass,
}

impl Default for MembershipPredicate {
    fn default() -> Self { MembershipPredicate::GeneralCategory(vec!["M".to_string()]) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaseMapping {
    Upper,
    Lower,
    Title,
    Fold,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    pub fallback: String,
    /// First listed override wins where two overlap.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<OverrideConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideConfig {
    #[serde(with = "range_text")]
    pub range: Interval,
    pub tag: String,
}

/// Ranges are written the way the database writes them: `3400..4DBF`.
mod range_text {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    use crate::record::parse_range;
    use crate::table::Interval;

    pub fn serialize<S: Serializer>(range: &Interval, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(range)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Interval, D::Error> {
        let text = String::deserialize(d)?;
        parse_range(&text).map_err(D::Error::custom)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"));

fn check_identifier(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if IDENTIFIER.is_match(value) {
        return Ok(());
    }
    Err(ConfigError::BadIdentifier { field, value: value.to_string() })
}

impl PolicyConfig {
    pub fn to_policy(&self) -> DefaultPolicy<String> {
        self.overrides
            .iter()
            .fold(DefaultPolicy::fallback(self.fallback.clone()), |policy, o| {
                policy.with_override(o.range, o.tag.clone())
            })
    }

    fn tags(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.fallback.as_str()).chain(self.overrides.iter().map(|o| o.tag.as_str()))
    }
}

impl FamilyKind {
    pub fn label(&self) -> &'static str {
        match self {
            FamilyKind::Membership { .. } => "membership",
            FamilyKind::WordBreak { .. } => "word-break",
            FamilyKind::EastAsianWidth { .. } => "east-asian-width",
            FamilyKind::Case { .. } => "case",
        }
    }
}

impl FamilyConfig {
    fn validate(&self, sources: &IndexMap<String, String>) -> Result<(), ConfigError> {
        check_identifier("family name", &self.name)?;
        if !self.tag_prefix.is_empty() {
            check_identifier("tag prefix", &self.tag_prefix)?;
        }
        if !sources.contains_key(&self.source) {
            return Err(ConfigError::UndeclaredSource { family: self.name.clone(), source_name: self.source.clone() });
        }
        let unknown = match &self.kind {
            FamilyKind::WordBreak { default: Some(policy) } => {
                policy.tags().find(|t| WordBreak::from_name(t).is_none())
            }
            FamilyKind::EastAsianWidth { default: Some(policy) } => {
                policy.tags().find(|t| EastAsianWidth::from_name(t).is_none())
            }
            _ => None,
        };
        match unknown {
            Some(tag) => Err(ConfigError::UnknownTag { family: self.name.clone(), tag: tag.to_string() }),
            None => Ok(()),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|error| ConfigError::Read { path: path.to_path_buf(), error })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Config = from_str_with_path(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for family in &self.families {
            if !seen.insert(family.name.as_str()) {
                return Err(ConfigError::DuplicateFamily(family.name.clone()));
            }
            family.validate(&self.sources)?;
        }
        Ok(())
    }

    /// Keep only the named families, in configuration order. An empty
    /// selection keeps everything.
    pub fn select(mut self, names: &[String]) -> Result<Self, ConfigError> {
        if names.is_empty() {
            return Ok(self);
        }
        if let Some(missing) = names.iter().find(|n| !self.families.iter().any(|f| &f.name == *n)) {
            return Err(ConfigError::UnknownFamily(missing.clone()));
        }
        self.families.retain(|f| names.contains(&f.name));
        Ok(self)
    }

    /// Distinct sources the selected families read, in first-use order.
    pub fn required_sources(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for family in &self.families {
            if !out.contains(&family.source.as_str()) {
                out.push(&family.source);
            }
        }
        out
    }

    pub fn family(&self, name: &str) -> Option<&FamilyConfig> { self.families.iter().find(|f| f.name == name) }
}

/// CJK ideograph blocks that are wide even where unassigned.
const WIDE_BLOCKS: &[(u32, u32)] = &[
    (0x3400, 0x4DBF),
    (0x4E00, 0x9FFF),
    (0xF900, 0xFAFF),
    (0x20000, 0x2FFFD),
    (0x30000, 0x3FFFD),
];

impl Default for Config {
    fn default() -> Self {
        let sources = IndexMap::from([
            ("UnicodeData".to_string(), "UnicodeData.txt".to_string()),
            ("WordBreakProperty".to_string(), "auxiliary/WordBreakProperty.txt".to_string()),
            ("EastAsianWidth".to_string(), "EastAsianWidth.txt".to_string()),
            ("CaseFolding".to_string(), "CaseFolding.txt".to_string()),
        ]);

        let family = |name: &str, source: &str, tag_prefix: &str, kind: FamilyKind| FamilyConfig {
            name: name.to_string(),
            source: source.to_string(),
            tag_prefix: tag_prefix.to_string(),
            kind,
        };
        let case = |name: &str, source: &str, mapping| family(name, source, "", FamilyKind::Case { mapping });

        let width_default = PolicyConfig {
            fallback: EastAsianWidth::Neutral.name().to_string(),
            overrides: WIDE_BLOCKS
                .iter()
                .map(|&(start, end)| OverrideConfig {
                    range: Interval::new(start, end),
                    tag: EastAsianWidth::Wide.name().to_string(),
                })
                .collect(),
        };

        let families = vec![
            family("combining", "UnicodeData", "", FamilyKind::Membership { predicate: MembershipPredicate::default() }),
            family("word_break", "WordBreakProperty", "WB_", FamilyKind::WordBreak { default: None }),
            family("east_asian_width", "EastAsianWidth", "EAW_", FamilyKind::EastAsianWidth { default: Some(width_default) }),
            case("to_upper", "UnicodeData", CaseMapping::Upper),
            case("to_lower", "UnicodeData", CaseMapping::Lower),
            case("to_title", "UnicodeData", CaseMapping::Title),
            case("case_fold", "CaseFolding", CaseMapping::Fold),
        ];

        Config { sources, families }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
