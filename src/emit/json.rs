use serde::{Deserialize, Serialize};

use crate::family::CompiledFamily;
use crate::path_de::{PathError, from_str_with_path};

/// The JSON document: every compiled family, in configuration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSet {
    pub generator: String,
    pub generated_at: String,
    pub families: Vec<CompiledFamily>,
}

impl TableSet {
    pub fn new(families: Vec<CompiledFamily>) -> Self {
        let generated_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        Self::with_timestamp(families, generated_at)
    }

    pub fn with_timestamp(families: Vec<CompiledFamily>, generated_at: String) -> Self {
        Self { generator: concat!("ucd-runs ", env!("CARGO_PKG_VERSION")).to_string(), generated_at, families }
    }

    pub fn to_json(&self) -> serde_json::Result<String> { serde_json::to_string_pretty(self) }

    pub fn from_json(text: &str) -> Result<Self, PathError> { from_str_with_path(text) }

    pub fn family(&self, name: &str) -> Option<&CompiledFamily> { self.families.iter().find(|f| f.name == name) }
}
