//! Raw source retrieval.
//!
//! The compiler never opens files itself: a `SourceProvider` hands out the
//! text of a logical source (`UnicodeData`, `WordBreakProperty`, ..) and the
//! `Snapshot` holds every text an invocation needs, each read exactly once.
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("no location configured for source `{0}`")]
    NotConfigured(String),
    #[error("invalid glob pattern {pattern:?}: {error}")]
    Pattern { pattern: String, error: glob::PatternError },
    #[error("glob pattern matched no files: {0}")]
    NoMatch(String),
    #[error("glob pattern {pattern:?} matched {count} files, expected exactly one")]
    Ambiguous { pattern: String, count: usize },
    #[error("failed to read {}: {error}", path.display())]
    Io { path: PathBuf, error: std::io::Error },
    #[error("{} is not valid UTF-8", path.display())]
    Utf8 { path: PathBuf },
}

/// Byte-stream provider keyed by logical source name.
pub trait SourceProvider: Sync {
    fn fetch(&self, name: &str) -> Result<Vec<u8>, SourceError>;

    /// Human-readable location of a source, for diagnostics and headers.
    fn describe(&self, name: &str) -> String { name.to_string() }
}

// ---------------------------- Directory provider --------------------------- //

/// Reads sources from a local copy of the character database.
///
/// Locations are relative to `root` and may be glob patterns, in which case
/// they must match exactly one file.
#[derive(Debug, Clone)]
pub struct DirectoryProvider {
    root: PathBuf,
    locations: IndexMap<String, String>,
}

impl DirectoryProvider {
    pub fn new(root: impl Into<PathBuf>, locations: IndexMap<String, String>) -> Self {
        Self { root: root.into(), locations }
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, SourceError> {
        let location = self
            .locations
            .get(name)
            .ok_or_else(|| SourceError::NotConfigured(name.to_string()))?;
        resolve_file_path_pattern(&self.root.join(location))
    }
}

impl SourceProvider for DirectoryProvider {
    fn fetch(&self, name: &str) -> Result<Vec<u8>, SourceError> {
        let path = self.resolve(name)?;
        std::fs::read(&path).map_err(|error| SourceError::Io { path, error })
    }

    fn describe(&self, name: &str) -> String {
        match self.resolve(name) {
            Ok(path) => path.file_name().map(|f| f.to_string_lossy().into_owned()).unwrap_or_else(|| name.to_string()),
            Err(_) => name.to_string(),
        }
    }
}

fn has_glob_chars(s: &str) -> bool {
    // Minimal glob detection for the `glob` crate syntax.
    s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
}

fn resolve_file_path_pattern(path: &Path) -> Result<PathBuf, SourceError> {
    let pattern = path.to_string_lossy();
    if !has_glob_chars(&pattern) {
        return Ok(path.to_path_buf());
    }

    let entries = glob::glob(&pattern).map_err(|error| SourceError::Pattern { pattern: pattern.to_string(), error })?;
    let mut matched = Vec::new();
    for entry in entries {
        match entry {
            Ok(p) => matched.push(p),
            Err(e) => {
                let path = e.path().to_path_buf();
                return Err(SourceError::Io { path, error: e.into_error() });
            }
        }
    }
    match matched.len() {
        0 => Err(SourceError::NoMatch(pattern.to_string())),
        1 => Ok(matched.remove(0)),
        count => Err(SourceError::Ambiguous { pattern: pattern.to_string(), count }),
    }
}

// --------------------------------- Snapshot -------------------------------- //

#[derive(Debug, Clone)]
pub struct SourceText {
    pub text: String,
    /// Where the text came from, e.g. `WordBreakProperty.txt`.
    pub origin: String,
}

/// Every source text for one compile, shared read-only by all families.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    texts: IndexMap<String, SourceText>,
}

impl Snapshot {
    /// Fetch each distinct name once, in first-seen order.
    pub fn load<'a>(provider: &dyn SourceProvider, names: impl IntoIterator<Item = &'a str>) -> Result<Self, SourceError> {
        let mut texts = IndexMap::new();
        for name in names {
            if texts.contains_key(name) {
                continue;
            }
            let origin = provider.describe(name);
            let bytes = provider.fetch(name)?;
            let text = String::from_utf8(bytes).map_err(|_| SourceError::Utf8 { path: PathBuf::from(&origin) })?;
            texts.insert(name.to_string(), SourceText { text, origin });
        }
        Ok(Self { texts })
    }

    pub fn from_texts<'a>(texts: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let texts = texts
            .into_iter()
            .map(|(name, text)| (name.to_string(), SourceText { text: text.to_string(), origin: name.to_string() }))
            .collect();
        Self { texts }
    }

    pub fn get(&self, name: &str) -> Option<&SourceText> { self.texts.get(name) }

    pub fn names(&self) -> impl Iterator<Item = &str> { self.texts.keys().map(String::as_str) }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Counting {
        texts: HashMap<&'static str, &'static str>,
        fetched: std::sync::Mutex<Vec<String>>,
    }

    impl SourceProvider for Counting {
        fn fetch(&self, name: &str) -> Result<Vec<u8>, SourceError> {
            self.fetched.lock().unwrap().push(name.to_string());
            self.texts
                .get(name)
                .map(|t| t.as_bytes().to_vec())
                .ok_or_else(|| SourceError::NotConfigured(name.to_string()))
        }
    }

    #[test]
    fn shared_sources_are_fetched_once() {
        let provider = Counting {
            texts: HashMap::from([("UnicodeData", "0041;A;Lu"), ("CaseFolding", "0041; C; 0061;")]),
            fetched: Default::default(),
        };
        let snapshot = Snapshot::load(&provider, ["UnicodeData", "CaseFolding", "UnicodeData"]).unwrap();
        assert_eq!(snapshot.names().collect::<Vec<_>>(), vec!["UnicodeData", "CaseFolding"]);
        assert_eq!(*provider.fetched.lock().unwrap(), vec!["UnicodeData", "CaseFolding"]);
        assert_eq!(snapshot.get("CaseFolding").unwrap().text, "0041; C; 0061;");
    }

    #[test]
    fn missing_source_is_reported() {
        let provider = Counting { texts: HashMap::new(), fetched: Default::default() };
        let err = Snapshot::load(&provider, ["EastAsianWidth"]).unwrap_err();
        assert!(matches!(err, SourceError::NotConfigured(name) if name == "EastAsianWidth"));
    }

    #[test]
    fn directory_provider_resolves_globs() {
        let dir = std::env::temp_dir().join(format!("ucd-runs-source-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("auxiliary")).unwrap();
        std::fs::write(dir.join("auxiliary").join("WordBreakProperty-16.0.0.txt"), "0041;ALetter\n").unwrap();
        std::fs::write(dir.join("a.txt"), "").unwrap();
        std::fs::write(dir.join("b.txt"), "").unwrap();

        let locations = IndexMap::from([
            ("WordBreakProperty".to_string(), "auxiliary/WordBreakProperty*.txt".to_string()),
            ("Either".to_string(), "*.txt".to_string()),
            ("Absent".to_string(), "nothing-*.txt".to_string()),
        ]);
        let provider = DirectoryProvider::new(&dir, locations);

        let bytes = provider.fetch("WordBreakProperty").unwrap();
        assert_eq!(bytes, b"0041;ALetter\n");
        assert_eq!(provider.describe("WordBreakProperty"), "WordBreakProperty-16.0.0.txt");
        assert!(matches!(provider.fetch("Either"), Err(SourceError::Ambiguous { count: 2, .. })));
        assert!(matches!(provider.fetch("Absent"), Err(SourceError::NoMatch(_))));
        assert!(matches!(provider.fetch("Unlisted"), Err(SourceError::NotConfigured(_))));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        struct Binary;
        impl SourceProvider for Binary {
            fn fetch(&self, _: &str) -> Result<Vec<u8>, SourceError> { Ok(vec![0xFF, 0xFE]) }
        }
        assert!(matches!(Snapshot::load(&Binary, ["UnicodeData"]), Err(SourceError::Utf8 { .. })));
    }
}
