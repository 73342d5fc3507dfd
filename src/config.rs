//! Extraction configuration.
//!
//! Loaded from JSON with schema validation, or built in code with the
//! setters. Every field has a default, so `{}` is a valid config file.

use crate::error::{RepoGraphError, Result};
use crate::ingest::detect::Language;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Files assembled concurrently per batch unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Settings for one repository extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionConfig {
    /// Languages whose files are discovered and analyzed.
    pub languages: Vec<Language>,

    /// Maximum number of files assembled concurrently.
    pub batch_size: usize,

    /// Decompose files into entities. When false, files carry only their
    /// full source text.
    pub detailed_extraction: bool,

    /// Directory names excluded in addition to each language's own.
    pub extra_excluded_dirs: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            languages: Language::ALL.to_vec(),
            batch_size: DEFAULT_BATCH_SIZE,
            detailed_extraction: true,
            extra_excluded_dirs: Vec::new(),
        }
    }
}

impl ExtractionConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict analysis to `languages`.
    pub fn with_languages(mut self, languages: impl IntoIterator<Item = Language>) -> Self {
        self.languages = languages.into_iter().collect();
        self
    }

    /// Set the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Toggle entity decomposition.
    pub fn with_detailed_extraction(mut self, detailed: bool) -> Self {
        self.detailed_extraction = detailed;
        self
    }

    /// Exclude directories named `name` anywhere under the root.
    pub fn exclude_dir(mut self, name: impl Into<String>) -> Self {
        self.extra_excluded_dirs.push(name.into());
        self
    }

    /// Load a config from a JSON file and validate it.
    ///
    /// # Errors
    /// * `RepoGraphError::Io` - the file cannot be read
    /// * `RepoGraphError::InvalidConfig` - malformed JSON or failed validation
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| RepoGraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse a config from JSON text and validate it.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: ExtractionConfig =
            serde_json::from_str(content).map_err(|e| RepoGraphError::InvalidConfig {
                message: format!("JSON parse error: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants every run relies on.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(RepoGraphError::InvalidConfig {
                message: "'batch_size' must be greater than zero".to_string(),
            });
        }

        if self.languages.is_empty() {
            return Err(RepoGraphError::InvalidConfig {
                message: "'languages' must name at least one language".to_string(),
            });
        }

        for (i, dir) in self.extra_excluded_dirs.iter().enumerate() {
            if dir.is_empty() || dir.contains(['/', '\\']) {
                return Err(RepoGraphError::InvalidConfig {
                    message: format!(
                        "Entry {} of 'extra_excluded_dirs' must be a single directory name, got '{}'",
                        i + 1,
                        dir
                    ),
                });
            }
        }

        Ok(())
    }

    /// Directory names excluded from discovery: every selected language's
    /// own plus the extra ones.
    pub fn excluded_dirs(&self) -> Vec<String> {
        let mut dirs: Vec<String> = self
            .languages
            .iter()
            .flat_map(|lang| lang.excluded_dirs().iter().map(|d| d.to_string()))
            .chain(self.extra_excluded_dirs.iter().cloned())
            .collect();
        dirs.sort();
        dirs.dedup();
        dirs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.languages, vec![Language::Java, Language::Python]);
        assert_eq!(config.batch_size, 100);
        assert!(config.detailed_extraction);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = ExtractionConfig::from_json("{}").unwrap();
        assert_eq!(config, ExtractionConfig::default());
    }

    #[test]
    fn test_json_fields() {
        let json = r#"{"languages": ["python"], "batch_size": 8,
                       "detailed_extraction": false, "extra_excluded_dirs": ["vendor"]}"#;
        let config = ExtractionConfig::from_json(json).unwrap();
        assert_eq!(config.languages, vec![Language::Python]);
        assert_eq!(config.batch_size, 8);
        assert!(!config.detailed_extraction);
        assert_eq!(config.excluded_dirs(), vec![".venv", "vendor"]);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let err = ExtractionConfig::from_json(r#"{"batch_size": 0}"#).unwrap_err();
        assert_eq!(err.kind(), "InvalidConfig");
        assert!(err.to_string().contains("batch_size"));
    }

    #[test]
    fn test_unknown_language_rejected() {
        let err = ExtractionConfig::from_json(r#"{"languages": ["cobol"]}"#).unwrap_err();
        assert!(matches!(err, RepoGraphError::InvalidConfig { .. }));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(ExtractionConfig::from_json(r#"{"batchsize": 4}"#).is_err());
    }

    #[test]
    fn test_path_in_excluded_dir_rejected() {
        let config = ExtractionConfig::new().exclude_dir("a/b");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repograph.json");
        std::fs::write(&path, r#"{"batch_size": 3}"#).unwrap();
        let config = ExtractionConfig::from_file(&path).unwrap();
        assert_eq!(config.batch_size, 3);

        let missing = ExtractionConfig::from_file(&dir.path().join("nope.json")).unwrap_err();
        assert_eq!(missing.kind(), "Io");
    }

    #[test]
    fn test_excluded_dirs_union() {
        let config = ExtractionConfig::new()
            .with_languages([Language::Java])
            .exclude_dir("generated");
        let dirs = config.excluded_dirs();
        assert!(dirs.contains(&"target".to_string()));
        assert!(dirs.contains(&"generated".to_string()));
        assert!(!dirs.contains(&".venv".to_string()));
    }
}
