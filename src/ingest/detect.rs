//! Supported languages and how files are matched to them.
//!
//! A file's language comes from its extension alone, looked up in each
//! language's extension table. Each language also owns its discovery rules:
//! which directories are build or environment output, and which file names
//! are test files.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Programming languages supported by repograph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Java (.java)
    Java,
    /// Python (.py)
    Python,
}

impl Language {
    /// Every supported language, in a stable order.
    pub const ALL: [Language; 2] = [Language::Java, Language::Python];

    /// Lowercase name, as used in config files and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::Python => "python",
        }
    }

    /// File extensions (without the dot) owned by this language.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Java => &["java"],
            Language::Python => &["py"],
        }
    }

    /// Directory names whose subtrees never contain analyzable sources.
    pub fn excluded_dirs(&self) -> &'static [&'static str] {
        match self {
            Language::Java => &["target", "build", "out", ".gradle", ".mvn"],
            Language::Python => &[".venv"],
        }
    }

    /// Whether a file name follows this language's test naming convention.
    pub fn is_test_file(&self, file_name: &str) -> bool {
        match self {
            Language::Java => file_name.ends_with("Test.java") || file_name.starts_with("Test"),
            Language::Python => file_name.starts_with("test_") || file_name.ends_with("_test.py"),
        }
    }

    /// The tree-sitter grammar for this language.
    pub fn grammar(&self) -> tree_sitter::Language {
        match self {
            Language::Java => tree_sitter_java::language(),
            Language::Python => tree_sitter_python::language(),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language owning `path`'s extension, if any.
///
/// Matching is exact and case-sensitive; file content is never inspected.
///
/// # Examples
///
/// ```
/// # use repograph::ingest::detect::{detect_language, Language};
/// # use std::path::Path;
/// assert_eq!(detect_language(Path::new("Main.java")), Some(Language::Java));
/// assert_eq!(detect_language(Path::new("script.py")), Some(Language::Python));
/// assert_eq!(detect_language(Path::new("file.txt")), None);
/// ```
pub fn detect_language(path: &Path) -> Option<Language> {
    let extension = path.extension()?.to_str()?;

    // Case-sensitive
    Language::ALL
        .into_iter()
        .find(|lang| lang.extensions().contains(&extension))
}
