//! Syntax frontend: file bytes → tree-sitter tree.
//!
//! A frontend reads each path at most once and caches the parsed result.
//! Its cache lives exactly as long as the frontend, so callers scope one
//! frontend to one file assembly and the memory is released with it.

use crate::error::ParseFailure;
use crate::ingest::detect::{detect_language, Language};
use log::{debug, error, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Source text plus the tree parsed from it.
#[derive(Debug)]
pub struct ParsedSource {
    /// File the source was read from.
    pub path: PathBuf,
    /// Grammar the tree was produced with.
    pub language: Language,
    /// Full source text.
    pub text: String,
    /// Syntax tree over `text`.
    pub tree: tree_sitter::Tree,
}

impl ParsedSource {
    /// Root node of the tree.
    pub fn root(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Source bytes the tree's ranges index into.
    pub fn bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

/// Parses files into syntax trees, caching by path.
#[derive(Debug, Default)]
pub struct SyntaxFrontend {
    cache: HashMap<PathBuf, Arc<ParsedSource>>,
}

impl SyntaxFrontend {
    /// Create a frontend with an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse `path`, or return the cached result.
    ///
    /// Failures are logged here and handed back as values; nothing is
    /// retried.
    pub async fn parse(&mut self, path: &Path) -> Result<Arc<ParsedSource>, ParseFailure> {
        let language = supported_language(path)?;

        if let Some(cached) = self.cache.get(path) {
            return Ok(Arc::clone(cached));
        }

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(source) => {
                error!("Error reading file {}: {}", path.display(), source);
                return Err(ParseFailure::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let text = String::from_utf8(bytes).map_err(|source| {
            warn!("Skipping {}: not valid UTF-8 ({})", path.display(), source);
            ParseFailure::Decode {
                path: path.to_path_buf(),
                source,
            }
        })?;

        self.insert(path, language, text)
    }

    /// Parse in-memory `text` as if it were the contents of `path`.
    ///
    /// The language is still chosen by `path`'s extension. A cached entry for
    /// `path` wins over `text`.
    pub fn parse_source(
        &mut self,
        path: &Path,
        text: impl Into<String>,
    ) -> Result<Arc<ParsedSource>, ParseFailure> {
        let language = supported_language(path)?;

        if let Some(cached) = self.cache.get(path) {
            return Ok(Arc::clone(cached));
        }

        self.insert(path, language, text.into())
    }

    /// Number of cached files.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn insert(
        &mut self,
        path: &Path,
        language: Language,
        text: String,
    ) -> Result<Arc<ParsedSource>, ParseFailure> {
        let tree = parse_text(path, language, &text)?;
        debug!("Parsed {} as {}", path.display(), language);

        let parsed = Arc::new(ParsedSource {
            path: path.to_path_buf(),
            language,
            text,
            tree,
        });
        self.cache.insert(path.to_path_buf(), Arc::clone(&parsed));
        Ok(parsed)
    }
}

fn supported_language(path: &Path) -> Result<Language, ParseFailure> {
    detect_language(path).ok_or_else(|| {
        warn!("Unsupported file type for parsing: {}. Skipping.", path.display());
        ParseFailure::Unsupported {
            path: path.to_path_buf(),
        }
    })
}

fn parse_text(
    path: &Path,
    language: Language,
    text: &str,
) -> Result<tree_sitter::Tree, ParseFailure> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language.grammar())
        .map_err(|e| ParseFailure::Grammar {
            path: path.to_path_buf(),
            message: format!("Failed to set {} language: {:?}", language, e),
        })?;

    parser
        .parse(text.as_bytes(), None)
        .ok_or_else(|| ParseFailure::Grammar {
            path: path.to_path_buf(),
            message: "Parse failed - no tree returned".to_string(),
        })
}
