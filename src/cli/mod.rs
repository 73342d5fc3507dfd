//! Command-line interface for repograph.
//!
//! This module handles argument parsing and output payloads only.
//! Extraction itself lives in the library.

use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::graph::GraphNode;
use crate::ingest::detect::Language as DetectLanguage;
use crate::symbol::EntityKind;
use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// repograph: turn a source repository into an entity graph.
#[derive(Parser, Debug)]
#[command(name = "repograph")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_required = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available repograph commands.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Extract the entity graph of a repository.
    Extract {
        /// Repository root.
        repo: PathBuf,

        /// Restrict analysis to these languages (repeatable).
        #[arg(short, long = "language", value_name = "LANG")]
        languages: Vec<Language>,

        /// Keep whole-file source text instead of decomposing into entities.
        #[arg(long)]
        shallow: bool,

        /// Files assembled concurrently per batch.
        #[arg(short, long, value_name = "N")]
        batch_size: Option<usize>,

        /// JSON config file; flags override its values.
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
        format: OutputFormat,
    },

    /// List the files an extraction would analyze.
    List {
        /// Repository root.
        repo: PathBuf,

        /// Restrict discovery to these languages (repeatable).
        #[arg(short, long = "language", value_name = "LANG")]
        languages: Vec<Language>,

        /// JSON config file; flags override its values.
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

/// Programming language.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    /// Java (.java)
    Java,
    /// Python (.py)
    Python,
}

impl Language {
    /// Convert to the detection language.
    pub fn to_detect_language(self) -> DetectLanguage {
        match self {
            Language::Java => DetectLanguage::Java,
            Language::Python => DetectLanguage::Python,
        }
    }
}

/// How `extract` prints its results.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One JSON payload with per-kind counts.
    Summary,
    /// One serialized graph node per line.
    Jsonl,
}

/// Parse command-line arguments.
///
/// This function is the entry point for CLI argument parsing.
/// It returns the parsed Cli struct or exits on error.
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Build the run config: file values first, then command-line overrides.
pub fn resolve_config(
    config_path: Option<&Path>,
    languages: &[Language],
    shallow: bool,
    batch_size: Option<usize>,
) -> Result<ExtractionConfig> {
    let mut config = match config_path {
        Some(path) => ExtractionConfig::from_file(path)?,
        None => ExtractionConfig::default(),
    };

    if !languages.is_empty() {
        config = config.with_languages(languages.iter().map(|l| l.to_detect_language()));
    }
    if shallow {
        config = config.with_detailed_extraction(false);
    }
    if let Some(batch_size) = batch_size {
        config = config.with_batch_size(batch_size);
    }

    config.validate()?;
    Ok(config)
}

/// Counts gathered while a stream is consumed.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    /// Repository root, once seen.
    pub repository: Option<String>,
    /// Number of file aggregates.
    pub files: usize,
    /// Files that produced no entities.
    pub empty_files: usize,
    /// Entity count per kind.
    pub entities: BTreeMap<EntityKind, usize>,
}

impl RunSummary {
    /// Fold one stream item into the counts.
    pub fn record(&mut self, node: &GraphNode) {
        match node {
            GraphNode::Repository(repo) => self.repository = Some(repo.path.clone()),
            GraphNode::File(file) => {
                self.files += 1;
                if file.entity_count() == 0 {
                    self.empty_files += 1;
                }
                for entity in file.all_entities() {
                    *self.entities.entry(entity.kind()).or_default() += 1;
                }
            }
        }
    }

    /// Total entities across all kinds.
    pub fn total_entities(&self) -> usize {
        self.entities.values().sum()
    }
}

/// JSON success payload for CLI responses.
#[derive(Serialize)]
pub struct CliSuccessPayload {
    /// Status indicator ("ok").
    pub status: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CliSuccessPayload {
    /// Construct a payload containing only the message.
    pub fn message_only(message: String) -> Self {
        Self {
            status: "ok",
            message,
            data: None,
        }
    }

    /// Construct a payload with structured data.
    pub fn with_data(message: String, data: Value) -> Self {
        Self {
            status: "ok",
            message,
            data: Some(data),
        }
    }
}

/// JSON error payload for CLI responses.
#[derive(Serialize)]
pub struct CliErrorPayload {
    /// Status indicator ("error").
    pub status: &'static str,
    /// Structured error details.
    pub error: ErrorDetails,
}

/// Details for a CLI error payload.
#[derive(Serialize)]
pub struct ErrorDetails {
    /// Error kind identifier (RepositoryNotFound, etc.).
    pub kind: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional file context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl CliErrorPayload {
    /// Build payload from a RepoGraphError instance.
    pub fn from_error(error: &crate::RepoGraphError) -> Self {
        let file = error
            .file_path()
            .map(|path| path.to_string_lossy().to_string());

        CliErrorPayload {
            status: "error",
            error: ErrorDetails {
                kind: error.kind(),
                message: error.to_string(),
                file,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CodeFile, Repository};

    #[test]
    fn test_parse_extract_flags() {
        let cli = Cli::try_parse_from([
            "repograph", "extract", "/repo", "-l", "java", "--shallow", "-b", "8", "--format",
            "jsonl",
        ])
        .unwrap();
        match cli.command {
            Commands::Extract {
                repo,
                languages,
                shallow,
                batch_size,
                format,
                ..
            } => {
                assert_eq!(repo, PathBuf::from("/repo"));
                assert_eq!(languages, vec![Language::Java]);
                assert!(shallow);
                assert_eq!(batch_size, Some(8));
                assert_eq!(format, OutputFormat::Jsonl);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["repograph"]).is_err());
    }

    #[test]
    fn test_resolve_config_overrides() {
        let config = resolve_config(None, &[Language::Python], true, Some(5)).unwrap();
        assert_eq!(config.languages, vec![DetectLanguage::Python]);
        assert!(!config.detailed_extraction);
        assert_eq!(config.batch_size, 5);
    }

    #[test]
    fn test_resolve_config_rejects_zero_batch() {
        let err = resolve_config(None, &[], false, Some(0)).unwrap_err();
        let payload = serde_json::to_value(CliErrorPayload::from_error(&err)).unwrap();
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error"]["kind"], "InvalidConfig");
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = RunSummary::default();
        summary.record(&GraphNode::Repository(Repository::new("/repo")));
        summary.record(&GraphNode::File(Box::new(CodeFile::new("A.java", "/repo/A.java"))));
        assert_eq!(summary.repository.as_deref(), Some("/repo"));
        assert_eq!(summary.files, 1);
        assert_eq!(summary.empty_files, 1);
        assert_eq!(summary.total_entities(), 0);
    }
}
