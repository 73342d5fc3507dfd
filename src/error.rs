//! Repograph error types.
//!
//! All errors are typed and provide root cause information. Only
//! [`RepoGraphError`] ever reaches a caller of the orchestrator; per-file
//! [`ParseFailure`]s are absorbed by the assembler and degrade that file's
//! output instead.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main error type for repository extraction.
#[derive(Error, Debug)]
pub enum RepoGraphError {
    /// The repository root does not exist.
    #[error("Repository path {path} does not exist")]
    RepositoryNotFound {
        /// The requested repository root.
        path: PathBuf,
    },

    /// I/O error outside of per-file reads (config loading, path resolution).
    #[error("I/O error for path {path}: {source}")]
    Io {
        /// The path that caused the I/O error.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Extraction config failed validation.
    #[error("Invalid extraction config: {message}")]
    InvalidConfig {
        /// The validation error message.
        message: String,
    },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RepoGraphError {
    /// Stable identifier for the error variant, used in CLI payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            RepoGraphError::RepositoryNotFound { .. } => "RepositoryNotFound",
            RepoGraphError::Io { .. } => "Io",
            RepoGraphError::InvalidConfig { .. } => "InvalidConfig",
            RepoGraphError::Json(_) => "Json",
        }
    }

    /// Path associated with the error, if any.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            RepoGraphError::RepositoryNotFound { path } | RepoGraphError::Io { path, .. } => {
                Some(path.as_path())
            }
            _ => None,
        }
    }
}

/// Why a single file could not be turned into a syntax tree.
///
/// Produced by the syntax frontend, logged there, and never propagated past
/// the file graph assembler.
#[derive(Error, Debug)]
pub enum ParseFailure {
    /// No grammar is registered for the file extension.
    #[error("Unsupported file type: {path}")]
    Unsupported {
        /// The file that was skipped.
        path: PathBuf,
    },

    /// The file could not be read.
    #[error("Error reading file {path}: {source}")]
    Read {
        /// The file that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid UTF-8.
    #[error("File {path} is not valid UTF-8: {source}")]
    Decode {
        /// The file that failed to decode.
        path: PathBuf,
        /// The underlying decode error.
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Tree-sitter could not produce a tree.
    #[error("Parse error in {path}: {message}")]
    Grammar {
        /// The file that failed to parse.
        path: PathBuf,
        /// The parse error message.
        message: String,
    },
}

impl ParseFailure {
    /// The file this failure refers to.
    pub fn path(&self) -> &Path {
        match self {
            ParseFailure::Unsupported { path }
            | ParseFailure::Read { path, .. }
            | ParseFailure::Decode { path, .. }
            | ParseFailure::Grammar { path, .. } => path,
        }
    }
}

/// Result type alias for repograph operations.
pub type Result<T> = std::result::Result<T, RepoGraphError>;
