//! repograph: source-code-to-entity-graph extraction.
//!
//! This library walks a repository, parses every Java and Python source file
//! with tree-sitter, and produces a stream of graph nodes: one repository
//! root followed by one aggregate per file owning its packages, imports,
//! types, callables and fields.

#![warn(missing_docs)]
// env_logger is used by src/main.rs (binary), not this library
#![expect(unused_crate_dependencies)]

pub mod assemble;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod repo;
pub mod symbol;

/// Re-export common error types for convenience.
pub use error::{ParseFailure, RepoGraphError, Result};

/// Re-export the extraction entry points.
pub use assemble::assemble_file;
pub use config::ExtractionConfig;
pub use graph::{CodeFile, GraphNode, Repository};
pub use repo::{discover_source_files, extract_repository};

/// repograph version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
