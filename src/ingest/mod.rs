//! Filesystem → syntax tree → entity extraction.
//!
//! The frontend reads and parses one file, the dispatcher walks its tree with
//! the extractor for its language, and the per-file context keeps every
//! declaration unique.

pub mod context;
pub mod detect;
pub mod dispatch;
pub mod frontend;
pub mod imports;
pub mod java;
pub mod python;

pub use context::{DedupKey, ExtractionContext, KeyKind};
pub use detect::{detect_language, Language};
pub use dispatch::{extract_entities, extract_file_entities, extractor_for, LanguageExtractor};
pub use frontend::{ParsedSource, SyntaxFrontend};
