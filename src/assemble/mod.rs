//! File graph assembly.
//!
//! Turns one source file into one [`CodeFile`] aggregate. Never fails: a file
//! that cannot be read or parsed still yields an aggregate with its name and
//! path, so one bad file cannot abort a repository run.

use crate::graph::CodeFile;
use crate::ingest::context::ExtractionContext;
use crate::ingest::dispatch::{extract_entities, extractor_for};
use crate::ingest::frontend::SyntaxFrontend;
use log::debug;
use std::path::{Path, MAIN_SEPARATOR};

/// Path of `file_path` relative to `repo_path`.
///
/// Plain prefix removal of the root and its trailing separator. A path
/// outside the root is returned unchanged.
pub fn relative_name(file_path: &str, repo_path: &str) -> String {
    let root = repo_path.trim_end_matches(MAIN_SEPARATOR);
    file_path
        .strip_prefix(root)
        .and_then(|rest| rest.strip_prefix(MAIN_SEPARATOR))
        .unwrap_or(file_path)
        .to_string()
}

/// Assemble the aggregate for `file_path`.
///
/// With `detailed` false the aggregate carries the full source text and no
/// entities. With `detailed` true every extracted entity is classified into
/// its relationship list and stamped with the file path.
pub async fn assemble_file(file_path: &Path, repo_path: &Path, detailed: bool) -> CodeFile {
    let path_str = file_path.to_string_lossy().into_owned();
    let name = relative_name(&path_str, &repo_path.to_string_lossy());
    let mut code_file = CodeFile::new(name, path_str.clone());

    // Scoped to this call so the cached tree is dropped with it.
    let mut frontend = SyntaxFrontend::new();
    let parsed = match frontend.parse(file_path).await {
        Ok(parsed) => parsed,
        Err(failure) => {
            debug!("Minimal aggregate for {}: {}", failure.path().display(), failure);
            return code_file;
        }
    };

    if !detailed {
        return code_file.with_source_code(parsed.text.clone());
    }

    let mut ctx = ExtractionContext::new(path_str);
    let extractor = extractor_for(parsed.language);
    for entity in extract_entities(extractor, parsed.root(), parsed.bytes(), &mut ctx) {
        code_file.insert(entity);
    }

    debug!(
        "Assembled {} with {} entities",
        code_file.name,
        code_file.entity_count()
    );
    code_file
}
