//! Source file discovery.

use crate::config::ExtractionConfig;
use crate::ingest::detect::detect_language;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Find every analyzable source file under `repo_path`.
///
/// A file is kept when its language is selected in `config`, its name is not
/// a test file name for that language, it is not empty, and no directory on
/// the way down is excluded. Walk errors are logged and skipped. The result
/// is sorted and free of duplicates.
pub fn discover_source_files(repo_path: &Path, config: &ExtractionConfig) -> Vec<PathBuf> {
    let excluded = config.excluded_dirs();
    let mut files = BTreeSet::new();

    let walker = WalkDir::new(repo_path)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_excluded_dir(entry, &excluded));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry under {}: {}", repo_path.display(), err);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        if is_candidate(&entry, config) {
            files.insert(entry.into_path());
        }
    }

    debug!("Discovered {} source files under {}", files.len(), repo_path.display());
    files.into_iter().collect()
}

fn is_excluded_dir(entry: &DirEntry, excluded: &[String]) -> bool {
    // The root itself is never excluded, whatever its name.
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excluded.iter().any(|dir| dir == name))
}

fn is_candidate(entry: &DirEntry, config: &ExtractionConfig) -> bool {
    let Some(language) = detect_language(entry.path()) else {
        return false;
    };
    if !config.languages.contains(&language) {
        return false;
    }

    let Some(file_name) = entry.file_name().to_str() else {
        return false;
    };
    if language.is_test_file(file_name) {
        return false;
    }

    match entry.metadata() {
        Ok(metadata) => metadata.len() > 0,
        Err(err) => {
            warn!("Cannot stat {}: {}", entry.path().display(), err);
            false
        }
    }
}
