//! Repository orchestration.
//!
//! Discovers source files, assembles them batch by batch, and streams the
//! results behind one [`Repository`] node. Within a batch every file is
//! assembled concurrently on the current task; batches run strictly in order.

pub mod discover;

use crate::assemble::assemble_file;
use crate::config::ExtractionConfig;
use crate::error::{RepoGraphError, Result};
use crate::graph::{GraphNode, Repository};
use async_stream::stream;
use futures::future::join_all;
use futures::Stream;
use log::{debug, info};
use std::path::{Path, PathBuf};

pub use discover::discover_source_files;

/// Stream the graph of the repository at `repo_path`.
///
/// The first item is always the [`Repository`] node, followed by one
/// [`GraphNode::File`] per discovered file with `part_of` set. Files are
/// assembled in batches of `config.batch_size`; no file of one batch is
/// yielded before every file of the previous batch is complete.
///
/// # Errors
/// * `RepoGraphError::RepositoryNotFound` - `repo_path` does not exist
/// * `RepoGraphError::InvalidConfig` - `config` fails validation
/// * `RepoGraphError::Io` - `repo_path` cannot be made absolute
///
/// Nothing is yielded in those cases. Per-file failures never surface here.
pub fn extract_repository(
    repo_path: &Path,
    config: &ExtractionConfig,
) -> Result<impl Stream<Item = GraphNode>> {
    config.validate()?;

    if !repo_path.exists() {
        return Err(RepoGraphError::RepositoryNotFound {
            path: repo_path.to_path_buf(),
        });
    }

    let root = std::path::absolute(repo_path).map_err(|source| RepoGraphError::Io {
        path: repo_path.to_path_buf(),
        source,
    })?;
    let files = discover_source_files(&root, config);
    let repository = Repository::new(root.to_string_lossy());
    let batch_size = config.batch_size;
    let detailed = config.detailed_extraction;

    info!(
        "Extracting {} files from {} in batches of {}",
        files.len(),
        root.display(),
        batch_size
    );

    Ok(stream! {
        yield GraphNode::Repository(repository.clone());

        for (index, batch) in files.chunks(batch_size).enumerate() {
            debug!("Batch {}: assembling {} files", index, batch.len());
            let results = join_all(
                batch.iter().map(|file| assemble_file(file, &root, detailed)),
            )
            .await;

            for mut code_file in results {
                code_file.part_of = Some(repository.clone());
                yield GraphNode::File(Box::new(code_file));
            }
        }
    })
}

/// Discover only: the files [`extract_repository`] would analyze.
pub fn list_repository(repo_path: &Path, config: &ExtractionConfig) -> Result<Vec<PathBuf>> {
    config.validate()?;
    if !repo_path.exists() {
        return Err(RepoGraphError::RepositoryNotFound {
            path: repo_path.to_path_buf(),
        });
    }
    Ok(discover_source_files(repo_path, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_missing_repository_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = extract_repository(&missing, &ExtractionConfig::default())
            .err()
            .expect("missing root must fail");
        assert_eq!(err.kind(), "RepositoryNotFound");
    }

    #[tokio::test]
    async fn test_invalid_config_fails_fast() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExtractionConfig::new().with_batch_size(0);
        assert!(extract_repository(dir.path(), &config).is_err());
    }

    #[tokio::test]
    async fn test_empty_repository_yields_only_root() {
        let dir = tempfile::tempdir().unwrap();
        let nodes: Vec<_> = extract_repository(dir.path(), &ExtractionConfig::default())
            .unwrap()
            .collect()
            .await;
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].as_repository().is_some());
    }

    #[test]
    fn test_list_repository() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.py"), "x = 1\n").unwrap();
        let files = list_repository(dir.path(), &ExtractionConfig::default()).unwrap();
        assert_eq!(files.len(), 1);
    }
}
