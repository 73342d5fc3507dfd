//! Repository orchestration tests.

use futures::StreamExt;
use repograph::symbol::EntityKind;
use repograph::{extract_repository, ExtractionConfig, GraphNode};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

async fn collect(root: &Path, config: &ExtractionConfig) -> Vec<GraphNode> {
    extract_repository(root, config)
        .unwrap()
        .collect()
        .await
}

#[tokio::test]
async fn test_end_to_end_single_file() {
    let repo = TempDir::new().unwrap();
    let source = "package com.example;\n\
                  \n\
                  import java.util.List;\n\
                  \n\
                  public class Foo {\n\
                  \x20   private int count;\n\
                  \x20   private List<String> names;\n\
                  \n\
                  \x20   public int total() {\n\
                  \x20       return count;\n\
                  \x20   }\n\
                  }\n";
    write(repo.path(), "com/example/Foo.java", source.as_bytes());

    let nodes = collect(repo.path(), &ExtractionConfig::default()).await;
    assert_eq!(nodes.len(), 2);

    let repository = nodes[0].as_repository().expect("repository comes first");
    let file = nodes[1].as_file().expect("then the file");

    let expected_name = Path::new("com").join("example").join("Foo.java");
    assert_eq!(file.name, expected_name.to_string_lossy());
    assert_eq!(file.part_of.as_ref(), Some(repository));

    assert_eq!(file.count_of(EntityKind::Package), 1);
    assert_eq!(file.count_of(EntityKind::Import), 1);
    assert_eq!(file.count_of(EntityKind::Class), 1);
    assert_eq!(file.count_of(EntityKind::Field), 2);
    assert_eq!(file.count_of(EntityKind::Method), 1);
    assert_eq!(file.entity_count(), 6);
    assert!(file
        .all_entities()
        .all(|e| e.file_path() == file.file_path && e.file_path().ends_with("Foo.java")));
}

#[tokio::test]
async fn test_stream_shape_across_batches() {
    let repo = TempDir::new().unwrap();
    for i in 0..5 {
        write(
            repo.path(),
            &format!("pkg/Mod{}.java", i),
            format!("class Mod{} {{}}\n", i).as_bytes(),
        );
    }
    write(repo.path(), "scripts/run.py", b"def main():\n    pass\n");

    let config = ExtractionConfig::new().with_batch_size(2);
    let nodes = collect(repo.path(), &config).await;

    // One repository plus one aggregate per file.
    assert_eq!(nodes.len(), 1 + 6);
    let repository = nodes[0].as_repository().unwrap().clone();
    assert!(nodes[1..].iter().all(|n| n.as_file().is_some()));
    assert!(nodes[1..]
        .iter()
        .all(|n| n.as_file().unwrap().part_of.as_ref() == Some(&repository)));

    let ids: HashSet<_> = nodes.iter().map(GraphNode::id).collect();
    assert_eq!(ids.len(), nodes.len());

    // Batches preserve discovery order.
    let names: Vec<_> = nodes[1..]
        .iter()
        .map(|n| n.as_file().unwrap().name.replace('\\', "/"))
        .collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[tokio::test]
async fn test_bad_file_degrades_gracefully() {
    let repo = TempDir::new().unwrap();
    write(repo.path(), "Good.java", b"class Good { int x; }\n");
    write(repo.path(), "Bad.java", &[0x63, 0x6c, 0xff, 0xfe, 0x0a]);

    let nodes = collect(repo.path(), &ExtractionConfig::default()).await;
    assert_eq!(nodes.len(), 3);

    let bad = nodes
        .iter()
        .filter_map(GraphNode::as_file)
        .find(|f| f.name == "Bad.java")
        .unwrap();
    assert_eq!(bad.entity_count(), 0);
    assert!(bad.part_of.is_some());

    let good = nodes
        .iter()
        .filter_map(GraphNode::as_file)
        .find(|f| f.name == "Good.java")
        .unwrap();
    assert_eq!(good.entity_count(), 2);
}

#[tokio::test]
async fn test_shallow_repository() {
    let repo = TempDir::new().unwrap();
    write(repo.path(), "a.py", b"import os\n");

    let config = ExtractionConfig::new().with_detailed_extraction(false);
    let nodes = collect(repo.path(), &config).await;
    let file = nodes[1].as_file().unwrap();
    assert_eq!(file.source_code.as_deref(), Some("import os\n"));
    assert_eq!(file.entity_count(), 0);
}

#[tokio::test]
async fn test_missing_repository() {
    let repo = TempDir::new().unwrap();
    let missing = repo.path().join("does-not-exist");
    match extract_repository(&missing, &ExtractionConfig::default()) {
        Err(err) => {
            assert_eq!(err.kind(), "RepositoryNotFound");
            assert!(err.to_string().contains("does-not-exist"));
        }
        Ok(_) => panic!("expected RepositoryNotFound"),
    }
}

#[tokio::test]
async fn test_repository_id_is_stable() {
    let repo = TempDir::new().unwrap();
    let first = collect(repo.path(), &ExtractionConfig::default()).await;
    let second = collect(repo.path(), &ExtractionConfig::default()).await;
    assert_eq!(first[0].id(), second[0].id());
}

#[tokio::test]
async fn test_stream_can_be_dropped_early() {
    let repo = TempDir::new().unwrap();
    for i in 0..3 {
        write(repo.path(), &format!("m{}.py", i), b"x = 1\n");
    }

    let stream = extract_repository(repo.path(), &ExtractionConfig::default()).unwrap();
    let first: Vec<_> = stream.take(1).collect().await;
    assert_eq!(first.len(), 1);
    assert!(first[0].as_repository().is_some());
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_file_degrades_gracefully() {
    use std::os::unix::fs::PermissionsExt;

    let repo = TempDir::new().unwrap();
    write(repo.path(), "Open.java", b"class Open {}\n");
    write(repo.path(), "Locked.java", b"class Locked { int x; }\n");
    let locked = repo.path().join("Locked.java");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits are not enforced for privileged users.
    if fs::read(&locked).is_ok() {
        return;
    }

    let nodes = collect(repo.path(), &ExtractionConfig::default()).await;
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
    assert_eq!(nodes.len(), 3);

    let locked_file = nodes
        .iter()
        .filter_map(GraphNode::as_file)
        .find(|f| f.name == "Locked.java")
        .unwrap();
    assert_eq!(locked_file.entity_count(), 0);
    assert!(locked_file.source_code.is_none());
    assert!(locked_file.part_of.is_some());

    let open = nodes
        .iter()
        .filter_map(GraphNode::as_file)
        .find(|f| f.name == "Open.java")
        .unwrap();
    assert_eq!(open.entity_count(), 1);
}
