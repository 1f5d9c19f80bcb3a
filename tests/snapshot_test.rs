//! Tests for loading snapshot files

use std::fs;

use tempfile::TempDir;

use doclineage::config::Settings;
use doclineage::application::ApplicationError;
use doclineage::domain::{BlockReason, CopyKind, DomainError};
use doclineage::infrastructure::di::ServiceContainer;
use doclineage::infrastructure::snapshot::Snapshot;
use doclineage::infrastructure::InfraError;

const SNAPSHOT: &str = r#"
[[documents]]
id = "qd-12"
title = "Decision 12"
copy_kind = "original"

[[documents]]
id = "sy-1"
copy_kind = "certified-true-copy"
original_id = "qd-12"

[[records]]
id = "school"
sort_key = 1
label = "School"

[[records]]
id = "album"
parent_id = "school"
label = "ALBUM"
"#;

#[test]
fn given_snapshot_file_when_loading_then_wires_container() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("snapshot.toml");
    fs::write(&path, SNAPSHOT).unwrap();

    // Act
    let snapshot = Snapshot::load(&path).unwrap();
    let container = ServiceContainer::from_snapshot(Settings::default(), snapshot);

    // Assert
    let kinds = container.copy_service().authorized_kinds("sy-1").unwrap();
    assert_eq!(kinds.as_slice(), &[CopyKind::RegisteredCopy]);
    let paths = container.hierarchy_service().paths().unwrap();
    assert_eq!(paths["album"], "School/ALBUM");
}

#[test]
fn given_missing_file_when_loading_then_io_error() {
    let temp = TempDir::new().unwrap();

    let err = Snapshot::load(&temp.path().join("absent.toml")).unwrap_err();

    assert!(matches!(err, InfraError::Io { .. }));
}

#[test]
fn given_malformed_file_when_loading_then_parse_error_names_path() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.toml");
    fs::write(&path, "[[records]\nid = ").unwrap();

    let err = Snapshot::load(&path).unwrap_err();

    assert!(matches!(err, InfraError::Parse { .. }));
    assert!(err.to_string().contains("broken.toml"));
}

#[test]
fn given_unrecognised_stored_kind_when_loading_then_document_is_blocked_and_tree_builds() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("snapshot.toml");
    let content = format!(
        "[[documents]]\nid = \"x\"\ncopy_kind = \"ban-dien-tu\"\n{}",
        SNAPSHOT
    );
    fs::write(&path, content).unwrap();

    // Act
    let snapshot = Snapshot::load(&path).unwrap();
    let container = ServiceContainer::from_snapshot(Settings::default(), snapshot);

    // Assert
    let err = container.copy_service().authorized_kinds("x").unwrap_err();
    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::Blocked {
            reason: BlockReason::UnknownKind,
            ..
        })
    ));
    let tree = container.hierarchy_service().tree().unwrap();
    assert_eq!(tree.len(), 2);
}
