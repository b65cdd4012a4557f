//! Snapshot round trips of built and updated indexes.

mod common;

use common::{build, indexed_fixture, labelled, path_graph, suite_proptest_config};
use lcknn_core::{
    IndexError, IndexSnapshot, LcIndex, LcIndexBuilder, PersistError, PersistErrorCode,
    SNAPSHOT_VERSION,
};
use proptest::prelude::*;
use rstest::rstest;
use tempfile::TempDir;

proptest! {
    #![proptest_config(suite_proptest_config(32))]

    #[test]
    fn snapshots_restore_identical_profiles((fixture, k) in indexed_fixture()) {
        let mut index = build(&fixture, k);
        if let Some(&outsider) = fixture.non_pois().first() {
            index.insert_poi(outsider).expect("vertex is not a point of interest");
        }
        let mut encoded = Vec::new();
        index.snapshot().write_json(&mut encoded).expect("snapshot encodes");
        let decoded = IndexSnapshot::read_json(encoded.as_slice()).expect("snapshot decodes");
        let restored = LcIndex::restore(labelled(&fixture), decoded).expect("snapshot restores");
        for vertex in index.graph().vertices() {
            prop_assert_eq!(restored.profile(vertex), index.profile(vertex));
        }
        prop_assert_eq!(restored.pois(), index.pois());
        prop_assert_eq!(restored.order(), index.order());
    }
}

#[test]
fn files_survive_a_save_and_load() {
    let index = LcIndexBuilder::new()
        .with_k(2)
        .build(path_graph(), [1, 5])
        .expect("path index must build");
    let dir = TempDir::new().expect("temporary directory must be created");
    let path = dir.path().join("path.index.json");
    index.save(&path).expect("index must save");
    let loaded = LcIndex::load(path_graph(), &path).expect("index must load");
    assert_eq!(loaded.snapshot(), index.snapshot());
    assert_eq!(loaded.snapshot().version(), SNAPSHOT_VERSION);
}

#[test]
fn missing_files_are_io_errors() {
    let dir = TempDir::new().expect("temporary directory must be created");
    let err = LcIndex::load(path_graph(), &dir.path().join("absent.json"))
        .expect_err("absent files cannot load");
    assert_eq!(err.code(), PersistErrorCode::Io);
}

#[rstest]
#[case("\"k\":2", "\"k\":0", IndexError::InvalidK { got: 0 })]
#[case(
    "\"version\":1",
    "\"version\":7",
    IndexError::SnapshotMismatch { field: "version", expected: 1, found: 7 }
)]
#[case(
    "\"label_size\":1",
    "\"label_size\":2",
    IndexError::SnapshotMismatch { field: "label_size", expected: 1, found: 2 }
)]
fn tampered_snapshots_are_rejected(
    #[case] field: &str,
    #[case] replacement: &str,
    #[case] expected: IndexError,
) {
    let index = LcIndexBuilder::new()
        .with_k(2)
        .build(path_graph(), [1, 5])
        .expect("path index must build");
    let json = serde_json::to_string(&index.snapshot()).expect("snapshot encodes");
    assert!(json.contains(field), "{json}");
    let tampered = json.replacen(field, replacement, 1);
    let snapshot = IndexSnapshot::read_json(tampered.as_bytes()).expect("still a snapshot");
    let err = LcIndex::restore(path_graph(), snapshot).expect_err("tampering is detected");
    assert_eq!(err, expected);
    let wrapped = PersistError::from(err);
    assert_eq!(wrapped.code(), PersistErrorCode::Index);
}
