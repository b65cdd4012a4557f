//! Instrumentation emitted while building and maintaining an index.

mod common;

use common::path_graph;
use lcknn_core::{IndexError, LcIndexBuilder};
use lcknn_test_support::tracing::RecordingLayer;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

#[test]
fn build_records_its_phases() {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let index = tracing::subscriber::with_default(subscriber, || {
        LcIndexBuilder::new().with_k(2).build(path_graph(), [1, 5])
    })
    .expect("path index must build");
    assert_eq!(index.pois().len(), 2);

    let build = layer.span("index.build").expect("index.build span must exist");
    assert_eq!(build.fields.get("vertices"), Some(&"5".to_owned()));
    assert_eq!(build.fields.get("edges"), Some(&"4".to_owned()));
    assert_eq!(build.fields.get("k"), Some(&"2".to_owned()));

    let eliminate = layer
        .span("hierarchy.eliminate")
        .expect("hierarchy.eliminate span must exist");
    assert_eq!(eliminate.fields.get("strategy"), Some(&"min_degree".to_owned()));
    assert!(layer.span("hierarchy.refine").is_some());
    assert!(layer.span("index.construct").is_some());
    assert!(layer.has_event(Level::INFO, "index built"));
}

#[test]
fn updates_record_their_spans() {
    let mut index = LcIndexBuilder::new()
        .with_k(2)
        .build(path_graph(), [1, 5])
        .expect("path index must build");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    tracing::subscriber::with_default(subscriber, || {
        index.insert_poi(3).expect("vertex 3 is not a point of interest");
        index.batch_delete([1, 5]).expect("both ends are points of interest");
    });

    let insert = layer.span("update.insert").expect("update.insert span must exist");
    assert_eq!(insert.fields.get("inserted"), Some(&"3".to_owned()));
    let batch = layer
        .span("update.batch_delete")
        .expect("update.batch_delete span must exist");
    assert_eq!(batch.fields.get("count"), Some(&"2".to_owned()));
    assert!(layer.has_event(Level::DEBUG, "insertion applied"));
    assert!(layer.has_event(Level::DEBUG, "batch deletion applied"));
}

#[test]
fn failed_builds_log_the_error() {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let err = tracing::subscriber::with_default(subscriber, || {
        LcIndexBuilder::new().with_k(0).build(path_graph(), [1])
    })
    .expect_err("zero k is rejected");
    assert_eq!(err, IndexError::InvalidK { got: 0 });
    assert!(
        layer
            .events()
            .iter()
            .any(|event| event.level == Level::ERROR && event.fields.contains_key("error"))
    );
}
