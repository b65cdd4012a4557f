//! Label-constrained k-nearest-neighbour index over labelled road graphs.
//!
//! An [`LcIndex`] answers "which `k` points of interest are closest to this
//! vertex if only edges carrying these labels may be used?" without
//! searching the graph. It is built once over an elimination hierarchy and
//! kept current as points of interest are inserted and deleted.
//!
//! ```
//! use lcknn_core::{LabelSet, LabelledGraph, LcIndexBuilder};
//!
//! let road: LabelSet = "a".parse().expect("valid labels");
//! let rail: LabelSet = "b".parse().expect("valid labels");
//! let graph = LabelledGraph::from_edges(
//!     3,
//!     2,
//!     [(1, 2, 1.0, road), (2, 3, 1.0, road), (1, 3, 1.5, rail)],
//! )
//! .expect("valid graph");
//! let mut index = LcIndexBuilder::new()
//!     .with_k(1)
//!     .build(graph, [3])
//!     .expect("valid configuration");
//!
//! let nearest = index.query(1, road).expect("vertex exists");
//! assert_eq!(nearest[0].distance(), 2.0);
//! let nearest = index.query(1, road | rail).expect("vertex exists");
//! assert_eq!(nearest[0].distance(), 1.5);
//!
//! index.insert_poi(2).expect("vertex 2 is not yet a point of interest");
//! assert_eq!(index.query(1, road).expect("vertex exists")[0].vertex(), 2);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod build;
mod builder;
mod compaction;
mod error;
mod graph;
mod hierarchy;
mod index;
mod label;
mod oracle;
mod persist;
mod poi;
mod profile;
mod query;
mod state;
mod stats;
mod summary;
mod telemetry;
mod update;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{DEFAULT_K, LcIndexBuilder},
    compaction::LabelCompaction,
    error::{IndexError, IndexErrorCode, Result},
    graph::{GraphEdge, LabelledGraph, RawEdge, VertexId},
    hierarchy::EliminationOrder,
    index::LcIndex,
    label::{LabelSet, LabelSubsets, MAX_LABELS, ParseLabelSetError},
    oracle::{
        DISTANCE_TOLERANCE, Mismatch, VerificationReport, answers_agree, label_constrained_knn,
    },
    persist::{IndexSnapshot, PersistError, PersistErrorCode, SNAPSHOT_VERSION},
    poi::PoiSet,
    profile::{Neighbour, ProfileEntry, ProfiledIndex},
    stats::IndexStats,
    summary::{PathEntry, PathSummary},
    update::{UpdateOp, UpdateSummary},
};
