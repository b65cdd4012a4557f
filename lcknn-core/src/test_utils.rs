//! Shared test utilities for `lcknn-core`.

use lcknn_test_support::{
    graphs::{GraphFixture, RandomGraphSpec, random_graph},
    profile::ProptestRunProfile,
};
use proptest::{prelude::*, test_runner::Config as ProptestConfig};

use crate::{graph::LabelledGraph, label::LabelSet};

/// Builds a proptest configuration from the shared run profile, so every
/// suite honours `LCKNN_PROPTEST_CASES` and `LCKNN_PBT_FORK`.
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Converts a generated fixture into a graph.
pub(crate) fn labelled(fixture: &GraphFixture) -> LabelledGraph {
    LabelledGraph::from_edges(
        fixture.vertex_count,
        fixture.label_size,
        fixture.edges.iter().map(|edge| {
            (
                edge.source,
                edge.target,
                edge.weight,
                LabelSet::from_bits(edge.labels),
            )
        }),
    )
    .expect("generated fixtures are valid graphs")
}

/// Small connected graphs with up to three labels and a handful of points
/// of interest.
pub(crate) fn fixture_strategy() -> impl Strategy<Value = GraphFixture> {
    (any::<u64>(), 2_usize..=30, 1_usize..=3, 0_usize..=30, 1_usize..=8).prop_map(
        |(seed, vertex_count, label_size, extra_edges, poi_count)| {
            random_graph(
                seed,
                RandomGraphSpec {
                    vertex_count,
                    label_size,
                    extra_edges,
                    poi_count,
                },
            )
        },
    )
}
