//! Helpers shared by the integration suites.
#![allow(dead_code, reason = "each suite uses a different subset of helpers")]

use lcknn_core::{
    LabelSet, LabelledGraph, LcIndex, LcIndexBuilder, Neighbour, VertexId, answers_agree,
};
use lcknn_test_support::{
    graphs::{GraphFixture, RandomGraphSpec, random_graph},
    profile::ProptestRunProfile,
};
use proptest::{prelude::*, test_runner::Config as ProptestConfig};

pub fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

pub fn labels(text: &str) -> LabelSet {
    text.parse().expect("label text must parse")
}

pub fn labelled(fixture: &GraphFixture) -> LabelledGraph {
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

pub fn build(fixture: &GraphFixture, k: usize) -> LcIndex {
    LcIndexBuilder::new()
        .with_k(k)
        .build(labelled(fixture), fixture.pois.iter().copied())
        .expect("generated fixtures build")
}

/// Path 1-2-3-4-5 with unit `a` edges.
pub fn path_graph() -> LabelledGraph {
    let a = labels("a");
    LabelledGraph::from_edges(
        5,
        1,
        [(1, 2, 1.0, a), (2, 3, 1.0, a), (3, 4, 1.0, a), (4, 5, 1.0, a)],
    )
    .expect("path graph must be valid")
}

pub fn pairs(found: &[Neighbour]) -> Vec<(VertexId, f64)> {
    found
        .iter()
        .map(|neighbour| (neighbour.vertex(), neighbour.distance()))
        .collect()
}

/// Every answer of the index, vertex by vertex and label set by label set.
pub fn all_answers(index: &LcIndex) -> Vec<Vec<Neighbour>> {
    let label_size = index.graph().label_size();
    index
        .graph()
        .vertices()
        .flat_map(|vertex| {
            LabelSet::subsets(label_size)
                .map(move |allowed| index.query(vertex, allowed).expect("vertex exists"))
        })
        .collect()
}

/// Compares two indexes over the same graph query by query, ignoring the
/// order of equidistant neighbours.
pub fn same_answers(left: &LcIndex, right: &LcIndex) -> Result<(), TestCaseError> {
    let (expected, found) = (all_answers(left), all_answers(right));
    prop_assert_eq!(expected.len(), found.len());
    for (position, (expected, found)) in expected.iter().zip(&found).enumerate() {
        prop_assert!(
            answers_agree(expected, found),
            "query {} differs: {:?} vs {:?}",
            position,
            expected,
            found
        );
    }
    Ok(())
}

/// Returns every `(owner, listed)` pair where `owner`'s profile still lists
/// a vertex that is not a point of interest.
pub fn withdrawn_candidates(index: &LcIndex) -> Vec<(VertexId, VertexId)> {
    index
        .graph()
        .vertices()
        .flat_map(|owner| {
            index
                .profile(owner)
                .into_iter()
                .flat_map(|profile| profile.entries().iter())
                .flat_map(|entry| entry.knn().iter())
                .filter(|neighbour| !index.is_poi(neighbour.vertex()))
                .map(move |neighbour| (owner, neighbour.vertex()))
        })
        .collect()
}

/// Fixtures paired with a neighbour count.
pub fn indexed_fixture() -> impl Strategy<Value = (GraphFixture, usize)> {
    (any::<u64>(), 2_usize..=30, 1_usize..=3, 0_usize..=30, 1_usize..=10, 1_usize..=4).prop_map(
        |(seed, vertex_count, label_size, extra_edges, poi_count, k)| {
            let fixture = random_graph(
                seed,
                RandomGraphSpec {
                    vertex_count,
                    label_size,
                    extra_edges,
                    poi_count,
                },
            );
            (fixture, k)
        },
    )
}
