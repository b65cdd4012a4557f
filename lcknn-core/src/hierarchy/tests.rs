//! Unit tests for elimination, tree derivation, and shortcut refinement.

use lcknn_test_support::graphs::GraphFixture;
use proptest::prelude::*;
use rstest::{fixture, rstest};

use super::{EliminationOrder, Hierarchy};
use crate::{
    graph::{LabelledGraph, VertexId},
    label::LabelSet,
    summary::{PathEntry, PathSummary},
    test_utils::{fixture_strategy, labelled, suite_proptest_config},
};

fn labels(text: &str) -> LabelSet {
    text.parse().expect("label text must parse")
}

fn graph(vertex_count: usize, edges: &[(VertexId, VertexId, f64, &str)]) -> LabelledGraph {
    LabelledGraph::from_edges(
        vertex_count,
        2,
        edges
            .iter()
            .map(|&(source, target, weight, text)| (source, target, weight, labels(text))),
    )
    .expect("test graph must be valid")
}

#[fixture]
fn path() -> LabelledGraph {
    graph(
        5,
        &[
            (1, 2, 1.0, "a"),
            (2, 3, 1.0, "a"),
            (3, 4, 1.0, "a"),
            (4, 5, 1.0, "a"),
        ],
    )
}

#[fixture]
fn triangle() -> LabelledGraph {
    graph(3, &[(1, 2, 1.0, "a"), (2, 3, 1.0, "a"), (1, 3, 5.0, "a")])
}

#[rstest]
fn min_degree_peels_a_path_from_its_ends(path: LabelledGraph) {
    let hierarchy = Hierarchy::build(&path, None);
    assert_eq!(hierarchy.order().vertices(), &[5, 4, 3, 2, 1]);
    assert_eq!(hierarchy.tree().parent(5), Some(4));
    assert_eq!(hierarchy.tree().parent(1), None);
    assert_eq!(hierarchy.tree().ancestors(5), vec![5, 4, 3, 2, 1]);
    assert_eq!(hierarchy.tree().descendants(3), &[4]);
    assert_eq!(hierarchy.tree().depths()[5], 5);
}

#[rstest]
fn elimination_records_shortcuts_between_remaining_neighbours(triangle: LabelledGraph) {
    let hierarchy = Hierarchy::build(&triangle, None);
    assert_eq!(hierarchy.order().vertices(), &[3, 2, 1]);
    // The two-hop path through 3 costs 6 and is dominated by the direct edge.
    assert_eq!(
        hierarchy.shortcuts().get(1, 2),
        &PathSummary::edge(1.0, labels("a"))
    );
}

#[rstest]
fn refinement_drops_shortcuts_matched_by_a_detour(triangle: LabelledGraph) {
    let hierarchy = Hierarchy::build(&triangle, None);
    assert!(hierarchy.shortcuts().get(3, 1).is_empty());
    assert_eq!(hierarchy.tree().bag(3), &[2]);
    // Parents still come from the bag as it was at elimination time.
    assert_eq!(hierarchy.tree().parent(3), Some(2));
    assert_eq!(hierarchy.tree().descendants(1), &[2]);
}

#[test]
fn refinement_keeps_entries_with_fewer_labels() {
    // 3-1 is long but uses only `a`; the detour through 2 needs `b`.
    let graph = graph(3, &[(1, 2, 1.0, "b"), (2, 3, 1.0, "a"), (1, 3, 5.0, "a")]);
    let hierarchy = Hierarchy::build(&graph, None);
    let vertex = hierarchy.order().vertex_at(1).expect("rank 1 exists");
    assert_eq!(vertex, 3);
    assert_eq!(
        hierarchy.shortcuts().get(3, 1).entries(),
        &[PathEntry::new(5.0, labels("a"))]
    );
    assert_eq!(hierarchy.tree().bag(3), &[1, 2]);
}

#[test]
fn zero_weight_links_keep_one_of_two_tied_shortcuts() {
    // 3 reaches 1 and 2 at cost 1 and they are joined at cost 0, so each
    // shortcut out of 3 ties with the detour through the other.
    let graph = graph(3, &[(3, 1, 1.0, "a"), (3, 2, 1.0, "a"), (2, 1, 0.0, "a")]);
    let order = EliminationOrder::from_vertices(vec![3, 1, 2], 3).expect("a permutation");
    let hierarchy = Hierarchy::build(&graph, Some(&order));
    let bag = hierarchy.tree().bag(3);
    assert_eq!(bag.len(), 1);
    assert_eq!(
        hierarchy.shortcuts().get(3, bag[0]).entries(),
        &[PathEntry::new(1.0, labels("a"))]
    );
    assert_eq!(
        hierarchy.shortcuts().get(1, 2).entries(),
        &[PathEntry::new(0.0, labels("a"))]
    );
}

#[rstest]
fn supplied_order_reproduces_the_heuristic_hierarchy(path: LabelledGraph) {
    let computed = Hierarchy::build(&path, None);
    let supplied = EliminationOrder::from_vertices(computed.order().vertices().to_vec(), 5)
        .expect("order must be a permutation");
    let replayed = Hierarchy::build(&path, Some(&supplied));
    assert_eq!(replayed.order(), computed.order());
    for vertex in path.vertices() {
        assert_eq!(replayed.tree().bag(vertex), computed.tree().bag(vertex));
        assert_eq!(replayed.tree().parent(vertex), computed.tree().parent(vertex));
        for &member in computed.tree().bag(vertex) {
            assert_eq!(
                replayed.shortcuts().get(vertex, member),
                computed.shortcuts().get(vertex, member)
            );
        }
    }
}

#[test]
fn parallel_edges_fold_into_one_summary() {
    let graph = graph(2, &[(1, 2, 3.0, "a"), (1, 2, 1.0, "b"), (1, 2, 4.0, "a")]);
    let hierarchy = Hierarchy::build(&graph, None);
    let lower = hierarchy.order().vertex_at(1).expect("rank 1 exists");
    let upper = hierarchy.order().vertex_at(2).expect("rank 2 exists");
    assert_eq!(
        hierarchy.shortcuts().get(lower, upper).entries(),
        &[
            PathEntry::new(1.0, labels("b")),
            PathEntry::new(3.0, labels("a"))
        ]
    );
}

#[rstest]
#[case(vec![1, 2], 3)]
#[case(vec![1, 2, 2], 3)]
#[case(vec![1, 2, 4], 3)]
fn rejects_malformed_orders(#[case] vertices: Vec<VertexId>, #[case] vertex_count: usize) {
    assert!(EliminationOrder::from_vertices(vertices, vertex_count).is_err());
}

fn check_tree_shape(fixture: &GraphFixture) -> Result<(), TestCaseError> {
    let graph = labelled(fixture);
    let hierarchy = Hierarchy::build(&graph, None);
    let (order, tree) = (hierarchy.order(), hierarchy.tree());
    prop_assert_eq!(order.len(), graph.vertex_count());
    // Generated graphs are connected, so the tree has a single root.
    prop_assert_eq!(tree.roots().count(), 1);
    for vertex in graph.vertices() {
        let rank = order.rank(vertex);
        if let Some(parent) = tree.parent(vertex) {
            prop_assert!(order.rank(parent) > rank);
        }
        for &member in tree.bag(vertex) {
            prop_assert!(order.rank(member) > rank);
            prop_assert!(!hierarchy.shortcuts().get(vertex, member).is_empty());
            prop_assert!(tree.descendants(member).contains(&vertex));
        }
        let chain = tree.ancestors(vertex);
        let top = chain.last().copied();
        prop_assert!(top.is_some_and(|root| tree.parent(root).is_none()));
    }
    Ok(())
}

proptest! {
    #![proptest_config(suite_proptest_config(64))]

    #[test]
    fn elimination_trees_respect_rank(fixture in fixture_strategy()) {
        check_tree_shape(&fixture)?;
    }
}
