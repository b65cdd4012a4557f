//! Algebraic properties of incremental maintenance.

mod common;

use common::{build, indexed_fixture, same_answers, suite_proptest_config, withdrawn_candidates};
use lcknn_core::{LabelSet, LcIndex};
use lcknn_test_support::graphs::{GraphFixture, RandomGraphSpec, random_graph};
use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rstest::rstest;

/// Picks up to `count` non-POI vertices, spread across the id range.
fn pick_outsiders(fixture: &GraphFixture, offset: usize, count: usize) -> Vec<usize> {
    let outsiders = fixture.non_pois();
    if outsiders.is_empty() {
        return Vec::new();
    }
    let mut picked: Vec<usize> = (0..count)
        .map(|step| outsiders[(offset + step * 7) % outsiders.len()])
        .collect();
    picked.sort_unstable();
    picked.dedup();
    picked
}

fn rebuilt(index: &LcIndex) -> LcIndex {
    let mut fresh = index.clone();
    fresh.rebuild();
    fresh
}

/// A dense single-label graph with most vertices designated, so deleted
/// points of interest are often shadowed by their owners' own slot.
fn crowded(seed: u64) -> GraphFixture {
    random_graph(
        seed,
        RandomGraphSpec {
            vertex_count: 15,
            label_size: 1,
            extra_edges: 15,
            poi_count: 10,
        },
    )
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(13)]
#[case(29)]
#[case(101)]
fn toggling_never_leaves_withdrawn_pois_in_profiles(#[case] seed: u64) {
    let fixture = crowded(seed);
    let mut index = build(&fixture, 3);
    let mut rng = SmallRng::seed_from_u64(seed);
    for step in 0..40 {
        let vertex = rng.gen_range(1..=fixture.vertex_count);
        if index.is_poi(vertex) {
            index.delete_poi(vertex).expect("vertex is a point of interest");
        } else {
            index.insert_poi(vertex).expect("vertex is not a point of interest");
        }
        let stale = withdrawn_candidates(&index);
        assert!(stale.is_empty(), "step {step} on vertex {vertex}: {stale:?}");
        let report = index.verify();
        assert!(report.is_consistent(), "step {step}: {:?}", report.mismatches());
    }
}

#[rstest]
#[case(3)]
#[case(17)]
#[case(42)]
fn batch_deletion_clears_every_profile(#[case] seed: u64) {
    let fixture = crowded(seed);
    let mut index = build(&fixture, 3);
    let mut rng = SmallRng::seed_from_u64(seed);
    for _ in 0..6 {
        let vertex = rng.gen_range(1..=fixture.vertex_count);
        if !index.is_poi(vertex) {
            index.insert_poi(vertex).expect("vertex is not a point of interest");
        }
    }
    let doomed: Vec<usize> = index.pois().iter().step_by(2).collect();
    index.batch_delete(doomed.iter().copied()).expect("batch is valid");
    let stale = withdrawn_candidates(&index);
    assert!(stale.is_empty(), "{stale:?}");
    assert!(index.verify().is_consistent());
    let fresh = rebuilt(&index);
    for vertex in index.graph().vertices() {
        let allowed = LabelSet::universe(1);
        let found = index.query(vertex, allowed).expect("vertex exists");
        let expected = fresh.query(vertex, allowed).expect("vertex exists");
        assert!(lcknn_core::answers_agree(&expected, &found), "vertex {vertex}");
    }
}

proptest! {
    #![proptest_config(suite_proptest_config(64))]

    #[test]
    fn insertion_matches_a_rebuild((fixture, k) in indexed_fixture(), offset in 0_usize..64) {
        let mut index = build(&fixture, k);
        for vertex in pick_outsiders(&fixture, offset, 1) {
            index.insert_poi(vertex).expect("vertex is not a point of interest");
        }
        same_answers(&rebuilt(&index), &index)?;
    }

    #[test]
    fn deletion_matches_a_rebuild((fixture, k) in indexed_fixture(), offset in 0_usize..64) {
        let mut index = build(&fixture, k);
        let victim = fixture.pois[offset % fixture.pois.len()];
        index.delete_poi(victim).expect("vertex is a point of interest");
        same_answers(&rebuilt(&index), &index)?;
    }

    #[test]
    fn deletion_undoes_insertion((fixture, k) in indexed_fixture(), offset in 0_usize..64) {
        let original = build(&fixture, k);
        let mut index = original.clone();
        for vertex in pick_outsiders(&fixture, offset, 1) {
            index.insert_poi(vertex).expect("vertex is not a point of interest");
            index.delete_poi(vertex).expect("vertex was just inserted");
        }
        same_answers(&original, &index)?;
    }

    #[test]
    fn insertion_undoes_deletion((fixture, k) in indexed_fixture(), offset in 0_usize..64) {
        let original = build(&fixture, k);
        let mut index = original.clone();
        let victim = fixture.pois[offset % fixture.pois.len()];
        index.delete_poi(victim).expect("vertex is a point of interest");
        index.insert_poi(victim).expect("vertex was just deleted");
        same_answers(&original, &index)?;
    }

    #[test]
    fn batch_insert_matches_sequential_inserts(
        (fixture, k) in indexed_fixture(),
        offset in 0_usize..64,
        count in 1_usize..4,
    ) {
        let batch = pick_outsiders(&fixture, offset, count);
        let mut batched = build(&fixture, k);
        let mut sequential = batched.clone();
        batched.batch_insert(batch.iter().copied()).expect("batch is valid");
        for &vertex in &batch {
            sequential.insert_poi(vertex).expect("vertex is not a point of interest");
        }
        same_answers(&sequential, &batched)?;
    }

    #[test]
    fn batch_delete_matches_sequential_deletes(
        (fixture, k) in indexed_fixture(),
        take in 1_usize..4,
    ) {
        let batch: Vec<usize> = fixture.pois.iter().copied().take(take).collect();
        let mut batched = build(&fixture, k);
        let mut sequential = batched.clone();
        batched.batch_delete(batch.iter().copied()).expect("batch is valid");
        for &vertex in &batch {
            sequential.delete_poi(vertex).expect("vertex is a point of interest");
        }
        same_answers(&sequential, &batched)?;
    }

    #[test]
    fn deletions_leave_only_current_pois_listed(
        (fixture, k) in indexed_fixture(),
        seed in any::<u64>(),
    ) {
        let mut index = build(&fixture, k);
        let mut rng = SmallRng::seed_from_u64(seed);
        for _ in 0..12 {
            let vertex = rng.gen_range(1..=fixture.vertex_count);
            if index.is_poi(vertex) {
                index.delete_poi(vertex).expect("vertex is a point of interest");
            } else {
                index.insert_poi(vertex).expect("vertex is not a point of interest");
            }
            let stale = withdrawn_candidates(&index);
            prop_assert!(stale.is_empty(), "{:?}", stale);
        }
        same_answers(&rebuilt(&index), &index)?;
    }

    #[test]
    fn wider_label_sets_never_lengthen_answers((fixture, k) in indexed_fixture()) {
        let index = build(&fixture, k);
        let label_size = index.graph().label_size();
        for vertex in index.graph().vertices() {
            for narrow in LabelSet::subsets(label_size) {
                let narrow_answer = index.query(vertex, narrow).expect("vertex exists");
                for wide in LabelSet::subsets(label_size).filter(|wide| wide.includes(narrow)) {
                    let wide_answer = index.query(vertex, wide).expect("vertex exists");
                    prop_assert!(wide_answer.len() >= narrow_answer.len());
                    for (wider, narrower) in wide_answer.iter().zip(&narrow_answer) {
                        prop_assert!(wider.distance() <= narrower.distance() + 1e-9);
                    }
                }
            }
        }
    }
}
