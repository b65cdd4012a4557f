//! Grid workloads shared by the benchmarks.
//!
//! A workload owns a generated four-neighbour grid with random weights and
//! single-label edges, and derives reproducible query mixes and update
//! streams from it.

use lcknn_core::{LabelSet, LabelledGraph, LcIndex, LcIndexBuilder, UpdateOp, VertexId};
use lcknn_test_support::graphs::{GraphFixture, grid};
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};

use crate::{error::BenchSetupError, params::GridBenchParams};

/// A generated grid and its initial points of interest.
#[derive(Clone, Debug)]
pub struct GridWorkload {
    params: GridBenchParams,
    fixture: GraphFixture,
    graph: LabelledGraph,
}

impl GridWorkload {
    /// Generates the grid described by `params`.
    ///
    /// # Errors
    /// Returns [`BenchSetupError::ZeroValue`] for an empty grid, label
    /// universe, or neighbour count, and [`BenchSetupError::Index`] when the
    /// generated edges do not form a valid graph.
    pub fn generate(params: GridBenchParams, seed: u64) -> Result<Self, BenchSetupError> {
        for (value, context) in [
            (params.width, "grid width"),
            (params.height, "grid height"),
            (params.label_size, "label size"),
            (params.k, "neighbour count"),
        ] {
            if value == 0 {
                return Err(BenchSetupError::ZeroValue { context });
            }
        }
        let fixture = grid(
            seed,
            params.width,
            params.height,
            params.label_size,
            params.poi_count,
        );
        let graph = LabelledGraph::from_edges(
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
        )?;
        Ok(Self {
            params,
            fixture,
            graph,
        })
    }

    /// Returns the generated graph.
    #[must_use]
    pub const fn graph(&self) -> &LabelledGraph {
        &self.graph
    }

    /// Returns the initial points of interest in ascending order.
    #[must_use]
    pub fn pois(&self) -> &[VertexId] {
        &self.fixture.pois
    }

    /// Builds the index of the grid with its initial points of interest.
    ///
    /// # Errors
    /// Returns [`BenchSetupError::Index`] when construction fails.
    pub fn build_index(&self) -> Result<LcIndex, BenchSetupError> {
        Ok(LcIndexBuilder::new()
            .with_k(self.params.k)
            .build(self.graph.clone(), self.fixture.pois.iter().copied())?)
    }

    /// Draws `count` queries with uniformly random sources and label sets.
    #[must_use]
    pub fn queries(&self, seed: u64, count: usize) -> Vec<(VertexId, LabelSet)> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let subsets: Vec<LabelSet> = LabelSet::subsets(self.graph.label_size()).collect();
        (0..count)
            .filter_map(|_| {
                let vertex = rng.gen_range(1..=self.graph.vertex_count());
                subsets.choose(&mut rng).map(|&labels| (vertex, labels))
            })
            .collect()
    }

    /// Picks up to `count` vertices that are not initial points of interest.
    #[must_use]
    pub fn outsiders(&self, seed: u64, count: usize) -> Vec<VertexId> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut outsiders = self.fixture.non_pois();
        outsiders.shuffle(&mut rng);
        outsiders.truncate(count);
        outsiders
    }

    /// Builds a valid stream that inserts each vertex of `outsiders` and
    /// then deletes them in reverse, leaving the initial set unchanged.
    #[must_use]
    pub fn round_trip_stream(outsiders: &[VertexId]) -> Vec<UpdateOp> {
        outsiders
            .iter()
            .copied()
            .map(UpdateOp::Insert)
            .chain(outsiders.iter().rev().copied().map(UpdateOp::Delete))
            .collect()
    }
}
