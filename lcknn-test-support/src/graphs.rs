//! Seeded labelled-graph fixtures.
//!
//! Weights are small integers stored as `f64`, so path lengths are exact and
//! equal distances compare equal regardless of summation order. Zero is a
//! valid weight, which produces tied detours. Each edge carries exactly one
//! label, given as a bit mask over `label_size` bits.

use rand::{Rng, SeedableRng, rngs::SmallRng, seq::index::sample};

/// Largest edge weight produced by the generators.
pub const MAX_WEIGHT: u32 = 9;

/// One undirected edge of a fixture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixtureEdge {
    /// First endpoint, 1-based.
    pub source: usize,
    /// Second endpoint, 1-based.
    pub target: usize,
    /// Non-negative integral weight.
    pub weight: f64,
    /// Label bit mask with a single bit set.
    pub labels: u32,
}

/// A generated graph together with a set of points of interest.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphFixture {
    /// Number of vertices; ids run from 1 to `vertex_count`.
    pub vertex_count: usize,
    /// Number of distinct labels.
    pub label_size: usize,
    /// Edge list.
    pub edges: Vec<FixtureEdge>,
    /// Points of interest in ascending order.
    pub pois: Vec<usize>,
}

impl GraphFixture {
    /// Returns the vertices that are not points of interest, ascending.
    #[must_use]
    pub fn non_pois(&self) -> Vec<usize> {
        (1..=self.vertex_count)
            .filter(|vertex| self.pois.binary_search(vertex).is_err())
            .collect()
    }
}

/// Parameters of [`random_graph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomGraphSpec {
    /// Number of vertices, at least one.
    pub vertex_count: usize,
    /// Number of labels, between 1 and 32.
    pub label_size: usize,
    /// Edges added on top of the spanning tree.
    pub extra_edges: usize,
    /// Points of interest to sample, capped at `vertex_count`.
    pub poi_count: usize,
}

/// Generates a connected graph: a random spanning tree plus `extra_edges`
/// random chords, which may duplicate tree edges.
///
/// # Examples
/// ```
/// use lcknn_test_support::graphs::{RandomGraphSpec, random_graph};
///
/// let spec = RandomGraphSpec { vertex_count: 12, label_size: 3, extra_edges: 6, poi_count: 4 };
/// let fixture = random_graph(7, spec);
/// assert_eq!(fixture, random_graph(7, spec));
/// assert_eq!(fixture.pois.len(), 4);
/// assert!(fixture.edges.len() >= 11);
/// ```
#[must_use]
pub fn random_graph(seed: u64, spec: RandomGraphSpec) -> GraphFixture {
    let mut rng = SmallRng::seed_from_u64(seed);
    let n = spec.vertex_count.max(1);
    let mut edges = Vec::with_capacity(n - 1 + spec.extra_edges);
    for vertex in 2..=n {
        let parent = rng.gen_range(1..vertex);
        edges.push(random_edge(&mut rng, parent, vertex, spec.label_size));
    }
    if n > 1 {
        while edges.len() < n - 1 + spec.extra_edges {
            let source = rng.gen_range(1..=n);
            let target = rng.gen_range(1..=n);
            if source != target {
                edges.push(random_edge(&mut rng, source, target, spec.label_size));
            }
        }
    }
    let pois = sample_vertices(&mut rng, n, spec.poi_count);
    GraphFixture {
        vertex_count: n,
        label_size: spec.label_size,
        edges,
        pois,
    }
}

/// Generates a `width` by `height` four-neighbour grid with random weights
/// and labels and `poi_count` sampled points of interest. Vertex `(x, y)`
/// has id `y * width + x + 1`.
#[must_use]
pub fn grid(seed: u64, width: usize, height: usize, label_size: usize, poi_count: usize) -> GraphFixture {
    let mut rng = SmallRng::seed_from_u64(seed);
    let id = |x: usize, y: usize| y * width + x + 1;
    let mut edges = Vec::with_capacity(2 * width * height);
    for y in 0..height {
        for x in 0..width {
            if x + 1 < width {
                edges.push(random_edge(&mut rng, id(x, y), id(x + 1, y), label_size));
            }
            if y + 1 < height {
                edges.push(random_edge(&mut rng, id(x, y), id(x, y + 1), label_size));
            }
        }
    }
    let vertex_count = width * height;
    let pois = sample_vertices(&mut rng, vertex_count, poi_count);
    GraphFixture {
        vertex_count,
        label_size,
        edges,
        pois,
    }
}

fn random_edge(rng: &mut SmallRng, source: usize, target: usize, label_size: usize) -> FixtureEdge {
    FixtureEdge {
        source,
        target,
        weight: f64::from(rng.gen_range(0..=MAX_WEIGHT)),
        labels: 1 << rng.gen_range(0..label_size.clamp(1, 32)),
    }
}

fn sample_vertices(rng: &mut SmallRng, vertex_count: usize, count: usize) -> Vec<usize> {
    let mut picked: Vec<usize> = sample(rng, vertex_count, count.min(vertex_count))
        .into_iter()
        .map(|index| index + 1)
        .collect();
    picked.sort_unstable();
    picked
}
