//! Benchmark parameter types.
//!
//! Groups the grid dimensions so benchmark ids and setup helpers share one
//! description of each run.

use std::fmt;

/// Shape of a grid benchmark run.
#[derive(Clone, Copy, Debug)]
pub struct GridBenchParams {
    /// Vertices per row.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Size of the label universe.
    pub label_size: usize,
    /// Points of interest sampled before construction.
    pub poi_count: usize,
    /// Neighbours kept per label set.
    pub k: usize,
}

impl GridBenchParams {
    /// Returns the number of grid vertices.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.width.saturating_mul(self.height)
    }
}

impl fmt::Display for GridBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{},L={},k={}",
            self.width, self.height, self.label_size, self.k
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_name_the_grid_shape() {
        let params = GridBenchParams {
            width: 8,
            height: 4,
            label_size: 3,
            poi_count: 5,
            k: 2,
        };
        assert_eq!(params.to_string(), "8x4,L=3,k=2");
        assert_eq!(params.vertex_count(), 32);
    }
}
