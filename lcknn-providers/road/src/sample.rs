//! Seeded point-of-interest sampling for networks shipped without a POI
//! file.

use lcknn_core::VertexId;
use rand::{SeedableRng, rngs::SmallRng, seq::index::sample};

use crate::errors::RoadFormatError;

/// Seed used when the caller does not choose one.
pub const DEFAULT_POI_SEED: u64 = 3307;
/// Fraction of vertices sampled when the caller does not choose one.
pub const DEFAULT_POI_DENSITY: f64 = 0.005;

/// Picks `floor(vertex_count * density)` distinct vertices, returned in
/// ascending order. The same seed always yields the same vertices.
///
/// # Errors
/// Returns [`RoadFormatError::InvalidDensity`] unless `density` lies in
/// `[0, 1]`.
///
/// # Examples
/// ```
/// use lcknn_providers_road::{DEFAULT_POI_SEED, sample_pois};
///
/// let pois = sample_pois(1000, 0.01, DEFAULT_POI_SEED).expect("density is valid");
/// assert_eq!(pois.len(), 10);
/// assert_eq!(pois, sample_pois(1000, 0.01, DEFAULT_POI_SEED).expect("density is valid"));
/// ```
pub fn sample_pois(vertex_count: usize, density: f64, seed: u64) -> Result<Vec<VertexId>, RoadFormatError> {
    if !(0.0..=1.0).contains(&density) {
        return Err(RoadFormatError::InvalidDensity { density });
    }
    let count = ((vertex_count as f64) * density).floor() as usize;
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut pois: Vec<VertexId> = sample(&mut rng, vertex_count, count.min(vertex_count))
        .into_iter()
        .map(|index| index + 1)
        .collect();
    pois.sort_unstable();
    Ok(pois)
}
