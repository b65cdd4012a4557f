use rstest::rstest;

use crate::{DEFAULT_POI_DENSITY, DEFAULT_POI_SEED, RoadFormatError, sample_pois};

#[test]
fn default_density_samples_one_vertex_in_two_hundred() {
    let pois = sample_pois(4000, DEFAULT_POI_DENSITY, DEFAULT_POI_SEED).expect("density is valid");
    assert_eq!(pois.len(), 20);
    assert!(pois.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(pois.iter().all(|&vertex| (1..=4000).contains(&vertex)));
}

#[test]
fn seeds_select_different_vertices() {
    let first = sample_pois(500, 0.1, 1).expect("density is valid");
    let second = sample_pois(500, 0.1, 2).expect("density is valid");
    assert_eq!(first.len(), second.len());
    assert_ne!(first, second);
}

#[test]
fn full_density_selects_every_vertex() {
    let pois = sample_pois(6, 1.0, DEFAULT_POI_SEED).expect("density is valid");
    assert_eq!(pois, vec![1, 2, 3, 4, 5, 6]);
}

#[rstest]
#[case(-0.1)]
#[case(1.5)]
#[case(f64::NAN)]
fn densities_outside_the_unit_interval_are_rejected(#[case] density: f64) {
    let err = sample_pois(10, density, DEFAULT_POI_SEED).expect_err("density is invalid");
    assert!(matches!(err, RoadFormatError::InvalidDensity { .. }));
}
