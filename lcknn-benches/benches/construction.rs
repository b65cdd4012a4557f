//! Index construction benchmarks.
//!
//! Measures the two-pass build of a label-constrained index over grids of
//! increasing size and label universes of increasing width. The elimination
//! order is computed inside the measured region.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use lcknn_benches::{error::BenchSetupError, params::GridBenchParams, workload::GridWorkload};
use lcknn_core::LcIndexBuilder;

/// Seed used for all grid generation in this benchmark.
const SEED: u64 = 42;

/// Grid side lengths to benchmark.
const SIDES: &[usize] = &[16, 32, 48];

/// Label universe sizes to benchmark.
const LABEL_SIZES: &[usize] = &[2, 4];

fn index_build_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("index_build");
    group.sample_size(10);

    for &side in SIDES {
        for &label_size in LABEL_SIZES {
            let params = GridBenchParams {
                width: side,
                height: side,
                label_size,
                poi_count: side.saturating_mul(2),
                k: 4,
            };
            let workload = GridWorkload::generate(params, SEED)?;

            group.bench_with_input(
                BenchmarkId::from_parameter(params),
                &workload,
                |b, workload| {
                    b.iter(|| {
                        LcIndexBuilder::new()
                            .with_k(params.k)
                            .build(workload.graph().clone(), workload.pois().iter().copied())
                    });
                },
            );
        }
    }

    group.finish();
    Ok(())
}

fn index_build(c: &mut Criterion) {
    if let Err(err) = index_build_impl(c) {
        panic!("index_build benchmark setup failed: {err}");
    }
}

criterion_group!(benches, index_build);
criterion_main!(benches);
