//! Benchmark support crate for lcknn.
//!
//! Provides grid workloads and parameter types used by the Criterion
//! benchmarks for index construction, querying, and update maintenance.

pub mod error;
pub mod params;
pub mod workload;
