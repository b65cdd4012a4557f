//! Shared test utilities used across lcknn crates.
//!
//! The fixtures here deliberately avoid depending on `lcknn-core` so the core
//! crate can pull them in as a dev-dependency. Graphs are therefore handed
//! out as plain vertex ids, weights, and label bit masks.

pub mod graphs;
pub mod profile;
pub mod tracing;
