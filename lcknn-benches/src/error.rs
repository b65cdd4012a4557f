//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of using
//! `.expect()`.

use lcknn_core::IndexError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Graph validation or index construction failed.
    #[error("index operation failed: {0}")]
    Index(#[from] IndexError),
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// A description of the parameter that was unexpectedly zero.
        context: &'static str,
    },
}
