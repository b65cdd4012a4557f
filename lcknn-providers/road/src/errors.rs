use std::io;

use lcknn_core::{IndexError, ParseLabelSetError};
use thiserror::Error;

/// Failures raised while reading road-network text formats.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RoadFormatError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("input is empty; expected a `<vertices> <edges>` header")]
    MissingHeader,
    #[error("line {line}: expected {expected} fields but found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: `{token}` is not a valid {what}")]
    InvalidToken {
        line: usize,
        token: String,
        what: &'static str,
    },
    #[error("line {line}: unknown update operation `{token}`; expected `i` or `d`")]
    UnknownOperation { line: usize, token: String },
    #[error("line {line}: {source}")]
    InvalidLabels {
        line: usize,
        #[source]
        source: ParseLabelSetError,
    },
    #[error("point-of-interest density {density} is outside [0, 1]")]
    InvalidDensity { density: f64 },
    #[error(transparent)]
    Index(#[from] IndexError),
}

impl RoadFormatError {
    /// Returns the 1-based input line the error refers to, if any.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::FieldCount { line, .. }
            | Self::InvalidToken { line, .. }
            | Self::UnknownOperation { line, .. }
            | Self::InvalidLabels { line, .. } => Some(*line),
            _ => None,
        }
    }
}
