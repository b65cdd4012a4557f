//! Error types for the lcknn core library.
//!
//! Defines the error enum exposed by index construction, queries, and updates,
//! together with stable machine-readable codes and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::{graph::VertexId, label::LabelSet};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

pub(crate) use define_error_codes;

/// Error type produced when building, querying, or updating an
/// [`crate::LcIndex`].
///
/// Every operation validates its inputs before touching index state, so an
/// error always leaves the index exactly as it was.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum IndexError {
    /// The neighbour count `k` must be at least one.
    #[error("k must be at least 1 (got {got})")]
    InvalidK {
        /// The invalid neighbour count supplied by the caller.
        got: usize,
    },
    /// The label universe must hold between one and 32 labels.
    #[error("label size must be between 1 and {max} (got {got})")]
    InvalidLabelSize {
        /// The requested label universe size.
        got: usize,
        /// Largest supported label universe.
        max: usize,
    },
    /// The graph contained no vertices.
    #[error("graph contains no vertices")]
    EmptyGraph,
    /// A vertex identifier fell outside `1..=vertex_count`.
    #[error("vertex {vertex} is out of range (graph has {vertex_count} vertices)")]
    VertexOutOfRange {
        /// The offending vertex identifier.
        vertex: VertexId,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },
    /// An edge weight was negative, infinite, or NaN.
    #[error("edge ({from}, {to}) has a negative or non-finite weight")]
    InvalidWeight {
        /// First endpoint of the edge.
        from: VertexId,
        /// Second endpoint of the edge.
        to: VertexId,
    },
    /// An edge label was empty or used labels outside the universe.
    #[error("edge ({from}, {to}) has label `{labels}` outside a universe of {label_size}")]
    InvalidEdgeLabel {
        /// First endpoint of the edge.
        from: VertexId,
        /// Second endpoint of the edge.
        to: VertexId,
        /// The rejected label set.
        labels: LabelSet,
        /// Size of the label universe.
        label_size: usize,
    },
    /// A supplied elimination order did not list every vertex exactly once.
    #[error("elimination order has {got} vertices but the graph has {expected}")]
    OrderLengthMismatch {
        /// Number of vertices listed in the order.
        got: usize,
        /// Number of vertices in the graph.
        expected: usize,
    },
    /// A supplied elimination order repeated a vertex.
    #[error("elimination order lists vertex {vertex} more than once")]
    OrderRepeatsVertex {
        /// The repeated vertex.
        vertex: VertexId,
    },
    /// Insertion targeted a vertex that is already a point of interest.
    #[error("vertex {vertex} is already a point of interest")]
    AlreadyPoi {
        /// The vertex passed to the insertion.
        vertex: VertexId,
    },
    /// Deletion targeted a vertex that is not a point of interest.
    #[error("vertex {vertex} is not a point of interest")]
    NotPoi {
        /// The vertex passed to the deletion.
        vertex: VertexId,
    },
    /// A batch update listed the same vertex twice.
    #[error("vertex {vertex} appears more than once in the batch")]
    DuplicateBatchVertex {
        /// The repeated vertex.
        vertex: VertexId,
    },
    /// A snapshot does not describe the graph it is restored against.
    #[error("snapshot {field} is {found} but the index expects {expected}")]
    SnapshotMismatch {
        /// Name of the mismatching snapshot field.
        field: &'static str,
        /// Value required by the graph or build configuration.
        expected: usize,
        /// Value recorded in the snapshot.
        found: usize,
    },
    /// A snapshot profile was unsorted, held an empty or oversized list, or
    /// named a vertex outside the graph.
    #[error("snapshot profile of vertex {vertex} is malformed")]
    MalformedProfile {
        /// Owner of the rejected profile.
        vertex: VertexId,
    },
}

define_error_codes! {
    /// Stable codes describing [`IndexError`] variants.
    enum IndexErrorCode for IndexError {
        /// The neighbour count `k` must be at least one.
        InvalidK => InvalidK { .. } => "LCKNN_INVALID_K",
        /// The label universe size was out of range.
        InvalidLabelSize => InvalidLabelSize { .. } => "LCKNN_INVALID_LABEL_SIZE",
        /// The graph contained no vertices.
        EmptyGraph => EmptyGraph => "LCKNN_EMPTY_GRAPH",
        /// A vertex identifier was out of range.
        VertexOutOfRange => VertexOutOfRange { .. } => "LCKNN_VERTEX_OUT_OF_RANGE",
        /// An edge weight was negative or non-finite.
        InvalidWeight => InvalidWeight { .. } => "LCKNN_INVALID_WEIGHT",
        /// An edge label was empty or outside the universe.
        InvalidEdgeLabel => InvalidEdgeLabel { .. } => "LCKNN_INVALID_EDGE_LABEL",
        /// A supplied elimination order had the wrong length.
        OrderLengthMismatch => OrderLengthMismatch { .. } => "LCKNN_ORDER_LENGTH_MISMATCH",
        /// A supplied elimination order repeated a vertex.
        OrderRepeatsVertex => OrderRepeatsVertex { .. } => "LCKNN_ORDER_REPEATS_VERTEX",
        /// Insertion targeted an existing point of interest.
        AlreadyPoi => AlreadyPoi { .. } => "LCKNN_ALREADY_POI",
        /// Deletion targeted a vertex that is not a point of interest.
        NotPoi => NotPoi { .. } => "LCKNN_NOT_POI",
        /// A batch update repeated a vertex.
        DuplicateBatchVertex => DuplicateBatchVertex { .. } => "LCKNN_DUPLICATE_BATCH_VERTEX",
        /// A snapshot did not match the graph.
        SnapshotMismatch => SnapshotMismatch { .. } => "LCKNN_SNAPSHOT_MISMATCH",
        /// A snapshot profile violated the profile invariants.
        MalformedProfile => MalformedProfile { .. } => "LCKNN_MALFORMED_PROFILE",
    }
}

/// Convenient result alias for index operations.
pub type Result<T> = core::result::Result<T, IndexError>;
