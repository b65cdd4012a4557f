//! Incremental maintenance of profiles as points of interest change.
//!
//! Insertion traces the paths from the new point of interest through the
//! elimination tree and grafts it into every profile it improves. Deletion
//! strips the removed vertex from every profile that lists it and reruns the
//! construction primitives on exactly those vertices.

mod delete;
mod insert;

use std::fmt;

use serde::{Deserialize, Serialize};

pub(crate) use self::{
    delete::{batch_delete, delete},
    insert::{batch_insert, insert},
};
use crate::graph::VertexId;

/// One record of an update stream.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(tag = "op", content = "vertex", rename_all = "snake_case")]
pub enum UpdateOp {
    /// Designate a vertex as a point of interest.
    Insert(VertexId),
    /// Withdraw a vertex's point-of-interest designation.
    Delete(VertexId),
}

impl UpdateOp {
    /// Returns the vertex the operation targets.
    #[must_use]
    pub const fn vertex(self) -> VertexId {
        match self {
            Self::Insert(vertex) | Self::Delete(vertex) => vertex,
        }
    }
}

impl fmt::Display for UpdateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert(vertex) => write!(f, "i {vertex}"),
            Self::Delete(vertex) => write!(f, "d {vertex}"),
        }
    }
}

/// What an applied update touched.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UpdateSummary {
    op: UpdateOp,
    affected: usize,
}

impl UpdateSummary {
    pub(crate) const fn new(op: UpdateOp, affected: usize) -> Self {
        Self { op, affected }
    }

    /// Returns the applied operation.
    #[must_use]
    pub const fn op(&self) -> UpdateOp {
        self.op
    }

    /// Returns the number of vertices whose profile was rewritten.
    #[must_use]
    pub const fn affected(&self) -> usize {
        self.affected
    }
}
