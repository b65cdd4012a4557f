//! Saving and restoring built indexes.
//!
//! A snapshot records the elimination order, the points of interest, and
//! every stored profile. Restoring recomputes the hierarchy from the order,
//! which is deterministic, and installs the profiles unchanged.

use std::{
    fmt,
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::{
    builder::{collect_pois, validate_k},
    error::{IndexError, define_error_codes},
    graph::{LabelledGraph, VertexId},
    hierarchy::{EliminationOrder, Hierarchy},
    index::LcIndex,
    profile::ProfiledIndex,
    state::IndexState,
};

/// Snapshot layout version written by this crate.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A serialisable image of an [`LcIndex`] without its graph.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct IndexSnapshot {
    version: u32,
    k: usize,
    label_size: usize,
    vertex_count: usize,
    order: Vec<VertexId>,
    pois: Vec<VertexId>,
    /// Profiles of vertices `1..=vertex_count` in id order.
    profiles: Vec<ProfiledIndex>,
}

impl IndexSnapshot {
    /// Returns the layout version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the neighbour count the index was built with.
    #[must_use]
    pub const fn k(&self) -> usize {
        self.k
    }

    /// Returns the number of graph vertices.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Returns the points of interest in ascending order.
    #[must_use]
    pub fn pois(&self) -> &[VertexId] {
        &self.pois
    }

    /// Writes the snapshot as JSON.
    ///
    /// # Errors
    /// Returns [`PersistError::Json`] when encoding or writing fails.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), PersistError> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    /// Reads a snapshot written by [`Self::write_json`].
    ///
    /// # Errors
    /// Returns [`PersistError::Json`] when the input is not a snapshot.
    pub fn read_json<R: Read>(reader: R) -> Result<Self, PersistError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Errors raised while saving or loading an index.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PersistError {
    /// The index file could not be opened or created.
    #[error("failed to access index file: {source}")]
    Io {
        /// Underlying operating system error.
        #[from]
        source: std::io::Error,
    },
    /// The index file was not a valid snapshot.
    #[error("failed to encode or decode index snapshot: {source}")]
    Json {
        /// Underlying serialisation error.
        #[from]
        source: serde_json::Error,
    },
    /// The snapshot did not fit the supplied graph.
    #[error(transparent)]
    Index {
        /// The validation failure.
        #[from]
        source: IndexError,
    },
}

define_error_codes! {
    /// Stable codes describing [`PersistError`] variants.
    enum PersistErrorCode for PersistError {
        /// The index file could not be accessed.
        Io => Io { .. } => "LCKNN_PERSIST_IO",
        /// The snapshot could not be encoded or decoded.
        Json => Json { .. } => "LCKNN_PERSIST_JSON",
        /// The snapshot was rejected by index validation.
        Index => Index { .. } => "LCKNN_PERSIST_INDEX",
    }
}

impl LcIndex {
    /// Captures the index state in a serialisable snapshot.
    #[must_use]
    pub fn snapshot(&self) -> IndexSnapshot {
        let state = self.state();
        IndexSnapshot {
            version: SNAPSHOT_VERSION,
            k: state.k,
            label_size: self.graph().label_size(),
            vertex_count: self.graph().vertex_count(),
            order: state.hierarchy.order().vertices().to_vec(),
            pois: state.pois.iter().collect(),
            profiles: state.profiles.iter().skip(1).cloned().collect(),
        }
    }

    /// Rebuilds an index of `graph` from `snapshot`.
    ///
    /// # Errors
    /// Returns [`IndexError::SnapshotMismatch`] when the version, vertex
    /// count, label size, or profile count disagree with the graph, the
    /// order and point-of-interest errors of [`crate::LcIndexBuilder::build`],
    /// and [`IndexError::MalformedProfile`] for profiles that are unsorted,
    /// hold empty or oversized lists, or name unknown vertices.
    #[instrument(
        name = "index.restore",
        err,
        skip(graph, snapshot),
        fields(vertices = snapshot.vertex_count, k = snapshot.k)
    )]
    pub fn restore(graph: LabelledGraph, snapshot: IndexSnapshot) -> Result<Self, IndexError> {
        expect_field("version", SNAPSHOT_VERSION as usize, snapshot.version as usize)?;
        expect_field("vertex_count", graph.vertex_count(), snapshot.vertex_count)?;
        expect_field("label_size", graph.label_size(), snapshot.label_size)?;
        expect_field("profiles", graph.vertex_count(), snapshot.profiles.len())?;
        validate_k(snapshot.k)?;
        let order = EliminationOrder::from_vertices(snapshot.order, graph.vertex_count())?;
        let pois = collect_pois(&graph, snapshot.pois)?;

        let mut profiles = Vec::with_capacity(snapshot.profiles.len() + 1);
        profiles.push(ProfiledIndex::new());
        for (vertex, profile) in graph.vertices().zip(snapshot.profiles) {
            let sound = profile.is_well_formed()
                && profile.entries().iter().all(|entry| {
                    entry.knn().len() <= snapshot.k
                        && entry
                            .knn()
                            .iter()
                            .all(|neighbour| graph.check_vertex(neighbour.vertex()).is_ok())
                });
            if !sound {
                return Err(IndexError::MalformedProfile { vertex });
            }
            profiles.push(profile);
        }

        let hierarchy = Hierarchy::build(&graph, Some(&order));
        let state = IndexState {
            hierarchy,
            profiles,
            pois,
            k: snapshot.k,
        };
        info!(pois = state.pois.len(), "index restored");
        Ok(Self::from_parts(graph, state))
    }

    /// Writes the index snapshot to `path` as JSON.
    ///
    /// # Errors
    /// Returns [`PersistError::Io`] when the file cannot be created and
    /// [`PersistError::Json`] when writing fails.
    pub fn save(&self, path: &Path) -> Result<(), PersistError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.snapshot().write_json(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Loads a snapshot written by [`Self::save`] and restores it against
    /// `graph`.
    ///
    /// # Errors
    /// Returns [`PersistError::Io`] or [`PersistError::Json`] when the file
    /// cannot be read, and [`PersistError::Index`] when restoration fails.
    pub fn load(graph: LabelledGraph, path: &Path) -> Result<Self, PersistError> {
        let snapshot = IndexSnapshot::read_json(BufReader::new(File::open(path)?))?;
        Ok(Self::restore(graph, snapshot)?)
    }
}

const fn expect_field(field: &'static str, expected: usize, found: usize) -> Result<(), IndexError> {
    if expected != found {
        return Err(IndexError::SnapshotMismatch {
            field,
            expected,
            found,
        });
    }
    Ok(())
}
