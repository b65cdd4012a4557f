//! Whitespace-separated vertex lists: point-of-interest files and
//! elimination orders.

use std::{fs::File, io::BufRead, io::BufReader, path::Path};

use lcknn_core::{EliminationOrder, VertexId};

use crate::{errors::RoadFormatError, records::records};

fn read_vertices<R: BufRead>(reader: R) -> Result<Vec<VertexId>, RoadFormatError> {
    let mut vertices = Vec::new();
    for record in records(reader) {
        let record = record?;
        for token in record.fields() {
            vertices.push(record.parse(token, "vertex id")?);
        }
    }
    Ok(vertices)
}

/// Reads point-of-interest vertex ids in file order. Range and duplicate
/// checks are left to index construction.
///
/// # Errors
/// Returns [`RoadFormatError::InvalidToken`] for tokens that are not ids.
pub fn read_pois<R: BufRead>(reader: R) -> Result<Vec<VertexId>, RoadFormatError> {
    read_vertices(reader)
}

/// Opens `path` and reads it with [`read_pois`].
///
/// # Errors
/// Returns [`RoadFormatError::Io`] when the file cannot be read.
pub fn load_pois(path: &Path) -> Result<Vec<VertexId>, RoadFormatError> {
    read_pois(BufReader::new(File::open(path)?))
}

/// Reads an elimination order listing every vertex once, lowest rank first.
///
/// # Errors
/// Returns [`RoadFormatError::Index`] when the ids are not a permutation of
/// `1..=vertex_count`.
pub fn read_order<R: BufRead>(reader: R, vertex_count: usize) -> Result<EliminationOrder, RoadFormatError> {
    Ok(EliminationOrder::from_vertices(read_vertices(reader)?, vertex_count)?)
}

/// Opens `path` and reads it with [`read_order`].
///
/// # Errors
/// Returns [`RoadFormatError::Io`] when the file cannot be read, and the
/// errors of [`read_order`].
pub fn load_order(path: &Path, vertex_count: usize) -> Result<EliminationOrder, RoadFormatError> {
    read_order(BufReader::new(File::open(path)?), vertex_count)
}
