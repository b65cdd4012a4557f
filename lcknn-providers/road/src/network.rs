//! The road-network edge list.
//!
//! ```text
//! 4 3
//! 1 2 1.5 A1
//! 2 3 2.0 B2
//! 3 4 0.5 17
//! ```
//!
//! The header gives the vertex and edge counts. Each edge line names two
//! endpoints, a weight, and a label that is either a road-class token or a
//! plain non-negative code.

use std::{fs::File, io::BufRead, io::BufReader, path::Path};

use lcknn_core::{LabelCompaction, LabelledGraph, RawEdge};
use tracing::{info, instrument, warn};

use crate::{
    errors::RoadFormatError,
    records::{Record, records},
};

/// A parsed network: the labelled graph and the mapping from raw label codes
/// to compacted labels.
#[derive(Clone, Debug)]
pub struct RoadNetwork {
    /// The canonicalised graph.
    pub graph: LabelledGraph,
    /// How raw label codes were folded into the label universe.
    pub compaction: LabelCompaction,
}

/// Maps a road-class token such as `B3` to its raw label code.
///
/// The letter selects a group of eight classes and the digit the class
/// within the group, so `A1` is code 0 and `B3` is code 10.
///
/// # Examples
/// ```
/// use lcknn_providers_road::road_class_code;
///
/// assert_eq!(road_class_code("A1"), Some(0));
/// assert_eq!(road_class_code("B3"), Some(10));
/// assert_eq!(road_class_code("b3"), None);
/// ```
#[must_use]
pub fn road_class_code(token: &str) -> Option<u32> {
    let &[letter, digit] = token.as_bytes() else {
        return None;
    };
    if !letter.is_ascii_uppercase() || !(b'1'..=b'8').contains(&digit) {
        return None;
    }
    Some(u32::from(letter - b'A') * 8 + u32::from(digit - b'1'))
}

/// Reads a label field: a road-class token or a plain integer code.
#[must_use]
pub fn parse_label_code(token: &str) -> Option<u32> {
    road_class_code(token).or_else(|| token.parse().ok())
}

/// Reads a network and compacts its labels into at most `label_size` bits.
///
/// # Errors
/// Returns [`RoadFormatError::MissingHeader`] for empty input, line-tagged
/// errors for malformed lines, and [`RoadFormatError::Index`] when the
/// edges do not form a valid graph.
#[instrument(name = "road.read_network", skip(reader), err)]
pub fn read_network<R: BufRead>(reader: R, label_size: usize) -> Result<RoadNetwork, RoadFormatError> {
    let mut lines = records(reader);
    let header = lines.next().ok_or(RoadFormatError::MissingHeader)??;
    let [vertices, declared] = header.exact::<2>()?;
    let vertex_count: usize = header.parse(vertices, "vertex count")?;
    let declared: usize = header.parse(declared, "edge count")?;

    let mut edges = Vec::with_capacity(declared);
    for record in lines {
        edges.push(parse_edge(&record?)?);
    }
    if edges.len() != declared {
        warn!(declared, found = edges.len(), "edge count differs from header");
    }

    let (graph, compaction) = LabelledGraph::from_raw_edges(vertex_count, &edges, label_size)?;
    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        label_size = graph.label_size(),
        "road network loaded"
    );
    Ok(RoadNetwork { graph, compaction })
}

/// Opens `path` and reads it with [`read_network`].
///
/// # Errors
/// Returns [`RoadFormatError::Io`] when the file cannot be opened, and the
/// errors of [`read_network`].
pub fn load_network(path: &Path, label_size: usize) -> Result<RoadNetwork, RoadFormatError> {
    read_network(BufReader::new(File::open(path)?), label_size)
}

fn parse_edge(record: &Record) -> Result<RawEdge, RoadFormatError> {
    let [source, target, weight, label] = record.exact::<4>()?;
    let code = parse_label_code(label).ok_or_else(|| RoadFormatError::InvalidToken {
        line: record.line,
        token: label.to_owned(),
        what: "edge label",
    })?;
    Ok(RawEdge::new(
        record.parse(source, "vertex id")?,
        record.parse(target, "vertex id")?,
        record.parse(weight, "edge weight")?,
        code,
    ))
}
