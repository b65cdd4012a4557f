//! Update streams and query workloads.

use std::{
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
};

use lcknn_core::{LabelSet, UpdateOp, VertexId};

use crate::{
    errors::RoadFormatError,
    records::{Record, records},
};

/// One line of a query workload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueryRequest {
    /// Source vertex.
    pub vertex: VertexId,
    /// Labels the answer may use.
    pub labels: LabelSet,
}

/// Reads an update stream of `i <vertex>` and `d <vertex>` lines.
///
/// # Errors
/// Returns [`RoadFormatError::UnknownOperation`] for operations other than
/// `i` and `d`, and [`RoadFormatError::InvalidToken`] for bad vertex ids.
///
/// # Examples
/// ```
/// use lcknn_core::UpdateOp;
/// use lcknn_providers_road::read_updates;
///
/// let ops = read_updates("i 4\n# comment\nd 2\n".as_bytes()).expect("valid stream");
/// assert_eq!(ops, vec![UpdateOp::Insert(4), UpdateOp::Delete(2)]);
/// ```
pub fn read_updates<R: BufRead>(reader: R) -> Result<Vec<UpdateOp>, RoadFormatError> {
    records(reader)
        .map(|record| parse_update(&record?))
        .collect()
}

/// Opens `path` and reads it with [`read_updates`].
///
/// # Errors
/// Returns [`RoadFormatError::Io`] when the file cannot be read, and the
/// errors of [`read_updates`].
pub fn load_updates(path: &Path) -> Result<Vec<UpdateOp>, RoadFormatError> {
    read_updates(BufReader::new(File::open(path)?))
}

/// Writes `ops` in the format read by [`read_updates`].
///
/// # Errors
/// Returns [`RoadFormatError::Io`] when writing fails.
pub fn write_updates<W: Write>(mut writer: W, ops: &[UpdateOp]) -> Result<(), RoadFormatError> {
    for op in ops {
        writeln!(writer, "{op}")?;
    }
    Ok(())
}

/// Reads a query workload of `<vertex> <labels>` lines, where labels are
/// written as letters (`a` for the first label) or `-` for none.
///
/// # Errors
/// Returns [`RoadFormatError::InvalidLabels`] for unreadable label sets and
/// [`RoadFormatError::InvalidToken`] for bad vertex ids.
pub fn read_queries<R: BufRead>(reader: R) -> Result<Vec<QueryRequest>, RoadFormatError> {
    records(reader)
        .map(|record| parse_query(&record?))
        .collect()
}

/// Opens `path` and reads it with [`read_queries`].
///
/// # Errors
/// Returns [`RoadFormatError::Io`] when the file cannot be read, and the
/// errors of [`read_queries`].
pub fn load_queries(path: &Path) -> Result<Vec<QueryRequest>, RoadFormatError> {
    read_queries(BufReader::new(File::open(path)?))
}

fn parse_update(record: &Record) -> Result<UpdateOp, RoadFormatError> {
    let [op, vertex] = record.exact::<2>()?;
    let vertex = record.parse(vertex, "vertex id")?;
    match op {
        "i" => Ok(UpdateOp::Insert(vertex)),
        "d" => Ok(UpdateOp::Delete(vertex)),
        other => Err(RoadFormatError::UnknownOperation {
            line: record.line,
            token: other.to_owned(),
        }),
    }
}

fn parse_query(record: &Record) -> Result<QueryRequest, RoadFormatError> {
    let [vertex, labels] = record.exact::<2>()?;
    Ok(QueryRequest {
        vertex: record.parse(vertex, "vertex id")?,
        labels: labels
            .parse()
            .map_err(|source| RoadFormatError::InvalidLabels {
                line: record.line,
                source,
            })?,
    })
}
