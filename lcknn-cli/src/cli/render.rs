//! Plain-text rendering of command outcomes.

use std::io::{self, Write};

use lcknn_core::{IndexStats, Neighbour, VerificationReport};
use lcknn_providers_road::QueryRequest;

use super::commands::UpdateMode;

/// Answer to one query of the `query` command.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryAnswer {
    /// The query that was asked.
    pub request: QueryRequest,
    /// Nearest points of interest in ascending distance order.
    pub neighbours: Vec<Neighbour>,
}

/// Outcome of a CLI command.
#[derive(Clone, Debug, PartialEq)]
pub enum Report {
    /// An index was built and written.
    Built {
        /// Vertices in the indexed graph.
        vertices: usize,
        /// Undirected edges in the indexed graph.
        edges: usize,
        /// Number of compacted labels.
        label_size: usize,
        /// Points of interest indexed.
        pois: usize,
        /// Neighbours reported per query.
        k: usize,
    },
    /// Query answers in request order.
    Answers(Vec<QueryAnswer>),
    /// An update stream was applied and the index written.
    Updated {
        /// Maintenance strategy used.
        mode: UpdateMode,
        /// Operations in the stream.
        operations: usize,
        /// Profiles rewritten.
        affected: usize,
        /// Points of interest after the stream.
        pois: usize,
    },
    /// Every answer was compared with exhaustive search.
    Verified(VerificationReport),
    /// Shape and size of an index.
    Stats(IndexStats),
}

impl Report {
    /// Returns `false` when verification found disagreeing answers.
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            Self::Verified(report) => report.is_consistent(),
            _ => true,
        }
    }
}

/// Writes `report` to `writer`.
///
/// Query answers print one line per query, `<vertex> <labels>` then a tab
/// and the `<poi>@<distance>` pairs. Other reports print `key: value` lines.
///
/// # Errors
/// Returns any I/O error raised by `writer`.
pub fn render_report(report: &Report, mut writer: impl Write) -> io::Result<()> {
    match report {
        Report::Built {
            vertices,
            edges,
            label_size,
            pois,
            k,
        } => {
            writeln!(writer, "vertices: {vertices}")?;
            writeln!(writer, "edges: {edges}")?;
            writeln!(writer, "label_size: {label_size}")?;
            writeln!(writer, "pois: {pois}")?;
            writeln!(writer, "k: {k}")?;
        }
        Report::Answers(answers) => {
            for answer in answers {
                write!(
                    writer,
                    "{} {}\t",
                    answer.request.vertex, answer.request.labels
                )?;
                let pairs: Vec<String> = answer
                    .neighbours
                    .iter()
                    .map(|n| format!("{}@{}", n.vertex(), n.distance()))
                    .collect();
                writeln!(writer, "{}", pairs.join(" "))?;
            }
        }
        Report::Updated {
            mode,
            operations,
            affected,
            pois,
        } => {
            writeln!(writer, "mode: {}", mode.as_str())?;
            writeln!(writer, "operations: {operations}")?;
            writeln!(writer, "affected: {affected}")?;
            writeln!(writer, "pois: {pois}")?;
        }
        Report::Verified(verification) => {
            writeln!(writer, "checked: {}", verification.checked())?;
            writeln!(writer, "mismatches: {}", verification.mismatches().len())?;
            for mismatch in verification.mismatches().iter().take(10) {
                writeln!(
                    writer,
                    "mismatch: {} {} expected {} found {}",
                    mismatch.vertex,
                    mismatch.labels,
                    mismatch.expected.len(),
                    mismatch.found.len()
                )?;
            }
        }
        Report::Stats(stats) => {
            writeln!(writer, "roots: {}", stats.roots)?;
            writeln!(writer, "max_height: {}", stats.max_height)?;
            writeln!(writer, "mean_height: {:.2}", stats.mean_height)?;
            writeln!(writer, "max_width: {}", stats.max_width)?;
            writeln!(writer, "mean_width: {:.2}", stats.mean_width)?;
            writeln!(writer, "label_sets: {}", stats.label_sets)?;
            writeln!(writer, "max_label_sets: {}", stats.max_label_sets)?;
            writeln!(writer, "mean_label_sets: {:.2}", stats.mean_label_sets)?;
            writeln!(writer, "candidates: {}", stats.candidates)?;
            writeln!(writer, "estimated_bytes: {}", stats.estimated_bytes)?;
        }
    }
    Ok(())
}
