//! Command implementations and argument parsing for the lcknn CLI.

use std::path::{Path, PathBuf};

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use lcknn_core::{
    DEFAULT_K, IndexError, LabelSet, LabelledGraph, LcIndex, LcIndexBuilder, PersistError,
    UpdateOp, VertexId,
};
use lcknn_providers_road::{
    DEFAULT_POI_DENSITY, DEFAULT_POI_SEED, QueryRequest, RoadFormatError, load_network,
    load_order, load_pois, load_queries, load_updates, sample_pois,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::render::{QueryAnswer, Report};

const DEFAULT_LABEL_SIZE: usize = 8;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "lcknn",
    about = "Build and query label-constrained k-nearest-neighbour indexes."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Build an index and write it to disk.
    Build(BuildCommand),
    /// Answer queries against a stored index.
    Query(QueryCommand),
    /// Apply an update stream to a stored index.
    Update(UpdateCommand),
    /// Compare every answer of a stored index against exhaustive search.
    Verify(IndexArgs),
    /// Report the shape and size of a stored index.
    Stats(IndexArgs),
}

/// Road network input shared by every command.
#[derive(Debug, Args, Clone)]
pub struct GraphArgs {
    /// Path to the road-network edge list.
    #[arg(long)]
    pub graph: PathBuf,

    /// Number of labels the raw edge labels are compacted into.
    #[arg(long = "label-size", default_value_t = DEFAULT_LABEL_SIZE)]
    pub label_size: usize,
}

/// A road network together with a stored index of it.
#[derive(Debug, Args, Clone)]
pub struct IndexArgs {
    /// Road network the index was built from.
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Path to the stored index.
    #[arg(long)]
    pub index: PathBuf,
}

/// Options accepted by the `build` command.
#[derive(Debug, Args, Clone)]
pub struct BuildCommand {
    /// Road network to index.
    #[command(flatten)]
    pub graph: GraphArgs,

    /// Number of neighbours each query reports.
    #[arg(long, default_value_t = DEFAULT_K)]
    pub k: usize,

    /// File of point-of-interest vertex ids; sampled when omitted.
    #[arg(long, conflicts_with_all = ["poi_density", "seed"])]
    pub pois: Option<PathBuf>,

    /// Fraction of vertices sampled as points of interest.
    #[arg(long = "poi-density", default_value_t = DEFAULT_POI_DENSITY)]
    pub poi_density: f64,

    /// Seed for point-of-interest sampling.
    #[arg(long, default_value_t = DEFAULT_POI_SEED)]
    pub seed: u64,

    /// File listing the elimination order; computed when omitted.
    #[arg(long)]
    pub order: Option<PathBuf>,

    /// Destination of the built index.
    #[arg(long)]
    pub out: PathBuf,
}

/// Options accepted by the `query` command.
#[derive(Debug, Args, Clone)]
#[command(group(ArgGroup::new("source").required(true).args(["vertex", "workload"])))]
pub struct QueryCommand {
    /// Stored index to query.
    #[command(flatten)]
    pub index: IndexArgs,

    /// Source vertex of a single query.
    #[arg(long, requires = "labels")]
    pub vertex: Option<VertexId>,

    /// Allowed labels of a single query, as letters or `-` for none.
    #[arg(long)]
    pub labels: Option<LabelSet>,

    /// File of `<vertex> <labels>` queries.
    #[arg(long, conflicts_with = "labels")]
    pub workload: Option<PathBuf>,
}

/// How an update stream is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UpdateMode {
    /// Apply operations one at a time.
    Incremental,
    /// Apply each run of consecutive inserts or deletes as one batch.
    Batch,
    /// Replay the stream on the point-of-interest set and rebuild once.
    Rebuild,
}

impl UpdateMode {
    pub(super) const fn as_str(self) -> &'static str {
        match self {
            Self::Incremental => "incremental",
            Self::Batch => "batch",
            Self::Rebuild => "rebuild",
        }
    }
}

/// Options accepted by the `update` command.
#[derive(Debug, Args, Clone)]
pub struct UpdateCommand {
    /// Stored index to update.
    #[command(flatten)]
    pub index: IndexArgs,

    /// File of `i <vertex>` and `d <vertex>` lines.
    #[arg(long)]
    pub stream: PathBuf,

    /// Maintenance strategy.
    #[arg(long, value_enum, default_value_t = UpdateMode::Incremental)]
    pub mode: UpdateMode,

    /// Destination of the updated index; defaults to overwriting `--index`.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input file could not be parsed.
    #[error("failed to read `{path}`: {source}")]
    Input {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying format error.
        #[source]
        source: RoadFormatError,
    },
    /// A stored index could not be saved or loaded.
    #[error("failed to access index `{path}`: {source}")]
    Persist {
        /// Index file involved.
        path: PathBuf,
        /// Underlying persistence error.
        #[source]
        source: PersistError,
    },
    /// The index rejected an operation.
    #[error(transparent)]
    Core(#[from] IndexError),
}

impl CliError {
    /// Returns the stable code of the underlying library error, if any.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Core(err) => Some(err.code().as_str()),
            Self::Persist {
                source: PersistError::Index { source },
                ..
            } => Some(source.code().as_str()),
            Self::Persist { source, .. } => Some(source.code().as_str()),
            Self::Input {
                source: RoadFormatError::Index(err),
                ..
            } => Some(err.code().as_str()),
            Self::Input { .. } => None,
        }
    }
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when an input cannot be read or the index rejects
/// an operation.
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<Report, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Build(command) => {
            span.record("command", "build");
            run_build(command)
        }
        Command::Query(command) => {
            span.record("command", "query");
            run_query(command)
        }
        Command::Update(command) => {
            span.record("command", "update");
            run_update(command)
        }
        Command::Verify(args) => {
            span.record("command", "verify");
            Ok(Report::Verified(open_index(&args)?.verify()))
        }
        Command::Stats(args) => {
            span.record("command", "stats");
            Ok(Report::Stats(open_index(&args)?.stats()))
        }
    }
}

#[instrument(
    name = "cli.build",
    err,
    skip(command),
    fields(k = command.k, pois = field::Empty)
)]
pub(super) fn run_build(command: BuildCommand) -> Result<Report, CliError> {
    let graph = read_graph(&command.graph)?;
    let pois = match &command.pois {
        Some(path) => load_pois(path).map_err(input_error(path))?,
        None => sample_pois(graph.vertex_count(), command.poi_density, command.seed)
            .map_err(input_error(&command.graph.graph))?,
    };
    Span::current().record("pois", pois.len());
    let mut builder = LcIndexBuilder::new().with_k(command.k);
    if let Some(path) = &command.order {
        builder = builder.with_order(
            load_order(path, graph.vertex_count()).map_err(input_error(path))?,
        );
    }
    let index = builder.build(graph, pois)?;
    save_index(&index, &command.out)?;
    info!(path = %command.out.display(), "index written");
    Ok(Report::Built {
        vertices: index.graph().vertex_count(),
        edges: index.graph().edge_count(),
        label_size: index.graph().label_size(),
        pois: index.pois().len(),
        k: index.k(),
    })
}

#[instrument(name = "cli.query", err, skip(command), fields(queries = field::Empty))]
pub(super) fn run_query(command: QueryCommand) -> Result<Report, CliError> {
    let index = open_index(&command.index)?;
    let requests = match (&command.workload, command.vertex, command.labels) {
        (Some(path), _, _) => load_queries(path).map_err(input_error(path))?,
        (None, Some(vertex), Some(labels)) => vec![QueryRequest { vertex, labels }],
        _ => Vec::new(),
    };
    Span::current().record("queries", requests.len());
    let answers = requests
        .into_iter()
        .map(|request| {
            Ok(QueryAnswer {
                neighbours: index.query(request.vertex, request.labels)?,
                request,
            })
        })
        .collect::<Result<Vec<_>, CliError>>()?;
    Ok(Report::Answers(answers))
}

#[instrument(
    name = "cli.update",
    err,
    skip(command),
    fields(mode = command.mode.as_str(), operations = field::Empty)
)]
pub(super) fn run_update(command: UpdateCommand) -> Result<Report, CliError> {
    let mut index = open_index(&command.index)?;
    let ops = load_updates(&command.stream).map_err(input_error(&command.stream))?;
    Span::current().record("operations", ops.len());
    let affected = match command.mode {
        UpdateMode::Incremental => index
            .apply_stream(ops.iter().copied())?
            .iter()
            .map(|summary| summary.affected())
            .sum(),
        UpdateMode::Batch => apply_in_batches(&mut index, &ops)?,
        UpdateMode::Rebuild => {
            index = rebuild_with(&index, &ops)?;
            index.graph().vertex_count()
        }
    };
    let out = command.out.as_ref().unwrap_or(&command.index.index);
    save_index(&index, out)?;
    info!(path = %out.display(), affected, "updated index written");
    Ok(Report::Updated {
        mode: command.mode,
        operations: ops.len(),
        affected,
        pois: index.pois().len(),
    })
}

/// Applies each maximal run of same-kind operations with one batch call.
fn apply_in_batches(index: &mut LcIndex, ops: &[UpdateOp]) -> Result<usize, CliError> {
    let mut affected = 0;
    for run in ops.chunk_by(|left, right| {
        matches!(left, UpdateOp::Insert(_)) == matches!(right, UpdateOp::Insert(_))
    }) {
        let vertices = run.iter().map(|op| op.vertex());
        affected += match run.first() {
            Some(UpdateOp::Insert(_)) => index.batch_insert(vertices)?,
            Some(UpdateOp::Delete(_)) => index.batch_delete(vertices)?,
            None => 0,
        };
    }
    Ok(affected)
}

/// Replays `ops` on the point-of-interest set of `index` and builds a fresh
/// index over the same graph and elimination order.
fn rebuild_with(index: &LcIndex, ops: &[UpdateOp]) -> Result<LcIndex, CliError> {
    let graph = index.graph();
    let mut member = vec![false; graph.vertex_count() + 1];
    for poi in index.pois().iter() {
        member[poi] = true;
    }
    for op in ops {
        let vertex = op.vertex();
        graph.check_vertex(vertex)?;
        match (op, member[vertex]) {
            (UpdateOp::Insert(_), true) => return Err(IndexError::AlreadyPoi { vertex }.into()),
            (UpdateOp::Delete(_), false) => return Err(IndexError::NotPoi { vertex }.into()),
            (UpdateOp::Insert(_), false) => member[vertex] = true,
            (UpdateOp::Delete(_), true) => member[vertex] = false,
        }
    }
    let pois = graph.vertices().filter(|&vertex| member[vertex]);
    Ok(LcIndexBuilder::new()
        .with_k(index.k())
        .with_order(index.order().clone())
        .build(graph.clone(), pois)?)
}

fn read_graph(args: &GraphArgs) -> Result<LabelledGraph, CliError> {
    let network = load_network(&args.graph, args.label_size).map_err(input_error(&args.graph))?;
    Ok(network.graph)
}

#[instrument(name = "cli.open_index", err, skip(args), fields(path = %args.index.display()))]
pub(super) fn open_index(args: &IndexArgs) -> Result<LcIndex, CliError> {
    let graph = read_graph(&args.graph)?;
    LcIndex::load(graph, &args.index).map_err(|source| CliError::Persist {
        path: args.index.clone(),
        source,
    })
}

fn save_index(index: &LcIndex, path: &Path) -> Result<(), CliError> {
    index.save(path).map_err(|source| CliError::Persist {
        path: path.to_path_buf(),
        source,
    })
}

fn input_error(path: &Path) -> impl FnOnce(RoadFormatError) -> CliError + '_ {
    move |source| CliError::Input {
        path: path.to_path_buf(),
        source,
    }
}
