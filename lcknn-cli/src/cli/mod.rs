//! Command-line interface for building, querying, and maintaining
//! label-constrained kNN indexes stored on disk.

mod commands;
mod render;

pub use commands::{
    BuildCommand, Cli, CliError, Command, GraphArgs, IndexArgs, QueryCommand, UpdateCommand,
    UpdateMode, run_cli,
};
pub use render::{QueryAnswer, Report, render_report};
