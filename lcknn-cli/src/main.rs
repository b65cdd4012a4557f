//! Entry point of the `lcknn` binary.
//!
//! Parses arguments, runs the requested command, and prints its report on
//! `stdout`. Failures are logged with their stable error code and end the
//! process unsuccessfully, as does a verification that found mismatches.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use lcknn_cli::{
    cli::{Cli, CliError, render_report, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field, warn};

/// Runs the parsed command and writes its report. Returns whether the report
/// describes a successful outcome.
fn try_main() -> Result<bool> {
    let cli = Cli::parse();
    let report = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_report(&report, &mut writer).context("failed to render report")?;
    writer.flush().context("failed to flush output")?;
    Ok(report.is_success())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    match try_main() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            warn!("index answers disagree with exhaustive search");
            ExitCode::FAILURE
        }
        Err(err) => {
            let code = err.downcast_ref::<CliError>().and_then(CliError::code);
            error!(
                error = %err,
                code = code.map(field::display),
                "command execution failed"
            );
            ExitCode::FAILURE
        }
    }
}

#[expect(
    clippy::print_stderr,
    reason = "Emit one-off diagnostic before tracing is initialized"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}
