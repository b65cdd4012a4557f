//! Support library for the `lcknn` binary.
//!
//! Exposes the command pipeline and logging bootstrap so tests can drive
//! commands without spawning a subprocess.

pub mod cli;
pub mod logging;
