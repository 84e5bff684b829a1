//! Defines the command-line arguments for the Tapline CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::Parser;

use crate::logging::DEFAULT_LOG_LEVEL;
use crate::serialize::DEFAULT_MAX_DEPTH;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "tapline",
    version,
    about = "Reads newline-delimited JSON test events on stdin and writes TAP version 13 to stdout."
)]
pub struct TaplineArgs {
    /// Nesting depth past which actual/expected values are elided.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Log filter used when RUST_LOG is not set (logs go to stderr).
    #[arg(long, default_value = DEFAULT_LOG_LEVEL)]
    pub log_level: String,
}
