//! The Tapline Command-Line Interface.
//!
//! Reads one JSON-encoded [`Event`] per line from stdin and reports them as
//! TAP on stdout. Exits non-zero when an assertion failed.

use std::io::{self, BufRead};
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use crate::cli::args::TaplineArgs;
use crate::errors::{Result, TaplineError};
use crate::events::Event;
use crate::logging;
use crate::reporter::TapReporter;
use crate::serialize::{SerializeOptions, Serializer};
use crate::sink::{LineSink, StdoutSink};
use crate::tap::TapWriter;

pub mod args;

/// The main entry point for the CLI.
pub fn run() -> miette::Result<ExitCode> {
    let args = TaplineArgs::parse();
    logging::init(&args.log_level);

    let serializer = Serializer::new(SerializeOptions {
        max_depth: args.max_depth,
    });
    let reporter = TapReporter::new(TapWriter::with_serializer(StdoutSink::stdout(), serializer));
    let failures = report_lines(reporter, io::stdin().lock())?;

    Ok(if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Reports every event read from `input` and returns the failure count.
/// Blank lines are skipped; line numbers in errors are 1-based. Reading stops
/// early once the sink is closed.
pub fn report_lines<S: LineSink>(
    mut reporter: TapReporter<S>,
    input: impl BufRead,
) -> Result<usize> {
    reporter.start();
    for (index, line) in input.lines().enumerate() {
        if reporter.sink().is_closed() {
            debug!(line = index + 1, "output closed; ignoring remaining events");
            break;
        }
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event: Event =
            serde_json::from_str(&line).map_err(|source| TaplineError::InvalidEvent {
                line: index + 1,
                source,
            })?;
        debug!(kind = event.kind(), line = index + 1, "event");
        reporter.report(&event)?;
    }
    let (counts, _) = reporter.finish();
    Ok(counts.failure)
}
