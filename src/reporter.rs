//! Drives a [`TapWriter`] from a stream of [`Event`]s.
//!
//! The reporter owns the run-level bookkeeping the writer deliberately does
//! not: it numbers assertions, tallies outcomes and closes the run with a
//! summary.

use tracing::{debug, warn};

use crate::errors::{Result, TaplineError};
use crate::events::{AssertionId, AssertionResult, Event, SummaryCounts};
use crate::serialize::serialize;
use crate::sink::LineSink;
use crate::tap::TapWriter;

#[derive(Debug)]
pub struct TapReporter<S> {
    writer: TapWriter<S>,
    last_id: u32,
    counts: SummaryCounts,
    upstream_summary: Option<SummaryCounts>,
    started: bool,
}

impl<S: LineSink> TapReporter<S> {
    pub fn new(writer: TapWriter<S>) -> Self {
        Self {
            writer,
            last_id: 0,
            counts: SummaryCounts::default(),
            upstream_summary: None,
            started: false,
        }
    }

    pub fn sink(&self) -> &S {
        self.writer.sink()
    }

    /// Counts tallied so far.
    pub fn counts(&self) -> SummaryCounts {
        self.counts
    }

    /// Prints the protocol header. Idempotent.
    pub fn start(&mut self) {
        if !self.started {
            debug!("starting TAP stream");
            self.writer.print_header();
            self.started = true;
        }
    }

    /// Reports one event. A bail-out is printed and then returned as an error;
    /// the run is over at that point.
    pub fn report(&mut self, event: &Event) -> Result<()> {
        self.start();
        match event {
            Event::TestStart(start) => self.writer.print_test_start(start),
            Event::Assertion(result) => self.report_assertion(result),
            Event::TestEnd(end) => {
                debug!(
                    description = %end.description,
                    execution_time = ?end.execution_time,
                    "test finished"
                );
            }
            Event::BailOut(bail_out) => {
                let reason =
                    serialize(&bail_out.error).unwrap_or_else(|| "unknown error".to_string());
                warn!(%reason, "bailing out");
                self.writer.print_bail_out();
                return Err(TaplineError::BailOut { reason });
            }
            Event::Summary(counts) => self.upstream_summary = Some(*counts),
        }
        Ok(())
    }

    /// Reports every event, then finishes the run.
    pub fn run<'a>(
        mut self,
        events: impl IntoIterator<Item = &'a Event>,
    ) -> Result<(SummaryCounts, S)> {
        for event in events {
            self.report(event)?;
        }
        Ok(self.finish())
    }

    /// Prints the summary and returns the counts printed along with the sink.
    ///
    /// Counts received from upstream take precedence over the tally.
    pub fn finish(mut self) -> (SummaryCounts, S) {
        self.start();
        let counts = self.upstream_summary.unwrap_or(self.counts);
        debug!(?counts, "finishing TAP stream");
        self.writer.print_summary(&counts);
        (counts, self.writer.into_sink())
    }

    fn report_assertion(&mut self, result: &AssertionResult) {
        self.last_id += 1;
        let id = AssertionId(self.last_id);
        self.counts.total += 1;
        if result.skip {
            self.counts.skip += 1;
        } else if result.pass {
            self.counts.success += 1;
        } else {
            self.counts.failure += 1;
        }
        debug!(%id, pass = result.pass, skip = result.skip, "assertion");
        self.writer.print_assertion(result, id);
    }
}
