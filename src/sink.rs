//! Line sinks: where a writer's output goes.
//!
//! A writer performs no I/O of its own. Every line it produces is handed to a
//! [`LineSink`], which may print it, buffer it, or forward it elsewhere.

use std::io::{self, Write};

use tracing::debug;

/// Consumes output one line at a time. Lines carry no trailing newline.
pub trait LineSink {
    fn log(&mut self, line: &str);

    /// True once the sink can no longer accept lines.
    fn is_closed(&self) -> bool {
        false
    }
}

impl<F> LineSink for F
where
    F: FnMut(&str),
{
    fn log(&mut self, line: &str) {
        self(line)
    }
}

/// LineBuffer: collects lines in memory for testing or programmatic capture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// All lines joined with `\n`.
    pub fn as_text(&self) -> String {
        self.lines.join("\n")
    }
}

impl LineSink for LineBuffer {
    fn log(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// IoSink: writes each line to an `io::Write`. The first write error closes
/// the sink; later lines are dropped.
#[derive(Debug)]
pub struct IoSink<W> {
    writer: W,
    closed: bool,
}

/// StdoutSink: the CLI's sink.
pub type StdoutSink = IoSink<io::Stdout>;

impl<W: Write> IoSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            closed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl StdoutSink {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> LineSink for IoSink<W> {
    fn log(&mut self, line: &str) {
        if self.closed {
            return;
        }
        if let Err(error) = writeln!(self.writer, "{line}") {
            debug!(%error, "output closed; dropping remaining lines");
            self.closed = true;
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
