//! TAP (Test Anything Protocol) version 13 line writer.
//!
//! `TapWriter` turns test lifecycle events into protocol lines and hands each
//! line to its sink. Failing assertions get a YAML diagnostic block whose
//! `actual`/`expected` values are rendered by the [`Serializer`].
//!
//! ```text
//! TAP version 13
//! # some test
//! ok 1 - passes
//! not ok 2 - fails
//!   ---
//!     actual: {"a":123}
//!     expected: {"b":456}
//!   ...
//!
//! 1..2
//! # tests 2
//! # pass  1
//! # fail  1
//! # skip  0
//! ```

use crate::events::{AssertionId, AssertionResult, SummaryCounts, TestStart};
use crate::serialize::Serializer;
use crate::sink::LineSink;
use crate::value::Value;

pub const TAP_VERSION_HEADER: &str = "TAP version 13";
pub const BAIL_OUT_LINE: &str = "Bail out! Unhandled error.";

/// Spaces per indentation level for `print` and `print_comment`.
const INDENT_WIDTH: usize = 4;
const DIAGNOSTIC_FENCE_INDENT: &str = "  ";
const DIAGNOSTIC_FIELD_INDENT: &str = "    ";

/// Writes TAP lines to a [`LineSink`]. Holds no state besides the sink.
#[derive(Debug)]
pub struct TapWriter<S> {
    sink: S,
    serializer: Serializer,
}

impl<S: LineSink> TapWriter<S> {
    pub fn new(sink: S) -> Self {
        Self::with_serializer(sink, Serializer::default())
    }

    pub fn with_serializer(sink: S, serializer: Serializer) -> Self {
        Self { sink, serializer }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Emits `text` unindented.
    pub fn print(&mut self, text: &str) {
        self.print_indented(text, 0);
    }

    /// Emits `text` preceded by `indent * 4` spaces.
    pub fn print_indented(&mut self, text: &str, indent: usize) {
        let line = format!("{:width$}{text}", "", width = indent * INDENT_WIDTH);
        self.sink.log(&line);
    }

    /// Emits `# text`.
    pub fn print_comment(&mut self, text: &str) {
        self.print_comment_indented(text, 0);
    }

    /// Emits `# text` with the `#` after `indent * 4` spaces.
    pub fn print_comment_indented(&mut self, text: &str, indent: usize) {
        self.print_indented(&format!("# {text}"), indent);
    }

    pub fn print_header(&mut self) {
        self.print(TAP_VERSION_HEADER);
    }

    pub fn print_bail_out(&mut self) {
        self.print(BAIL_OUT_LINE);
    }

    pub fn print_test_start(&mut self, start: &TestStart) {
        self.print_comment(&start.description);
    }

    /// Emits the test point for `result`.
    ///
    /// A pass is a single `ok` line, a skip adds a `# SKIP` directive, and a
    /// failure is followed by a diagnostic block:
    ///
    /// ```text
    /// not ok 666 - some failing test
    ///   ---
    ///     actual: {"a":123}
    ///     expected: {"b":456}
    ///   ...
    /// ```
    pub fn print_assertion(&mut self, result: &AssertionResult, id: AssertionId) {
        let description = &result.description;
        if result.skip {
            self.print(&format!("ok {id} - {description} # SKIP"));
            return;
        }
        if result.pass {
            self.print(&format!("ok {id} - {description}"));
            return;
        }

        self.print(&format!("not ok {id} - {description}"));
        self.print(&format!("{DIAGNOSTIC_FENCE_INDENT}---"));
        if let Some(operator) = &result.operator {
            self.print_field("operator", operator);
        }
        let actual = self.render(&result.actual);
        self.print_field("actual", &actual);
        let expected = self.render(&result.expected);
        self.print_field("expected", &expected);
        if let Some(at) = &result.at {
            self.print_field("at", at);
        }
        self.print(&format!("{DIAGNOSTIC_FENCE_INDENT}..."));
    }

    /// Emits the plan line and the run totals.
    pub fn print_summary(&mut self, counts: &SummaryCounts) {
        self.print("");
        self.print(&format!("1..{}", counts.total));
        self.print_comment(&format!("tests {}", counts.total));
        self.print_comment(&format!("pass  {}", counts.success));
        self.print_comment(&format!("fail  {}", counts.failure));
        self.print_comment(&format!("skip  {}", counts.skip));
    }

    fn print_field(&mut self, name: &str, value: &str) {
        self.print(&format!("{DIAGNOSTIC_FIELD_INDENT}{name}: {value}"));
    }

    /// Serialized form of a payload; an absent value reads as `undefined`.
    fn render(&self, value: &Value) -> String {
        self.serializer
            .serialize(value)
            .unwrap_or_else(|| "undefined".to_string())
    }
}
