//! Test lifecycle events as produced by an upstream test engine.
//!
//! On the wire each event is one JSON object tagged by `type`, with its
//! payload under `data`:
//!
//! ```json
//! {"type":"ASSERTION","data":{"pass":false,"description":"eq","actual":1,"expected":2}}
//! ```
//!
//! A `BAIL_OUT` carries the unhandled error itself as `data`, whatever its
//! shape; `data` may also be `null` or missing.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::Deserialize;

use crate::value::Value;

const KINDS: &[&str] = &["TEST_START", "ASSERTION", "TEST_END", "BAIL_OUT", "SUMMARY"];

/// One moment in a test run.
#[derive(Debug, Clone)]
pub enum Event {
    TestStart(TestStart),
    Assertion(AssertionResult),
    TestEnd(TestEnd),
    BailOut(BailOut),
    /// Final counts computed upstream. When present they are printed as-is.
    Summary(SummaryCounts),
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TestStart(_) => "TEST_START",
            Event::Assertion(_) => "ASSERTION",
            Event::TestEnd(_) => "TEST_END",
            Event::BailOut(_) => "BAIL_OUT",
            Event::Summary(_) => "SUMMARY",
        }
    }
}

/// Wire shape shared by every kind. Unknown top-level fields are ignored.
#[derive(Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let RawEvent { kind, data } = RawEvent::deserialize(deserializer)?;
        let Some(payload) = data else {
            return match kind.as_str() {
                "BAIL_OUT" => Ok(Event::BailOut(BailOut::default())),
                "TEST_START" | "ASSERTION" | "TEST_END" | "SUMMARY" => {
                    Err(de::Error::missing_field("data"))
                }
                other => Err(de::Error::unknown_variant(other, KINDS)),
            };
        };
        let event = match kind.as_str() {
            "TEST_START" => serde_json::from_value(payload).map(Event::TestStart),
            "ASSERTION" => serde_json::from_value(payload).map(Event::Assertion),
            "TEST_END" => serde_json::from_value(payload).map(Event::TestEnd),
            "SUMMARY" => serde_json::from_value(payload).map(Event::Summary),
            "BAIL_OUT" => Ok(Event::BailOut(BailOut {
                error: Value::from(payload),
            })),
            other => return Err(de::Error::unknown_variant(other, KINDS)),
        };
        event.map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestStart {
    pub description: String,
}

impl TestStart {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Outcome of a single assertion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssertionResult {
    pub pass: bool,
    pub description: String,
    #[serde(default)]
    pub actual: Value,
    #[serde(default)]
    pub expected: Value,
    /// Name of the comparison that was made, e.g. `equal`.
    #[serde(default)]
    pub operator: Option<String>,
    /// Source location of the assertion.
    #[serde(default)]
    pub at: Option<String>,
    #[serde(default)]
    pub skip: bool,
}

impl AssertionResult {
    pub fn passed(description: impl Into<String>) -> Self {
        Self {
            pass: true,
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn failed(
        description: impl Into<String>,
        actual: impl Into<Value>,
        expected: impl Into<Value>,
    ) -> Self {
        Self {
            pass: false,
            description: description.into(),
            actual: actual.into(),
            expected: expected.into(),
            ..Self::default()
        }
    }

    pub fn skipped(description: impl Into<String>) -> Self {
        Self {
            pass: true,
            skip: true,
            description: description.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestEnd {
    #[serde(default)]
    pub description: String,
    /// Wall time of the test in milliseconds.
    #[serde(default)]
    pub execution_time: Option<f64>,
}

/// The run stopped on an unhandled error.
#[derive(Debug, Clone, Default)]
pub struct BailOut {
    /// Whatever the engine reported as the error; absent when it sent nothing.
    pub error: Value,
}

/// Test-point number of an assertion, unique within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssertionId(pub u32);

impl fmt::Display for AssertionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Totals for a run. `success + skip + failure == total` is expected but
/// not checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct SummaryCounts {
    pub success: usize,
    pub skip: usize,
    pub failure: usize,
    pub total: usize,
}
