//! Tapline: TAP output for test runs, with a cycle-safe value serializer for
//! assertion diagnostics.

pub use crate::errors::{Result, TaplineError};
pub use crate::events::{
    AssertionId, AssertionResult, BailOut, Event, SummaryCounts, TestEnd, TestStart,
};
pub use crate::reporter::TapReporter;
pub use crate::serialize::{serialize, SerializeOptions, Serializer, CIRCULAR_REF};
pub use crate::sink::{IoSink, LineBuffer, LineSink, StdoutSink};
pub use crate::tap::TapWriter;
pub use crate::value::Value;

pub mod cli;
pub mod errors;
pub mod events;
pub mod logging;
pub mod reporter;
pub mod serialize;
pub mod sink;
pub mod tap;
pub mod value;
