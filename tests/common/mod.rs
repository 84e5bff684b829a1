//! Shared helpers for the Tapline integration tests.

#![allow(dead_code)]

use tapline::value::{Object, Value};
use tapline::{LineBuffer, TapWriter};

/// A writer that captures its lines in memory.
pub fn capture_writer() -> TapWriter<LineBuffer> {
    TapWriter::new(LineBuffer::new())
}

/// Lines emitted so far by a capturing writer.
pub fn lines(writer: &TapWriter<LineBuffer>) -> Vec<String> {
    writer.sink().lines().to_vec()
}

/// Builds an object from `(key, value)` pairs, preserving their order.
pub fn object<const N: usize>(members: [(&str, Value); N]) -> Object {
    members.into_iter().collect()
}

/// Serializes `value`, treating the absent marker as a test failure.
pub fn text(value: impl Into<Value>) -> String {
    tapline::serialize(&value.into()).expect("value should serialize to text")
}
