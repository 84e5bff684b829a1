//! Tapline error handling.
//!
//! The serializer and the writer cannot fail. Errors only arise at the edges:
//! decoding the incoming event stream, reading it, and an upstream bail-out.

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for reporter and CLI failure modes.
#[derive(Debug, Error, Diagnostic)]
pub enum TaplineError {
    #[error("invalid event on input line {line}: {source}")]
    #[diagnostic(
        code(tapline::input::json),
        help("each input line must be one JSON object with a `type` and a `data` field")
    )]
    InvalidEvent {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read events: {0}")]
    #[diagnostic(code(tapline::input::io))]
    Io(#[from] std::io::Error),

    #[error("test run bailed out: {reason}")]
    #[diagnostic(code(tapline::bail_out))]
    BailOut { reason: String },
}

pub type Result<T, E = TaplineError> = std::result::Result<T, E>;
