//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Hard errors raised while parsing a single dump line
///
/// Every variant knows which 1-based field of its line failed,
/// see [`ParseError::field`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("goroutine line, field 1: first word ({0}) is not 'goroutine'")]
    NotGoroutineLine(String),

    #[error("goroutine line, field 2: expected integer goroutine ID, got: {0}")]
    InvalidGoroutineId(String),

    #[error("goroutine line, field 3: state info not found (or is empty)")]
    MissingStateInfo,

    #[error("goroutine line, field {field}: expected integer wait time, got: {value}")]
    InvalidWaitTime { field: usize, value: String },

    #[error("function line, field 0: not a function line (no argument list found)")]
    NotFunctionLine,

    #[error("file line, field 0: not a file line (no colon found)")]
    NotFileLine,

    #[error("file line, field 1: no filename found")]
    MissingFilename,

    #[error("file line, field 2: expected integer line number, got: {0}")]
    InvalidLineNumber(String),
}

impl ParseError {
    /// 1-based index of the field that failed (0 = the line as a whole)
    pub fn field(&self) -> usize {
        match self {
            ParseError::NotGoroutineLine(_) => 1,
            ParseError::InvalidGoroutineId(_) => 2,
            ParseError::MissingStateInfo => 3,
            ParseError::InvalidWaitTime { field, .. } => *field,
            ParseError::NotFunctionLine | ParseError::NotFileLine => 0,
            ParseError::MissingFilename => 1,
            ParseError::InvalidLineNumber(_) => 2,
        }
    }
}

/// Errors that can occur while fetching a dump
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    BadStatus { url: String, status: u16 },

    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Dump source cannot be empty")]
    EmptySource,
}

/// Errors that can occur during flamegraph generation
#[derive(Error, Debug)]
pub enum FlamegraphError {
    #[error("Empty stack data")]
    EmptyStacks,

    #[error("Failed to render flamegraph: {0}")]
    RenderFailed(String),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Monitor state lock was poisoned by a panicking writer")]
    LockPoisoned,
}
