//! Common result and error types for the fuzzing engine.

/// The standard result type for fallible internal operations.
///
/// `Err` indicates an unrecoverable internal error (a bug in VeriFuzz),
/// never an external-tool outcome. Tool failures, timeouts, and mismatches
/// are expected events: they flow through the drivers as classified values
/// and are recorded in run artifacts, not raised as errors.
pub type FuzzResult<T> = Result<T, InternalError>;

/// An internal fuzzer error indicating a bug in VeriFuzz, not a tool outcome.
///
/// Raised when a generator invariant is violated, an invalid AST reaches
/// code generation, or similar. An internal error aborts the current fuzz
/// iteration with a diagnostic; it does not poison the outer loop.
#[derive(Debug, thiserror::Error)]
#[error("internal fuzzer error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}
