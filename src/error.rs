//! Error types for the Quorum library.
//!
//! All errors are represented by the [`QuorumError`] enum. Running out of
//! matching documents is never an error: `next()` and `skip_to()` report
//! exhaustion by returning `Ok(false)`.
//!
//! # Examples
//!
//! ```
//! use quorum::error::{QuorumError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(QuorumError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

/// The main error type for Quorum operations.
#[derive(Error, Debug)]
pub enum QuorumError {
    /// A capability that does not apply to this scorer (e.g. scoring a
    /// placeholder that never matches).
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Invalid argument, such as a negative skip target.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The clause collection stage exceeded its configured limit.
    #[error("Too many clauses: {count} exceeds the maximum of {max}")]
    TooManyClauses { count: usize, max: usize },

    /// Operation not valid in the current state.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with QuorumError.
pub type Result<T> = std::result::Result<T, QuorumError>;

impl QuorumError {
    /// Create a new unsupported operation error.
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        QuorumError::UnsupportedOperation(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        QuorumError::InvalidArgument(msg.into())
    }

    /// Create a new too many clauses error.
    pub fn too_many_clauses(count: usize, max: usize) -> Self {
        QuorumError::TooManyClauses { count, max }
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        QuorumError::InvalidOperation(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        QuorumError::Other(msg.into())
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        QuorumError::Other(format!("Internal error: {}", msg.into()))
    }
}
