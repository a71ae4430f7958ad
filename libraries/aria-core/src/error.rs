//! Core error types for Aria.

use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Aria
///
/// These are the errors that can be raised before any network call is
/// attempted; everything here is rejected synchronously.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Song descriptor carries no usable identity field
    #[error("invalid song descriptor: {0}")]
    InvalidSongId(String),

    /// Host sent an action we do not advertise
    #[error("unsupported action: {0}")]
    UnknownAction(String),

    /// Source code not present in the source map
    #[error("unknown source: {0}")]
    UnknownSource(String),

    /// Generic invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl CoreError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an invalid song id error
    pub fn invalid_song_id(msg: impl Into<String>) -> Self {
        Self::InvalidSongId(msg.into())
    }
}
