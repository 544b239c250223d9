//! Error types and result alias for the GCS adapter.
//!
//! The adapter degrades gracefully on most token-path problems (missing
//! configuration, a failed mint subprocess, empty mint output) and reserves
//! hard errors for the conditions a caller must see: malformed URLs, an
//! oversized minted token, and failures reported by the opener collaborator.

use thiserror::Error;

/// Result type alias used throughout the adapter.
pub type GcsResult<T> = Result<T, GcsError>;

/// Errors surfaced by the GCS adapter.
#[derive(Debug, Error)]
pub enum GcsError {
    /// The input URL is not of the `gs[+scheme]://bucket/path` family.
    #[error("invalid GCS URL: {0}")]
    InvalidUrl(String),

    /// A minted access token exceeded the fixed size bound.
    ///
    /// A truncated token would cause confusing downstream authentication
    /// failures, so the adapter refuses to store or serve it.
    #[error("minted access token is {len} bytes, exceeding the {max}-byte bound")]
    TokenOverflow {
        /// Length of the rejected token in bytes.
        len: usize,
        /// Maximum permitted token length in bytes.
        max: usize,
    },

    /// The credential-minting source failed to produce a token.
    ///
    /// The token provider treats this as recoverable and keeps serving the
    /// previous cached value; it crosses the public API only when a
    /// [`TokenSource`](crate::token::TokenSource) is invoked directly.
    #[error("token source failed: {message}")]
    TokenSource {
        /// Description of the mint failure.
        message: String,
    },

    /// The generic URL opener reported a failure.
    #[error("open failed: {message}")]
    Open {
        /// Description of the open failure.
        message: String,
        /// The underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An internal error that should not happen in normal operation.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl GcsError {
    /// Creates a new open error with the given message.
    #[must_use]
    pub fn open(message: impl Into<String>) -> Self {
        Self::Open {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new open error with a source cause.
    #[must_use]
    pub fn open_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Open {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new token source error.
    #[must_use]
    pub fn token_source(message: impl Into<String>) -> Self {
        Self::TokenSource {
            message: message.into(),
        }
    }
}
