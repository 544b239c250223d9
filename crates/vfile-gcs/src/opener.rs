//! Generic URL-opener collaborator seam.
//!
//! The adapter never performs HTTP itself; it delegates the actual open to a
//! host-supplied opener. Two entry points mirror the host contract: a bare
//! `(url, mode)` fast path and a structured-options path used as soon as
//! headers or backend-specific parameters come into play.

use async_trait::async_trait;

use crate::error::GcsResult;

/// One HTTP header as a `(name, value)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Header name, e.g. `Authorization`.
    pub name: String,
    /// Header value.
    pub value: String,
}

impl Header {
    /// Creates a header from name and value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Builds an `Authorization: Bearer <token>` header.
    #[must_use]
    pub fn bearer_auth(token: &str) -> Self {
        Self::new("Authorization", format!("Bearer {token}"))
    }

    /// Builds an `X-Goog-User-Project` requester-pays header.
    #[must_use]
    pub fn user_project(project: &str) -> Self {
        Self::new("X-Goog-User-Project", project)
    }
}

impl std::fmt::Display for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

/// Structured options for the non-trivial open path.
///
/// Replaces a variadic pass-through with an explicit value: the header list
/// supports zero or more entries, and `extra` carries opaque
/// backend-specific parameters untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpenRequest {
    /// Target URL to open.
    pub url: String,
    /// Open mode, always carrying its trailing `:` modifier marker.
    pub mode: String,
    /// Headers to attach, in order; possibly empty.
    pub headers: Vec<Header>,
    /// Opaque backend-specific parameters, forwarded verbatim.
    pub extra: Vec<(String, String)>,
}

/// Generic URL opener the adapter delegates to.
///
/// Implementations own transport, retries, and error reporting; the adapter
/// propagates whatever they return without interpretation.
#[async_trait]
pub trait UrlOpener: Send + Sync {
    /// Handle type returned by a successful open.
    type Handle;

    /// Opens a URL with a bare mode string (fast path, no options).
    ///
    /// # Errors
    ///
    /// Returns whatever failure the opener reports.
    async fn open(&self, url: &str, mode: &str) -> GcsResult<Self::Handle>;

    /// Opens a URL with structured options.
    ///
    /// # Errors
    ///
    /// Returns whatever failure the opener reports.
    async fn open_with(&self, request: OpenRequest) -> GcsResult<Self::Handle>;
}
