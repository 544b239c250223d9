//! # vfile-gcs
//!
//! Google Cloud Storage scheme adapter for virtual file handles.
//!
//! The adapter lets a host I/O layer open `gs://bucket/path` objects as if
//! they were ordinary URLs, by rewriting them into HTTPS endpoints and
//! attaching an OAuth bearer token:
//!
//! - **[`GcsTranslator`]**: per-call stateless rewrite of
//!   `gs[+scheme]://bucket/path` plus an open mode into a target URL and a
//!   header set, delegated to a host-supplied [`UrlOpener`].
//! - **[`TokenProvider`]**: thread-safe bearer-token lookup with a fixed
//!   precedence (explicit override, delegation opt-out, cached
//!   subprocess-minted service-account token) and a bounded-lifetime cache
//!   guarded by one process-wide mutex.
//!
//! The host's file-handle abstraction, HTTP transport, and retry policy are
//! collaborators behind the [`UrlOpener`] and
//! [`TokenSource`](token::TokenSource) seams; this crate owns neither.
//!
//! ## Example
//!
//! ```rust,ignore
//! use vfile_gcs::{GcsConfig, GcsTranslator};
//!
//! let translator = GcsTranslator::new(GcsConfig::from_env(), opener);
//! let handle = translator.open("gs://my-bucket/dir/obj.bam", "r").await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod observability;
pub mod opener;
pub mod scheme;
pub mod token;
pub mod translate;
pub mod url;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::GcsConfig;
    pub use crate::error::{GcsError, GcsResult};
    pub use crate::opener::{Header, OpenRequest, UrlOpener};
    pub use crate::scheme::{SchemeHandler, SchemeRegistry, register_gcs_schemes};
    pub use crate::token::{TokenProvider, TokenSource};
    pub use crate::translate::GcsTranslator;
}

// Re-export key types at crate root for ergonomics
pub use config::{DEFAULT_SERVICE_DOMAIN, GcsConfig};
pub use error::{GcsError, GcsResult};
pub use observability::{LogFormat, init_logging};
pub use opener::{Header, OpenRequest, UrlOpener};
pub use scheme::{
    HANDLER_LABEL, HANDLER_PRIORITY, SCHEMES, SchemeHandler, SchemeRegistry, register_gcs_schemes,
};
pub use token::{GcloudTokenSource, MAX_TOKEN_LEN, TOKEN_STALE_AFTER, TokenProvider, TokenSource};
pub use translate::GcsTranslator;
pub use url::{Direction, rewrite_url};
