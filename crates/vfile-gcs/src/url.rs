//! Rewriting of `gs[+scheme]://bucket/path` URLs into HTTPS endpoints.
//!
//! The rewrite is pure and per-call stateless. The bucket becomes a
//! direction-specific virtual host so the storage backend can apply
//! download- or upload-side optimizations:
//!
//! - read modes target `bucket.storage-download.<domain>`
//! - write modes target `bucket.storage-upload.<domain>`
//! - anything else targets `bucket.storage.<domain>`

use crate::error::{GcsError, GcsResult};

/// Transfer direction derived from an open-mode string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Download-oriented host (`storage-download`).
    Download,
    /// Upload-oriented host (`storage-upload`).
    Upload,
    /// Direction-neutral host (`storage`).
    Neutral,
}

impl Direction {
    /// Derives the direction from an open-mode string.
    ///
    /// Interpretation is substring-based: `'r'` selects download and wins
    /// over `'w'`; `'w'` alone selects upload; anything else is neutral.
    #[must_use]
    pub fn from_mode(mode: &str) -> Self {
        if mode.contains('r') {
            Self::Download
        } else if mode.contains('w') {
            Self::Upload
        } else {
            Self::Neutral
        }
    }

    const fn host_infix(self) -> &'static str {
        match self {
            Self::Download => ".storage-download.",
            Self::Upload => ".storage-upload.",
            Self::Neutral => ".storage.",
        }
    }
}

/// Rewrites a `gs[+scheme]://bucket/path` URL into its HTTPS endpoint.
///
/// An explicit `+scheme` is trusted verbatim as the transport; no allow-list
/// is applied. The path tail (including any query or fragment) is appended
/// unchanged.
///
/// # Errors
///
/// Returns [`GcsError::InvalidUrl`] when the URL does not carry the
/// `scheme[+sub]://` marker or names an empty bucket.
pub fn rewrite_url(raw: &str, mode: &str, service_domain: &str) -> GcsResult<String> {
    let rest = raw
        .strip_prefix("gs")
        .ok_or_else(|| GcsError::InvalidUrl(raw.to_string()))?;

    let (transport, rest) = if let Some(sub) = rest.strip_prefix('+') {
        let colon = sub
            .find(':')
            .ok_or_else(|| GcsError::InvalidUrl(raw.to_string()))?;
        (&sub[..colon], &sub[colon..])
    } else {
        ("https", rest)
    };

    let rest = rest
        .strip_prefix("://")
        .ok_or_else(|| GcsError::InvalidUrl(raw.to_string()))?;

    // Bucket runs to the first path, query, or fragment delimiter; the tail
    // from that delimiter on is carried over verbatim.
    let split = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (bucket, tail) = rest.split_at(split);

    if bucket.is_empty() {
        return Err(GcsError::InvalidUrl(raw.to_string()));
    }

    let infix = Direction::from_mode(mode).host_infix();
    Ok(format!("{transport}://{bucket}{infix}{service_domain}{tail}"))
}
