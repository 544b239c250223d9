//! URL translation and open dispatch.
//!
//! Per call: rewrite the storage URL, ask the token provider for a bearer
//! token, assemble the header list, and hand the open to the opener
//! collaborator — via the bare fast path when there is nothing to attach,
//! via the structured-options path otherwise.

use std::sync::Arc;

use tracing::debug;

use crate::config::GcsConfig;
use crate::error::GcsResult;
use crate::opener::{Header, OpenRequest, UrlOpener};
use crate::token::TokenProvider;
use crate::url::rewrite_url;

/// Translator from `gs://` URLs to opened handles.
///
/// Stateless per invocation; the only shared state is the token provider's
/// cache. Cheap to share behind an `Arc` across caller tasks.
pub struct GcsTranslator<O: UrlOpener> {
    config: GcsConfig,
    tokens: Arc<TokenProvider>,
    opener: O,
}

impl<O: UrlOpener> std::fmt::Debug for GcsTranslator<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcsTranslator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<O: UrlOpener> GcsTranslator<O> {
    /// Creates a translator over the given opener, with a token provider
    /// backed by the `gcloud` credential tool.
    #[must_use]
    pub fn new(config: GcsConfig, opener: O) -> Self {
        let tokens = Arc::new(TokenProvider::new(config.clone()));
        Self::with_token_provider(config, tokens, opener)
    }

    /// Creates a translator with an injected token provider.
    #[must_use]
    pub fn with_token_provider(
        config: GcsConfig,
        tokens: Arc<TokenProvider>,
        opener: O,
    ) -> Self {
        Self {
            config,
            tokens,
            opener,
        }
    }

    /// Opens a storage URL with a plain mode string.
    ///
    /// Uses the bare fast path when no headers apply; otherwise switches to
    /// the options path, appending the `:` modifier marker to the mode.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed URL, an oversized minted token, or
    /// any failure the opener reports.
    pub async fn open(&self, raw_url: &str, mode: &str) -> GcsResult<O::Handle> {
        self.open_inner(raw_url, mode, false, Vec::new()).await
    }

    /// Opens a storage URL carrying backend-specific parameters.
    ///
    /// Always uses the options path; the mode may already carry modifiers.
    ///
    /// # Errors
    ///
    /// Returns an error for a malformed URL, an oversized minted token, or
    /// any failure the opener reports.
    pub async fn open_with(
        &self,
        raw_url: &str,
        mode: &str,
        extra: Vec<(String, String)>,
    ) -> GcsResult<O::Handle> {
        self.open_inner(raw_url, mode, true, extra).await
    }

    async fn open_inner(
        &self,
        raw_url: &str,
        mode: &str,
        options_path: bool,
        extra: Vec<(String, String)>,
    ) -> GcsResult<O::Handle> {
        let url = rewrite_url(raw_url, mode, &self.config.service_domain)?;
        debug!(url = %url, "rewrote storage URL");

        let mut headers = Vec::new();
        if let Some(token) = self.tokens.get_token().await? {
            headers.push(Header::bearer_auth(&token));
        }
        if let Some(project) = self.config.requester_pays_project.as_deref() {
            headers.push(Header::user_project(project));
        }

        if !options_path && headers.is_empty() && extra.is_empty() {
            return self.opener.open(&url, mode).await;
        }

        // The options path expects the mode's modifier-colon marker; append
        // one without mutating the caller's value.
        let mode = if mode.contains(':') {
            mode.to_string()
        } else {
            format!("{mode}:")
        };

        self.opener
            .open_with(OpenRequest {
                url,
                mode,
                headers,
                extra,
            })
            .await
    }
}
