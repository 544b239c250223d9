//! Bearer-token provider with a bounded-lifetime cache.
//!
//! Token lookup follows a fixed precedence: an explicit override token wins,
//! an auth-delegation opt-out yields no token, and otherwise a configured
//! service-account credential path enables a cached subprocess-minted token.
//! "No token" is a normal outcome, not an error; the translator then opens
//! the URL unauthenticated.

use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::config::GcsConfig;
use crate::error::{GcsError, GcsResult};

/// Maximum accepted access-token length in bytes.
///
/// A minted token past this bound is rejected outright; truncating it would
/// produce baffling authentication failures far from the cause.
pub const MAX_TOKEN_LEN: usize = 2048;

/// Age at which a cached token is considered stale.
///
/// Service-account access tokens expire after 3600 seconds; refreshing 60
/// seconds early absorbs clock skew and slow servers.
pub const TOKEN_STALE_AFTER: Duration = Duration::from_secs(3540);

/// Command line used to mint an access token from application-default
/// credentials.
const MINT_COMMAND: &[&str] = &["gcloud", "auth", "application-default", "print-access-token"];

/// Capability that produces a fresh access token.
///
/// Modeled as an injectable seam so tests can substitute a fake without
/// spawning real processes.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Mints one access token.
    ///
    /// # Errors
    ///
    /// Returns an error when the source cannot produce a token. The
    /// [`TokenProvider`] treats any such failure as recoverable.
    async fn mint(&self) -> GcsResult<String>;
}

/// Production token source: spawns the `gcloud` credential tool and reads
/// exactly one line of its standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct GcloudTokenSource;

#[async_trait]
impl TokenSource for GcloudTokenSource {
    async fn mint(&self) -> GcsResult<String> {
        let mut child = Command::new(MINT_COMMAND[0])
            .args(&MINT_COMMAND[1..])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| GcsError::token_source(format!("failed to spawn {}: {e}", MINT_COMMAND[0])))?;

        let stdout = child.stdout.take().ok_or_else(|| GcsError::Internal {
            message: "child stdout was not captured".to_string(),
        })?;

        let mut line = String::new();
        let read = BufReader::new(stdout).read_line(&mut line).await;

        // Reap the child regardless of how the read went.
        let wait = child.wait().await;

        read.map_err(|e| GcsError::token_source(format!("failed to read token: {e}")))?;
        if let Err(e) = wait {
            warn!(error = %e, "failed to reap credential tool");
        }

        let token = line.trim_end_matches(['\r', '\n']).to_string();
        if token.is_empty() {
            return Err(GcsError::token_source("credential tool produced no output"));
        }
        Ok(token)
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    fetched_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// Thread-safe provider of the current bearer token.
///
/// The cache mutex is the only exclusive section in the adapter: it
/// serializes all callers so at most one mint runs at a time and no caller
/// observes a partially written token. Waiters blocked behind an in-flight
/// refresh re-observe the refreshed cache rather than being notified
/// individually.
pub struct TokenProvider {
    config: GcsConfig,
    source: Arc<dyn TokenSource>,
    cache: Mutex<Option<CachedToken>>,
    stale_after: Duration,
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider")
            .field("config", &self.config)
            .field("stale_after", &self.stale_after)
            .finish_non_exhaustive()
    }
}

impl TokenProvider {
    /// Creates a provider backed by the `gcloud` credential tool.
    #[must_use]
    pub fn new(config: GcsConfig) -> Self {
        Self::with_source(config, Arc::new(GcloudTokenSource))
    }

    /// Creates a provider with an injected token source.
    #[must_use]
    pub fn with_source(config: GcsConfig, source: Arc<dyn TokenSource>) -> Self {
        Self {
            config,
            source,
            cache: Mutex::new(None),
            stale_after: TOKEN_STALE_AFTER,
        }
    }

    /// Overrides the staleness threshold.
    #[must_use]
    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    /// Returns the best available bearer token, or `None` when no token
    /// applies.
    ///
    /// Precedence:
    /// 1. explicit override token from configuration, returned verbatim;
    /// 2. auth delegation opt-out, yielding `None`;
    /// 3. service-account credential route with the bounded-lifetime cache;
    /// 4. nothing configured, yielding `None`.
    ///
    /// # Errors
    ///
    /// Returns [`GcsError::TokenOverflow`] when a minted token exceeds
    /// [`MAX_TOKEN_LEN`]. Mint failures and empty output are recoverable:
    /// the previous cached value (possibly none) keeps being served.
    #[instrument(skip(self), level = "debug")]
    pub async fn get_token(&self) -> GcsResult<Option<String>> {
        if let Some(token) = self.config.oauth_token.as_deref() {
            return Ok(Some(token.to_string()));
        }

        if self.config.delegate_auth {
            // Deliberate opt-out: the host's generic auth layer handles it.
            return Ok(None);
        }

        if self.config.credentials_path.is_none() {
            return Ok(None);
        }

        let mut cache = self.cache.lock().await;

        let stale = cache
            .as_ref()
            .is_none_or(|cached| !cached.is_fresh(self.stale_after));
        if stale {
            match self.source.mint().await {
                Ok(token) => {
                    if token.len() > MAX_TOKEN_LEN {
                        return Err(GcsError::TokenOverflow {
                            len: token.len(),
                            max: MAX_TOKEN_LEN,
                        });
                    }
                    debug!("refreshed cached access token");
                    *cache = Some(CachedToken {
                        value: token,
                        fetched_at: Instant::now(),
                    });
                }
                Err(e) => {
                    // No update on failure: the previous value and its
                    // timestamp stand, so the next call retries the mint.
                    warn!(error = %e, "access token refresh failed; serving previous value");
                }
            }
        }

        Ok(cache.as_ref().map(|cached| cached.value.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        mints: AtomicUsize,
        response: GcsResult<String>,
    }

    impl CountingSource {
        fn ok(token: &str) -> Arc<Self> {
            Arc::new(Self {
                mints: AtomicUsize::new(0),
                response: Ok(token.to_string()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                mints: AtomicUsize::new(0),
                response: Err(GcsError::token_source("mint unavailable")),
            })
        }

        fn mints(&self) -> usize {
            self.mints.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TokenSource for CountingSource {
        async fn mint(&self) -> GcsResult<String> {
            self.mints.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(token) => Ok(token.clone()),
                Err(_) => Err(GcsError::token_source("mint unavailable")),
            }
        }
    }

    fn service_account_config() -> GcsConfig {
        GcsConfig::default().with_credentials_path("/creds.json")
    }

    #[tokio::test]
    async fn override_token_wins_over_credential_path() {
        let source = CountingSource::ok("minted");
        let config = service_account_config().with_oauth_token("override");
        let provider = TokenProvider::with_source(config, source.clone());

        let token = provider.get_token().await.expect("token");
        assert_eq!(token.as_deref(), Some("override"));
        assert_eq!(source.mints(), 0, "override must bypass the cache");
    }

    #[tokio::test]
    async fn delegated_auth_yields_no_token() {
        let source = CountingSource::ok("minted");
        let config = service_account_config().with_delegated_auth();
        let provider = TokenProvider::with_source(config, source.clone());

        let token = provider.get_token().await.expect("token");
        assert!(token.is_none());
        assert_eq!(source.mints(), 0);
    }

    #[tokio::test]
    async fn no_configuration_yields_no_token() {
        let source = CountingSource::ok("minted");
        let provider = TokenProvider::with_source(GcsConfig::default(), source.clone());

        let token = provider.get_token().await.expect("token");
        assert!(token.is_none());
        assert_eq!(source.mints(), 0);
    }

    #[tokio::test]
    async fn fresh_cache_is_reused_without_minting_again() {
        let source = CountingSource::ok("minted");
        let provider = TokenProvider::with_source(service_account_config(), source.clone());

        let first = provider.get_token().await.expect("token");
        let second = provider.get_token().await.expect("token");

        assert_eq!(first.as_deref(), Some("minted"));
        assert_eq!(second.as_deref(), Some("minted"));
        assert_eq!(source.mints(), 1, "fresh cache must be memoized");
    }

    #[tokio::test]
    async fn stale_cache_triggers_exactly_one_new_mint() {
        let source = CountingSource::ok("minted");
        let provider = TokenProvider::with_source(service_account_config(), source.clone())
            .with_stale_after(Duration::ZERO);

        provider.get_token().await.expect("token");
        provider.get_token().await.expect("token");

        assert_eq!(source.mints(), 2);
    }

    #[tokio::test]
    async fn mint_failure_degrades_to_no_token() {
        let source = CountingSource::failing();
        let provider = TokenProvider::with_source(service_account_config(), source.clone());

        let token = provider.get_token().await.expect("recoverable");
        assert!(token.is_none());
        assert_eq!(source.mints(), 1);
    }

    #[tokio::test]
    async fn mint_failure_serves_previous_value_and_retries_next_time() {
        struct FlakySource {
            mints: AtomicUsize,
        }

        #[async_trait]
        impl TokenSource for FlakySource {
            async fn mint(&self) -> GcsResult<String> {
                let attempt = self.mints.fetch_add(1, Ordering::SeqCst);
                if attempt == 0 {
                    Ok("first".to_string())
                } else {
                    Err(GcsError::token_source("mint unavailable"))
                }
            }
        }

        let source = Arc::new(FlakySource {
            mints: AtomicUsize::new(0),
        });
        let provider = TokenProvider::with_source(service_account_config(), source.clone())
            .with_stale_after(Duration::ZERO);

        let first = provider.get_token().await.expect("token");
        assert_eq!(first.as_deref(), Some("first"));

        // Every subsequent call re-attempts the mint (the failed refresh
        // leaves the timestamp untouched) and keeps serving the stale value.
        let second = provider.get_token().await.expect("token");
        assert_eq!(second.as_deref(), Some("first"));
        let third = provider.get_token().await.expect("token");
        assert_eq!(third.as_deref(), Some("first"));
        assert_eq!(source.mints.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn oversized_token_is_a_hard_failure() {
        let source = CountingSource::ok(&"x".repeat(MAX_TOKEN_LEN + 1));
        let provider = TokenProvider::with_source(service_account_config(), source);

        let err = provider.get_token().await.expect_err("must fail");
        assert!(matches!(
            err,
            GcsError::TokenOverflow {
                len,
                max: MAX_TOKEN_LEN
            } if len == MAX_TOKEN_LEN + 1
        ));
    }

    #[tokio::test]
    async fn token_at_the_bound_is_accepted() {
        let source = CountingSource::ok(&"x".repeat(MAX_TOKEN_LEN));
        let provider = TokenProvider::with_source(service_account_config(), source);

        let token = provider.get_token().await.expect("token");
        assert_eq!(token.map(|t| t.len()), Some(MAX_TOKEN_LEN));
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_refresh() {
        let source = CountingSource::ok("minted");
        let provider = Arc::new(TokenProvider::with_source(
            service_account_config(),
            source.clone(),
        ));

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let provider = Arc::clone(&provider);
            tasks.push(tokio::spawn(async move { provider.get_token().await }));
        }
        for task in tasks {
            let token = task.await.expect("join").expect("token");
            assert_eq!(token.as_deref(), Some("minted"));
        }

        assert_eq!(source.mints(), 1, "refreshes must not interleave");
    }
}
