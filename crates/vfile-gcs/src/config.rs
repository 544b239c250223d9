//! Adapter configuration.
//!
//! Configuration is an explicit snapshot rather than per-call environment
//! lookups, so tests can construct isolated instances. `from_env` reads the
//! environment keys the adapter has always honored:
//!
//! | Key | Effect |
//! |---|---|
//! | `GCS_OAUTH_TOKEN` | used verbatim as the bearer token, bypassing the cache |
//! | `HTS_AUTH_LOCATION` | if set, token lookup opts out; the host's generic auth layer takes over |
//! | `GOOGLE_APPLICATION_CREDENTIALS` | enables cached subprocess-based token refresh |
//! | `GCS_REQUESTER_PAYS_PROJECT` | adds the `X-Goog-User-Project` header |

use serde::{Deserialize, Serialize};

/// Default Google service domain for rewritten URLs.
pub const DEFAULT_SERVICE_DOMAIN: &str = "googleapis.com";

/// Configuration for the GCS adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcsConfig {
    /// Explicit bearer token override. Highest precedence; never cached.
    #[serde(default)]
    pub oauth_token: Option<String>,
    /// When true, the token provider opts out and yields no token so an
    /// external authentication layer can take over.
    #[serde(default)]
    pub delegate_auth: bool,
    /// Service-account credential path. Presence enables the cached
    /// subprocess-based refresh route; the path itself is consumed by the
    /// credential-minting tool, not by this adapter.
    #[serde(default)]
    pub credentials_path: Option<String>,
    /// Requester-pays billing project, attached as `X-Goog-User-Project`.
    #[serde(default)]
    pub requester_pays_project: Option<String>,
    /// Service domain used when rewriting URLs.
    #[serde(default = "default_service_domain")]
    pub service_domain: String,
}

fn default_service_domain() -> String {
    DEFAULT_SERVICE_DOMAIN.to_string()
}

impl Default for GcsConfig {
    fn default() -> Self {
        Self {
            oauth_token: None,
            delegate_auth: false,
            credentials_path: None,
            requester_pays_project: None,
            service_domain: default_service_domain(),
        }
    }
}

impl GcsConfig {
    /// Builds configuration from the process environment.
    ///
    /// Values are trimmed; empty strings count as unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            oauth_token: env_string("GCS_OAUTH_TOKEN"),
            delegate_auth: env_string("HTS_AUTH_LOCATION").is_some(),
            credentials_path: env_string("GOOGLE_APPLICATION_CREDENTIALS"),
            requester_pays_project: env_string("GCS_REQUESTER_PAYS_PROJECT"),
            service_domain: default_service_domain(),
        }
    }

    /// Sets the explicit bearer token override.
    #[must_use]
    pub fn with_oauth_token(mut self, token: impl Into<String>) -> Self {
        self.oauth_token = Some(token.into());
        self
    }

    /// Opts token lookup out in favor of an external authentication layer.
    #[must_use]
    pub fn with_delegated_auth(mut self) -> Self {
        self.delegate_auth = true;
        self
    }

    /// Sets the service-account credential path.
    #[must_use]
    pub fn with_credentials_path(mut self, path: impl Into<String>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Sets the requester-pays billing project.
    #[must_use]
    pub fn with_requester_pays_project(mut self, project: impl Into<String>) -> Self {
        self.requester_pays_project = Some(project.into());
        self
    }

    /// Overrides the service domain used in rewritten URLs.
    #[must_use]
    pub fn with_service_domain(mut self, domain: impl Into<String>) -> Self {
        self.service_domain = domain.into();
        self
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .and_then(|value| if value.is_empty() { None } else { Some(value) })
}
