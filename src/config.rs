//! Client configuration
//!
//! `ClientConfig` carries every constructor-time option of the client. The
//! library never reads the environment on its own; `ClientConfig::from_env`
//! is the one place that does, for bootstrap code such as the CLI.

use std::env;
use std::time::Duration;

use crate::cache::{DEFAULT_MAX_AGE, DEFAULT_MAX_ENTRIES};

/// Environment variable holding the default auth token
pub const AUTH_TOKEN_ENV: &str = "FOOTBALL_DATA_AUTH_TOKEN";

/// Default API host
pub const DEFAULT_BASE_URL: &str = "http://api.football-data.org";

/// Default API version segment
pub const DEFAULT_API_VERSION: &str = "v1";

/// Options used to build a `FootballDataClient`
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Value sent in the `X-Auth-Token` header, if any
    pub auth_token: Option<String>,
    /// API host, e.g. `http://api.football-data.org`
    pub base_url: String,
    /// Version segment placed between host and resource path
    pub api_version: String,
    /// Maximum number of cached responses
    pub cache_max_len: usize,
    /// Maximum age of a cached response
    pub cache_max_age: Duration,
    /// Overall request timeout applied by the transport
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            auth_token: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            cache_max_len: DEFAULT_MAX_ENTRIES,
            cache_max_age: DEFAULT_MAX_AGE,
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// Creates a default config with the auth token taken from `FOOTBALL_DATA_AUTH_TOKEN`
    ///
    /// An empty variable is treated as unset.
    pub fn from_env() -> Self {
        Self {
            auth_token: env::var(AUTH_TOKEN_ENV).ok().filter(|t| !t.is_empty()),
            ..Self::default()
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_cache_max_len(mut self, max_len: usize) -> Self {
        self.cache_max_len = max_len;
        self
    }

    pub fn with_cache_max_age(mut self, max_age: Duration) -> Self {
        self.cache_max_age = max_age;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
