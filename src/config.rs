//! Client configuration
//!
//! Credentials and endpoint selection for the Klarna API, loadable from
//! the environment (with `.env` support) or built in code.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::error::{KlarnaError, KlarnaResult};
use crate::ratelimit::RateLimiterConfig;

/// Klarna API region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Europe
    #[serde(alias = "eu")]
    Europe,
    /// North America
    #[serde(alias = "na")]
    NorthAmerica,
    /// Oceania
    #[serde(alias = "oc")]
    Oceania,
}

impl Region {
    /// Base URL for this region, production or playground
    pub fn base_url(&self, playground: bool) -> &'static str {
        match (self, playground) {
            (Region::Europe, false) => "https://api.klarna.com/",
            (Region::Europe, true) => "https://api.playground.klarna.com/",
            (Region::NorthAmerica, false) => "https://api-na.klarna.com/",
            (Region::NorthAmerica, true) => "https://api-na.playground.klarna.com/",
            (Region::Oceania, false) => "https://api-oc.klarna.com/",
            (Region::Oceania, true) => "https://api-oc.playground.klarna.com/",
        }
    }

    /// Parse the short region codes used in environment variables
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "eu" | "europe" => Some(Region::Europe),
            "na" | "northamerica" => Some(Region::NorthAmerica),
            "oc" | "oceania" => Some(Region::Oceania),
            _ => None,
        }
    }
}

/// Client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Klarna API username
    pub username: String,

    /// Klarna API password
    pub password: String,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Attach a `Klarna-Idempotency-Key` to every POST
    #[serde(default)]
    pub idempotency_keys: bool,

    /// Client-side throttling, if any
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
}

impl ClientConfig {
    /// Create a new configuration against the EU production endpoint
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            base_url: default_base_url(),
            username: username.into(),
            password: password.into(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            idempotency_keys: false,
            rate_limit: None,
        }
    }

    /// Create a configuration for a region
    pub fn for_region(
        region: Region,
        playground: bool,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(username, password).with_base_url(region.base_url(playground))
    }

    /// Load configuration from the process environment
    ///
    /// A `.env` file in the working directory is loaded first when present.
    pub fn from_env() -> KlarnaResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> KlarnaResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| KlarnaError::Config(format!("{} is not set", key)))
        };

        let username = required("KLARNA_USERNAME")?;
        let password = required("KLARNA_PASSWORD")?;

        let playground = match lookup("KLARNA_PLAYGROUND") {
            Some(v) => parse_bool(&v).ok_or_else(|| {
                KlarnaError::Config(format!("KLARNA_PLAYGROUND must be a boolean, got {:?}", v))
            })?,
            None => false,
        };

        let region = match lookup("KLARNA_REGION") {
            Some(code) => Region::from_code(&code)
                .ok_or_else(|| KlarnaError::Config(format!("Unknown KLARNA_REGION {:?}", code)))?,
            None => Region::Europe,
        };

        let mut config = Self::for_region(region, playground, username, password);

        if let Some(base_url) = lookup("KLARNA_BASE_URL") {
            config = config.with_base_url(base_url.as_str());
            Url::parse(&config.base_url)
                .map_err(|e| KlarnaError::Config(format!("KLARNA_BASE_URL {:?}: {}", base_url, e)))?;
        }

        if let Some(timeout) = lookup("KLARNA_TIMEOUT_SECS") {
            let secs = timeout.trim().parse::<u64>().map_err(|e| {
                KlarnaError::Config(format!("KLARNA_TIMEOUT_SECS {:?}: {}", timeout, e))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the base URL; a trailing slash is appended if missing
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        self.base_url = base_url;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the User-Agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Enable idempotency keys on POST requests
    pub fn with_idempotency_keys(mut self, enabled: bool) -> Self {
        self.idempotency_keys = enabled;
        self
    }

    /// Enable client-side throttling
    pub fn with_rate_limit(mut self, rate_limit: RateLimiterConfig) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    /// Request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Parsed base URL
    pub fn base(&self) -> KlarnaResult<Url> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| KlarnaError::Config(format!("Invalid base URL {}: {}", self.base_url, e)))?;
        if url.cannot_be_a_base() {
            return Err(KlarnaError::Config(format!(
                "Base URL {} cannot be used as a base",
                self.base_url
            )));
        }
        Ok(url)
    }

    /// Validate the configuration
    pub fn validate(&self) -> KlarnaResult<()> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(KlarnaError::Config("API credentials must not be empty".to_string()));
        }

        self.base()?;

        if self.timeout_ms == 0 {
            return Err(KlarnaError::Config("Timeout must be greater than zero".to_string()));
        }

        if let Some(rate_limit) = &self.rate_limit {
            rate_limit.validate()?;
        }

        Ok(())
    }
}

// Keep the password out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("timeout_ms", &self.timeout_ms)
            .field("user_agent", &self.user_agent)
            .field("idempotency_keys", &self.idempotency_keys)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" | "" => Some(false),
        _ => None,
    }
}

fn default_base_url() -> String {
    Region::Europe.base_url(false).to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_user_agent() -> String {
    format!("klarna-order-management/{}", env!("CARGO_PKG_VERSION"))
}
