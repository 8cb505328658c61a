//! Rate limiting implementation
//!
//! Client-side throttling for Klarna API requests using a token bucket.
//! Requests are delayed, never retried or dropped.

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter as GovRateLimiter};
use nonzero_ext::nonzero;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use tracing::debug;

use crate::error::{KlarnaError, KlarnaResult};
use crate::transport::http_client::{ApiResponse, HttpClient};
use crate::types::RequestPayload;

fn default_requests_per_second() -> NonZeroU32 {
    nonzero!(10u32)
}

fn default_burst_size() -> NonZeroU32 {
    nonzero!(20u32)
}

/// Rate limiter for API requests
pub struct RateLimiter {
    limiter: DefaultDirectRateLimiter,
    requests_per_second: u32,
    burst_size: u32,
}

impl RateLimiter {
    /// Create a new rate limiter
    ///
    /// # Arguments
    /// * `requests_per_second` - Maximum requests per second
    /// * `burst_size` - Maximum burst capacity
    pub fn new(requests_per_second: u32, burst_size: u32) -> KlarnaResult<Self> {
        let rps = NonZeroU32::new(requests_per_second).ok_or_else(|| {
            KlarnaError::Config("requests_per_second must be greater than zero".to_string())
        })?;
        let burst = NonZeroU32::new(burst_size)
            .ok_or_else(|| KlarnaError::Config("burst_size must be greater than zero".to_string()))?;

        Ok(Self::from_parts(rps, burst))
    }

    fn from_parts(requests_per_second: NonZeroU32, burst_size: NonZeroU32) -> Self {
        let quota = Quota::per_second(requests_per_second).allow_burst(burst_size);

        Self {
            limiter: GovRateLimiter::direct(quota),
            requests_per_second: requests_per_second.get(),
            burst_size: burst_size.get(),
        }
    }

    /// Wait until the rate limit allows the request
    pub async fn check(&self) -> KlarnaResult<()> {
        if self.limiter.check().is_err() {
            debug!(
                "Rate limit reached ({} req/s), waiting for capacity",
                self.requests_per_second
            );
            self.limiter.until_ready().await;
        }
        Ok(())
    }

    /// Try to acquire permission without waiting
    ///
    /// # Returns
    /// * `Ok(())` - Permission granted
    /// * `Err(KlarnaError::RateLimitExceeded)` - Rate limit exceeded
    pub fn try_check(&self) -> KlarnaResult<()> {
        self.limiter
            .check()
            .map_err(|_| KlarnaError::RateLimitExceeded {
                requests_per_second: self.requests_per_second,
                burst_size: self.burst_size,
            })
    }

    /// Get requests per second limit
    pub fn requests_per_second(&self) -> u32 {
        self.requests_per_second
    }

    /// Get burst size
    pub fn burst_size(&self) -> u32 {
        self.burst_size
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::from_parts(default_requests_per_second(), default_burst_size())
    }
}

/// Rate limiter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimiterConfig {
    /// Requests per second
    pub requests_per_second: u32,
    /// Burst capacity
    pub burst_size: u32,
}

impl RateLimiterConfig {
    /// Create a new rate limiter configuration
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }

    /// Conservative default for the Klarna API
    pub fn klarna_default() -> Self {
        Self {
            requests_per_second: default_requests_per_second().get(),
            burst_size: default_burst_size().get(),
        }
    }

    /// Reject zero rates and bursts
    pub fn validate(&self) -> KlarnaResult<()> {
        if self.requests_per_second == 0 || self.burst_size == 0 {
            return Err(KlarnaError::Config(format!(
                "Rate limit must be positive, got {} req/s burst {}",
                self.requests_per_second, self.burst_size
            )));
        }
        Ok(())
    }

    /// Build a rate limiter with this configuration
    pub fn build(&self) -> KlarnaResult<RateLimiter> {
        RateLimiter::new(self.requests_per_second, self.burst_size)
    }
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self::klarna_default()
    }
}

/// HttpClient decorator that throttles every request
pub struct RateLimitedClient<C> {
    inner: C,
    limiter: RateLimiter,
}

impl<C: HttpClient> RateLimitedClient<C> {
    /// Wrap a client with a rate limiter
    pub fn new(inner: C, limiter: RateLimiter) -> Self {
        Self { inner, limiter }
    }

    /// Wrap a client, building the limiter from configuration
    pub fn from_config(inner: C, config: &RateLimiterConfig) -> KlarnaResult<Self> {
        Ok(Self::new(inner, config.build()?))
    }

    /// The wrapped client
    pub fn inner(&self) -> &C {
        &self.inner
    }

    /// The rate limiter
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for RateLimitedClient<C> {
    async fn get(&self, path: &str) -> KlarnaResult<ApiResponse> {
        self.limiter.check().await?;
        self.inner.get(path).await
    }

    async fn post(&self, path: &str, body: Option<&RequestPayload>) -> KlarnaResult<ApiResponse> {
        self.limiter.check().await?;
        self.inner.post(path, body).await
    }

    async fn patch(&self, path: &str, body: Option<&RequestPayload>) -> KlarnaResult<ApiResponse> {
        self.limiter.check().await?;
        self.inner.patch(path, body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    #[derive(Default)]
    struct EchoClient {
        calls: Mutex<Vec<(String, String, Option<RequestPayload>)>>,
    }

    impl EchoClient {
        fn record(&self, verb: &str, path: &str, body: Option<&RequestPayload>) -> ApiResponse {
            self.calls
                .lock()
                .unwrap()
                .push((verb.to_string(), path.to_string(), body.cloned()));
            ApiResponse::new(StatusCode::OK, HeaderMap::new(), "{}")
        }
    }

    #[async_trait]
    impl HttpClient for EchoClient {
        async fn get(&self, path: &str) -> KlarnaResult<ApiResponse> {
            Ok(self.record("GET", path, None))
        }

        async fn post(&self, path: &str, body: Option<&RequestPayload>) -> KlarnaResult<ApiResponse> {
            Ok(self.record("POST", path, body))
        }

        async fn patch(&self, path: &str, body: Option<&RequestPayload>) -> KlarnaResult<ApiResponse> {
            Ok(self.record("PATCH", path, body))
        }
    }

    #[tokio::test]
    async fn test_rate_limiter_allows_requests() {
        let limiter = RateLimiter::new(10, 10).unwrap();

        // First request should succeed immediately
        assert!(limiter.try_check().is_ok());
    }

    #[tokio::test]
    async fn test_rate_limiter_enforces_limit() {
        let limiter = RateLimiter::new(2, 2).unwrap();

        assert!(limiter.try_check().is_ok());
        assert!(limiter.try_check().is_ok());

        let result = limiter.try_check();
        assert!(matches!(result, Err(KlarnaError::RateLimitExceeded { .. })));
    }

    #[tokio::test]
    async fn test_rate_limiter_check_waits() {
        let limiter = RateLimiter::new(2, 2).unwrap();

        // Exhaust burst capacity
        limiter.try_check().unwrap();
        limiter.try_check().unwrap();

        let start = Instant::now();
        limiter.check().await.unwrap();

        assert!(start.elapsed() > Duration::from_millis(100));
    }

    #[test]
    fn test_rate_limiter_rejects_zero() {
        assert!(RateLimiter::new(0, 10).is_err());
        assert!(RateLimiter::new(10, 0).is_err());
    }

    #[test]
    fn test_rate_limiter_config() {
        let config = RateLimiterConfig::new(15, 30);
        let limiter = config.build().unwrap();
        assert_eq!(limiter.requests_per_second(), 15);
        assert_eq!(limiter.burst_size(), 30);

        let default_config = RateLimiterConfig::default();
        assert_eq!(default_config.requests_per_second, 10);
        assert_eq!(default_config.burst_size, 20);

        let limiter = RateLimiter::default();
        assert_eq!(limiter.requests_per_second(), 10);
        assert_eq!(limiter.burst_size(), 20);
    }

    #[tokio::test]
    async fn test_rate_limited_client_forwards_requests() {
        let client =
            RateLimitedClient::from_config(EchoClient::default(), &RateLimiterConfig::new(100, 100))
                .unwrap();

        let body = json!({ "amount": 500 }).as_object().cloned().unwrap();
        client.get("a").await.unwrap();
        client.post("b", Some(&body)).await.unwrap();
        client.patch("c", None).await.unwrap();

        let calls = client.inner().calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], ("GET".to_string(), "a".to_string(), None));
        assert_eq!(calls[1], ("POST".to_string(), "b".to_string(), Some(body)));
        assert_eq!(calls[2], ("PATCH".to_string(), "c".to_string(), None));
    }
}
