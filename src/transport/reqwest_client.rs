//! reqwest-backed HttpClient
//!
//! Talks to the Klarna REST API over HTTPS with basic authentication.
//! Documentation: https://docs.klarna.com/api/authentication/

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{KlarnaError, KlarnaResult};
use crate::transport::http_client::{ApiResponse, HttpClient, CORRELATION_ID_HEADER};
use crate::types::RequestPayload;

/// Header carrying the idempotency key on POST requests
pub const IDEMPOTENCY_KEY_HEADER: &str = "Klarna-Idempotency-Key";

/// Klarna HTTP client
pub struct ReqwestHttpClient {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
    idempotency_keys: bool,
}

impl ReqwestHttpClient {
    /// Create a new client from configuration
    pub fn new(config: &ClientConfig) -> KlarnaResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| KlarnaError::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!("Created Klarna HTTP client for {}", config.base_url);

        Ok(Self {
            client,
            base_url: config.base()?,
            username: config.username.clone(),
            password: config.password.clone(),
            idempotency_keys: config.idempotency_keys,
        })
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a relative API path
    pub fn url(&self, path: &str) -> KlarnaResult<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&RequestPayload>,
    ) -> KlarnaResult<ApiResponse> {
        let url = self.url(path)?;
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), url)
            .basic_auth(&self.username, Some(&self.password));

        if self.idempotency_keys && method == Method::POST {
            request = request.header(IDEMPOTENCY_KEY_HEADER, Uuid::new_v4().to_string());
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;

        if !status.is_success() {
            let error = api_error(status, &headers, text);
            warn!("{} {} failed: {}", method, path, error);
            return Err(error);
        }

        debug!("{} {} -> {}", method, path, status);
        Ok(ApiResponse::new(status, headers, text))
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, path: &str) -> KlarnaResult<ApiResponse> {
        self.send(Method::GET, path, None).await
    }

    async fn post(&self, path: &str, body: Option<&RequestPayload>) -> KlarnaResult<ApiResponse> {
        self.send(Method::POST, path, body).await
    }

    async fn patch(&self, path: &str, body: Option<&RequestPayload>) -> KlarnaResult<ApiResponse> {
        self.send(Method::PATCH, path, body).await
    }
}

// Klarna error document
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    error_messages: Vec<String>,
    #[serde(default)]
    correlation_id: Option<String>,
}

fn api_error(status: StatusCode, headers: &HeaderMap, body: String) -> KlarnaError {
    let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();

    let correlation_id = parsed.correlation_id.or_else(|| {
        headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    });

    KlarnaError::Api {
        status,
        error_code: parsed.error_code,
        error_messages: parsed.error_messages,
        correlation_id,
        body,
    }
}
