//! HTTP client capability and response type
//!
//! This module defines the HttpClient trait the order management client
//! delegates to. Any transport (reqwest, a test double, a decorator) can
//! implement it.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, LOCATION};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::error::KlarnaResult;
use crate::types::RequestPayload;

/// Header Klarna uses to tag every response for support lookups
pub const CORRELATION_ID_HEADER: &str = "Klarna-Correlation-Id";

/// HTTP client capability
///
/// Paths are relative to the API base URL and carry no leading slash,
/// e.g. `ordermanagement/v1/orders/ord_1`. Identifiers are interpolated
/// unescaped, so an id containing `/`, `..`, `?` or `#` changes the URL the
/// transport resolves.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a GET request
    async fn get(&self, path: &str) -> KlarnaResult<ApiResponse>;

    /// Issue a POST request, with a JSON body when `body` is set
    async fn post(&self, path: &str, body: Option<&RequestPayload>) -> KlarnaResult<ApiResponse>;

    /// Issue a PATCH request, with a JSON body when `body` is set
    async fn patch(&self, path: &str, body: Option<&RequestPayload>) -> KlarnaResult<ApiResponse>;
}

#[async_trait]
impl<C: HttpClient + ?Sized> HttpClient for &C {
    async fn get(&self, path: &str) -> KlarnaResult<ApiResponse> {
        (**self).get(path).await
    }

    async fn post(&self, path: &str, body: Option<&RequestPayload>) -> KlarnaResult<ApiResponse> {
        (**self).post(path, body).await
    }

    async fn patch(&self, path: &str, body: Option<&RequestPayload>) -> KlarnaResult<ApiResponse> {
        (**self).patch(path, body).await
    }
}

#[async_trait]
impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    async fn get(&self, path: &str) -> KlarnaResult<ApiResponse> {
        (**self).get(path).await
    }

    async fn post(&self, path: &str, body: Option<&RequestPayload>) -> KlarnaResult<ApiResponse> {
        (**self).post(path, body).await
    }

    async fn patch(&self, path: &str, body: Option<&RequestPayload>) -> KlarnaResult<ApiResponse> {
        (**self).patch(path, body).await
    }
}

#[async_trait]
impl<C: HttpClient + ?Sized> HttpClient for Box<C> {
    async fn get(&self, path: &str) -> KlarnaResult<ApiResponse> {
        (**self).get(path).await
    }

    async fn post(&self, path: &str, body: Option<&RequestPayload>) -> KlarnaResult<ApiResponse> {
        (**self).post(path, body).await
    }

    async fn patch(&self, path: &str, body: Option<&RequestPayload>) -> KlarnaResult<ApiResponse> {
        (**self).patch(path, body).await
    }
}

/// Raw response returned by an HttpClient
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl ApiResponse {
    /// Create a new response
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<String>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// HTTP status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Value of a header, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Raw response body
    pub fn body(&self) -> &str {
        &self.body
    }

    /// True for bodiless responses such as `204 No Content`
    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// Deserialize the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> KlarnaResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// `Location` header, set by Klarna on created captures and refunds
    pub fn location(&self) -> Option<&str> {
        self.header(LOCATION.as_str())
    }

    /// Klarna correlation ID
    pub fn correlation_id(&self) -> Option<&str> {
        self.header(CORRELATION_ID_HEADER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;
    use serde_json::Value;

    #[test]
    fn test_response_accessors() {
        let mut headers = HeaderMap::new();
        headers.insert(
            LOCATION,
            HeaderValue::from_static("https://api.klarna.com/ordermanagement/v1/orders/o/captures/c"),
        );
        headers.insert("klarna-correlation-id", HeaderValue::from_static("corr-42"));

        let response = ApiResponse::new(StatusCode::CREATED, headers, "");

        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.is_empty());
        assert!(response.location().unwrap().ends_with("/captures/c"));
        assert_eq!(response.correlation_id(), Some("corr-42"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn test_response_json() {
        let response = ApiResponse::new(
            StatusCode::OK,
            HeaderMap::new(),
            r#"{"order_id":"ord_1","status":"AUTHORIZED"}"#,
        );

        let order: Value = response.json().unwrap();
        assert_eq!(order["status"], "AUTHORIZED");
        assert!(!response.is_empty());
    }

    #[test]
    fn test_response_json_error() {
        let response = ApiResponse::new(StatusCode::OK, HeaderMap::new(), "not json");
        assert!(response.json::<Value>().is_err());
    }
}
