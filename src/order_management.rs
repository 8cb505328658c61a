//! Order Management API client
//!
//! One method per Klarna Order Management endpoint. Each call builds the
//! endpoint path, picks the verb, attaches the caller's payload when the
//! endpoint takes one, and hands the request to the injected HttpClient.
//! Responses and errors come back exactly as the HttpClient produced them.
//!
//! API reference: https://docs.klarna.com/api/ordermanagement/

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::KlarnaResult;
use crate::ratelimit::RateLimitedClient;
use crate::transport::{ApiResponse, HttpClient, ReqwestHttpClient};
use crate::types::{CaptureId, OrderId, RefundId, RequestPayload};

/// Path prefix shared by every order endpoint
pub const ORDERS_BASE_PATH: &str = "ordermanagement/v1/orders";

/// Klarna Order Management client
pub struct OrderManagementClient<C> {
    client: C,
}

impl OrderManagementClient<Box<dyn HttpClient>> {
    /// Build a client over reqwest from configuration
    ///
    /// Wraps the transport in a rate limiter when `config.rate_limit` is set.
    pub fn from_config(config: &ClientConfig) -> KlarnaResult<Self> {
        let http = ReqwestHttpClient::new(config)?;

        let client: Box<dyn HttpClient> = match &config.rate_limit {
            Some(rate_limit) => Box::new(RateLimitedClient::from_config(http, rate_limit)?),
            None => Box::new(http),
        };

        Ok(Self::new(client))
    }

    /// Build a client from environment variables
    pub fn from_env() -> KlarnaResult<Self> {
        Self::from_config(&ClientConfig::from_env()?)
    }
}

impl<C: HttpClient> OrderManagementClient<C> {
    /// Create a client over an HttpClient
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// The underlying HttpClient
    pub fn http_client(&self) -> &C {
        &self.client
    }

    /// Retrieve an order
    pub async fn get_order(&self, order_id: &OrderId) -> KlarnaResult<ApiResponse> {
        self.get("get_order", order_path(order_id)).await
    }

    /// Acknowledge an order
    pub async fn acknowledge(&self, order_id: &OrderId) -> KlarnaResult<ApiResponse> {
        self.post("acknowledge", order_action(order_id, "acknowledge"), None)
            .await
    }

    /// Set new order amount and order lines
    pub async fn change_authorization(
        &self,
        order_id: &OrderId,
        data: &RequestPayload,
    ) -> KlarnaResult<ApiResponse> {
        self.post(
            "change_authorization",
            order_action(order_id, "authorization"),
            Some(data),
        )
        .await
    }

    /// Adjust order amount and order lines
    pub async fn update_authorization(
        &self,
        order_id: &OrderId,
        data: &RequestPayload,
    ) -> KlarnaResult<ApiResponse> {
        self.post(
            "update_authorization",
            order_action(order_id, "authorization-adjustments"),
            Some(data),
        )
        .await
    }

    /// Cancel an order
    pub async fn cancel(&self, order_id: &OrderId) -> KlarnaResult<ApiResponse> {
        self.post("cancel", order_action(order_id, "cancel"), None).await
    }

    /// Update customer shipping and billing addresses
    pub async fn update_customer_details(
        &self,
        order_id: &OrderId,
        data: &RequestPayload,
    ) -> KlarnaResult<ApiResponse> {
        self.patch(
            "update_customer_details",
            order_action(order_id, "customer-details"),
            Some(data),
        )
        .await
    }

    /// Extend the authorization time of an order
    pub async fn extend_authorization_time(&self, order_id: &OrderId) -> KlarnaResult<ApiResponse> {
        self.post(
            "extend_authorization_time",
            order_action(order_id, "extend-authorization-time"),
            None,
        )
        .await
    }

    /// Update merchant references
    pub async fn update_merchant_references(
        &self,
        order_id: &OrderId,
        data: &RequestPayload,
    ) -> KlarnaResult<ApiResponse> {
        self.patch(
            "update_merchant_references",
            order_action(order_id, "merchant-references"),
            Some(data),
        )
        .await
    }

    /// Release the remaining authorized amount
    pub async fn release_remaining_authorization(
        &self,
        order_id: &OrderId,
    ) -> KlarnaResult<ApiResponse> {
        self.post(
            "release_remaining_authorization",
            order_action(order_id, "release-remaining-authorization"),
            None,
        )
        .await
    }

    /// List all captures of an order
    pub async fn list_captures(&self, order_id: &OrderId) -> KlarnaResult<ApiResponse> {
        self.get("list_captures", order_action(order_id, "captures"))
            .await
    }

    /// Capture part or all of the authorized amount
    pub async fn create_capture(
        &self,
        order_id: &OrderId,
        data: &RequestPayload,
    ) -> KlarnaResult<ApiResponse> {
        self.post(
            "create_capture",
            order_action(order_id, "captures"),
            Some(data),
        )
        .await
    }

    /// Retrieve one capture
    pub async fn get_capture(
        &self,
        order_id: &OrderId,
        capture_id: &CaptureId,
    ) -> KlarnaResult<ApiResponse> {
        self.get("get_capture", capture_path(order_id, capture_id))
            .await
    }

    /// Add shipping info to a capture
    pub async fn add_shipping_info_to_capture(
        &self,
        order_id: &OrderId,
        capture_id: &CaptureId,
        data: &RequestPayload,
    ) -> KlarnaResult<ApiResponse> {
        self.post(
            "add_shipping_info_to_capture",
            format!("{}/shipping-info", capture_path(order_id, capture_id)),
            Some(data),
        )
        .await
    }

    /// Trigger a resend of the customer communication for a capture
    pub async fn trigger_capture_send_out(
        &self,
        order_id: &OrderId,
        capture_id: &CaptureId,
    ) -> KlarnaResult<ApiResponse> {
        self.post(
            "trigger_capture_send_out",
            format!("{}/trigger-send-out", capture_path(order_id, capture_id)),
            None,
        )
        .await
    }

    /// Refund part or all of a captured amount
    pub async fn create_refund(
        &self,
        order_id: &OrderId,
        data: &RequestPayload,
    ) -> KlarnaResult<ApiResponse> {
        self.post("create_refund", order_action(order_id, "refunds"), Some(data))
            .await
    }

    /// Retrieve one refund
    pub async fn get_refund(
        &self,
        order_id: &OrderId,
        refund_id: &RefundId,
    ) -> KlarnaResult<ApiResponse> {
        self.get(
            "get_refund",
            format!("{}/{}", order_action(order_id, "refunds"), refund_id),
        )
        .await
    }

    async fn get(&self, operation: &str, path: String) -> KlarnaResult<ApiResponse> {
        debug!("{}: GET {}", operation, path);
        self.client.get(&path).await
    }

    async fn post(
        &self,
        operation: &str,
        path: String,
        body: Option<&RequestPayload>,
    ) -> KlarnaResult<ApiResponse> {
        debug!("{}: POST {}", operation, path);
        self.client.post(&path, body).await
    }

    async fn patch(
        &self,
        operation: &str,
        path: String,
        body: Option<&RequestPayload>,
    ) -> KlarnaResult<ApiResponse> {
        debug!("{}: PATCH {}", operation, path);
        self.client.patch(&path, body).await
    }
}

fn order_path(order_id: &OrderId) -> String {
    format!("{}/{}", ORDERS_BASE_PATH, order_id)
}

fn order_action(order_id: &OrderId, action: &str) -> String {
    format!("{}/{}", order_path(order_id), action)
}

fn capture_path(order_id: &OrderId, capture_id: &CaptureId) -> String {
    format!("{}/{}", order_action(order_id, "captures"), capture_id)
}
