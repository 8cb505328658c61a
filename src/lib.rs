//! # klarna-order-management: Klarna Order Management API client
//!
//! An async client for the Klarna Order Management REST API: acknowledge,
//! adjust, cancel, capture and refund orders after checkout.
//!
//! ## Core Components
//!
//! - **OrderManagementClient**: one method per Order Management endpoint
//! - **HttpClient**: transport capability the client is built over
//! - **ReqwestHttpClient**: reqwest transport with Klarna basic auth
//! - **Rate Limiting**: optional client-side throttling decorator
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use klarna_order_management::{ClientConfig, OrderId, OrderManagementClient, Region};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::for_region(Region::Europe, true, "PK123_abc", "secret");
//!     let client = OrderManagementClient::from_config(&config)?;
//!
//!     let order_id = OrderId::new("f3392f8b-6116-4073-ab96-e330819e2c07");
//!     let order = client.get_order(&order_id).await?;
//!     println!("Order: {}", order.body());
//!
//!     let capture = klarna_order_management::payload_from(&json!({ "captured_amount": 6000 }))?;
//!     let response = client.create_capture(&order_id, &capture).await?;
//!     println!("Capture created at {:?}", response.location());
//!
//!     Ok(())
//! }
//! ```

// Public modules
pub mod config;
pub mod error;
pub mod order_management;
pub mod ratelimit;
pub mod transport;
pub mod types;

// Re-export main types
pub use config::{ClientConfig, Region};
pub use error::{KlarnaError, KlarnaResult};
pub use order_management::{OrderManagementClient, ORDERS_BASE_PATH};
pub use ratelimit::{RateLimitedClient, RateLimiter, RateLimiterConfig};
pub use transport::{ApiResponse, HttpClient, ReqwestHttpClient};
pub use types::{payload_from, CaptureId, OrderId, RefundId, RequestPayload};

// Initialize tracing
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();
}
