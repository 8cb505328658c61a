//! HTTP transport
//!
//! This module defines the HttpClient capability and the reqwest-backed
//! implementation used against the live API.

pub mod http_client;
pub mod reqwest_client;

pub use http_client::{ApiResponse, HttpClient};
pub use reqwest_client::ReqwestHttpClient;
