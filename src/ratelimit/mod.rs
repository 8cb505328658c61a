//! Rate limiting
//!
//! This module provides client-side throttling to stay inside Klarna's API limits.

pub mod limiter;

pub use limiter::{RateLimitedClient, RateLimiter, RateLimiterConfig};
