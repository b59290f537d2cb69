//! HTTP transport module
//!
//! Provides the HTTP client every service client is built on.
//!
//! # Features
//!
//! - **Automatic Retries**: Idempotent requests retried with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Expected Status Codes**: Per-request accepted status lists
//! - **Authentication**: Integration with auth module

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
