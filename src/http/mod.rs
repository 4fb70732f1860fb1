//! HTTP client module
//!
//! Provides the authenticated JSON transport used by the API client.
//!
//! # Features
//!
//! - **Authentication**: Integration with auth module
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Status Mapping**: Non-2xx responses surface as `Error::HttpStatus`
//!
//! Requests are never retried; a failed request fails the caller's stream.

mod client;
mod rate_limit;

pub use client::{
    HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig, DEFAULT_BASE_URL,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
