//! HTTP client module
//!
//! The backend collaborator for every list screen.
//!
//! # Features
//!
//! - **Automatic Retries**: 429, 5xx, timeouts and connect errors, with backoff
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Error Translation**: `{ "message": ... }` bodies become `Error::HttpStatus`
//! - **Paging**: `HttpClient` is the `PageSource` used by the fetcher

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
