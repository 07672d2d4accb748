#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! HTTP transport for the Dinner Done Better API client.
//!
//! A hyper client wrapped in a tower middleware stack:
//! - TLS via rustls (HTTPS only unless explicitly relaxed)
//! - Per-attempt timeout and an optional deadline across all attempts
//! - Bounded retries with exponential backoff and jitter
//! - A child tracing span and [`AttemptHooks`] callbacks per attempt
//! - Default headers (`User-Agent`) on every request
//! - A redirect policy that refuses cross-origin hops and downgrades by default
//! - Transparent response decompression with a decompressed-size cap
//! - An insertion point for credential layers inside the retry loop
//!   ([`HttpClientBuilder::with_auth_layer`])
//!
//! # Example
//!
//! ```ignore
//! use ddb_http::{HttpClient, RetryConfig};
//! use std::time::Duration;
//!
//! let client = HttpClient::builder()
//!     .timeout(Duration::from_secs(10))
//!     .retry(RetryConfig::with_attempts(3))
//!     .build()?;
//!
//! let status: serde_json::Value = client
//!     .get("https://api.example.com/auth/status")
//!     .send()
//!     .await?
//!     .json()
//!     .await?;
//! ```

mod builder;
mod client;
mod config;
mod error;
mod hooks;
mod layers;
pub mod otel;
mod request;
mod response;
mod tls;

pub use builder::{HttpClientBuilder, InnerService};
pub use client::HttpClient;
pub use config::{
    DEFAULT_USER_AGENT, ExponentialBackoff, HttpClientConfig, RedirectConfig, RetryConfig,
    RetryTrigger, TlsRootConfig, TransportSecurity,
};
pub use error::{HttpError, InvalidUriKind};
pub use hooks::{AttemptHooks, LoggingHooks};
pub use layers::{
    DefaultHeadersLayer, DefaultHeadersService, OtelLayer, OtelService, RETRY_ATTEMPT_HEADER,
    RetryLayer, RetryService, SENSITIVE_HEADERS, SecureRedirectPolicy,
};
pub use request::RequestBuilder;
pub use response::{
    ERROR_BODY_PREVIEW_LIMIT, HttpResponse, ResponseBody, parse_retry_after, read_body_limited,
};
