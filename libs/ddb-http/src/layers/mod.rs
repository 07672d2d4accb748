//! Tower layers composing the transport stack.
//!
//! - [`DefaultHeadersLayer`] - fills in `User-Agent` and other fixed headers
//! - [`RetryLayer`] - bounded retries, attempt spans and [`AttemptHooks`](crate::AttemptHooks)
//! - [`OtelLayer`] - `outgoing_http` span and trace-context propagation
//! - [`SecureRedirectPolicy`] - origin-aware redirect following

mod default_headers;
mod otel;
mod redirect;
mod retry;

pub use default_headers::{DefaultHeadersLayer, DefaultHeadersService};
pub use otel::{OtelLayer, OtelService};
pub use redirect::{SENSITIVE_HEADERS, SecureRedirectPolicy};
pub use retry::{RETRY_ATTEMPT_HEADER, RetryLayer, RetryService};
