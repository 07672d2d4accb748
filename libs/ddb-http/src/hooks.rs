//! Per-attempt callbacks driven by the retry layer.

use crate::error::HttpError;
use http::StatusCode;
use http::request::Parts;
use std::time::Duration;

/// Observer notified around every HTTP attempt.
///
/// `attempt` is 1-based. `on_error` fires once per call, only when the call
/// ends in an error after the last permitted attempt. A retryable server
/// status still standing after that attempt counts as an error here and
/// arrives as [`HttpError::HttpStatus`], though the caller gets the response.
pub trait AttemptHooks: Send + Sync {
    /// Before an attempt is sent
    fn on_request(&self, attempt: usize, request: &Parts) {
        let _ = (attempt, request);
    }

    /// After a response head arrives, whatever the status
    fn on_response(&self, attempt: usize, status: StatusCode, elapsed: Duration) {
        let _ = (attempt, status, elapsed);
    }

    /// When the call fails terminally, or gives up on a server error
    fn on_error(&self, attempt: usize, error: &HttpError) {
        let _ = (attempt, error);
    }
}

/// Hooks that write to `tracing`.
///
/// Query strings are left out of logged URLs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHooks;

impl AttemptHooks for LoggingHooks {
    fn on_request(&self, attempt: usize, request: &Parts) {
        tracing::debug!(
            attempt,
            method = %request.method,
            path = request.uri.path(),
            "sending request"
        );
    }

    fn on_response(&self, attempt: usize, status: StatusCode, elapsed: Duration) {
        tracing::debug!(
            attempt,
            status = status.as_u16(),
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "received response"
        );
    }

    fn on_error(&self, attempt: usize, error: &HttpError) {
        tracing::error!(attempt, error = %error, "request failed");
    }
}
