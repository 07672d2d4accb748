use crate::config::{ExponentialBackoff, RetryConfig, RetryTrigger};
use crate::error::HttpError;
use crate::hooks::{AttemptHooks, LoggingHooks};
use crate::response::{ResponseBody, parse_retry_after};
use bytes::Bytes;
use http::{HeaderValue, Request, Response};
use http_body_util::{BodyExt, Full};
use rand::Rng;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::Instant;
use tower::{Layer, Service, ServiceExt};
use tracing::Instrument;

/// Header carried by retried attempts: the number of retries so far (1 on the second attempt).
pub const RETRY_ATTEMPT_HEADER: &str = "x-retry-attempt";

/// Tower layer that drives up to `max_attempts` attempts per request.
///
/// Every attempt runs inside an `http_attempt` span and is reported to the
/// configured [`AttemptHooks`].
#[derive(Clone)]
pub struct RetryLayer {
    config: RetryConfig,
    total_timeout: Option<Duration>,
    hooks: Arc<dyn AttemptHooks>,
}

impl RetryLayer {
    #[must_use]
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            total_timeout: None,
            hooks: Arc::new(LoggingHooks),
        }
    }

    /// Bound all attempts and backoff sleeps by one deadline
    #[must_use]
    pub fn with_total_timeout(mut self, total_timeout: Option<Duration>) -> Self {
        self.total_timeout = total_timeout;
        self
    }

    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<dyn AttemptHooks>) -> Self {
        self.hooks = hooks;
        self
    }
}

impl<S> Layer<S> for RetryLayer {
    type Service = RetryService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RetryService {
            inner,
            config: self.config.clone(),
            total_timeout: self.total_timeout,
            hooks: Arc::clone(&self.hooks),
        }
    }
}

/// Service created by [`RetryLayer`].
///
/// Returns `Ok(Response)` for every status once attempts are exhausted; only
/// transport, timeout and deadline failures come back as `Err`. Each attempt
/// is rebuilt from the original parts and a clone of the buffered body.
#[derive(Clone)]
pub struct RetryService<S> {
    inner: S,
    config: RetryConfig,
    total_timeout: Option<Duration>,
    hooks: Arc<dyn AttemptHooks>,
}

impl<S> Service<Request<Full<Bytes>>> for RetryService<S>
where
    S: Service<Request<Full<Bytes>>, Response = Response<ResponseBody>, Error = HttpError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = HttpError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Full<Bytes>>) -> Self::Future {
        let clone = self.inner.clone();
        let inner = std::mem::replace(&mut self.inner, clone);
        let config = self.config.clone();
        let total_timeout = self.total_timeout;
        let hooks = Arc::clone(&self.hooks);

        let (parts, body) = req.into_parts();
        let version = parts.version;
        let extensions = parts.extensions.clone();
        let parts = Arc::new(parts);

        Box::pin(async move {
            let deadline = total_timeout.map(|t| (Instant::now() + t, t));
            let max_attempts = config.max_attempts.max(1);
            let mut attempt = 1usize;

            loop {
                if let Some((at, budget)) = deadline
                    && Instant::now() >= at
                {
                    return Err(HttpError::DeadlineExceeded(budget));
                }

                let mut req = Request::from_parts((*parts).clone(), body.clone());
                *req.version_mut() = version;
                *req.extensions_mut() = extensions.clone();
                if attempt > 1
                    && let Ok(value) = HeaderValue::try_from((attempt - 1).to_string())
                {
                    req.headers_mut().insert(RETRY_ATTEMPT_HEADER, value);
                }

                hooks.on_request(attempt, &parts);

                let span = tracing::debug_span!(
                    "http_attempt",
                    attempt,
                    max_attempts,
                    http.status_code = tracing::field::Empty,
                    outcome = tracing::field::Empty,
                );
                let started = Instant::now();
                let mut svc = inner.clone();
                let result = async {
                    svc.ready().await?;
                    svc.call(req).await
                }
                .instrument(span.clone())
                .await;

                let (trigger, retry_after) = match &result {
                    Ok(resp) => {
                        span.record("http.status_code", resp.status().as_u16());
                        hooks.on_response(attempt, resp.status(), started.elapsed());
                        (
                            RetryTrigger::Status(resp.status().as_u16()),
                            parse_retry_after(resp.headers()),
                        )
                    }
                    Err(err) => (RetryTrigger::from(err), None),
                };

                if !config.should_retry(trigger, attempt) {
                    let outcome = match &result {
                        Ok(resp) if resp.status().is_success() => "success",
                        Ok(_) => "status",
                        Err(_) => "error",
                    };
                    span.record("outcome", outcome);
                    match &result {
                        Err(err) => hooks.on_error(attempt, err),
                        Ok(resp) if trigger.is_retryable() => {
                            hooks.on_error(attempt, &unrecovered(resp));
                        }
                        Ok(_) => {}
                    }
                    return result;
                }
                span.record("outcome", "retry");

                let delay = match retry_after {
                    Some(server_delay) if !config.ignore_retry_after => {
                        server_delay.min(config.backoff.max_wait)
                    }
                    _ => calculate_backoff(&config.backoff, attempt - 1),
                };
                let delay = match deadline {
                    Some((at, budget)) => {
                        let remaining = at.saturating_duration_since(Instant::now());
                        if remaining.is_zero() {
                            return Err(HttpError::DeadlineExceeded(budget));
                        }
                        delay.min(remaining)
                    }
                    None => delay,
                };

                match result {
                    Ok(resp) => {
                        if let Err(e) = drain_response_body(resp, config.retry_response_drain_limit).await
                        {
                            tracing::debug!(error = %e, "failed to drain body before retry");
                        }
                        tracing::warn!(
                            attempt,
                            max_attempts,
                            trigger = ?trigger,
                            method = %parts.method,
                            path = parts.uri.path(),
                            backoff_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            "retrying after server error"
                        );
                    }
                    Err(err) => {
                        tracing::warn!(
                            attempt,
                            max_attempts,
                            error = %err,
                            method = %parts.method,
                            path = parts.uri.path(),
                            backoff_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                            "retrying after transport error"
                        );
                    }
                }

                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        })
    }
}

impl From<&HttpError> for RetryTrigger {
    fn from(err: &HttpError) -> Self {
        match err {
            HttpError::Transport(_) => RetryTrigger::TransportError,
            HttpError::Timeout(_) => RetryTrigger::Timeout,
            _ => RetryTrigger::NonRetryable,
        }
    }
}

/// Read and discard up to `limit` bytes so the connection can be pooled again.
async fn drain_response_body(
    response: Response<ResponseBody>,
    limit: usize,
) -> Result<(), HttpError> {
    let mut body = std::pin::pin!(response.into_body());
    let mut drained = 0usize;

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(HttpError::Transport)?;
        if let Some(chunk) = frame.data_ref() {
            drained += chunk.len();
            if drained >= limit {
                break;
            }
        }
    }

    Ok(())
}

/// Delay before retry number `retry` (0-based).
///
/// Non-finite or negative inputs fall back to safe values instead of panicking.
pub fn calculate_backoff(backoff: &ExponentialBackoff, retry: usize) -> Duration {
    const MAX_BACKOFF_SECS: f64 = 86400.0;

    let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
    let multiplier = if backoff.multiplier.is_finite() && backoff.multiplier >= 0.0 {
        backoff.multiplier
    } else {
        1.0
    };
    let min_secs = backoff.min_wait.as_secs_f64();
    let max_secs = backoff.max_wait.as_secs_f64().min(MAX_BACKOFF_SECS);

    let raw = min_secs * multiplier.powi(exponent);
    let clamped = if raw.is_finite() {
        raw.clamp(0.0, max_secs)
    } else {
        max_secs
    };
    let mut delay = Duration::from_secs_f64(clamped);

    if backoff.jitter {
        let factor = rand::rng().random_range(0.0..=0.25);
        delay += delay.mul_f64(factor);
    }

    delay.min(Duration::from_secs_f64(max_secs))
}

/// Terminal report for a server error that outlasted every permitted attempt.
/// The body is left unread for the caller.
fn unrecovered(resp: &Response<ResponseBody>) -> HttpError {
    HttpError::HttpStatus {
        status: resp.status(),
        body_preview: String::new(),
        content_type: resp
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned),
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use http::{Method, StatusCode};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn body(data: &'static [u8]) -> ResponseBody {
        Full::new(Bytes::from_static(data))
            .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> { Box::new(e) })
            .boxed()
    }

    /// Answers with the scripted statuses in order, repeating the last one.
    #[derive(Clone)]
    struct Scripted {
        statuses: Arc<Vec<u16>>,
        calls: Arc<AtomicUsize>,
        retry_headers: Arc<Mutex<Vec<Option<String>>>>,
    }

    impl Scripted {
        fn new(statuses: &[u16]) -> Self {
            Self {
                statuses: Arc::new(statuses.to_vec()),
                calls: Arc::new(AtomicUsize::new(0)),
                retry_headers: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl Service<Request<Full<Bytes>>> for Scripted {
        type Response = Response<ResponseBody>;
        type Error = HttpError;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

        fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: Request<Full<Bytes>>) -> Self::Future {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let status = *self
                .statuses
                .get(n)
                .or_else(|| self.statuses.last())
                .unwrap();
            self.retry_headers.lock().unwrap().push(
                req.headers()
                    .get(RETRY_ATTEMPT_HEADER)
                    .map(|v| v.to_str().unwrap().to_owned()),
            );
            Box::pin(async move {
                Ok(Response::builder()
                    .status(status)
                    .body(body(b"{}"))
                    .unwrap())
            })
        }
    }

    /// Fails every call with a transport error.
    #[derive(Clone, Default)]
    struct Unreachable {
        calls: Arc<AtomicUsize>,
    }

    impl Service<Request<Full<Bytes>>> for Unreachable {
        type Response = Response<ResponseBody>;
        type Error = HttpError;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

        fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, _req: Request<Full<Bytes>>) -> Self::Future {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async { Err(HttpError::Transport("connection refused".into())) })
        }
    }

    #[derive(Default)]
    struct CountingHooks {
        requests: AtomicUsize,
        responses: AtomicUsize,
        errors: AtomicUsize,
    }

    impl AttemptHooks for CountingHooks {
        fn on_request(&self, _: usize, _: &http::request::Parts) {
            self.requests.fetch_add(1, Ordering::SeqCst);
        }

        fn on_response(&self, _: usize, _: StatusCode, _: Duration) {
            self.responses.fetch_add(1, Ordering::SeqCst);
        }

        fn on_error(&self, _: usize, _: &HttpError) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn get() -> Request<Full<Bytes>> {
        Request::builder()
            .method(Method::GET)
            .uri("http://example.com/api/v1/recipes")
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn fast(attempts: usize) -> RetryConfig {
        RetryConfig::with_attempts(attempts).backoff(ExponentialBackoff::fast())
    }

    #[tokio::test]
    async fn test_default_policy_makes_one_attempt() {
        let svc = Scripted::new(&[503, 200]);
        let retry = RetryLayer::new(RetryConfig::default()).layer(svc.clone());

        let resp = retry.oneshot(get()).await.unwrap();

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(svc.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_5xx_until_success() {
        let svc = Scripted::new(&[500, 502, 200]);
        let retry = RetryLayer::new(fast(3)).layer(svc.clone());

        let resp = retry.oneshot(get()).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(svc.calls.load(Ordering::SeqCst), 3);
        let headers = svc.retry_headers.lock().unwrap().clone();
        assert_eq!(
            headers,
            vec![None, Some("1".to_owned()), Some("2".to_owned())]
        );
    }

    #[tokio::test]
    async fn test_attempts_never_exceed_limit() {
        let svc = Scripted::new(&[503]);
        let retry = RetryLayer::new(fast(4)).layer(svc.clone());

        let resp = retry.oneshot(get()).await.unwrap();

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(svc.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_not_implemented_is_final() {
        let svc = Scripted::new(&[501, 200]);
        let retry = RetryLayer::new(fast(3)).layer(svc.clone());

        let resp = retry.oneshot(get()).await.unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(svc.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_client_errors_are_never_retried() {
        for status in [400, 401, 404, 409, 429] {
            let svc = Scripted::new(&[status, 200]);
            let retry = RetryLayer::new(fast(5)).layer(svc.clone());

            let resp = retry.oneshot(get()).await.unwrap();

            assert_eq!(resp.status().as_u16(), status);
            assert_eq!(svc.calls.load(Ordering::SeqCst), 1, "status {status}");
        }
    }

    #[tokio::test]
    async fn test_post_is_retried_on_5xx() {
        let svc = Scripted::new(&[503, 201]);
        let retry = RetryLayer::new(fast(2)).layer(svc.clone());
        let req = Request::builder()
            .method(Method::POST)
            .uri("http://example.com/api/v1/recipes")
            .body(Full::new(Bytes::from_static(b"{\"name\":\"soup\"}")))
            .unwrap();

        let resp = retry.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(svc.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_transport_errors_retried_then_surfaced() {
        let svc = Unreachable::default();
        let hooks = Arc::new(CountingHooks::default());
        let retry = RetryLayer::new(fast(3))
            .with_hooks(hooks.clone())
            .layer(svc.clone());

        let err = retry.oneshot(get()).await.unwrap_err();

        assert!(matches!(err, HttpError::Transport(_)));
        assert_eq!(svc.calls.load(Ordering::SeqCst), 3);
        assert_eq!(hooks.requests.load(Ordering::SeqCst), 3);
        assert_eq!(hooks.responses.load(Ordering::SeqCst), 0);
        assert_eq!(hooks.errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_server_error_reaches_error_hook() {
        let svc = Scripted::new(&[503]);
        let hooks = Arc::new(CountingHooks::default());
        let retry = RetryLayer::new(fast(3))
            .with_hooks(hooks.clone())
            .layer(svc.clone());

        let resp = retry.oneshot(get()).await.unwrap();

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(svc.calls.load(Ordering::SeqCst), 3);
        assert_eq!(hooks.responses.load(Ordering::SeqCst), 3);
        assert_eq!(hooks.errors.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_final_client_error_skips_error_hook() {
        for status in [404, 501] {
            let svc = Scripted::new(&[status]);
            let hooks = Arc::new(CountingHooks::default());
            let retry = RetryLayer::new(fast(3))
                .with_hooks(hooks.clone())
                .layer(svc);

            retry.oneshot(get()).await.unwrap();

            assert_eq!(hooks.errors.load(Ordering::SeqCst), 0, "status {status}");
        }
    }

    #[tokio::test]
    async fn test_hooks_see_every_response() {
        let svc = Scripted::new(&[502, 200]);
        let hooks = Arc::new(CountingHooks::default());
        let retry = RetryLayer::new(fast(2))
            .with_hooks(hooks.clone())
            .layer(svc);

        retry.oneshot(get()).await.unwrap();

        assert_eq!(hooks.requests.load(Ordering::SeqCst), 2);
        assert_eq!(hooks.responses.load(Ordering::SeqCst), 2);
        assert_eq!(hooks.errors.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_deadline_stops_retries() {
        let svc = Unreachable::default();
        let config = RetryConfig::with_attempts(100).backoff(ExponentialBackoff::new(
            Duration::from_millis(20),
            Duration::from_millis(20),
        ));
        let retry = RetryLayer::new(config)
            .with_total_timeout(Some(Duration::from_millis(50)))
            .layer(svc.clone());

        let err = retry.oneshot(get()).await.unwrap_err();

        assert!(matches!(err, HttpError::DeadlineExceeded(_)));
        assert!(svc.calls.load(Ordering::SeqCst) < 100);
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let backoff = ExponentialBackoff {
            min_wait: Duration::from_millis(100),
            max_wait: Duration::from_millis(350),
            multiplier: 2.0,
            jitter: false,
        };
        assert_eq!(calculate_backoff(&backoff, 0), Duration::from_millis(100));
        assert_eq!(calculate_backoff(&backoff, 1), Duration::from_millis(200));
        assert_eq!(calculate_backoff(&backoff, 2), Duration::from_millis(350));
        assert_eq!(calculate_backoff(&backoff, 40), Duration::from_millis(350));
    }

    #[test]
    fn test_backoff_jitter_stays_in_bounds() {
        let backoff = ExponentialBackoff::new(Duration::from_millis(100), Duration::from_secs(1));
        for _ in 0..50 {
            let delay = calculate_backoff(&backoff, 0);
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(125));
        }
    }

    #[test]
    fn test_backoff_survives_bad_multiplier() {
        let backoff = ExponentialBackoff {
            min_wait: Duration::from_millis(10),
            max_wait: Duration::from_secs(1),
            multiplier: f64::NAN,
            jitter: false,
        };
        assert_eq!(calculate_backoff(&backoff, 3), Duration::from_millis(10));
    }

    #[test]
    fn test_trigger_from_error() {
        assert_eq!(
            RetryTrigger::from(&HttpError::Transport("x".into())),
            RetryTrigger::TransportError
        );
        assert_eq!(
            RetryTrigger::from(&HttpError::Timeout(Duration::from_secs(1))),
            RetryTrigger::Timeout
        );
        assert_eq!(
            RetryTrigger::from(&HttpError::DeadlineExceeded(Duration::from_secs(1))),
            RetryTrigger::NonRetryable
        );
        assert_eq!(
            RetryTrigger::from(&HttpError::Credentials("expired".into())),
            RetryTrigger::NonRetryable
        );
    }
}
