use std::collections::HashSet;
use std::time::Duration;

/// Default `User-Agent` sent on every request.
pub const DEFAULT_USER_AGENT: &str = concat!("ddb-client/", env!("CARGO_PKG_VERSION"));

/// Condition observed after an attempt, used to decide whether to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RetryTrigger {
    /// Network-class failure (connection refused, reset, DNS, etc.)
    TransportError,
    /// The attempt exceeded the per-request timeout
    Timeout,
    /// The server answered with this status
    Status(u16),
    /// Failure that must surface immediately (deadline, closed service, bad input)
    NonRetryable,
}

impl RetryTrigger {
    /// Whether this condition may be retried.
    ///
    /// Network errors, per-attempt timeouts and 5xx statuses other than
    /// `501 Not Implemented` are retryable. Every 4xx is final.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        match self {
            Self::TransportError | Self::Timeout => true,
            Self::Status(code) => (500..600).contains(&code) && code != 501,
            Self::NonRetryable => false,
        }
    }
}

/// Exponential backoff between `min_wait` and `max_wait`.
///
/// The delay before retry `n` (0-based) is `min(min_wait * multiplier^n, max_wait)`,
/// plus up to 25% random jitter when enabled, never exceeding `max_wait`.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    /// Delay before the first retry (default: 100ms)
    pub min_wait: Duration,

    /// Upper bound for any single delay (default: 10s)
    pub max_wait: Duration,

    /// Growth factor per retry (default: 2.0)
    pub multiplier: f64,

    /// Add 0-25% random jitter to each delay (default: true)
    pub jitter: bool,
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self {
            min_wait: Duration::from_millis(100),
            max_wait: Duration::from_secs(10),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl ExponentialBackoff {
    /// Backoff bounded by the given waits, default multiplier and jitter
    #[must_use]
    pub fn new(min_wait: Duration, max_wait: Duration) -> Self {
        Self {
            min_wait,
            max_wait,
            ..Default::default()
        }
    }

    /// Millisecond-scale backoff without jitter, for tests
    #[must_use]
    pub fn fast() -> Self {
        Self {
            min_wait: Duration::from_millis(1),
            max_wait: Duration::from_millis(50),
            multiplier: 2.0,
            jitter: false,
        }
    }
}

/// Retry policy.
///
/// `max_attempts` counts every HTTP attempt made for one call, the first
/// included. The default of `1` disables retries.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts per call, at least 1 (default: 1)
    pub max_attempts: usize,

    /// Delay strategy between attempts
    pub backoff: ExponentialBackoff,

    /// Ignore a server-provided `Retry-After` and always use `backoff` (default: false)
    ///
    /// When honoured, `Retry-After` is still capped at `backoff.max_wait`.
    pub ignore_retry_after: bool,

    /// Bytes drained from a retryable response before the next attempt (default: 64 KiB)
    ///
    /// Draining lets hyper return the connection to the pool.
    pub retry_response_drain_limit: usize,
}

/// Default drain limit before retrying on a status (64 KiB)
pub const DEFAULT_RETRY_RESPONSE_DRAIN_LIMIT: usize = 64 * 1024;

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff: ExponentialBackoff::default(),
            ignore_retry_after: false,
            retry_response_drain_limit: DEFAULT_RETRY_RESPONSE_DRAIN_LIMIT,
        }
    }
}

impl RetryConfig {
    /// Policy making at most `max_attempts` attempts (clamped to at least 1)
    #[must_use]
    pub fn with_attempts(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Default::default()
        }
    }

    /// Replace the backoff strategy
    #[must_use]
    pub fn backoff(mut self, backoff: ExponentialBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Whether another attempt should follow `attempts_made` attempts that ended in `trigger`
    #[must_use]
    pub fn should_retry(&self, trigger: RetryTrigger, attempts_made: usize) -> bool {
        attempts_made < self.max_attempts.max(1) && trigger.is_retryable()
    }
}

/// Redirect handling.
///
/// The defaults follow same-origin redirects only, strip credentials and
/// impersonation headers whenever a hop leaves the origin, and refuse
/// HTTPS → HTTP downgrades.
#[derive(Debug, Clone)]
pub struct RedirectConfig {
    /// Maximum redirects followed per request, `0` disables following (default: 10)
    pub max_redirects: usize,

    /// Refuse redirects to another origin unless the host is allow-listed (default: true)
    pub same_origin_only: bool,

    /// Hostnames (no scheme, no port) accepted as cross-origin targets
    pub allowed_redirect_hosts: HashSet<String>,

    /// Remove sensitive headers after a cross-origin hop (default: true)
    pub strip_sensitive_headers: bool,

    /// Follow HTTPS → HTTP redirects (default: false)
    pub allow_https_downgrade: bool,
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            max_redirects: 10,
            same_origin_only: true,
            allowed_redirect_hosts: HashSet::new(),
            strip_sensitive_headers: true,
            allow_https_downgrade: false,
        }
    }
}

impl RedirectConfig {
    /// Follow redirects to any origin, still stripping headers and refusing downgrades
    #[must_use]
    pub fn permissive() -> Self {
        Self {
            same_origin_only: false,
            ..Default::default()
        }
    }

    /// Return 3xx responses to the caller untouched
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_redirects: 0,
            ..Default::default()
        }
    }

    /// Permissive and downgrade-tolerant, for plain-HTTP mock servers
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            same_origin_only: false,
            allow_https_downgrade: true,
            ..Default::default()
        }
    }
}

/// Root certificate source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TlsRootConfig {
    /// Mozilla roots bundled through webpki-roots
    #[default]
    WebPki,
    /// The operating system certificate store
    Native,
}

/// Whether plain HTTP is acceptable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransportSecurity {
    /// HTTPS only
    #[default]
    TlsOnly,
    /// Accept `http://` URLs (local development and mock servers)
    AllowInsecureHttp,
}

/// Transport configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Timeout for a single attempt (default: 30s)
    pub request_timeout: Duration,

    /// Deadline covering every attempt and backoff sleep (default: none)
    ///
    /// Exceeding it fails the call with `HttpError::DeadlineExceeded`.
    pub total_timeout: Option<Duration>,

    /// Cap on decompressed response bytes (default: 10 MiB)
    pub max_body_size: usize,

    /// `User-Agent` value (default: [`DEFAULT_USER_AGENT`])
    pub user_agent: String,

    /// Retry policy (default: one attempt)
    pub retry: RetryConfig,

    /// Transport security mode (default: `TlsOnly`)
    pub transport: TransportSecurity,

    /// Root certificate source (default: `WebPki`)
    pub tls_roots: TlsRootConfig,

    /// Wrap requests in an `outgoing_http` span and propagate trace context (default: false)
    pub otel: bool,

    /// Requests that may queue in front of the service (default: 1024)
    pub buffer_capacity: usize,

    /// Redirect policy (default: same-origin only)
    pub redirect: RedirectConfig,

    /// Idle pooled connections are closed after this long (default: 90s)
    pub pool_idle_timeout: Option<Duration>,

    /// Idle connections kept per host (default: 32)
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            total_timeout: None,
            max_body_size: 10 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            retry: RetryConfig::default(),
            transport: TransportSecurity::TlsOnly,
            tls_roots: TlsRootConfig::default(),
            otel: false,
            buffer_capacity: 1024,
            redirect: RedirectConfig::default(),
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 32,
        }
    }
}

impl HttpClientConfig {
    /// Configuration for `OAuth2` token endpoints.
    ///
    /// Token exchanges are POSTs, but a transport failure before a response
    /// means nothing was issued, so three attempts are allowed.
    #[must_use]
    pub fn token_endpoint() -> Self {
        Self {
            max_body_size: 1024 * 1024,
            retry: RetryConfig::with_attempts(3),
            buffer_capacity: 64,
            pool_idle_timeout: Some(Duration::from_secs(60)),
            pool_max_idle_per_host: 4,
            ..Default::default()
        }
    }

    /// Configuration for plain-HTTP mock servers.
    ///
    /// **WARNING**: allows unencrypted traffic; never use against a real deployment.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            max_body_size: 1024 * 1024,
            transport: TransportSecurity::AllowInsecureHttp,
            buffer_capacity: 256,
            redirect: RedirectConfig::for_testing(),
            pool_idle_timeout: Some(Duration::from_secs(10)),
            pool_max_idle_per_host: 4,
            ..Default::default()
        }
    }

    /// Same configuration with redirect following turned off
    #[must_use]
    pub fn no_redirect(mut self) -> Self {
        self.redirect = RedirectConfig::disabled();
        self
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        for code in [500, 502, 503, 504, 599] {
            assert!(RetryTrigger::Status(code).is_retryable(), "{code}");
        }
        assert!(!RetryTrigger::Status(501).is_retryable());
        for code in [400, 401, 403, 404, 408, 409, 429] {
            assert!(!RetryTrigger::Status(code).is_retryable(), "{code}");
        }
        assert!(!RetryTrigger::Status(200).is_retryable());
        assert!(!RetryTrigger::Status(302).is_retryable());
    }

    #[test]
    fn test_retryable_errors() {
        assert!(RetryTrigger::TransportError.is_retryable());
        assert!(RetryTrigger::Timeout.is_retryable());
        assert!(!RetryTrigger::NonRetryable.is_retryable());
    }

    #[test]
    fn test_retry_config_defaults_to_single_attempt() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 1);
        assert!(!config.should_retry(RetryTrigger::Status(503), 1));
        assert!(!config.ignore_retry_after);
        assert_eq!(
            config.retry_response_drain_limit,
            DEFAULT_RETRY_RESPONSE_DRAIN_LIMIT
        );
    }

    #[test]
    fn test_should_retry_counts_attempts() {
        let config = RetryConfig::with_attempts(3);
        assert!(config.should_retry(RetryTrigger::Status(503), 1));
        assert!(config.should_retry(RetryTrigger::TransportError, 2));
        assert!(!config.should_retry(RetryTrigger::Status(503), 3));
        assert!(!config.should_retry(RetryTrigger::Status(404), 1));
    }

    #[test]
    fn test_with_attempts_clamps_zero() {
        assert_eq!(RetryConfig::with_attempts(0).max_attempts, 1);
    }

    #[test]
    fn test_backoff_defaults() {
        let backoff = ExponentialBackoff::default();
        assert_eq!(backoff.min_wait, Duration::from_millis(100));
        assert_eq!(backoff.max_wait, Duration::from_secs(10));
        assert!(backoff.jitter);

        let fast = ExponentialBackoff::fast();
        assert!(!fast.jitter);
        assert_eq!(fast.min_wait, Duration::from_millis(1));
    }

    #[test]
    fn test_redirect_presets() {
        let default = RedirectConfig::default();
        assert!(default.same_origin_only);
        assert!(default.strip_sensitive_headers);
        assert!(!default.allow_https_downgrade);

        assert!(!RedirectConfig::permissive().same_origin_only);
        assert_eq!(RedirectConfig::disabled().max_redirects, 0);
        assert!(RedirectConfig::for_testing().allow_https_downgrade);
    }

    #[test]
    fn test_http_client_config_defaults() {
        let config = HttpClientConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.total_timeout.is_none());
        assert_eq!(config.max_body_size, 10 * 1024 * 1024);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.transport, TransportSecurity::TlsOnly);
        assert!(!config.otel);
    }

    #[test]
    fn test_token_endpoint_config() {
        let config = HttpClientConfig::token_endpoint();
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.transport, TransportSecurity::TlsOnly);
    }

    #[test]
    fn test_for_testing_config_allows_http() {
        let config = HttpClientConfig::for_testing();
        assert_eq!(config.transport, TransportSecurity::AllowInsecureHttp);
        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.no_redirect().redirect.max_redirects, 0);
    }
}
