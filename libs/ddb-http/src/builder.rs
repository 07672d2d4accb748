use crate::config::{
    HttpClientConfig, RedirectConfig, RetryConfig, TlsRootConfig, TransportSecurity,
};
use crate::error::HttpError;
use crate::hooks::{AttemptHooks, LoggingHooks};
use crate::layers::{DefaultHeadersLayer, OtelLayer, RetryLayer, SecureRedirectPolicy};
use crate::response::ResponseBody;
use crate::tls;
use bytes::Bytes;
use http::Response;
use http::header::{HeaderName, HeaderValue};
use http_body_util::{BodyExt, Full};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use std::sync::Arc;
use std::time::Duration;
use tower::buffer::Buffer;
use tower::timeout::TimeoutLayer;
use tower::util::BoxCloneService;
use tower::{ServiceBuilder, ServiceExt};
use tower_http::decompression::DecompressionLayer;
use tower_http::follow_redirect::FollowRedirectLayer;

/// Type-erased service handed to [`HttpClientBuilder::with_auth_layer`] wrappers
pub type InnerService =
    BoxCloneService<http::Request<Full<Bytes>>, http::Response<ResponseBody>, HttpError>;

type AuthWrap = Box<dyn FnOnce(InnerService) -> InnerService + Send>;

/// Builds an [`HttpClient`](crate::HttpClient).
///
/// Stack, outermost first:
/// `Buffer → Otel? → Retry → auth wraps → error mapping → Timeout →
/// DefaultHeaders → Decompression → FollowRedirect → hyper`.
///
/// Every status comes back as `Ok(Response)`; `Err` is reserved for
/// transport, timeout, deadline and credential failures.
pub struct HttpClientBuilder {
    config: HttpClientConfig,
    auth_layers: Vec<AuthWrap>,
    default_headers: Vec<(HeaderName, HeaderValue)>,
    hooks: Arc<dyn AttemptHooks>,
}

impl HttpClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(HttpClientConfig::default())
    }

    #[must_use]
    pub fn with_config(config: HttpClientConfig) -> Self {
        Self {
            config,
            auth_layers: Vec::new(),
            default_headers: Vec::new(),
            hooks: Arc::new(LoggingHooks),
        }
    }

    /// Per-attempt timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Deadline covering every attempt and backoff sleep
    #[must_use]
    pub fn total_timeout(mut self, timeout: Duration) -> Self {
        self.config.total_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Header added to every request that does not already carry it
    #[must_use]
    pub fn default_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.default_headers.push((name, value));
        self
    }

    #[must_use]
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    /// Keep the retry policy, change only the attempt count (clamped to at least 1)
    #[must_use]
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.config.retry.max_attempts = attempts.max(1);
        self
    }

    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: TransportSecurity) -> Self {
        self.config.transport = transport;
        self
    }

    /// Accept `http://` URLs.
    ///
    /// Only compiled into debug builds or with the `allow-insecure-http` feature.
    #[must_use]
    #[cfg(any(debug_assertions, feature = "allow-insecure-http"))]
    pub fn allow_insecure_http(mut self) -> Self {
        tracing::warn!(
            target: "ddb_http::security",
            "allow_insecure_http() called; traffic will not be encrypted"
        );
        self.config.transport = TransportSecurity::AllowInsecureHttp;
        self
    }

    #[must_use]
    pub fn tls_roots(mut self, roots: TlsRootConfig) -> Self {
        self.config.tls_roots = roots;
        self
    }

    /// Toggle the `outgoing_http` span layer and trace context propagation
    #[must_use]
    pub fn otel(mut self, enabled: bool) -> Self {
        self.config.otel = enabled;
        self
    }

    /// Wrap the service inside the retry loop, so every attempt re-runs the wrap.
    ///
    /// Wraps apply in call order; the last one added is outermost.
    #[must_use]
    pub fn with_auth_layer(
        mut self,
        wrap: impl FnOnce(InnerService) -> InnerService + Send + 'static,
    ) -> Self {
        self.auth_layers.push(Box::new(wrap));
        self
    }

    /// Replace the default [`LoggingHooks`]
    #[must_use]
    pub fn hooks(mut self, hooks: Arc<dyn AttemptHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Queue depth in front of the stack, at least 1
    #[must_use]
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity.max(1);
        self
    }

    /// Hand 3xx responses back untouched
    #[must_use]
    pub fn no_redirects(mut self) -> Self {
        self.config.redirect = RedirectConfig::disabled();
        self
    }

    #[must_use]
    pub fn redirect(mut self, config: RedirectConfig) -> Self {
        self.config.redirect = config;
        self
    }

    #[must_use]
    pub fn pool_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.pool_idle_timeout = timeout;
        self
    }

    #[must_use]
    pub fn pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.config.pool_max_idle_per_host = max;
        self
    }

    /// Assemble the stack.
    ///
    /// Must run inside a Tokio runtime: the buffer worker is spawned here.
    ///
    /// # Errors
    /// Returns `Tls` if the connector cannot be built, or `InvalidHeaderValue`
    /// for a bad `User-Agent`
    pub fn build(self) -> Result<crate::HttpClient, HttpError> {
        let config = self.config;
        if config.transport == TransportSecurity::AllowInsecureHttp {
            tracing::warn!("plain HTTP allowed on this client; use only against local servers");
        }

        let https = build_https_connector(config.tls_roots, config.transport)?;

        let mut pool = Client::builder(TokioExecutor::new());
        pool.pool_timer(TokioTimer::new())
            .pool_max_idle_per_host(config.pool_max_idle_per_host);
        if let Some(idle) = config.pool_idle_timeout {
            pool.pool_idle_timeout(idle);
        }
        let hyper_client = pool.build::<_, Full<Bytes>>(https);

        let mut headers = DefaultHeadersLayer::try_new(&config.user_agent)?;
        for (name, value) in self.default_headers {
            headers = headers.with(name, value);
        }

        let timeout = config.request_timeout;
        let service = ServiceBuilder::new()
            .layer(TimeoutLayer::new(timeout))
            .layer(headers)
            .layer(DecompressionLayer::new())
            .layer(FollowRedirectLayer::with_policy(SecureRedirectPolicy::new(
                config.redirect.clone(),
            )))
            .service(hyper_client)
            .map_response(box_response_body)
            .map_err(move |e: tower::BoxError| map_tower_error(e, timeout));

        let mut stack: InnerService = service.boxed_clone();
        for wrap in self.auth_layers {
            stack = wrap(stack);
        }

        let retry = RetryLayer::new(config.retry.clone())
            .with_total_timeout(config.total_timeout)
            .with_hooks(self.hooks);
        stack = ServiceBuilder::new()
            .layer(retry)
            .service(stack)
            .boxed_clone();

        if config.otel {
            stack = ServiceBuilder::new()
                .layer(OtelLayer::new())
                .service(stack)
                .boxed_clone();
        }

        let service: crate::client::BufferedService =
            Buffer::new(stack, config.buffer_capacity.max(1));

        Ok(crate::HttpClient {
            service,
            max_body_size: config.max_body_size,
            transport: config.transport,
        })
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn map_tower_error(err: tower::BoxError, timeout: Duration) -> HttpError {
    if err.is::<tower::timeout::error::Elapsed>() {
        return HttpError::Timeout(timeout);
    }
    match err.downcast::<HttpError>() {
        Ok(http_err) => *http_err,
        Err(other) => HttpError::Transport(other),
    }
}

fn box_response_body<B>(response: Response<B>) -> Response<ResponseBody>
where
    B: hyper::body::Body<Data = Bytes> + Send + Sync + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    response.map(|body| body.map_err(Into::into).boxed())
}

fn build_https_connector(
    roots: TlsRootConfig,
    transport: TransportSecurity,
) -> Result<HttpsConnector<HttpConnector>, HttpError> {
    let builder = match roots {
        TlsRootConfig::WebPki => hyper_rustls::HttpsConnectorBuilder::new()
            .with_provider_and_webpki_roots(tls::crypto_provider())
            .map_err(|e| HttpError::Tls(Box::new(e)))?,
        TlsRootConfig::Native => hyper_rustls::HttpsConnectorBuilder::new()
            .with_tls_config(tls::native_roots_client_config().map_err(HttpError::Tls)?),
    };

    Ok(match transport {
        TransportSecurity::AllowInsecureHttp => builder.https_or_http().enable_all_versions().build(),
        TransportSecurity::TlsOnly => builder.https_only().enable_all_versions().build(),
    })
}
