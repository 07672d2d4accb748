use bytes::Bytes;
use http::{Request, Response, Uri};
use http_body_util::Full;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::Instrument;

/// Wraps every outbound request in an `outgoing_http` client span.
///
/// The span carries method, query-less URL and final status; `error` is set
/// for 4xx/5xx and for transport failures. W3C trace context is injected into
/// the request headers when the `otel` feature is enabled.
#[derive(Clone, Debug, Default)]
pub struct OtelLayer;

impl OtelLayer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for OtelLayer {
    type Service = OtelService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OtelService { inner }
    }
}

/// Service created by [`OtelLayer`]
#[derive(Clone, Debug)]
pub struct OtelService<S> {
    inner: S,
}

/// `scheme://authority/path`, dropping the query where filters and tokens live
pub(crate) fn url_without_query(uri: &Uri) -> String {
    format!(
        "{}://{}{}",
        uri.scheme_str().unwrap_or("https"),
        uri.authority().map_or("", http::uri::Authority::as_str),
        uri.path()
    )
}

impl<S, ResBody> Service<Request<Full<Bytes>>> for OtelService<S>
where
    S: Service<Request<Full<Bytes>>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    S::Error: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Full<Bytes>>) -> Self::Future {
        let span = tracing::info_span!(
            "outgoing_http",
            http.method = %req.method(),
            http.url = %url_without_query(req.uri()),
            otel.kind = "client",
            http.status_code = tracing::field::Empty,
            error = tracing::field::Empty,
        );

        {
            let _entered = span.enter();
            crate::otel::inject_current_span(req.headers_mut());
        }

        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let result = inner.call(req).instrument(span.clone()).await;

            match &result {
                Ok(response) => {
                    let status = response.status();
                    span.record("http.status_code", status.as_u16());
                    if status.is_client_error() || status.is_server_error() {
                        span.record("error", true);
                    }
                }
                Err(_) => {
                    span.record("error", true);
                }
            }

            result
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_url_without_query_drops_filters() {
        let uri: Uri = "https://api.example.com/api/v1/recipes?q=soup&limit=50"
            .parse()
            .unwrap();
        assert_eq!(
            url_without_query(&uri),
            "https://api.example.com/api/v1/recipes"
        );
    }

    #[test]
    fn test_url_without_query_keeps_port() {
        let uri: Uri = "http://127.0.0.1:8080/auth/status".parse().unwrap();
        assert_eq!(url_without_query(&uri), "http://127.0.0.1:8080/auth/status");
    }
}
