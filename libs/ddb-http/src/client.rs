use crate::builder::HttpClientBuilder;
use crate::config::TransportSecurity;
use crate::error::HttpError;
use crate::request::RequestBuilder;
use crate::response::ResponseBody;
use bytes::Bytes;
use http::{Method, Request, Response};
use http_body_util::Full;
use std::future::Future;
use std::pin::Pin;
use tower::buffer::Buffer;

/// Future of the type-erased service behind the buffer
pub type ServiceFuture =
    Pin<Box<dyn Future<Output = Result<Response<ResponseBody>, HttpError>> + Send>>;

/// Buffered front of the middleware stack
pub type BufferedService = Buffer<Request<Full<Bytes>>, ServiceFuture>;

/// HTTP client over the tower stack built by [`HttpClientBuilder`].
///
/// `Clone + Send + Sync`; clones share the same connection pool and buffer
/// worker, so store it directly without a mutex.
#[derive(Clone)]
pub struct HttpClient {
    pub(crate) service: BufferedService,
    pub(crate) max_body_size: usize,
    pub(crate) transport: TransportSecurity,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("max_body_size", &self.max_body_size)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Client with the default configuration
    ///
    /// # Errors
    /// Returns an error if TLS initialization fails
    pub fn new() -> Result<Self, HttpError> {
        HttpClientBuilder::new().build()
    }

    #[must_use]
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Request with an arbitrary method. `url` must be absolute.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        RequestBuilder::new(
            self.service.clone(),
            self.max_body_size,
            self.transport,
            method,
            url.to_owned(),
        )
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    pub fn put(&self, url: &str) -> RequestBuilder {
        self.request(Method::PUT, url)
    }

    pub fn delete(&self, url: &str) -> RequestBuilder {
        self.request(Method::DELETE, url)
    }
}

/// Unwrap an `HttpError` boxed by the buffer, or report the worker as gone
pub fn map_buffer_error(err: tower::BoxError) -> HttpError {
    match err.downcast::<HttpError>() {
        Ok(http_err) => *http_err,
        Err(err) => {
            tracing::error!(error = %err, "http buffer worker closed");
            HttpError::ServiceClosed
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::HttpClientConfig;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_client() -> HttpClient {
        HttpClientBuilder::with_config(HttpClientConfig::for_testing())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_json() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/valid_vessels/v1")
                .header_exists("user-agent");
            then.status(200)
                .json_body(json!({"data": {"id": "v1", "name": "pot"}}));
        });

        let value: serde_json::Value = test_client()
            .get(&server.url("/api/v1/valid_vessels/v1"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        mock.assert();
        assert_eq!(value["data"]["name"], "pot");
    }

    #[tokio::test]
    async fn test_post_json_sets_content_type() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v1/recipes")
                .header("content-type", "application/json")
                .json_body(json!({"name": "soup"}));
            then.status(201).json_body(json!({"data": {"id": "r1"}}));
        });

        let resp = test_client()
            .post(&server.url("/api/v1/recipes"))
            .json(&json!({"name": "soup"}))
            .unwrap()
            .send()
            .await
            .unwrap();

        mock.assert();
        assert_eq!(resp.status(), http::StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_error_status_is_ok_until_checked() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path("/api/v1/recipes/r1");
            then.status(404).body("missing");
        });

        let resp = test_client()
            .delete(&server.url("/api/v1/recipes/r1"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), http::StatusCode::NOT_FOUND);

        let err = resp.text().await.unwrap_err();
        assert!(matches!(err, HttpError::HttpStatus { .. }));
    }

    #[tokio::test]
    async fn test_explicit_content_type_wins() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/v1/meal_plans/m1")
                .header("content-type", "application/xml");
            then.status(200);
        });

        test_client()
            .put(&server.url("/api/v1/meal_plans/m1"))
            .header("content-type", "application/xml")
            .body("<envelope/>", "text/plain")
            .send()
            .await
            .unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn test_tls_only_rejects_http() {
        let client = HttpClientBuilder::new().build().unwrap();
        let err = client
            .get("http://localhost:1/auth/status")
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::InvalidScheme { .. }));
    }

    #[tokio::test]
    async fn test_relative_url_rejected() {
        let err = test_client().get("/auth/status").send().await.unwrap_err();
        assert!(matches!(
            err,
            HttpError::InvalidUri {
                kind: crate::error::InvalidUriKind::MissingAuthority,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_bad_header_deferred_to_send() {
        let err = test_client()
            .get("http://localhost:1/")
            .header("bad header", "x")
            .send()
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::InvalidHeaderName(_)));
    }

    #[tokio::test]
    async fn test_body_cap_enforced() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/big");
            then.status(200).body("x".repeat(2048));
        });

        let client = HttpClientBuilder::with_config(HttpClientConfig::for_testing())
            .max_body_size(1024)
            .build()
            .unwrap();
        let err = client
            .get(&server.url("/big"))
            .send()
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap_err();
        assert!(matches!(err, HttpError::BodyTooLarge { limit: 1024, .. }));
    }

    #[test]
    fn test_buffer_error_unwraps_http_error() {
        let boxed: tower::BoxError = Box::new(HttpError::ServiceClosed);
        assert!(matches!(map_buffer_error(boxed), HttpError::ServiceClosed));

        let other: tower::BoxError = "worker gone".into();
        assert!(matches!(map_buffer_error(other), HttpError::ServiceClosed));
    }
}
