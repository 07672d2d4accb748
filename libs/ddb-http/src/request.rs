use crate::client::{BufferedService, map_buffer_error};
use crate::config::TransportSecurity;
use crate::error::{HttpError, InvalidUriKind};
use crate::response::HttpResponse;
use bytes::Bytes;
use http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use http::{Method, Request, Uri};
use http_body_util::Full;
use serde::Serialize;
use tower::{Service, ServiceExt};

/// A request under construction.
///
/// Header errors are deferred and reported by [`send`](Self::send) (or by
/// the first fallible body setter) so calls can be chained.
#[must_use = "RequestBuilder does nothing until .send() is called"]
pub struct RequestBuilder {
    service: BufferedService,
    max_body_size: usize,
    transport: TransportSecurity,
    method: Method,
    url: String,
    headers: Vec<(HeaderName, HeaderValue)>,
    body: Bytes,
    content_type: Option<HeaderValue>,
    error: Option<HttpError>,
}

impl RequestBuilder {
    pub(crate) fn new(
        service: BufferedService,
        max_body_size: usize,
        transport: TransportSecurity,
        method: Method,
        url: String,
    ) -> Self {
        Self {
            service,
            max_body_size,
            transport,
            method,
            url,
            headers: Vec::new(),
            body: Bytes::new(),
            content_type: None,
            error: None,
        }
    }

    /// Append a header
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if self.error.is_some() {
            return self;
        }
        match (HeaderName::try_from(name), HeaderValue::try_from(value)) {
            (Ok(name), Ok(value)) => self.headers.push((name, value)),
            (Err(e), _) => self.error = Some(HttpError::InvalidHeaderName(e)),
            (_, Err(e)) => self.error = Some(HttpError::InvalidHeaderValue(e)),
        }
        self
    }

    /// Append already-validated headers
    pub fn headers(mut self, headers: impl IntoIterator<Item = (HeaderName, HeaderValue)>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Serialize `body` as JSON
    ///
    /// # Errors
    /// Returns a deferred header error, or `Json` if serialization fails
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.body = Bytes::from(serde_json::to_vec(body)?);
        self.content_type = Some(HeaderValue::from_static("application/json"));
        Ok(self)
    }

    /// URL-encode `fields` as an `application/x-www-form-urlencoded` body
    ///
    /// # Errors
    /// Returns a deferred header error, or `FormEncode` if encoding fails
    pub fn form<T: Serialize + ?Sized>(mut self, fields: &T) -> Result<Self, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.body = Bytes::from(serde_urlencoded::to_string(fields)?);
        self.content_type = Some(HeaderValue::from_static(
            "application/x-www-form-urlencoded",
        ));
        Ok(self)
    }

    /// Raw body with its content type
    pub fn body(mut self, body: impl Into<Bytes>, content_type: &'static str) -> Self {
        self.body = body.into();
        self.content_type = Some(HeaderValue::from_static(content_type));
        self
    }

    /// Absolute URL with an `http`/`https` scheme the transport accepts
    fn validate_url(&self) -> Result<Uri, HttpError> {
        let invalid = |kind, reason: String| HttpError::InvalidUri {
            url: self.url.clone(),
            kind,
            reason,
        };

        let uri: Uri = self
            .url
            .parse()
            .map_err(|e: http::uri::InvalidUri| invalid(InvalidUriKind::ParseError, e.to_string()))?;

        if uri.authority().is_none() {
            return Err(invalid(
                InvalidUriKind::MissingAuthority,
                "missing host".to_owned(),
            ));
        }

        match uri.scheme_str() {
            Some("https") => Ok(uri),
            Some("http") if self.transport == TransportSecurity::AllowInsecureHttp => Ok(uri),
            Some("http") => Err(HttpError::InvalidScheme {
                scheme: "http".to_owned(),
                reason: "HTTPS required".to_owned(),
            }),
            Some(other) => Err(HttpError::InvalidScheme {
                scheme: other.to_owned(),
                reason: "only http and https are supported".to_owned(),
            }),
            None => Err(invalid(
                InvalidUriKind::MissingScheme,
                "missing scheme".to_owned(),
            )),
        }
    }

    /// Send the request through the middleware stack.
    ///
    /// Resolves to `Ok` for every HTTP status once attempts are exhausted.
    ///
    /// # Errors
    /// Returns deferred builder errors, URL validation errors, and transport,
    /// timeout or credential failures from the stack
    pub async fn send(mut self) -> Result<HttpResponse, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        let uri = self.validate_url()?;

        let mut request = Request::builder()
            .method(self.method)
            .uri(uri)
            .body(Full::new(self.body))?;

        let headers = request.headers_mut();
        for (name, value) in self.headers {
            headers.append(name, value);
        }
        if let Some(content_type) = self.content_type
            && !headers.contains_key(CONTENT_TYPE)
        {
            headers.insert(CONTENT_TYPE, content_type);
        }

        let inner = self
            .service
            .ready()
            .await
            .map_err(map_buffer_error)?
            .call(request)
            .await
            .map_err(map_buffer_error)?;

        Ok(HttpResponse {
            inner,
            max_body_size: self.max_body_size,
        })
    }
}
