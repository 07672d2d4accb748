//! Session-cookie credentials.
//!
//! A [`SessionCookie`] is a shared, swappable slot. [`CookieAuthLayer`] reads
//! it on every attempt and writes back whatever the server sets under the
//! same name, so a refreshed cookie is used from the next request on.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use arc_swap::ArcSwapOption;
use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderValue, Request, Response};
use tower::{Layer, Service};

use crate::SecretString;
use ddb_http::HttpError;

/// Cookie name used by the API unless configured otherwise
pub const DEFAULT_COOKIE_NAME: &str = "ddb_api_cookie";

/// Named cookie whose value can be replaced atomically.
///
/// Clones share the slot.
#[derive(Clone)]
pub struct SessionCookie {
    name: Arc<str>,
    value: Arc<ArcSwapOption<SecretString>>,
}

impl std::fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCookie")
            .field("name", &self.name)
            .field("present", &self.value.load().is_some())
            .finish()
    }
}

impl SessionCookie {
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, value: Option<SecretString>) -> Self {
        Self {
            name: name.into(),
            value: Arc::new(ArcSwapOption::new(value.map(Arc::new))),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> Option<SecretString> {
        self.value.load_full().map(|v| (*v).clone())
    }

    /// Replace the stored value; an empty value clears it
    pub fn replace(&self, value: SecretString) {
        if value.is_empty() {
            self.value.store(None);
        } else {
            self.value.store(Some(Arc::new(value)));
        }
    }

    pub fn clear(&self) {
        self.value.store(None);
    }

    fn header_value(&self) -> Option<HeaderValue> {
        let current = self.value.load();
        let value = current.as_ref()?;
        let mut header =
            HeaderValue::from_str(&format!("{}={}", self.name, value.expose())).ok()?;
        header.set_sensitive(true);
        Some(header)
    }
}

/// Value of the first `Set-Cookie` for `name`, if any.
///
/// Attributes after the first `;` are ignored. An empty value is returned
/// as-is, which is how servers expire a cookie.
#[must_use]
pub fn find_set_cookie(headers: &HeaderMap, name: &str) -> Option<SecretString> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|raw| {
            let pair = raw.split(';').next()?.trim();
            let (n, v) = pair.split_once('=')?;
            (n.trim() == name).then(|| SecretString::new(v.trim().trim_matches('"')))
        })
}

fn carries_cookie(headers: &HeaderMap, name: &str) -> bool {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .any(|pair| pair.split_once('=').is_some_and(|(n, _)| n.trim() == name))
}

/// Attaches the session cookie and tracks refreshed values
#[derive(Clone, Debug)]
pub struct CookieAuthLayer {
    cookie: SessionCookie,
}

impl CookieAuthLayer {
    #[must_use]
    pub fn new(cookie: SessionCookie) -> Self {
        Self { cookie }
    }
}

impl<S> Layer<S> for CookieAuthLayer {
    type Service = CookieAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CookieAuthService {
            inner,
            cookie: self.cookie.clone(),
        }
    }
}

/// Service created by [`CookieAuthLayer`]
#[derive(Clone, Debug)]
pub struct CookieAuthService<S> {
    inner: S,
    cookie: SessionCookie,
}

impl<S, B, ResBody> Service<Request<B>> for CookieAuthService<S>
where
    S: Service<Request<B>, Response = Response<ResBody>, Error = HttpError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
    B: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = HttpError;
    type Future = Pin<Box<dyn Future<Output = Result<Response<ResBody>, HttpError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        if !carries_cookie(req.headers(), self.cookie.name())
            && let Some(value) = self.cookie.header_value()
        {
            req.headers_mut().append(COOKIE, value);
        }

        let cookie = self.cookie.clone();
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let response = inner.call(req).await?;
            if let Some(refreshed) = find_set_cookie(response.headers(), cookie.name()) {
                tracing::debug!(cookie = cookie.name(), "server refreshed session cookie");
                cookie.replace(refreshed);
            }
            Ok(response)
        })
    }
}
