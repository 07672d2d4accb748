use std::task::{Context, Poll};

use http::header::HeaderName;
use http::{HeaderValue, Request};
use tower::{Layer, Service};

use ddb_http::HttpError;

/// Header naming the user the server should act as
pub static IMPERSONATE_USER: HeaderName = HeaderName::from_static("x-impersonate-user");

/// Header naming the household the server should act within
pub static IMPERSONATE_HOUSEHOLD: HeaderName = HeaderName::from_static("x-impersonate-household");

/// Impersonation ids; empty or absent ids produce no header.
///
/// The server only honours these for cookie-authenticated sessions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Impersonation {
    pub user_id: Option<String>,
    pub household_id: Option<String>,
}

impl Impersonation {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.user_id.as_deref().is_none_or(str::is_empty)
            && self.household_id.as_deref().is_none_or(str::is_empty)
    }
}

/// Sets `X-Impersonate-User` / `X-Impersonate-Household`
#[derive(Clone, Debug)]
pub struct ImpersonationLayer {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl ImpersonationLayer {
    /// # Errors
    /// Returns `InvalidHeaderValue` when an id is not valid header text
    pub fn try_new(ids: &Impersonation) -> Result<Self, HttpError> {
        let mut headers = Vec::with_capacity(2);
        for (name, id) in [
            (&IMPERSONATE_USER, &ids.user_id),
            (&IMPERSONATE_HOUSEHOLD, &ids.household_id),
        ] {
            if let Some(id) = id.as_deref().filter(|id| !id.is_empty()) {
                headers.push((name.clone(), HeaderValue::from_str(id)?));
            }
        }
        Ok(Self { headers })
    }
}

impl<S> Layer<S> for ImpersonationLayer {
    type Service = ImpersonationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ImpersonationService {
            inner,
            headers: self.headers.clone(),
        }
    }
}

/// Service created by [`ImpersonationLayer`]
#[derive(Clone, Debug)]
pub struct ImpersonationService<S> {
    inner: S,
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl<S, B> Service<Request<B>> for ImpersonationService<S>
where
    S: Service<Request<B>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        for (name, value) in &self.headers {
            req.headers_mut().insert(name.clone(), value.clone());
        }
        self.inner.call(req)
    }
}
