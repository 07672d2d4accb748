use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use http::header::AUTHORIZATION;
use http::{HeaderValue, Request, Response, StatusCode};
use tower::{Layer, Service};

use crate::SecretString;
use crate::error::AuthError;
use crate::oauth2::Token;
use ddb_http::HttpError;

/// Where the bearer token comes from
#[derive(Clone, Debug)]
pub enum BearerCredential {
    /// A fixed token, such as a JWT from the JWT login endpoint
    Static(SecretString),
    /// An auto-refreshing OAuth2 token; a 401 invalidates it
    OAuth2(Token),
}

impl BearerCredential {
    fn current(&self) -> Result<SecretString, AuthError> {
        match self {
            Self::Static(secret) => Ok(secret.clone()),
            Self::OAuth2(token) => token.get(),
        }
    }
}

/// Sets `Authorization: Bearer <token>` on every attempt
#[derive(Clone, Debug)]
pub struct BearerAuthLayer {
    credential: BearerCredential,
}

impl BearerAuthLayer {
    #[must_use]
    pub fn new(credential: BearerCredential) -> Self {
        Self { credential }
    }
}

impl<S> Layer<S> for BearerAuthLayer {
    type Service = BearerAuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BearerAuthService {
            inner,
            credential: self.credential.clone(),
        }
    }
}

/// Service created by [`BearerAuthLayer`]
#[derive(Clone, Debug)]
pub struct BearerAuthService<S> {
    inner: S,
    credential: BearerCredential,
}

fn bearer_header(secret: &SecretString) -> Result<HeaderValue, HttpError> {
    let raw = zeroize::Zeroizing::new(format!("Bearer {}", secret.expose()));
    let mut value = HeaderValue::from_str(&raw)?;
    value.set_sensitive(true);
    Ok(value)
}

impl<S, B, ResBody> Service<Request<B>> for BearerAuthService<S>
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
        let header = match self.credential.current() {
            Ok(secret) => bearer_header(&secret),
            Err(e) => Err(HttpError::Credentials(Box::new(e))),
        };
        match header {
            Ok(value) => {
                req.headers_mut().insert(AUTHORIZATION, value);
            }
            Err(e) => return Box::pin(async move { Err(e) }),
        }

        let credential = self.credential.clone();
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let response = inner.call(req).await?;
            if response.status() == StatusCode::UNAUTHORIZED
                && let BearerCredential::OAuth2(token) = credential
            {
                tracing::debug!("bearer token rejected with 401; refreshing");
                token.invalidate().await;
            }
            Ok(response)
        })
    }
}
