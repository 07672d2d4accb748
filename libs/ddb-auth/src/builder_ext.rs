use tower::ServiceExt;

use crate::bearer::{BearerAuthLayer, BearerCredential};
use crate::cookie::{CookieAuthLayer, SessionCookie};
use crate::impersonation::ImpersonationLayer;
use crate::oauth2::Token;

/// Credential layers for [`ddb_http::HttpClientBuilder`].
///
/// Every layer sits inside the retry loop, so each attempt carries the
/// credential current at that moment.
///
/// ```ignore
/// use ddb_auth::HttpClientBuilderExt;
///
/// let client = HttpClientBuilder::new()
///     .with_session_cookie(cookie)
///     .with_impersonation(ImpersonationLayer::try_new(&ids)?)
///     .build()?;
/// ```
pub trait HttpClientBuilderExt {
    /// Send the session cookie and track refreshed values
    #[must_use]
    fn with_session_cookie(self, cookie: SessionCookie) -> Self;

    /// Add `Authorization: Bearer <token>`
    #[must_use]
    fn with_bearer(self, credential: BearerCredential) -> Self;

    /// Shorthand for [`with_bearer`](Self::with_bearer) with an `OAuth2` token
    #[must_use]
    fn with_oauth2_token(self, token: Token) -> Self;

    /// Add the impersonation headers
    #[must_use]
    fn with_impersonation(self, layer: ImpersonationLayer) -> Self;
}

impl HttpClientBuilderExt for ddb_http::HttpClientBuilder {
    fn with_session_cookie(self, cookie: SessionCookie) -> Self {
        let layer = CookieAuthLayer::new(cookie);
        self.with_auth_layer(move |svc| {
            tower::ServiceBuilder::new()
                .layer(layer)
                .service(svc)
                .boxed_clone()
        })
    }

    fn with_bearer(self, credential: BearerCredential) -> Self {
        let layer = BearerAuthLayer::new(credential);
        self.with_auth_layer(move |svc| {
            tower::ServiceBuilder::new()
                .layer(layer)
                .service(svc)
                .boxed_clone()
        })
    }

    fn with_oauth2_token(self, token: Token) -> Self {
        self.with_bearer(BearerCredential::OAuth2(token))
    }

    fn with_impersonation(self, layer: ImpersonationLayer) -> Self {
        self.with_auth_layer(move |svc| {
            tower::ServiceBuilder::new()
                .layer(layer)
                .service(svc)
                .boxed_clone()
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::cookie::DEFAULT_COOKIE_NAME;
    use crate::impersonation::Impersonation;
    use ddb_http::{HttpClientBuilder, HttpClientConfig};
    use httpmock::prelude::*;

    fn builder() -> HttpClientBuilder {
        HttpClientBuilder::with_config(HttpClientConfig::for_testing())
    }

    #[tokio::test]
    async fn cookie_and_impersonation_headers_sent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/households/current")
                .header("cookie", "ddb_api_cookie=sess")
                .header("x-impersonate-user", "u1")
                .header_missing("x-impersonate-household");
            then.status(200).body("{}");
        });

        let cookie = SessionCookie::new(DEFAULT_COOKIE_NAME, Some("sess".into()));
        let ids = Impersonation {
            user_id: Some("u1".into()),
            household_id: None,
        };
        let client = builder()
            .with_session_cookie(cookie)
            .with_impersonation(ImpersonationLayer::try_new(&ids).unwrap())
            .build()
            .unwrap();

        client
            .get(&server.url("/api/v1/households/current"))
            .send()
            .await
            .unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn static_bearer_sent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/users/self")
                .header("authorization", "Bearer jwt-1");
            then.status(200).body("{}");
        });

        let client = builder()
            .with_bearer(BearerCredential::Static("jwt-1".into()))
            .build()
            .unwrap();

        client
            .get(&server.url("/api/v1/users/self"))
            .send()
            .await
            .unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn no_credential_layers_no_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/users/self")
                .header_missing("authorization")
                .header_missing("cookie");
            then.status(200).body("{}");
        });

        let client = builder().build().unwrap();
        client
            .get(&server.url("/api/v1/users/self"))
            .send()
            .await
            .unwrap();

        mock.assert();
    }
}
