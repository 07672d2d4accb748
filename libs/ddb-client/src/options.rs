//! Client configuration: the option set and what it resolves to.

use std::sync::Arc;
use std::time::Duration;

use ddb_auth::{
    BearerCredential, DEFAULT_COOKIE_NAME, HttpClientBuilderExt, Impersonation,
    ImpersonationLayer, OAuth2Config, SecretString, SessionCookie, Token,
};
use ddb_http::{HttpClientBuilder, HttpClientConfig, RetryConfig, TransportSecurity};
use http::HeaderValue;
use http::header::ACCEPT;
use tracing::Dispatch;

use crate::client::{Client, ClientState};
use crate::encoding::{ContentType, Encoder};
use crate::error::Error;
use crate::types::auth::UserLoginInput;
use crate::url_builder::UrlBuilder;

/// Timeout used when none is configured, or when zero is given
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// One configuration change, applied in order by [`Client::new`] and
/// [`Client::set_options`].
///
/// `Login` and `OAuth2` talk to the server while being applied.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum ClientOption {
    /// Replace the base URL
    Url(String),
    /// Wrap requests in `outgoing_http` spans and propagate trace context
    Otel(bool),
    /// Encode and accept `application/json` (default)
    Json,
    /// Encode and accept `application/xml`
    Xml,
    /// Route this client's logs and spans to a dedicated dispatcher
    Logger(Dispatch),
    /// Log request and response bodies at `debug`
    Debug(bool),
    /// Bound every call, retries included; zero restores the default
    Timeout(Duration),
    Retry(RetryConfig),
    /// Session cookie name (default `ddb_api_cookie`)
    CookieName(String),
    /// Authenticate with an existing session cookie value
    Cookie(SecretString),
    /// Log in and authenticate with the returned session cookie
    Login(UserLoginInput),
    /// Static `Authorization: Bearer` token, such as a JWT
    Bearer(SecretString),
    /// Authorization-code exchange with background refresh
    OAuth2(OAuth2Credentials),
    ImpersonatingUser(String),
    ImpersonatingHousehold(String),
    WithoutImpersonating,
}

impl ClientOption {
    #[must_use]
    pub fn cookie(value: impl Into<SecretString>) -> Self {
        Self::Cookie(value.into())
    }

    #[must_use]
    pub fn bearer(token: impl Into<SecretString>) -> Self {
        Self::Bearer(token.into())
    }

    #[must_use]
    pub fn oauth2(
        client_id: impl Into<String>,
        client_secret: impl Into<SecretString>,
        scopes: Vec<String>,
        bootstrap_token: impl Into<SecretString>,
    ) -> Self {
        Self::OAuth2(OAuth2Credentials {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scopes,
            bootstrap_token: bootstrap_token.into(),
        })
    }
}

/// Registered client credentials plus the bearer token that authorizes
/// the authorize request
#[derive(Clone, Debug)]
pub struct OAuth2Credentials {
    pub client_id: String,
    pub client_secret: SecretString,
    pub scopes: Vec<String>,
    pub bootstrap_token: SecretString,
}

/// Credential strategy in force
#[derive(Clone, Debug, Default)]
pub enum AuthMode {
    #[default]
    None,
    Cookie(SessionCookie),
    Bearer(SecretString),
    OAuth2(Token),
}

/// Which [`AuthMode`] a client uses, without the credential
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthKind {
    None,
    Cookie,
    Bearer,
    OAuth2,
}

impl AuthMode {
    #[must_use]
    pub fn kind(&self) -> AuthKind {
        match self {
            Self::None => AuthKind::None,
            Self::Cookie(_) => AuthKind::Cookie,
            Self::Bearer(_) => AuthKind::Bearer,
            Self::OAuth2(_) => AuthKind::OAuth2,
        }
    }
}

/// Resolved options; transports are rebuilt from this on every change
#[derive(Clone, Debug)]
pub struct Settings {
    pub url: UrlBuilder,
    pub encoder: Encoder,
    pub timeout: Duration,
    pub retry: RetryConfig,
    pub otel: bool,
    pub debug: bool,
    pub logger: Option<Dispatch>,
    pub cookie_name: Arc<str>,
    pub auth: AuthMode,
    pub impersonation: Impersonation,
}

impl Settings {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        Ok(Self {
            url: UrlBuilder::new(base_url)?,
            encoder: Encoder::default(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
            otel: false,
            debug: false,
            logger: None,
            cookie_name: Arc::from(DEFAULT_COOKIE_NAME),
            auth: AuthMode::None,
            impersonation: Impersonation::default(),
        })
    }

    pub async fn apply(&mut self, option: ClientOption) -> Result<(), Error> {
        match option {
            ClientOption::Url(url) => self.url = UrlBuilder::new(&url)?,
            ClientOption::Otel(enabled) => self.otel = enabled,
            ClientOption::Json => self.encoder = Encoder::new(ContentType::Json),
            ClientOption::Xml => self.encoder = Encoder::new(ContentType::Xml),
            ClientOption::Logger(dispatch) => self.logger = Some(dispatch),
            ClientOption::Debug(enabled) => self.debug = enabled,
            ClientOption::Timeout(timeout) => {
                self.timeout = if timeout.is_zero() {
                    DEFAULT_TIMEOUT
                } else {
                    timeout
                };
            }
            ClientOption::Retry(retry) => self.retry = retry,
            ClientOption::CookieName(name) => self.set_cookie_name(&name)?,
            ClientOption::Cookie(value) => {
                if value.is_empty() {
                    return Err(Error::InvalidConfiguration(
                        "cookie value must not be empty".into(),
                    ));
                }
                self.use_cookie(value);
            }
            ClientOption::Login(input) => {
                let cookie = Client::from_settings(self.clone())?
                    .login(Some(&input))
                    .await?;
                self.use_cookie(cookie);
            }
            ClientOption::Bearer(token) => {
                if token.is_empty() {
                    return Err(Error::InvalidConfiguration(
                        "bearer token must not be empty".into(),
                    ));
                }
                self.auth = AuthMode::Bearer(token);
            }
            ClientOption::OAuth2(credentials) => {
                let token = Token::new(self.oauth2_config(credentials)?).await?;
                self.auth = AuthMode::OAuth2(token);
            }
            ClientOption::ImpersonatingUser(id) => {
                self.impersonation.user_id = Some(id).filter(|id| !id.is_empty());
            }
            ClientOption::ImpersonatingHousehold(id) => {
                self.impersonation.household_id = Some(id).filter(|id| !id.is_empty());
            }
            ClientOption::WithoutImpersonating => self.impersonation = Impersonation::default(),
        }
        Ok(())
    }

    fn set_cookie_name(&mut self, name: &str) -> Result<(), Error> {
        let name = name.trim();
        if name.is_empty() || name.contains(['=', ';', ' ']) {
            return Err(Error::InvalidConfiguration(format!(
                "invalid cookie name '{name}'"
            )));
        }
        self.cookie_name = Arc::from(name);
        if let AuthMode::Cookie(cookie) = &self.auth {
            self.auth = AuthMode::Cookie(SessionCookie::new(
                Arc::clone(&self.cookie_name),
                cookie.value(),
            ));
        }
        Ok(())
    }

    fn use_cookie(&mut self, value: SecretString) {
        self.auth = AuthMode::Cookie(SessionCookie::new(
            Arc::clone(&self.cookie_name),
            Some(value),
        ));
    }

    fn oauth2_config(&self, credentials: OAuth2Credentials) -> Result<OAuth2Config, Error> {
        let base_url = url::Url::parse(self.url.base())
            .map_err(|e| Error::InvalidConfiguration(format!("invalid base URL: {e}")))?;

        let mut config = OAuth2Config::new(
            base_url,
            credentials.client_id,
            credentials.client_secret,
            credentials.bootstrap_token,
        );
        config.scopes = credentials.scopes;
        config.http_config = Some(HttpClientConfig {
            request_timeout: self.timeout,
            transport: self.transport_security(),
            ..HttpClientConfig::token_endpoint()
        });
        config.validate()?;
        Ok(config)
    }

    fn transport_security(&self) -> TransportSecurity {
        if self.url.is_insecure() {
            TransportSecurity::AllowInsecureHttp
        } else {
            TransportSecurity::TlsOnly
        }
    }

    /// Transport settings shared by the authenticated and plain callers
    pub fn transport_config(&self) -> HttpClientConfig {
        HttpClientConfig {
            request_timeout: self.timeout,
            total_timeout: Some(self.timeout),
            retry: self.retry.clone(),
            transport: self.transport_security(),
            otel: self.otel,
            ..HttpClientConfig::default()
        }
    }

    fn http_builder(&self) -> HttpClientBuilder {
        HttpClientBuilder::with_config(self.transport_config()).default_header(
            ACCEPT,
            HeaderValue::from_static(self.encoder.content_type().mime()),
        )
    }

    /// Build both callers. Must run inside a Tokio runtime.
    pub fn build(self) -> Result<ClientState, Error> {
        let transport_error =
            |e: ddb_http::HttpError| Error::InvalidConfiguration(format!("transport: {e}"));

        let plain = self.http_builder().build().map_err(transport_error)?;

        let mut authed = match &self.auth {
            AuthMode::None => self.http_builder(),
            AuthMode::Cookie(cookie) => self.http_builder().with_session_cookie(cookie.clone()),
            AuthMode::Bearer(token) => self
                .http_builder()
                .with_bearer(BearerCredential::Static(token.clone())),
            AuthMode::OAuth2(token) => self.http_builder().with_oauth2_token(token.clone()),
        };
        if !self.impersonation.is_empty() {
            let layer = ImpersonationLayer::try_new(&self.impersonation).map_err(|e| {
                Error::InvalidConfiguration(format!("invalid impersonation id: {e}"))
            })?;
            authed = authed.with_impersonation(layer);
        }
        let authed = authed.build().map_err(transport_error)?;

        Ok(ClientState {
            settings: self,
            authed,
            plain,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings::new("https://api.example.com").unwrap()
    }

    #[tokio::test]
    async fn zero_timeout_restores_default() {
        let mut s = settings();
        s.apply(ClientOption::Timeout(Duration::from_secs(3)))
            .await
            .unwrap();
        assert_eq!(s.timeout, Duration::from_secs(3));
        s.apply(ClientOption::Timeout(Duration::ZERO)).await.unwrap();
        assert_eq!(s.timeout, DEFAULT_TIMEOUT);
    }

    #[tokio::test]
    async fn content_type_options_reseat_encoder() {
        let mut s = settings();
        s.apply(ClientOption::Xml).await.unwrap();
        assert_eq!(s.encoder.content_type(), ContentType::Xml);
        s.apply(ClientOption::Json).await.unwrap();
        assert_eq!(s.encoder.content_type(), ContentType::Json);
    }

    #[tokio::test]
    async fn malformed_url_is_rejected() {
        let mut s = settings();
        let err = s
            .apply(ClientOption::Url("::not a url::".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        assert_eq!(s.url.base(), "https://api.example.com");
    }

    #[tokio::test]
    async fn impersonation_ids_set_and_cleared() {
        let mut s = settings();
        s.apply(ClientOption::ImpersonatingUser("u9".into()))
            .await
            .unwrap();
        s.apply(ClientOption::ImpersonatingHousehold(String::new()))
            .await
            .unwrap();
        assert_eq!(s.impersonation.user_id.as_deref(), Some("u9"));
        assert!(s.impersonation.household_id.is_none());

        s.apply(ClientOption::WithoutImpersonating).await.unwrap();
        assert!(s.impersonation.is_empty());
    }

    #[tokio::test]
    async fn cookie_name_follows_existing_cookie() {
        let mut s = settings();
        s.apply(ClientOption::cookie("abc")).await.unwrap();
        s.apply(ClientOption::CookieName("session".into()))
            .await
            .unwrap();
        match &s.auth {
            AuthMode::Cookie(cookie) => {
                assert_eq!(cookie.name(), "session");
                assert_eq!(cookie.value().unwrap().expose(), "abc");
            }
            other => panic!("unexpected {other:?}"),
        }

        let err = s
            .apply(ClientOption::CookieName("a=b".into()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[tokio::test]
    async fn empty_credentials_are_rejected() {
        let mut s = settings();
        assert!(s.apply(ClientOption::cookie("")).await.is_err());
        assert!(s.apply(ClientOption::bearer("")).await.is_err());
        assert_eq!(s.auth.kind(), AuthKind::None);
    }

    #[test]
    fn transport_follows_base_scheme_and_timeout() {
        let mut s = Settings::new("http://localhost:8080").unwrap();
        s.timeout = Duration::from_secs(4);
        let config = s.transport_config();
        assert_eq!(config.transport, TransportSecurity::AllowInsecureHttp);
        assert_eq!(config.request_timeout, Duration::from_secs(4));
        assert_eq!(config.total_timeout, Some(Duration::from_secs(4)));

        assert_eq!(
            settings().transport_config().transport,
            TransportSecurity::TlsOnly
        );
    }

    #[tokio::test]
    async fn invalid_impersonation_id_fails_build() {
        let mut s = settings();
        s.apply(ClientOption::ImpersonatingUser("bad\nid".into()))
            .await
            .unwrap();
        assert!(matches!(s.build(), Err(Error::InvalidConfiguration(_))));
    }
}
