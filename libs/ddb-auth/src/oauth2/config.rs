use std::fmt;
use std::time::Duration;

use url::Url;

use crate::SecretString;
use crate::error::AuthError;

/// Configuration for the authorization-code flow against a DDB server.
///
/// Both legs are served by the API host itself:
/// `{base_url}/oauth2/authorize` and `{base_url}/oauth2/token`.
///
/// `Debug` redacts the client secret and the bootstrap token.
#[derive(Clone)]
pub struct OAuth2Config {
    /// API base URL; the `OAuth2` endpoints hang off it
    pub base_url: Url,

    pub client_id: String,
    pub client_secret: SecretString,

    /// Requested scopes, sent space-separated
    pub scopes: Vec<String>,

    /// Redirect URI registered for the client (default: `base_url`)
    pub redirect_uri: Option<Url>,

    /// Bearer token authenticating the authorize request, usually a JWT
    /// obtained from the JWT login endpoint
    pub bootstrap_token: SecretString,

    /// How far before expiry the token should be refreshed (default: 30 min)
    pub refresh_offset: Duration,

    /// Maximum random jitter applied to the refresh time (default: 5 min)
    pub jitter_max: Duration,

    /// Minimum period between consecutive refresh attempts (default: 10 s)
    pub min_refresh_period: Duration,

    /// Fallback TTL when the token endpoint omits `expires_in` (default: 5 min)
    pub default_ttl: Duration,

    /// Override for the token client's HTTP configuration. When `None`,
    /// [`HttpClientConfig::token_endpoint`](ddb_http::HttpClientConfig::token_endpoint)
    /// is used.
    pub http_config: Option<ddb_http::HttpClientConfig>,
}

impl OAuth2Config {
    /// Config with default refresh policy
    #[must_use]
    pub fn new(
        base_url: Url,
        client_id: impl Into<String>,
        client_secret: impl Into<SecretString>,
        bootstrap_token: impl Into<SecretString>,
    ) -> Self {
        Self {
            base_url,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            scopes: Vec::new(),
            redirect_uri: None,
            bootstrap_token: bootstrap_token.into(),
            refresh_offset: Duration::from_secs(30 * 60),
            jitter_max: Duration::from_secs(5 * 60),
            min_refresh_period: Duration::from_secs(10),
            default_ttl: Duration::from_secs(5 * 60),
            http_config: None,
        }
    }

    /// # Errors
    /// Returns [`AuthError::ConfigError`] when a credential is blank or the
    /// base URL cannot carry paths
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.client_id.trim().is_empty() {
            return Err(AuthError::ConfigError("client_id must not be empty".into()));
        }
        if self.client_secret.is_empty() {
            return Err(AuthError::ConfigError(
                "client_secret must not be empty".into(),
            ));
        }
        if self.bootstrap_token.is_empty() {
            return Err(AuthError::ConfigError(
                "bootstrap token must not be empty".into(),
            ));
        }
        if self.base_url.cannot_be_a_base() {
            return Err(AuthError::ConfigError(format!(
                "base URL '{}' cannot be a base",
                self.base_url
            )));
        }
        Ok(())
    }

    /// `{base_url}/oauth2/authorize`
    ///
    /// # Errors
    /// Returns [`AuthError::ConfigError`] if the URL cannot be joined
    pub fn authorize_endpoint(&self) -> Result<Url, AuthError> {
        self.endpoint("oauth2/authorize")
    }

    /// `{base_url}/oauth2/token`
    ///
    /// # Errors
    /// Returns [`AuthError::ConfigError`] if the URL cannot be joined
    pub fn token_endpoint(&self) -> Result<Url, AuthError> {
        self.endpoint("oauth2/token")
    }

    #[must_use]
    pub fn redirect_uri(&self) -> &Url {
        self.redirect_uri.as_ref().unwrap_or(&self.base_url)
    }

    #[must_use]
    pub(crate) fn joined_scopes(&self) -> Option<String> {
        (!self.scopes.is_empty()).then(|| self.scopes.join(" "))
    }

    pub(crate) fn http_config(&self) -> ddb_http::HttpClientConfig {
        self.http_config
            .clone()
            .unwrap_or_else(ddb_http::HttpClientConfig::token_endpoint)
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path)
            .map_err(|e| AuthError::ConfigError(format!("invalid OAuth2 endpoint: {e}")))
    }
}

impl fmt::Debug for OAuth2Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Config")
            .field("base_url", &self.base_url.as_str())
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scopes", &self.scopes)
            .field("redirect_uri", &self.redirect_uri.as_ref().map(Url::as_str))
            .field("bootstrap_token", &"[REDACTED]")
            .field("refresh_offset", &self.refresh_offset)
            .field("jitter_max", &self.jitter_max)
            .field("min_refresh_period", &self.min_refresh_period)
            .field("default_ttl", &self.default_ttl)
            .field("http_config", &self.http_config)
            .finish()
    }
}
