use std::sync::Arc;
use std::time::Duration;

use aliri_clock::DurationSecs;
use aliri_tokens::sources::AsyncTokenSource;
use aliri_tokens::{AccessToken, IdToken, TokenLifetimeConfig, TokenWithLifetime};
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use http::header::AUTHORIZATION;
use url::Url;
use zeroize::Zeroizing;

use super::config::OAuth2Config;
use super::types::TokenResponse;
use crate::SecretString;
use crate::error::AuthError;
use crate::format_http_error;

/// Refresh token shared by every source spawned for one [`Token`](super::Token)
pub type RefreshSlot = Arc<ArcSwapOption<SecretString>>;

/// Token source for the authorization-code grant.
///
/// The first request redeems the authorization code; every later one uses
/// `grant_type=refresh_token` with the most recent refresh token.
pub struct AuthCodeTokenSource {
    client: ddb_http::HttpClient,
    token_endpoint: Url,
    client_id: String,
    client_secret: SecretString,
    redirect_uri: String,
    scopes: Option<String>,
    pending_code: Option<SecretString>,
    refresh: RefreshSlot,
    default_ttl: Duration,
    refresh_offset: Duration,
    min_refresh_period: Duration,
}

impl AuthCodeTokenSource {
    /// # Errors
    /// Returns [`AuthError::ConfigError`] for a bad endpoint, or
    /// [`AuthError::Http`] if the client cannot be built
    pub fn new(
        config: &OAuth2Config,
        code: Option<SecretString>,
        refresh: RefreshSlot,
    ) -> Result<Self, AuthError> {
        let client = ddb_http::HttpClientBuilder::with_config(config.http_config())
            .build()
            .map_err(|e| AuthError::Http(format_http_error(&e, "OAuth2 token")))?;

        Ok(Self {
            client,
            token_endpoint: config.token_endpoint()?,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri().to_string(),
            scopes: config.joined_scopes(),
            pending_code: code,
            refresh,
            default_ttl: config.default_ttl,
            refresh_offset: config.refresh_offset,
            min_refresh_period: config.min_refresh_period,
        })
    }

    fn basic_auth(&self) -> Zeroizing<String> {
        let credentials = Zeroizing::new(format!(
            "{}:{}",
            self.client_id,
            self.client_secret.expose()
        ));
        let encoded = Zeroizing::new(general_purpose::STANDARD.encode(credentials.as_bytes()));
        Zeroizing::new(format!("Basic {}", &*encoded))
    }
}

#[async_trait]
impl AsyncTokenSource for AuthCodeTokenSource {
    type Error = AuthError;

    async fn request_token(&mut self) -> Result<TokenWithLifetime, Self::Error> {
        let refresh_token = self.refresh.load_full();
        let grant_value: Zeroizing<String>;
        let mut fields: Vec<(&str, &str)> = Vec::with_capacity(4);

        if let Some(code) = &self.pending_code {
            grant_value = Zeroizing::new(code.expose().to_owned());
            fields.push(("grant_type", "authorization_code"));
            fields.push(("code", &grant_value));
            fields.push(("redirect_uri", &self.redirect_uri));
        } else if let Some(refresh_token) = &refresh_token {
            grant_value = Zeroizing::new(refresh_token.expose().to_owned());
            fields.push(("grant_type", "refresh_token"));
            fields.push(("refresh_token", &grant_value));
        } else {
            return Err(AuthError::Unavailable(
                "no refresh token issued; authorization must be repeated".into(),
            ));
        }
        if let Some(scope) = &self.scopes {
            fields.push(("scope", scope));
        }

        let basic = self.basic_auth();
        let response = self
            .client
            .post(self.token_endpoint.as_str())
            .header(AUTHORIZATION.as_str(), &basic)
            .form(fields.as_slice())
            .map_err(|e| AuthError::Http(format_http_error(&e, "OAuth2 token")))?
            .send()
            .await
            .map_err(|e| AuthError::Http(format_http_error(&e, "OAuth2 token")))?;

        let token_resp: TokenResponse = response
            .error_for_status()
            .map_err(|e| AuthError::Http(format_http_error(&e, "OAuth2 token")))?
            .json()
            .await
            .map_err(|e| AuthError::Http(format_http_error(&e, "OAuth2 token")))?;

        if let Some(ref tt) = token_resp.token_type
            && !tt.eq_ignore_ascii_case("bearer")
        {
            return Err(AuthError::UnsupportedTokenType(tt.clone()));
        }
        if token_resp.access_token.is_empty() {
            return Err(AuthError::InvalidResponse("empty access_token".into()));
        }

        // The code is single-use once redeemed.
        self.pending_code = None;
        if let Some(rotated) = token_resp.refresh_token.filter(|t| !t.is_empty()) {
            self.refresh.store(Some(Arc::new(SecretString::new(rotated))));
        }

        let lifetime_secs = token_resp.expires_in.unwrap_or(self.default_ttl.as_secs());
        let (freshness, min_stale) = refresh_params(
            lifetime_secs,
            &self.refresh_offset,
            &self.min_refresh_period,
        );
        tracing::debug!(lifetime_secs, "OAuth2 token issued");

        let lifetime_config = TokenLifetimeConfig::new(freshness, min_stale);
        Ok(lifetime_config.create_token(
            &AccessToken::new(token_resp.access_token),
            None::<&IdToken>,
            DurationSecs(lifetime_secs),
        ))
    }
}

/// `(freshness_period, min_staleness_period)` for [`TokenLifetimeConfig`].
///
/// The token goes stale `refresh_offset` before expiry, or at half its
/// lifetime when the offset is longer than the lifetime. The staleness
/// floor is `min_refresh_period`, capped so stale time never passes expiry.
#[allow(clippy::integer_division, clippy::cast_precision_loss)]
pub fn refresh_params(
    lifetime_secs: u64,
    refresh_offset: &Duration,
    min_refresh_period: &Duration,
) -> (f64, DurationSecs) {
    if lifetime_secs == 0 {
        return (0.0, DurationSecs(0));
    }

    let offset = refresh_offset.as_secs();
    let desired_delay = if offset < lifetime_secs {
        lifetime_secs - offset
    } else {
        lifetime_secs / 2
    };

    let freshness = (desired_delay as f64) / (lifetime_secs as f64);
    let min_stale = min_refresh_period.as_secs().min(desired_delay);

    (freshness, DurationSecs(min_stale))
}
