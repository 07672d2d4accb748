use base64::{Engine as _, engine::general_purpose};
use http::header::{AUTHORIZATION, LOCATION};
use rand::Rng;
use url::Url;
use zeroize::Zeroizing;

use super::config::OAuth2Config;
use crate::SecretString;
use crate::error::AuthError;
use crate::format_http_error;

/// Run the authorize leg and return the authorization code.
///
/// Sends `GET /oauth2/authorize` with the bootstrap bearer, does not follow
/// the redirect, and reads `code` from the `Location` query. A `state`
/// echoed back must match the one sent.
///
/// # Errors
/// - [`AuthError::Http`] on transport failure or an error status
/// - [`AuthError::CodeNotReturned`] when no `code` comes back
/// - [`AuthError::InvalidResponse`] on a `state` mismatch
pub async fn authorize(config: &OAuth2Config) -> Result<SecretString, AuthError> {
    let client = ddb_http::HttpClientBuilder::with_config(config.http_config().no_redirect())
        .build()
        .map_err(|e| AuthError::Http(format_http_error(&e, "OAuth2 authorize")))?;

    let state = random_state();
    let mut url = config.authorize_endpoint()?;
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("client_id", &config.client_id)
            .append_pair("redirect_uri", config.redirect_uri().as_str())
            .append_pair("response_type", "code");
        if let Some(scope) = config.joined_scopes() {
            query.append_pair("scope", &scope);
        }
        query.append_pair("state", &state);
    }

    let bearer = Zeroizing::new(format!("Bearer {}", config.bootstrap_token.expose()));
    let response = client
        .get(url.as_str())
        .header(AUTHORIZATION.as_str(), &bearer)
        .send()
        .await
        .map_err(|e| AuthError::Http(format_http_error(&e, "OAuth2 authorize")))?;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        let err = ddb_http::HttpError::HttpStatus {
            status,
            body_preview: String::new(),
            content_type: response.media_type(),
        };
        return Err(AuthError::Http(format_http_error(&err, "OAuth2 authorize")));
    }

    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::CodeNotReturned)?;

    code_from_location(&config.base_url, location, &state)
}

/// Extract `code` from a redirect target, resolving relative targets
/// against `base`.
pub fn code_from_location(
    base: &Url,
    location: &str,
    expected_state: &str,
) -> Result<SecretString, AuthError> {
    let target = base
        .join(location)
        .map_err(|e| AuthError::InvalidResponse(format!("bad redirect location: {e}")))?;

    let mut code = None;
    for (key, value) in target.query_pairs() {
        match key.as_ref() {
            "code" if !value.is_empty() => code = Some(SecretString::new(value.into_owned())),
            "state" if value != expected_state => {
                return Err(AuthError::InvalidResponse(
                    "state returned by authorize does not match".into(),
                ));
            }
            _ => {}
        }
    }
    code.ok_or(AuthError::CodeNotReturned)
}

fn random_state() -> String {
    let bytes: [u8; 24] = rand::rng().random();
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
