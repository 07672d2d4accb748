use thiserror::Error;

/// Failures while obtaining or applying credentials.
///
/// No variant ever carries a secret: HTTP failures are pre-formatted by
/// [`format_http_error`](crate::format_http_error), which drops bodies.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    /// Transport or status failure talking to the auth endpoints
    #[error("{0}")]
    Http(String),

    /// The token endpoint answered with something unusable
    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    /// `token_type` other than `Bearer`
    #[error("unsupported token type: {0}")]
    UnsupportedTokenType(String),

    #[error("OAuth2 config error: {0}")]
    ConfigError(String),

    /// The token watcher has no usable token right now
    #[error("token unavailable: {0}")]
    Unavailable(String),

    /// The authorize redirect carried no `code` parameter
    #[error("OAuth2 authorization code not returned")]
    CodeNotReturned,
}
