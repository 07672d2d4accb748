use http::StatusCode;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::encoding::{DecodeError, EncodeError};
use ddb_auth::AuthError;
use ddb_http::HttpError;

/// Failure of a client operation.
///
/// Validation variants are returned before any network I/O. Server errors
/// carry the server's code and message verbatim; the HTTP status that came
/// with them is recorded on the operation span only.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An id argument was empty; `field` names it when the operation knows
    #[error("invalid ID provided{}", .field.map(|f| format!(" for {f}")).unwrap_or_default())]
    InvalidIdProvided { field: Option<&'static str> },

    #[error("nil input provided")]
    NilInputProvided,

    #[error("empty search query provided")]
    EmptyQueryProvided,

    #[error("empty email address provided")]
    EmptyEmailAddressProvided,

    /// The operation needs a cookie session
    #[error("cookie required for this operation")]
    CookieRequired,

    /// Login succeeded but no session cookie came back
    #[error("no cookies returned from request")]
    NoCookiesReturned,

    #[error("invalid TOTP token")]
    InvalidTotpToken,

    /// Unexpected status without a server error descriptor
    #[error("invalid response code: {status}")]
    InvalidResponseCode { status: StatusCode },

    #[error("OAuth2 authorization code not returned")]
    OAuth2CodeNotReturned,

    #[error("transport failure: {0}")]
    TransportFailure(#[source] HttpError),

    #[error("failed to decode response: {0}")]
    DecodeFailure(#[source] DecodeError),

    #[error("failed to encode request body: {0}")]
    EncodeFailure(#[source] EncodeError),

    /// Error descriptor returned in the response envelope
    #[error("server error {code}: {message}")]
    ServerError {
        code: String,
        message: String,
        details: Option<Map<String, Value>>,
    },

    /// The client timeout elapsed before the call completed
    #[error("request timed out")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,

    /// Rejected while applying client options
    #[error("invalid client configuration: {0}")]
    InvalidConfiguration(String),
}

/// Discriminant of [`Error`], for matching and span attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    InvalidIdProvided,
    NilInputProvided,
    EmptyQueryProvided,
    EmptyEmailAddressProvided,
    CookieRequired,
    NoCookiesReturned,
    InvalidTotpToken,
    InvalidResponseCode,
    OAuth2CodeNotReturned,
    TransportFailure,
    DecodeFailure,
    EncodeFailure,
    ServerError,
    Timeout,
    Cancelled,
    InvalidConfiguration,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidIdProvided => "invalid_id_provided",
            Self::NilInputProvided => "nil_input_provided",
            Self::EmptyQueryProvided => "empty_query_provided",
            Self::EmptyEmailAddressProvided => "empty_email_address_provided",
            Self::CookieRequired => "cookie_required",
            Self::NoCookiesReturned => "no_cookies_returned",
            Self::InvalidTotpToken => "invalid_totp_token",
            Self::InvalidResponseCode => "invalid_response_code",
            Self::OAuth2CodeNotReturned => "oauth2_code_not_returned",
            Self::TransportFailure => "transport_failure",
            Self::DecodeFailure => "decode_failure",
            Self::EncodeFailure => "encode_failure",
            Self::ServerError => "server_error",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
            Self::InvalidConfiguration => "invalid_configuration",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidIdProvided { .. } => ErrorKind::InvalidIdProvided,
            Self::NilInputProvided => ErrorKind::NilInputProvided,
            Self::EmptyQueryProvided => ErrorKind::EmptyQueryProvided,
            Self::EmptyEmailAddressProvided => ErrorKind::EmptyEmailAddressProvided,
            Self::CookieRequired => ErrorKind::CookieRequired,
            Self::NoCookiesReturned => ErrorKind::NoCookiesReturned,
            Self::InvalidTotpToken => ErrorKind::InvalidTotpToken,
            Self::InvalidResponseCode { .. } => ErrorKind::InvalidResponseCode,
            Self::OAuth2CodeNotReturned => ErrorKind::OAuth2CodeNotReturned,
            Self::TransportFailure(_) => ErrorKind::TransportFailure,
            Self::DecodeFailure(_) => ErrorKind::DecodeFailure,
            Self::EncodeFailure(_) => ErrorKind::EncodeFailure,
            Self::ServerError { .. } => ErrorKind::ServerError,
            Self::Timeout => ErrorKind::Timeout,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
        }
    }

    /// True for errors raised by pre-flight checks, before any I/O
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InvalidIdProvided
                | ErrorKind::NilInputProvided
                | ErrorKind::EmptyQueryProvided
                | ErrorKind::EmptyEmailAddressProvided
                | ErrorKind::CookieRequired
        )
    }

    pub(crate) fn invalid_id(field: &'static str) -> Self {
        Self::InvalidIdProvided { field: Some(field) }
    }
}

impl From<HttpError> for Error {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Timeout(_) | HttpError::DeadlineExceeded(_) => Self::Timeout,
            other => Self::TransportFailure(other),
        }
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::CodeNotReturned => Self::OAuth2CodeNotReturned,
            other => Self::InvalidConfiguration(format!("OAuth2 setup failed: {other}")),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn invalid_id_names_the_field_when_known() {
        assert_eq!(
            Error::InvalidIdProvided { field: None }.to_string(),
            "invalid ID provided"
        );
        assert_eq!(
            Error::invalid_id("mealPlan").to_string(),
            "invalid ID provided for mealPlan"
        );
    }

    #[test]
    fn server_error_renders_code_and_message() {
        let err = Error::ServerError {
            code: "E104".into(),
            message: "meal plan already finalized".into(),
            details: None,
        };
        assert_eq!(
            err.to_string(),
            "server error E104: meal plan already finalized"
        );
        assert_eq!(err.kind(), ErrorKind::ServerError);
        assert!(!err.is_validation());
    }

    #[test]
    fn http_timeouts_become_timeout() {
        let err = Error::from(HttpError::Timeout(Duration::from_secs(1)));
        assert!(matches!(err, Error::Timeout));

        let err = Error::from(HttpError::DeadlineExceeded(Duration::from_secs(1)));
        assert!(matches!(err, Error::Timeout));

        let err = Error::from(HttpError::ServiceClosed);
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
    }

    #[test]
    fn oauth2_missing_code_maps_to_its_own_kind() {
        assert_eq!(
            Error::from(AuthError::CodeNotReturned).kind(),
            ErrorKind::OAuth2CodeNotReturned
        );
        let err = Error::from(AuthError::ConfigError("client_id must not be empty".into()));
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        assert!(err.to_string().contains("client_id must not be empty"));
    }

    #[test]
    fn validation_kinds() {
        assert!(Error::NilInputProvided.is_validation());
        assert!(Error::EmptyQueryProvided.is_validation());
        assert!(Error::CookieRequired.is_validation());
        assert!(!Error::Timeout.is_validation());
        assert_eq!(ErrorKind::InvalidTotpToken.to_string(), "invalid_totp_token");
    }
}
