#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]
//! Credential plumbing for the Dinner Done Better API client.
//!
//! Everything here is a tower layer that [`HttpClientBuilderExt`] places
//! inside the [`ddb_http`] retry loop: the session cookie, a static or
//! `OAuth2` bearer token, and the impersonation headers.

pub mod bearer;
pub mod builder_ext;
pub mod cookie;
pub mod error;
mod http_error;
pub mod impersonation;
pub mod oauth2;
mod secret;

pub use bearer::{BearerAuthLayer, BearerAuthService, BearerCredential};
pub use builder_ext::HttpClientBuilderExt;
pub use cookie::{
    CookieAuthLayer, CookieAuthService, DEFAULT_COOKIE_NAME, SessionCookie, find_set_cookie,
};
pub use error::AuthError;
pub use http_error::format_http_error;
pub use impersonation::{
    IMPERSONATE_HOUSEHOLD, IMPERSONATE_USER, Impersonation, ImpersonationLayer,
    ImpersonationService,
};
pub use oauth2::{OAuth2Config, Token};
pub use secret::SecretString;
