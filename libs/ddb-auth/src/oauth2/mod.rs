//! Authorization-code `OAuth2` against the DDB server.
//!
//! [`Token::new`] performs the authorize redirect and the code exchange, then
//! keeps the access token fresh with the refresh token.

pub mod config;
pub(crate) mod flow;
pub(crate) mod source;
pub mod token;
pub(crate) mod types;

pub use config::OAuth2Config;
pub use flow::authorize;
pub use token::Token;
