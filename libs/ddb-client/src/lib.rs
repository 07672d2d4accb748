#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![warn(warnings)]

//! Typed client for the Dinner Done Better API.
//!
//! Every server endpoint is one async method on [`Client`]. A call:
//! - rejects empty ids, missing inputs and blank search queries before any
//!   network I/O
//! - composes the URL from the base URL, the route and the query filter
//! - sends through the `ddb-http` stack (retries, timeouts, redirect policy)
//!   with the configured credentials and impersonation headers
//! - unwraps the `{data, pagination, error}` envelope into the declared
//!   payload, a [`Page`], or an [`Error`]
//!
//! Each call runs in a `ddb.operation` tracing span named after the
//! operation, with one child span per HTTP attempt.
//!
//! # Example
//!
//! ```ignore
//! use ddb_client::{Client, ClientOption, QueryFilter, UserLoginInput};
//!
//! let client = Client::new(
//!     "https://api.dinnerdonebetter.dev",
//!     [ClientOption::Login(UserLoginInput::new("chef", "hunter2"))],
//! )
//! .await?;
//!
//! let whisks = client
//!     .search_for_valid_instruments("whisk", Some(&QueryFilter::default()))
//!     .await?;
//! for instrument in whisks {
//!     println!("{} {:?}", instrument.id, instrument.fields.str("name"));
//! }
//! ```

mod client;
pub mod encoding;
pub mod envelope;
mod error;
mod executor;
mod operations;
mod options;
pub mod query;
pub mod request;
pub mod types;
pub mod url_builder;

pub use client::Client;
pub use encoding::{ContentType, DecodeError, EncodeError, Encoder};
pub use envelope::{ApiError, Envelope, Page, Pagination};
pub use error::{Error, ErrorKind};
pub use options::{AuthKind, ClientOption, DEFAULT_TIMEOUT, OAuth2Credentials};
pub use query::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, QueryFilter, QueryValues, SortDirection};
pub use request::{Path, RequestSpec};
pub use types::auth::{TokenResponse, UserLoginInput, UserStatusResponse};
pub use url_builder::UrlBuilder;

pub use ddb_auth::{Impersonation, SecretString};
pub use ddb_http::{ExponentialBackoff, RetryConfig};
pub use tokio_util::sync::CancellationToken;
