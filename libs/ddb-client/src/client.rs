use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use ddb_auth::{Impersonation, SecretString};
use ddb_http::HttpClient;
use tokio_util::sync::CancellationToken;

use crate::encoding::ContentType;
use crate::error::Error;
use crate::options::{AuthKind, AuthMode, ClientOption, Settings};

/// Immutable snapshot used by in-flight calls
pub struct ClientState {
    pub settings: Settings,
    /// Carries credentials and impersonation headers
    pub authed: HttpClient,
    /// Carries neither; used by login, registration and password reset
    pub plain: HttpClient,
}

/// Client for the Dinner Done Better API.
///
/// Cheap to clone; clones share configuration, so [`Client::set_options`]
/// on one is seen by all. Calls already in flight keep the configuration
/// they started with.
///
/// ```ignore
/// use ddb_client::{Client, ClientOption, UserLoginInput};
///
/// let client = Client::new(
///     "https://api.dinnerdonebetter.dev",
///     [ClientOption::Login(UserLoginInput::new("chef", "hunter2"))],
/// )
/// .await?;
///
/// let plans = client.get_meal_plans(None).await?;
/// ```
#[derive(Clone)]
pub struct Client {
    state: Arc<ArcSwap<ClientState>>,
    cancel: Option<CancellationToken>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.load();
        f.debug_struct("Client")
            .field("base_url", &state.settings.url.base())
            .field("content_type", &state.settings.encoder.content_type())
            .field("auth", &state.settings.auth.kind())
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client for `base_url`, applying `options` in order.
    ///
    /// Must be called inside a Tokio runtime.
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfiguration`] for a bad base URL or option,
    /// or the error of a failed `Login`/`OAuth2` handshake
    pub async fn new(
        base_url: &str,
        options: impl IntoIterator<Item = ClientOption>,
    ) -> Result<Self, Error> {
        let mut settings = Settings::new(base_url)?;
        for option in options {
            settings.apply(option).await?;
        }
        Self::from_settings(settings)
    }

    pub(crate) fn from_settings(settings: Settings) -> Result<Self, Error> {
        Ok(Self {
            state: Arc::new(ArcSwap::from_pointee(settings.build()?)),
            cancel: None,
        })
    }

    /// Apply `options` in order and swap in the result.
    ///
    /// All or nothing: if any option fails the previous configuration stays.
    /// Concurrent calls to `set_options` on clones of one client race; the
    /// last one to finish wins.
    ///
    /// # Errors
    /// See [`Client::new`]
    pub async fn set_options(
        &self,
        options: impl IntoIterator<Item = ClientOption>,
    ) -> Result<(), Error> {
        let mut settings = self.state.load().settings.clone();
        for option in options {
            settings.apply(option).await?;
        }
        self.replace_settings(settings)
    }

    pub(crate) fn replace_settings(&self, settings: Settings) -> Result<(), Error> {
        self.state.store(Arc::new(settings.build()?));
        tracing::debug!("client configuration replaced");
        Ok(())
    }

    /// A handle whose calls fail with [`Error::Cancelled`] once `token`
    /// is cancelled. Configuration stays shared with `self`.
    #[must_use]
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            state: Arc::clone(&self.state),
            cancel: Some(token),
        }
    }

    pub(crate) fn snapshot(&self) -> Arc<ClientState> {
        self.state.load_full()
    }

    pub(crate) fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        self.state.load().settings.url.base().to_owned()
    }

    #[must_use]
    pub fn content_type(&self) -> ContentType {
        self.state.load().settings.encoder.content_type()
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.state.load().settings.timeout
    }

    #[must_use]
    pub fn auth_kind(&self) -> AuthKind {
        self.state.load().settings.auth.kind()
    }

    #[must_use]
    pub fn impersonation(&self) -> Impersonation {
        self.state.load().settings.impersonation.clone()
    }

    /// Current session cookie value, including refreshes the server sent
    #[must_use]
    pub fn session_cookie(&self) -> Option<SecretString> {
        match &self.state.load().settings.auth {
            AuthMode::Cookie(cookie) => cookie.value(),
            _ => None,
        }
    }
}
