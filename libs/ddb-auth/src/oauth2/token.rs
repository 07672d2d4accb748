use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use aliri_clock::DurationSecs;
use aliri_tokens::backoff::ErrorBackoffConfig;
use aliri_tokens::jitter::RandomEarlyJitter;
use aliri_tokens::{TokenStatus, TokenWatcher};
use arc_swap::{ArcSwap, ArcSwapOption};

use super::config::OAuth2Config;
use super::flow::authorize;
use super::source::{AuthCodeTokenSource, RefreshSlot};
use crate::SecretString;
use crate::error::AuthError;

struct TokenInner {
    watcher: TokenWatcher,
}

struct WatcherConfig {
    jitter_max: Duration,
    min_refresh_period: Duration,
}

type SourceFactory = dyn Fn() -> Result<AuthCodeTokenSource, AuthError> + Send + Sync;

/// Auto-refreshing `OAuth2` access token.
///
/// Obtained through the authorization-code flow, then kept fresh in the
/// background with the refresh token. Reads never block on the network.
///
/// Cheap to clone; clones share the watcher.
#[derive(Clone)]
pub struct Token {
    inner: Arc<ArcSwap<TokenInner>>,
    source_factory: Arc<SourceFactory>,
    watcher_config: Arc<WatcherConfig>,
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token").finish_non_exhaustive()
    }
}

impl Token {
    /// Run the authorize leg, redeem the code and start background refresh.
    ///
    /// # Errors
    /// Returns [`AuthError::ConfigError`] for an invalid config,
    /// [`AuthError::CodeNotReturned`] when authorize yields no code, or
    /// [`AuthError::Http`] if either leg fails
    pub async fn new(config: OAuth2Config) -> Result<Self, AuthError> {
        config.validate()?;
        let code = authorize(&config).await?;
        Self::from_code(config, code).await
    }

    /// Redeem an authorization code obtained elsewhere.
    ///
    /// # Errors
    /// Returns [`AuthError::Http`] if the code exchange fails
    pub async fn from_code(config: OAuth2Config, code: SecretString) -> Result<Self, AuthError> {
        let watcher_config = Arc::new(WatcherConfig {
            jitter_max: config.jitter_max,
            min_refresh_period: config.min_refresh_period,
        });
        let refresh: RefreshSlot = Arc::new(ArcSwapOption::empty());

        let source = AuthCodeTokenSource::new(&config, Some(code), refresh.clone())?;
        let watcher = spawn_watcher(source, &watcher_config).await?;

        let source_factory: Arc<SourceFactory> =
            Arc::new(move || AuthCodeTokenSource::new(&config, None, refresh.clone()));

        Ok(Self {
            inner: Arc::new(ArcSwap::from_pointee(TokenInner { watcher })),
            source_factory,
            watcher_config,
        })
    }

    /// Current access token.
    ///
    /// # Errors
    /// Returns [`AuthError::Unavailable`] if the token expired before the
    /// background refresh replaced it
    pub fn get(&self) -> Result<SecretString, AuthError> {
        let guard = self.inner.load();
        let borrowed = guard.watcher.token();
        if matches!(borrowed.token_status(), TokenStatus::Expired) {
            return Err(AuthError::Unavailable(
                "token expired, refresh pending".into(),
            ));
        }
        Ok(SecretString::new(borrowed.access_token().as_str()))
    }

    /// Drop the cached token and fetch a new one with the refresh token.
    ///
    /// On failure a warning is logged and the current watcher stays.
    pub async fn invalidate(&self) {
        let source = match (self.source_factory)() {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("OAuth2 token invalidation: failed to create source: {e}");
                return;
            }
        };

        let watcher = match spawn_watcher(source, &self.watcher_config).await {
            Ok(w) => w,
            Err(e) => {
                tracing::warn!("OAuth2 token invalidation: refresh failed: {e}");
                return;
            }
        };

        self.inner.store(Arc::new(TokenInner { watcher }));
    }
}

async fn spawn_watcher(
    source: AuthCodeTokenSource,
    config: &WatcherConfig,
) -> Result<TokenWatcher, AuthError> {
    let jitter = RandomEarlyJitter::new(DurationSecs(config.jitter_max.as_secs()));
    let backoff =
        ErrorBackoffConfig::new(config.min_refresh_period, config.min_refresh_period * 30, 2);

    TokenWatcher::spawn_from_token_source(source, jitter, backoff).await
}
