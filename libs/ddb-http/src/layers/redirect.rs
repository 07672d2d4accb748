//! Redirect policy for the API transport.
//!
//! Same-origin hops are followed as-is. Cross-origin hops are refused unless
//! the configuration allows them, and when followed they lose every header
//! in [`SENSITIVE_HEADERS`]. HTTPS → HTTP downgrades are refused.

use crate::config::RedirectConfig;
use http::header::{self, HeaderName};
use http::{Request, Uri};
use tower_http::follow_redirect::policy::{Action, Attempt, Policy};

/// Credential and impersonation headers removed on cross-origin redirects
pub static SENSITIVE_HEADERS: [HeaderName; 5] = [
    header::AUTHORIZATION,
    header::COOKIE,
    header::PROXY_AUTHORIZATION,
    HeaderName::from_static("x-impersonate-user"),
    HeaderName::from_static("x-impersonate-household"),
];

/// [`Policy`] driven by a [`RedirectConfig`].
///
/// Cloned per request by `FollowRedirect`, so hop counting restarts each call.
#[derive(Debug, Clone)]
pub struct SecureRedirectPolicy {
    config: RedirectConfig,
    hops: usize,
    left_origin: bool,
}

impl SecureRedirectPolicy {
    #[must_use]
    pub fn new(config: RedirectConfig) -> Self {
        Self {
            config,
            hops: 0,
            left_origin: false,
        }
    }

    /// Scheme, host and effective port all match. A missing scheme counts as https.
    fn same_origin(a: &Uri, b: &Uri) -> bool {
        let scheme_a = a.scheme_str().unwrap_or("https");
        let scheme_b = b.scheme_str().unwrap_or("https");
        let port_a = a.port_u16().unwrap_or_else(|| default_port(scheme_a));
        let port_b = b.port_u16().unwrap_or_else(|| default_port(scheme_b));

        scheme_a == scheme_b && a.host().unwrap_or("") == b.host().unwrap_or("") && port_a == port_b
    }

    fn downgrades(from: &Uri, to: &Uri) -> bool {
        from.scheme_str().unwrap_or("https") == "https" && to.scheme_str() == Some("http")
    }

    fn host_allowed(&self, target: &Uri) -> bool {
        target
            .host()
            .is_some_and(|h| self.config.allowed_redirect_hosts.contains(h))
    }

    fn decide(&mut self, from: &Uri, to: &Uri) -> Action {
        self.hops += 1;
        if self.hops > self.config.max_redirects {
            tracing::debug!(
                hops = self.hops,
                max = self.config.max_redirects,
                "redirect limit reached"
            );
            return Action::Stop;
        }

        if !self.config.allow_https_downgrade && Self::downgrades(from, to) {
            tracing::warn!(from = %from, to = %to, "refusing https to http redirect");
            return Action::Stop;
        }

        let same_origin = Self::same_origin(from, to);
        if !same_origin {
            if self.config.same_origin_only && !self.host_allowed(to) {
                tracing::warn!(from = %from, to = %to, "refusing cross-origin redirect");
                return Action::Stop;
            }
            self.left_origin = true;
        }

        Action::Follow
    }

    fn scrub(&self, headers: &mut http::HeaderMap) {
        if !(self.left_origin && self.config.strip_sensitive_headers) {
            return;
        }
        for name in &SENSITIVE_HEADERS {
            if headers.remove(name).is_some() {
                tracing::debug!(header = %name, "stripped header on cross-origin redirect");
            }
        }
    }
}

fn default_port(scheme: &str) -> u16 {
    match scheme {
        "http" => 80,
        "https" => 443,
        _ => 0,
    }
}

impl<B: Clone, E> Policy<B, E> for SecureRedirectPolicy {
    fn redirect(&mut self, attempt: &Attempt<'_>) -> Result<Action, E> {
        Ok(self.decide(attempt.previous(), attempt.location()))
    }

    fn on_request(&mut self, request: &mut Request<B>) {
        self.scrub(request.headers_mut());
    }

    fn clone_body(&self, body: &B) -> Option<B> {
        Some(body.clone())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use http::{HeaderMap, HeaderValue};
    use std::collections::HashSet;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    fn follows(action: &Action) -> bool {
        matches!(action, Action::Follow)
    }

    fn loaded_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer t"));
        headers.insert(header::COOKIE, HeaderValue::from_static("ddb_api_cookie=abc"));
        headers.insert("x-impersonate-user", HeaderValue::from_static("u1"));
        headers.insert("x-impersonate-household", HeaderValue::from_static("h1"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    #[test]
    fn test_same_origin_with_default_port() {
        assert!(SecureRedirectPolicy::same_origin(
            &uri("https://api.example.com/a"),
            &uri("https://api.example.com:443/b")
        ));
        assert!(!SecureRedirectPolicy::same_origin(
            &uri("https://api.example.com/a"),
            &uri("https://api.example.com:8443/b")
        ));
        assert!(!SecureRedirectPolicy::same_origin(
            &uri("https://api.example.com/a"),
            &uri("http://api.example.com/b")
        ));
    }

    #[test]
    fn test_same_origin_hop_keeps_credentials() {
        let mut policy = SecureRedirectPolicy::new(RedirectConfig::default());
        let action = policy.decide(
            &uri("https://api.example.com/a"),
            &uri("https://api.example.com/b"),
        );
        assert!(follows(&action));

        let mut headers = loaded_headers();
        policy.scrub(&mut headers);
        assert_eq!(headers.len(), 5);
    }

    #[test]
    fn test_cross_origin_refused_by_default() {
        let mut policy = SecureRedirectPolicy::new(RedirectConfig::default());
        let action = policy.decide(
            &uri("https://api.example.com/a"),
            &uri("https://evil.example.net/b"),
        );
        assert!(!follows(&action));
    }

    #[test]
    fn test_cross_origin_hop_strips_credentials_and_impersonation() {
        let mut policy = SecureRedirectPolicy::new(RedirectConfig::permissive());
        let action = policy.decide(
            &uri("https://api.example.com/a"),
            &uri("https://cdn.example.net/b"),
        );
        assert!(follows(&action));

        let mut headers = loaded_headers();
        policy.scrub(&mut headers);
        assert_eq!(headers.len(), 1);
        assert!(headers.contains_key(header::ACCEPT));
    }

    #[test]
    fn test_allow_listed_host_is_followed() {
        let config = RedirectConfig {
            allowed_redirect_hosts: HashSet::from(["auth.example.com".to_owned()]),
            ..Default::default()
        };
        let mut policy = SecureRedirectPolicy::new(config);
        assert!(follows(&policy.decide(
            &uri("https://api.example.com/a"),
            &uri("https://auth.example.com/b"),
        )));
    }

    #[test]
    fn test_downgrade_refused_unless_allowed() {
        let mut strict = SecureRedirectPolicy::new(RedirectConfig::permissive());
        assert!(!follows(&strict.decide(
            &uri("https://api.example.com/a"),
            &uri("http://api.example.com/b"),
        )));

        let mut lax = SecureRedirectPolicy::new(RedirectConfig::for_testing());
        assert!(follows(&lax.decide(
            &uri("https://api.example.com/a"),
            &uri("http://api.example.com/b"),
        )));
    }

    #[test]
    fn test_hop_limit() {
        let config = RedirectConfig {
            max_redirects: 2,
            ..Default::default()
        };
        let mut policy = SecureRedirectPolicy::new(config);
        let from = uri("https://api.example.com/a");
        let to = uri("https://api.example.com/b");
        assert!(follows(&policy.decide(&from, &to)));
        assert!(follows(&policy.decide(&from, &to)));
        assert!(!follows(&policy.decide(&from, &to)));
    }

    #[test]
    fn test_disabled_never_follows() {
        let mut policy = SecureRedirectPolicy::new(RedirectConfig::disabled());
        assert!(!follows(&policy.decide(
            &uri("https://api.example.com/a"),
            &uri("https://api.example.com/b"),
        )));
    }
}
