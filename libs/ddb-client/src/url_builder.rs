use url::Url;

use crate::error::Error;
use crate::query::QueryValues;

/// Joins operation paths onto the API base URL.
///
/// The base is kept as written (scheme and host case included) once it has
/// been validated, so composed URLs match fixtures byte for byte.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlBuilder {
    base: String,
    insecure: bool,
}

impl UrlBuilder {
    /// # Errors
    /// Returns [`Error::InvalidConfiguration`] for anything other than an
    /// absolute `http`/`https` URL with a host
    pub fn new(base: &str) -> Result<Self, Error> {
        let parsed = Url::parse(base.trim())
            .map_err(|e| Error::InvalidConfiguration(format!("invalid base URL '{base}': {e}")))?;

        let insecure = match parsed.scheme() {
            "https" => false,
            "http" => true,
            other => {
                return Err(Error::InvalidConfiguration(format!(
                    "unsupported base URL scheme '{other}'"
                )));
            }
        };
        if parsed.cannot_be_a_base() || parsed.host_str().is_none_or(str::is_empty) {
            return Err(Error::InvalidConfiguration(format!(
                "base URL '{base}' has no host"
            )));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(Error::InvalidConfiguration(format!(
                "base URL '{base}' must not carry a query or fragment"
            )));
        }

        Ok(Self {
            base: base.trim().trim_end_matches('/').to_owned(),
            insecure,
        })
    }

    /// Base URL without a trailing slash
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// True for `http://` bases
    #[must_use]
    pub fn is_insecure(&self) -> bool {
        self.insecure
    }

    /// `base + path`, plus `?query` when there are query values.
    ///
    /// `path` is used as given apart from its leading slash.
    #[must_use]
    pub fn build(&self, path: &str, query: &QueryValues) -> String {
        let path = path.trim_start_matches('/');
        let mut url = String::with_capacity(self.base.len() + path.len() + 1);
        url.push_str(&self.base);
        url.push('/');
        url.push_str(path);

        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.encode());
        }
        url
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn joins_without_double_slashes() {
        let empty = QueryValues::new();
        for base in ["https://api.example.com", "https://api.example.com/"] {
            let builder = UrlBuilder::new(base).unwrap();
            assert_eq!(
                builder.build("/api/v1/recipes", &empty),
                "https://api.example.com/api/v1/recipes"
            );
            assert_eq!(
                builder.build("api/v1/recipes", &empty),
                "https://api.example.com/api/v1/recipes"
            );
        }
    }

    #[test]
    fn keeps_base_path_prefix() {
        let builder = UrlBuilder::new("https://example.com/ddb/").unwrap();
        assert_eq!(
            builder.build("/auth/status", &QueryValues::new()),
            "https://example.com/ddb/auth/status"
        );
    }

    #[test]
    fn preserves_host_case() {
        let builder = UrlBuilder::new("https://API.Example.com").unwrap();
        assert_eq!(builder.base(), "https://API.Example.com");
    }

    #[test]
    fn query_keys_are_sorted_and_escaped() {
        let builder = UrlBuilder::new("https://api.example.com").unwrap();
        let mut query = QueryValues::new();
        query.set("q", "whisk & bowl");
        query.set("limit", "50");
        assert_eq!(
            builder.build("/api/v1/valid_instruments/search", &query),
            "https://api.example.com/api/v1/valid_instruments/search?limit=50&q=whisk+%26+bowl"
        );
    }

    #[test]
    fn rejects_unusable_bases() {
        for bad in [
            "not a url",
            "ftp://example.com",
            "mailto:chef@example.com",
            "https://example.com/?x=1",
        ] {
            let err = UrlBuilder::new(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidConfiguration(_)), "{bad}");
        }
    }

    #[test]
    fn plain_http_is_flagged() {
        assert!(UrlBuilder::new("http://localhost:8080").unwrap().is_insecure());
        assert!(!UrlBuilder::new("https://localhost").unwrap().is_insecure());
    }
}
