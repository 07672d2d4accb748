//! Per-call request description.

use http::Method;
use serde::Serialize;
use serde_json::Value;

use crate::encoding::EncodeError;
use crate::error::Error;
use crate::query::{QueryFilter, QueryValues};

/// Path under the API base, built segment by segment.
///
/// Ids are checked as they are appended and remembered for the operation
/// span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    path: String,
    ids: Vec<(&'static str, String)>,
}

impl Path {
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            path: prefix.trim_end_matches('/').to_owned(),
            ids: Vec::new(),
        }
    }

    /// Append an id segment
    ///
    /// # Errors
    /// Returns [`Error::InvalidIdProvided`] naming `field` when `id` is empty
    pub fn id(mut self, field: &'static str, id: &str) -> Result<Self, Error> {
        if id.is_empty() {
            return Err(Error::invalid_id(field));
        }
        self.path.push('/');
        self.path.push_str(id);
        self.ids.push((field, id.to_owned()));
        Ok(self)
    }

    #[must_use]
    pub fn segment(mut self, segment: &str) -> Self {
        self.path.push('/');
        self.path.push_str(segment.trim_matches('/'));
        self
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.path
    }
}

/// Everything needed to issue one request.
///
/// Built and validated by an operation method, then consumed by the
/// executor. Two specs built from the same arguments compare equal.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    method: Method,
    path: Path,
    query: QueryValues,
    filter: Option<QueryFilter>,
    body: Option<Value>,
    authenticated: bool,
    sensitive: bool,
}

impl RequestSpec {
    #[must_use]
    pub fn new(method: Method, path: Path) -> Self {
        Self {
            method,
            path,
            query: QueryValues::new(),
            filter: None,
            body: None,
            authenticated: true,
            sensitive: false,
        }
    }

    #[must_use]
    pub fn get(path: Path) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: Path) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: Path) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn patch(path: Path) -> Self {
        Self::new(Method::PATCH, path)
    }

    #[must_use]
    pub fn delete(path: Path) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a body; it is encoded with the client's content type at send time.
    ///
    /// # Errors
    /// Returns [`Error::EncodeFailure`] if `input` cannot be serialized
    pub fn body<T: Serialize + ?Sized>(mut self, input: &T) -> Result<Self, Error> {
        let value =
            serde_json::to_value(input).map_err(|e| Error::EncodeFailure(EncodeError::Json(e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Paginate with `filter`, or with the default filter when `None`
    #[must_use]
    pub fn filter(mut self, filter: Option<&QueryFilter>) -> Self {
        self.filter = Some(filter.cloned().unwrap_or_default());
        self
    }

    /// Set the search query `q`
    ///
    /// # Errors
    /// Returns [`Error::EmptyQueryProvided`] for a blank query
    pub fn search(mut self, query: &str) -> Result<Self, Error> {
        if query.trim().is_empty() {
            return Err(Error::EmptyQueryProvided);
        }
        self.query.set("q", query);
        Ok(self)
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.set(key, value);
        self
    }

    /// Send without credentials or impersonation headers
    #[must_use]
    pub fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }

    /// Keep bodies out of debug logs; they carry credentials
    #[must_use]
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        self.path.as_str()
    }

    /// Non-empty ids in the path, by field name
    #[must_use]
    pub fn ids(&self) -> &[(&'static str, String)] {
        &self.path.ids
    }

    #[must_use]
    pub fn pagination(&self) -> Option<&QueryFilter> {
        self.filter.as_ref()
    }

    #[must_use]
    pub fn body_value(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    #[must_use]
    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// Filter values overlaid with explicit query values
    #[must_use]
    pub fn query_values(&self) -> QueryValues {
        let mut values = self
            .filter
            .as_ref()
            .map(QueryFilter::to_query_values)
            .unwrap_or_default();
        values.extend(self.query.clone());
        values
    }
}

/// Reject a missing input
///
/// # Errors
/// Returns [`Error::NilInputProvided`] for `None`
pub fn required<T: ?Sized>(input: Option<&T>) -> Result<&T, Error> {
    input.ok_or(Error::NilInputProvided)
}
