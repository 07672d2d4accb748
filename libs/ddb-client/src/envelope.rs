//! The `{data, pagination, error}` wrapper every response arrives in.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::encoding::DecodeError;
use crate::error::Error;
use crate::query::SortDirection;

/// Server-reported pagination for list responses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total_count: u64,
    pub sort_by: SortDirection,
}

/// Error descriptor embedded in an envelope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

impl ApiError {
    /// A descriptor with neither code nor message means "no error"
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty() && self.message.is_empty()
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::ServerError {
            code: err.code,
            message: err.message,
            details: err.details,
        }
    }
}

/// Response wrapper, generic over the payload an operation declares.
///
/// Unknown top-level fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl<T> Envelope<T> {
    #[must_use]
    pub fn with_data(data: T) -> Self {
        Self {
            data: Some(data),
            pagination: None,
            error: None,
        }
    }

    /// The error descriptor, unless absent or blank
    #[must_use]
    pub fn error(&self) -> Option<&ApiError> {
        self.error.as_ref().filter(|e| !e.is_empty())
    }

    /// Fail with [`Error::ServerError`] if the envelope carries an error
    ///
    /// # Errors
    /// Returns the embedded error as [`Error::ServerError`]
    pub fn check(self) -> Result<Self, Error> {
        match self.error {
            Some(err) if !err.is_empty() => Err(err.into()),
            _ => Ok(Self { error: None, ..self }),
        }
    }

    /// The payload of a single-resource response
    ///
    /// # Errors
    /// Returns [`Error::ServerError`] for an embedded error, or
    /// [`Error::DecodeFailure`] when `data` is absent
    pub fn into_data(self) -> Result<T, Error> {
        self.check()?
            .data
            .ok_or(Error::DecodeFailure(DecodeError::MissingData))
    }

    /// Success check for operations without a payload
    ///
    /// # Errors
    /// Returns [`Error::ServerError`] for an embedded error
    pub fn into_unit(self) -> Result<(), Error> {
        self.check().map(drop)
    }
}

impl<T> Envelope<Vec<T>> {
    /// The items and pagination of a list response.
    ///
    /// A response without pagination is taken as one complete ascending page.
    ///
    /// # Errors
    /// Returns [`Error::ServerError`] for an embedded error
    pub fn into_page(self) -> Result<Page<T>, Error> {
        let envelope = self.check()?;
        let items = envelope.data.unwrap_or_default();
        let count = u64::try_from(items.len()).unwrap_or(u64::MAX);
        let pagination = envelope.pagination.unwrap_or(Pagination {
            page: 1,
            limit: count,
            total_count: count,
            sort_by: SortDirection::Asc,
        });

        Ok(Page {
            items,
            page: pagination.page,
            limit: pagination.limit,
            total_count: pagination.total_count,
            sort: pagination.sort_by,
        })
    }
}

/// One page of a list operation
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub limit: u64,
    pub total_count: u64,
    pub sort: SortDirection,
}

impl<T> Page<T> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Deserialize)]
    struct Vote {
        id: String,
    }

    fn parse<T: serde::de::DeserializeOwned>(json: &str) -> Envelope<T> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn list_with_pagination() {
        let env: Envelope<Vec<Vote>> = parse(
            r#"{"data":[{"id":"v1"}],"pagination":{"page":1,"limit":50,"totalCount":1,"sortBy":"asc"}}"#,
        );
        let page = env.into_page().unwrap();
        assert_eq!(page.items, vec![Vote { id: "v1".into() }]);
        assert_eq!((page.page, page.limit, page.total_count), (1, 50, 1));
        assert_eq!(page.sort, SortDirection::Asc);
    }

    #[test]
    fn list_without_pagination_is_one_full_page() {
        let env: Envelope<Vec<Vote>> = parse(r#"{"data":[{"id":"a"},{"id":"b"}]}"#);
        let page = env.into_page().unwrap();
        assert_eq!((page.page, page.limit, page.total_count), (1, 2, 2));
        assert_eq!(page.len(), 2);
    }

    #[test]
    fn null_list_is_empty_page() {
        let env: Envelope<Vec<Vote>> = parse(r#"{"data":null}"#);
        let page = env.into_page().unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn embedded_error_wins_over_data() {
        let env: Envelope<Vote> = parse(
            r#"{"data":{"id":"v1"},"error":{"code":"E42","message":"stale vote","details":{"vote":"v1"}}}"#,
        );
        match env.into_data().unwrap_err() {
            Error::ServerError {
                code,
                message,
                details,
            } => {
                assert_eq!(code, "E42");
                assert_eq!(message, "stale vote");
                assert_eq!(details.unwrap()["vote"], "v1");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn blank_error_descriptor_is_ignored() {
        let env: Envelope<Vote> = parse(r#"{"data":{"id":"v1"},"error":{"code":"","message":""}}"#);
        assert!(env.error().is_none());
        assert_eq!(env.into_data().unwrap().id, "v1");
    }

    #[test]
    fn missing_data_is_decode_failure() {
        let env: Envelope<Vote> = parse(r#"{"pagination":null}"#);
        assert!(matches!(
            env.into_data(),
            Err(Error::DecodeFailure(DecodeError::MissingData))
        ));

        let env: Envelope<Vote> = parse("{}");
        assert!(env.into_unit().is_ok());
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let env: Envelope<Vote> = parse(r#"{"data":{"id":"v1","weight":3},"details":{"traceID":"t"}}"#);
        assert_eq!(env.into_data().unwrap().id, "v1");
    }
}
