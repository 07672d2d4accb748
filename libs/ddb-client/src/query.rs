//! List filters and query-string values.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u8 = 50;
pub const MAX_LIMIT: u8 = 250;

/// Query parameters with lexicographically ordered keys.
///
/// A key may carry several values; they keep insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryValues(BTreeMap<String, Vec<String>>);

impl QueryValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every value of `key`
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), vec![value.into()]);
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `application/x-www-form-urlencoded` rendering, keys sorted
    #[must_use]
    pub fn encode(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.0 {
            for value in values {
                out.append_pair(key, value);
            }
        }
        out.finish()
    }

    pub(crate) fn extend(&mut self, other: QueryValues) {
        for (key, values) in other.0 {
            self.0.insert(key, values);
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pagination and time-window filter for list operations.
///
/// List operations given no filter send [`QueryFilter::default`]
/// (`limit=50&page=1&sortBy=asc`) rather than omitting the query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryFilter {
    /// 1-based page; 0 is sent as 1
    pub page: u64,
    /// Page size, clamped to `1..=250`
    pub limit: u8,
    pub sort_by: SortDirection,
    pub created_before: Option<DateTime<Utc>>,
    pub created_after: Option<DateTime<Utc>>,
    pub updated_before: Option<DateTime<Utc>>,
    pub updated_after: Option<DateTime<Utc>>,
    pub include_archived: Option<bool>,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort_by: SortDirection::Asc,
            created_before: None,
            created_after: None,
            updated_before: None,
            updated_after: None,
            include_archived: None,
        }
    }
}

impl QueryFilter {
    #[must_use]
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    #[must_use]
    pub fn limit(&self) -> u8 {
        self.limit.clamp(1, MAX_LIMIT)
    }

    #[must_use]
    pub fn to_query_values(&self) -> QueryValues {
        let mut values = QueryValues::new();
        values.set("page", self.page().to_string());
        values.set("limit", self.limit().to_string());
        values.set("sortBy", self.sort_by.as_str());

        let instants = [
            ("createdBefore", self.created_before),
            ("createdAfter", self.created_after),
            ("updatedBefore", self.updated_before),
            ("updatedAfter", self.updated_after),
        ];
        for (key, instant) in instants {
            if let Some(at) = instant {
                values.set(key, at.to_rfc3339_opts(SecondsFormat::AutoSi, true));
            }
        }
        if let Some(include) = self.include_archived {
            values.set("includeArchived", include.to_string());
        }
        values
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_filter_renders_sorted() {
        assert_eq!(
            QueryFilter::default().to_query_values().encode(),
            "limit=50&page=1&sortBy=asc"
        );
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let filter = QueryFilter {
            page: 0,
            limit: 255,
            ..QueryFilter::default()
        };
        let values = filter.to_query_values();
        assert_eq!(values.get("page"), Some("1"));
        assert_eq!(values.get("limit"), Some("250"));

        let filter = QueryFilter {
            limit: 0,
            ..QueryFilter::default()
        };
        assert_eq!(filter.to_query_values().get("limit"), Some("1"));
    }

    #[test]
    fn time_bounds_are_rfc3339() {
        let filter = QueryFilter {
            sort_by: SortDirection::Desc,
            created_after: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()),
            include_archived: Some(true),
            ..QueryFilter::default()
        };
        assert_eq!(
            filter.to_query_values().encode(),
            "createdAfter=2024-03-01T12%3A30%3A00Z&includeArchived=true&limit=50&page=1&sortBy=desc"
        );
    }

    #[test]
    fn values_set_replaces_and_add_appends() {
        let mut values = QueryValues::new();
        values.add("tag", "a");
        values.add("tag", "b");
        values.set("q", "x");
        values.set("q", "y");
        assert_eq!(values.encode(), "q=y&tag=a&tag=b");
    }
}
