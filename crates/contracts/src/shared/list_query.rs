//! Параметры запроса страницы коллекции (`page`, `limit`, `search`, фильтры).
//!
//! The same type is produced by the list controller on the client and parsed
//! back from the query string by the server, so both sides agree on the wire
//! names and on which keys are reserved.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

const PAGE_KEY: &str = "page";
const LIMIT_KEY: &str = "limit";
const SEARCH_KEY: &str = "search";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListQueryError {
    #[error("parameter `{key}` is not a number: {value:?}")]
    InvalidNumber { key: String, value: String },
    #[error("parameter `{key}` must be at least 1")]
    OutOfRange { key: String },
}

/// Identity of a list request. Two structurally equal values address the
/// same page of the same result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    /// Resource-specific filters. Empty values are never stored.
    pub filters: BTreeMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl ListQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit,
            search: String::new(),
            filters: BTreeMap::new(),
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.filters.insert(key.into(), value);
        }
        self
    }

    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    /// Trimmed search term, `None` when there is nothing to search for.
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search.trim();
        if term.is_empty() {
            None
        } else {
            Some(term)
        }
    }

    /// Number of rows preceding the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Key/value pairs in wire order: `page`, `limit`, `search`, then filters sorted by key.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            (PAGE_KEY.to_string(), self.page.to_string()),
            (LIMIT_KEY.to_string(), self.limit.to_string()),
            (SEARCH_KEY.to_string(), self.search.clone()),
        ];
        pairs.extend(
            self.filters
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        pairs
    }

    /// Parses decoded query-string pairs. Missing `page`/`limit` fall back to
    /// the defaults; both must be at least 1 when present.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ListQueryError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();
            match key.as_str() {
                PAGE_KEY => query.page = parse_positive(&key, &value)?,
                LIMIT_KEY => query.limit = parse_positive(&key, &value)?,
                SEARCH_KEY => query.search = value,
                _ => {
                    if !value.is_empty() {
                        query.filters.insert(key, value);
                    }
                }
            }
        }
        Ok(query)
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u32, ListQueryError> {
    let parsed: i64 = value
        .trim()
        .parse()
        .map_err(|_| ListQueryError::InvalidNumber {
            key: key.to_string(),
            value: value.to_string(),
        })?;
    if parsed < 1 {
        return Err(ListQueryError::OutOfRange {
            key: key.to_string(),
        });
    }
    u32::try_from(parsed).map_err(|_| ListQueryError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}
