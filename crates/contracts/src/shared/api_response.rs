//! Конверты ответов REST API.
//!
//! Every endpoint answers with a `{ status, message, ... }` envelope; list
//! endpoints add `data` and `pagination`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "totalPage")]
    pub total_page: u32,
}

impl Pagination {
    pub fn new(total: u64, page: u32, limit: u32) -> Self {
        Self {
            total,
            page,
            limit,
            total_page: total_pages(total, limit),
        }
    }
}

/// `ceil(total / limit)`; zero rows means zero pages.
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    let limit = u64::from(limit);
    u32::try_from(total.div_ceil(limit)).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiListResponse<T> {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiItemResponse<T> {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    pub data: T,
}

/// Ответ на мутацию (create/update/delete) и на любую ошибку.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessageResponse {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ApiMessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: message.into(),
            id: None,
        }
    }

    pub fn created(id: impl Into<String>) -> Self {
        Self {
            status: true,
            message: "created".to_string(),
            id: Some(id.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: false,
            message: message.into(),
            id: None,
        }
    }
}

/// Exact server-side counts for a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsDto {
    pub total: u64,
    pub counts: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pagination_wire_names() {
        let value = serde_json::to_value(Pagination::new(25, 3, 10)).unwrap();
        assert_eq!(
            value,
            json!({ "total": 25, "page": 3, "limit": 10, "totalPage": 3 })
        );
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_list_envelope_without_message() {
        let parsed: ApiListResponse<serde_json::Value> = serde_json::from_value(json!({
            "status": true,
            "data": [{ "id": "a" }],
            "pagination": { "total": 1, "page": 1, "limit": 10, "totalPage": 1 }
        }))
        .unwrap();
        assert!(parsed.status);
        assert_eq!(parsed.message, "");
        assert_eq!(parsed.data.len(), 1);
    }
}
