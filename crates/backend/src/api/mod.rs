pub mod handlers;

use axum::extract::rejection::JsonRejection;
use axum::Json;
use contracts::shared::list_query::ListQuery;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::shared::config::Config;
use crate::shared::error::AppError;

/// Shared by every handler through `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub api_token: Arc<str>,
    pub max_page_size: u32,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        Self {
            db,
            api_token: Arc::from(config.auth.api_token.as_str()),
            max_page_size: config.server.max_page_size,
        }
    }
}

/// Parses `page`, `limit`, `search` and filters; `limit` is capped at `max_page_size`.
pub fn parse_list_query(
    pairs: Vec<(String, String)>,
    max_page_size: u32,
) -> Result<ListQuery, AppError> {
    let mut query = ListQuery::from_pairs(pairs)?;
    if query.limit > max_page_size {
        tracing::debug!("limit {} capped to {}", query.limit, max_page_size);
        query.limit = max_page_size;
    }
    Ok(query)
}

/// Malformed JSON bodies answer with the error envelope instead of axum's plain text.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::Validation(vec![rejection.body_text()]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_limit_capped() {
        let query = parse_list_query(pairs(&[("page", "2"), ("limit", "5000")]), 1000).unwrap();
        assert_eq!(query.page, 2);
        assert_eq!(query.limit, 1000);
    }

    #[test]
    fn test_page_zero_rejected() {
        let err = parse_list_query(pairs(&[("page", "0")]), 1000).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        let err = parse_list_query(pairs(&[("limit", "ten")]), 1000).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
