use contracts::shared::api_response::StatsDto;
use contracts::shared::list_query::ListQuery;
use sea_orm::sea_query::{Expr, IntoColumnRef, LikeExpr, SimpleExpr};
use std::collections::BTreeMap;

use crate::shared::error::AppError;

/// `status` filter: `active`, `inactive`, or absent for all rows.
pub fn status_filter(query: &ListQuery) -> Result<Option<bool>, AppError> {
    match query.filter("status") {
        None => Ok(None),
        Some("active") => Ok(Some(true)),
        Some("inactive") => Ok(Some(false)),
        Some(other) => Err(AppError::BadRequest(format!(
            "status must be `active` or `inactive`, got {:?}",
            other
        ))),
    }
}

pub fn status_stats(total: u64, active: u64) -> StatsDto {
    let mut counts = BTreeMap::new();
    counts.insert("active".to_string(), active);
    counts.insert("inactive".to_string(), total.saturating_sub(active));
    StatsDto { total, counts }
}

/// Значение колонки `search_key`: поля в нижнем регистре (Unicode),
/// разделённые `\u{1f}`, чтобы подстрока не склеивала соседние поля.
/// SQLite `LIKE` сворачивает регистр только для ASCII.
pub fn search_key(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("\u{1f}")
}

/// `%term%` with `\`, `%` and `_` escaped, lowercased like [`search_key`].
pub fn search_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.to_lowercase().chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// `<column> LIKE '%term%' ESCAPE '\'` over a normalized `search_key` column.
pub fn search_condition<C: IntoColumnRef>(column: C, term: &str) -> SimpleExpr {
    Expr::col(column).like(LikeExpr::new(search_pattern(term)).escape('\\'))
}

/// Trims optional text fields; blank strings are stored as NULL.
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_filter() {
        let query = ListQuery::default();
        assert_eq!(status_filter(&query).unwrap(), None);
        let query = ListQuery::default().with_filter("status", "inactive");
        assert_eq!(status_filter(&query).unwrap(), Some(false));
        let query = ListQuery::default().with_filter("status", "archived");
        assert!(matches!(status_filter(&query), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_status_stats() {
        let stats = status_stats(1000, 620);
        assert_eq!(stats.counts.get("active"), Some(&620));
        assert_eq!(stats.counts.get("inactive"), Some(&380));
    }

    #[test]
    fn test_search_key_folds_cyrillic() {
        assert_eq!(
            search_key(&["SUP-001", "Аффинажный Завод"]),
            "sup-001\u{1f}аффинажный завод"
        );
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        assert_eq!(search_pattern("АФФ"), "%афф%");
        assert_eq!(search_pattern("50%"), "%50\\%%");
        assert_eq!(search_pattern("a_b\\c"), "%a\\_b\\\\c%");
    }

    #[test]
    fn test_clean_optional() {
        assert_eq!(clean_optional(Some("  ".into())), None);
        assert_eq!(clean_optional(Some(" Москва ".into())), Some("Москва".into()));
    }
}
