use super::repository::{self, EmployeeFilter};
use crate::domain::common::{clean_optional, status_filter, status_stats};
use crate::shared::error::AppError;
use contracts::domain::a002_employee::{EmployeeDto, EmployeeInput};
use contracts::shared::api_response::StatsDto;
use contracts::shared::list_query::ListQuery;
use sea_orm::DatabaseConnection;

pub fn filter_from_query(query: &ListQuery) -> Result<EmployeeFilter, AppError> {
    Ok(EmployeeFilter {
        search: query.search_term().map(str::to_string),
        department: query.filter("department").map(str::to_string),
        is_active: status_filter(query)?,
    })
}

pub async fn list(
    db: &DatabaseConnection,
    query: &ListQuery,
) -> Result<(Vec<EmployeeDto>, u64), AppError> {
    let filter = filter_from_query(query)?;
    let (items, total) =
        repository::list_page(db, &filter, query.offset(), u64::from(query.limit)).await?;
    Ok((items.into_iter().map(Into::into).collect(), total))
}

pub async fn get(db: &DatabaseConnection, id: &str) -> Result<EmployeeDto, AppError> {
    repository::find_by_id(db, id)
        .await?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("employee {}", id)))
}

fn normalize(input: EmployeeInput) -> EmployeeInput {
    EmployeeInput {
        code: input.code.trim().to_string(),
        full_name: input.full_name.trim().to_string(),
        department: input.department.trim().to_string(),
        position: clean_optional(input.position),
        ..input
    }
}

async fn validate(
    db: &DatabaseConnection,
    input: &EmployeeInput,
    id: Option<&str>,
) -> Result<(), AppError> {
    let mut errors = input.validate();
    if errors.is_empty() && repository::code_taken(db, &input.code, id).await? {
        errors.push(format!("code {} is already used", input.code));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

pub async fn create(db: &DatabaseConnection, input: EmployeeInput) -> Result<String, AppError> {
    let input = normalize(input);
    validate(db, &input, None).await?;
    let id = repository::insert(db, &input).await?;
    tracing::info!("employee {} created ({})", input.code, id);
    Ok(id)
}

pub async fn update(db: &DatabaseConnection, id: &str, input: EmployeeInput) -> Result<(), AppError> {
    let input = normalize(input);
    validate(db, &input, Some(id)).await?;
    if !repository::update(db, id, &input).await? {
        return Err(AppError::NotFound(format!("employee {}", id)));
    }
    Ok(())
}

pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<(), AppError> {
    if !repository::delete(db, id).await? {
        return Err(AppError::NotFound(format!("employee {}", id)));
    }
    tracing::info!("employee {} deleted", id);
    Ok(())
}

pub async fn stats(db: &DatabaseConnection) -> Result<StatsDto, AppError> {
    let (total, active) = repository::count_by_status(db).await?;
    Ok(status_stats(total, active))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;
    use chrono::NaiveDate;

    fn input(code: &str, department: &str, is_active: bool) -> EmployeeInput {
        EmployeeInput {
            code: code.to_string(),
            full_name: format!("Сотрудник {}", code),
            department: department.to_string(),
            position: Some("  ".to_string()),
            monthly_salary: 70000.0,
            hired_on: NaiveDate::from_ymd_opt(2022, 9, 1),
            is_active,
        }
    }

    #[tokio::test]
    async fn test_department_filter_and_toggle() {
        let db = connect_in_memory().await.unwrap();
        for (i, department) in ["casting", "retail", "casting", "office"].iter().enumerate() {
            create(&db, input(&format!("E{:02}", i + 1), department, true))
                .await
                .unwrap();
        }

        let query = ListQuery::new(10).with_filter("department", "casting");
        let (rows, total) = list(&db, &query).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(rows[0].code, "E01");
        assert_eq!(rows[0].position, None);
        assert_eq!(rows[0].hired_on, NaiveDate::from_ymd_opt(2022, 9, 1));

        let mut toggled = EmployeeInput::from(&rows[0]);
        toggled.is_active = false;
        update(&db, &rows[0].id, toggled).await.unwrap();

        let query = ListQuery::new(10)
            .with_filter("department", "casting")
            .with_filter("status", "active");
        let (rows, total) = list(&db, &query).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].code, "E03");

        let stats = stats(&db).await.unwrap();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.counts.get("active"), Some(&3));
        assert_eq!(stats.counts.get("inactive"), Some(&1));
    }

    #[tokio::test]
    async fn test_negative_salary_rejected() {
        let db = connect_in_memory().await.unwrap();
        let mut bad = input("E01", "retail", true);
        bad.monthly_salary = -1.0;
        assert!(matches!(
            create(&db, bad).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_search_matches_name() {
        let db = connect_in_memory().await.unwrap();
        create(&db, input("E01", "retail", true)).await.unwrap();
        let mut other = input("E02", "retail", true);
        other.full_name = "Petrov Ivan".to_string();
        create(&db, other).await.unwrap();

        let (rows, total) = list(&db, &ListQuery::new(10).with_search("petrov")).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].code, "E02");
    }

    #[tokio::test]
    async fn test_search_cyrillic_name_any_case() {
        let db = connect_in_memory().await.unwrap();
        create(&db, input("E01", "retail", true)).await.unwrap();
        let mut other = input("E02", "office", true);
        other.full_name = "Смирнова Мария".to_string();
        create(&db, other).await.unwrap();

        for term in ["смирнова", "СМИРНОВА М", "Мария"] {
            let (rows, total) = list(&db, &ListQuery::new(10).with_search(term)).await.unwrap();
            assert_eq!(total, 1, "search {term:?}");
            assert_eq!(rows[0].code, "E02");
        }
    }
}
