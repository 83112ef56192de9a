use super::repository::{self, SupplierFilter};
use crate::domain::common::{clean_optional, status_filter, status_stats};
use crate::shared::error::AppError;
use contracts::domain::a001_supplier::{SupplierDto, SupplierInput};
use contracts::shared::api_response::StatsDto;
use contracts::shared::list_query::ListQuery;
use sea_orm::DatabaseConnection;

pub fn filter_from_query(query: &ListQuery) -> Result<SupplierFilter, AppError> {
    Ok(SupplierFilter {
        search: query.search_term().map(str::to_string),
        is_active: status_filter(query)?,
    })
}

pub async fn list(
    db: &DatabaseConnection,
    query: &ListQuery,
) -> Result<(Vec<SupplierDto>, u64), AppError> {
    let filter = filter_from_query(query)?;
    let (items, total) =
        repository::list_page(db, &filter, query.offset(), u64::from(query.limit)).await?;
    Ok((items.into_iter().map(Into::into).collect(), total))
}

pub async fn get(db: &DatabaseConnection, id: &str) -> Result<SupplierDto, AppError> {
    repository::find_by_id(db, id)
        .await?
        .map(Into::into)
        .ok_or_else(|| AppError::NotFound(format!("supplier {}", id)))
}

fn normalize(input: SupplierInput) -> SupplierInput {
    SupplierInput {
        code: input.code.trim().to_string(),
        name: input.name.trim().to_string(),
        contact_person: clean_optional(input.contact_person),
        phone: clean_optional(input.phone),
        city: clean_optional(input.city),
        is_active: input.is_active,
    }
}

async fn validate(
    db: &DatabaseConnection,
    input: &SupplierInput,
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

/// Создание поставщика, возвращает id
pub async fn create(db: &DatabaseConnection, input: SupplierInput) -> Result<String, AppError> {
    let input = normalize(input);
    validate(db, &input, None).await?;
    let id = repository::insert(db, &input).await?;
    tracing::info!("supplier {} created ({})", input.code, id);
    Ok(id)
}

pub async fn update(db: &DatabaseConnection, id: &str, input: SupplierInput) -> Result<(), AppError> {
    let input = normalize(input);
    validate(db, &input, Some(id)).await?;
    if !repository::update(db, id, &input).await? {
        return Err(AppError::NotFound(format!("supplier {}", id)));
    }
    Ok(())
}

pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<(), AppError> {
    if !repository::delete(db, id).await? {
        return Err(AppError::NotFound(format!("supplier {}", id)));
    }
    tracing::info!("supplier {} deleted", id);
    Ok(())
}

pub async fn stats(db: &DatabaseConnection) -> Result<StatsDto, AppError> {
    let (total, active) = repository::count_by_status(db).await?;
    Ok(status_stats(total, active))
}
