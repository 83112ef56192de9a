use chrono::Utc;
use contracts::domain::a001_supplier::{SupplierDto, SupplierInput};
use sea_orm::entity::prelude::*;
use crate::domain::common::{search_condition, search_key};
use sea_orm::{Condition, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a001_supplier")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub is_active: bool,
    /// Нормализованные код + наименование для поиска
    pub search_key: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SupplierDto {
    fn from(m: Model) -> Self {
        SupplierDto {
            id: m.id,
            code: m.code,
            name: m.name,
            contact_person: m.contact_person,
            phone: m.phone,
            city: m.city,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SupplierFilter {
    /// Подстрока кода или наименования
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

impl SupplierFilter {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(term) = &self.search {
            condition = condition.add(search_condition(Column::SearchKey, term));
        }
        if let Some(is_active) = self.is_active {
            condition = condition.add(Column::IsActive.eq(is_active));
        }
        condition
    }
}

/// Страница поставщиков по коду + общее количество по фильтру
pub async fn list_page(
    db: &DatabaseConnection,
    filter: &SupplierFilter,
    offset: u64,
    limit: u64,
) -> Result<(Vec<Model>, u64), DbErr> {
    let total = Entity::find().filter(filter.condition()).count(db).await?;

    let items = Entity::find()
        .filter(filter.condition())
        .order_by_asc(Column::Code)
        .order_by_asc(Column::Id)
        .offset(offset)
        .limit(limit)
        .all(db)
        .await?;

    Ok((items, total))
}

pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<Model>, DbErr> {
    Entity::find_by_id(id.to_string()).one(db).await
}

/// Another supplier already using `code` (excluding `except_id`).
pub async fn code_taken(
    db: &DatabaseConnection,
    code: &str,
    except_id: Option<&str>,
) -> Result<bool, DbErr> {
    let mut query = Entity::find().filter(Column::Code.eq(code));
    if let Some(id) = except_id {
        query = query.filter(Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

pub async fn insert(db: &DatabaseConnection, input: &SupplierInput) -> Result<String, DbErr> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now();
    let active = ActiveModel {
        id: Set(id.clone()),
        code: Set(input.code.clone()),
        name: Set(input.name.clone()),
        contact_person: Set(input.contact_person.clone()),
        phone: Set(input.phone.clone()),
        city: Set(input.city.clone()),
        is_active: Set(input.is_active),
        search_key: Set(search_key(&[&input.code, &input.name])),
        created_at: Set(Some(now)),
        updated_at: Set(Some(now)),
    };
    active.insert(db).await?;
    Ok(id)
}

/// Returns `false` when there is no row with `id`.
pub async fn update(db: &DatabaseConnection, id: &str, input: &SupplierInput) -> Result<bool, DbErr> {
    if find_by_id(db, id).await?.is_none() {
        return Ok(false);
    }
    let active = ActiveModel {
        id: Set(id.to_string()),
        code: Set(input.code.clone()),
        name: Set(input.name.clone()),
        contact_person: Set(input.contact_person.clone()),
        phone: Set(input.phone.clone()),
        city: Set(input.city.clone()),
        is_active: Set(input.is_active),
        search_key: Set(search_key(&[&input.code, &input.name])),
        updated_at: Set(Some(Utc::now())),
        created_at: sea_orm::ActiveValue::NotSet,
    };
    active.update(db).await?;
    Ok(true)
}

pub async fn delete(db: &DatabaseConnection, id: &str) -> Result<bool, DbErr> {
    let result = Entity::delete_by_id(id.to_string()).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// (всего, активных)
pub async fn count_by_status(db: &DatabaseConnection) -> Result<(u64, u64), DbErr> {
    let total = Entity::find().count(db).await?;
    let active = Entity::find()
        .filter(Column::IsActive.eq(true))
        .count(db)
        .await?;
    Ok((total, active))
}
