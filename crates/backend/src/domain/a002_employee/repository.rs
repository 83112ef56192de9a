use chrono::{NaiveDate, Utc};
use contracts::domain::a002_employee::{EmployeeDto, EmployeeInput};
use sea_orm::entity::prelude::*;
use crate::domain::common::{search_condition, search_key};
use sea_orm::{Condition, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "a002_employee")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub full_name: String,
    pub department: String,
    pub position: Option<String>,
    pub monthly_salary: f64,
    pub hired_on: Option<NaiveDate>,
    pub is_active: bool,
    /// Нормализованные код + наименование для поиска
    pub search_key: String,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for EmployeeDto {
    fn from(m: Model) -> Self {
        EmployeeDto {
            id: m.id,
            code: m.code,
            full_name: m.full_name,
            department: m.department,
            position: m.position,
            monthly_salary: m.monthly_salary,
            hired_on: m.hired_on,
            is_active: m.is_active,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Подстрока табельного номера или ФИО
    pub search: Option<String>,
    pub department: Option<String>,
    pub is_active: Option<bool>,
}

impl EmployeeFilter {
    fn condition(&self) -> Condition {
        let mut condition = Condition::all();
        if let Some(term) = &self.search {
            condition = condition.add(search_condition(Column::SearchKey, term));
        }
        if let Some(department) = &self.department {
            condition = condition.add(Column::Department.eq(department.as_str()));
        }
        if let Some(is_active) = self.is_active {
            condition = condition.add(Column::IsActive.eq(is_active));
        }
        condition
    }
}

pub async fn list_page(
    db: &DatabaseConnection,
    filter: &EmployeeFilter,
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

pub async fn insert(db: &DatabaseConnection, input: &EmployeeInput) -> Result<String, DbErr> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now();
    let active = ActiveModel {
        id: Set(id.clone()),
        code: Set(input.code.clone()),
        full_name: Set(input.full_name.clone()),
        department: Set(input.department.clone()),
        position: Set(input.position.clone()),
        monthly_salary: Set(input.monthly_salary),
        hired_on: Set(input.hired_on),
        is_active: Set(input.is_active),
        search_key: Set(search_key(&[&input.code, &input.full_name])),
        created_at: Set(Some(now)),
        updated_at: Set(Some(now)),
    };
    active.insert(db).await?;
    Ok(id)
}

pub async fn update(db: &DatabaseConnection, id: &str, input: &EmployeeInput) -> Result<bool, DbErr> {
    if find_by_id(db, id).await?.is_none() {
        return Ok(false);
    }
    let active = ActiveModel {
        id: Set(id.to_string()),
        code: Set(input.code.clone()),
        full_name: Set(input.full_name.clone()),
        department: Set(input.department.clone()),
        position: Set(input.position.clone()),
        monthly_salary: Set(input.monthly_salary),
        hired_on: Set(input.hired_on),
        is_active: Set(input.is_active),
        search_key: Set(search_key(&[&input.code, &input.full_name])),
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

/// (всего, работающих)
pub async fn count_by_status(db: &DatabaseConnection) -> Result<(u64, u64), DbErr> {
    let total = Entity::find().count(db).await?;
    let active = Entity::find()
        .filter(Column::IsActive.eq(true))
        .count(db)
        .await?;
    Ok((total, active))
}
