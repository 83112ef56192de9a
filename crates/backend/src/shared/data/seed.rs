//! Демонстрационные данные для пустой базы.

use chrono::NaiveDate;
use contracts::domain::a001_supplier::SupplierInput;
use contracts::domain::a002_employee::{EmployeeInput, DEPARTMENTS};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};

use crate::domain::{a001_supplier, a002_employee};

const SUPPLIER_NAMES: [&str; 8] = [
    "Аффинажный завод",
    "Камни Урала",
    "Золотая нить",
    "Серебряный ряд",
    "Ювелирная фурнитура",
    "Якутские алмазы",
    "Упаковка и тара",
    "Инструмент мастера",
];

const CITIES: [&str; 5] = ["Москва", "Кострома", "Екатеринбург", "Красное-на-Волге", "Якутск"];

const FIRST_NAMES: [&str; 6] = ["Анна", "Игорь", "Мария", "Олег", "Светлана", "Павел"];
const LAST_NAMES: [&str; 6] = ["Иванова", "Петров", "Смирнова", "Кузнецов", "Волкова", "Соколов"];
const POSITIONS: [&str; 4] = ["Литейщик", "Закрепщик", "Продавец-консультант", "Бухгалтер"];

pub fn demo_suppliers(count: usize) -> Vec<SupplierInput> {
    (1..=count)
        .map(|i| SupplierInput {
            code: format!("SUP-{:03}", i),
            name: format!("{} №{}", SUPPLIER_NAMES[i % SUPPLIER_NAMES.len()], i),
            contact_person: (i % 2 == 0)
                .then(|| format!("{} {}", FIRST_NAMES[i % 6], LAST_NAMES[i % 6])),
            phone: Some(format!("+7 (900) 000-{:02}-{:02}", i / 100, i % 100)),
            city: Some(CITIES[i % CITIES.len()].to_string()),
            is_active: i % 4 != 0,
        })
        .collect()
}

pub fn demo_employees(count: usize) -> Vec<EmployeeInput> {
    (1..=count)
        .map(|i| EmployeeInput {
            code: format!("EMP-{:03}", i),
            full_name: format!("{} {}", LAST_NAMES[i % 6], FIRST_NAMES[(i / 6) % 6]),
            department: DEPARTMENTS[i % DEPARTMENTS.len()].0.to_string(),
            position: Some(POSITIONS[i % POSITIONS.len()].to_string()),
            monthly_salary: 55000.0 + (i % 7) as f64 * 5000.0,
            hired_on: NaiveDate::from_ymd_opt(2015 + (i % 9) as i32, (i % 12) as u32 + 1, 1),
            is_active: i % 5 != 0,
        })
        .collect()
}

/// Заполняет пустые таблицы; существующие данные не трогает
pub async fn seed_if_empty(db: &DatabaseConnection) -> anyhow::Result<()> {
    if a001_supplier::repository::Entity::find().count(db).await? == 0 {
        let suppliers = demo_suppliers(45);
        for input in &suppliers {
            a001_supplier::repository::insert(db, input).await?;
        }
        tracing::info!("Seeded {} suppliers", suppliers.len());
    }

    if a002_employee::repository::Entity::find().count(db).await? == 0 {
        let employees = demo_employees(36);
        for input in &employees {
            a002_employee::repository::insert(db, input).await?;
        }
        tracing::info!("Seeded {} employees", employees.len());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::connect_in_memory;

    #[test]
    fn test_demo_rows_are_valid() {
        assert!(demo_suppliers(45).iter().all(|s| s.validate().is_empty()));
        assert!(demo_employees(36).iter().all(|e| e.validate().is_empty()));
    }

    #[tokio::test]
    async fn test_seed_runs_once() {
        let db = connect_in_memory().await.unwrap();
        seed_if_empty(&db).await.unwrap();
        seed_if_empty(&db).await.unwrap();
        let suppliers = a001_supplier::repository::Entity::find()
            .count(&db)
            .await
            .unwrap();
        let employees = a002_employee::repository::Entity::find()
            .count(&db)
            .await
            .unwrap();
        assert_eq!(suppliers, 45);
        assert_eq!(employees, 36);
    }
}
