use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const RESOURCE: &str = "employees";

/// Подразделения: (значение фильтра `department`, подпись)
pub const DEPARTMENTS: [(&str, &str); 4] = [
    ("casting", "Литейный участок"),
    ("workshop", "Ювелирная мастерская"),
    ("retail", "Магазин"),
    ("office", "Офис"),
];

pub fn department_label(value: &str) -> &str {
    DEPARTMENTS
        .iter()
        .find(|(key, _)| *key == value)
        .map(|(_, label)| *label)
        .unwrap_or(value)
}

/// Сотрудник (мастерская, магазин, офис)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeDto {
    pub id: String,
    pub code: String,
    pub full_name: String,
    pub department: String,
    pub position: Option<String>,
    pub monthly_salary: f64,
    pub hired_on: Option<NaiveDate>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeInput {
    pub code: String,
    pub full_name: String,
    pub department: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub monthly_salary: f64,
    #[serde(default)]
    pub hired_on: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl EmployeeInput {
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.code.trim().is_empty() {
            errors.push("code is required".to_string());
        }
        if self.full_name.trim().is_empty() {
            errors.push("full_name is required".to_string());
        }
        if self.department.trim().is_empty() {
            errors.push("department is required".to_string());
        }
        if !self.monthly_salary.is_finite() || self.monthly_salary < 0.0 {
            errors.push("monthly_salary must be a non-negative amount".to_string());
        }
        errors
    }
}

impl From<&EmployeeDto> for EmployeeInput {
    fn from(dto: &EmployeeDto) -> Self {
        Self {
            code: dto.code.clone(),
            full_name: dto.full_name.clone(),
            department: dto.department.clone(),
            position: dto.position.clone(),
            monthly_salary: dto.monthly_salary,
            hired_on: dto.hired_on,
            is_active: dto.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_label() {
        assert_eq!(department_label("retail"), "Магазин");
        assert_eq!(department_label("engraving"), "engraving");
    }

    #[test]
    fn test_negative_salary_rejected() {
        let input = EmployeeInput {
            code: "E-7".to_string(),
            full_name: "Irina Volkova".to_string(),
            department: "casting".to_string(),
            position: None,
            monthly_salary: -1.0,
            hired_on: None,
            is_active: true,
        };
        assert_eq!(
            input.validate(),
            vec!["monthly_salary must be a non-negative amount".to_string()]
        );
    }
}
