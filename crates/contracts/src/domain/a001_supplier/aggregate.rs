use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const RESOURCE: &str = "suppliers";

/// Поставщик (сырьё, лом, комплектующие)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierDto {
    pub id: String,
    pub code: String,
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Тело запроса на создание/изменение поставщика
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierInput {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl SupplierInput {
    /// Returns the list of violated rules; empty when the input is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.code.trim().is_empty() {
            errors.push("code is required".to_string());
        }
        if self.name.trim().is_empty() {
            errors.push("name is required".to_string());
        }
        if let Some(phone) = &self.phone {
            if !phone.is_empty()
                && !phone
                    .chars()
                    .all(|c| c.is_ascii_digit() || "+-() ".contains(c))
            {
                errors.push("phone contains invalid characters".to_string());
            }
        }
        errors
    }
}

impl From<&SupplierDto> for SupplierInput {
    fn from(dto: &SupplierDto) -> Self {
        Self {
            code: dto.code.clone(),
            name: dto.name.clone(),
            contact_person: dto.contact_person.clone(),
            phone: dto.phone.clone(),
            city: dto.city.clone(),
            is_active: dto.is_active,
        }
    }
}
