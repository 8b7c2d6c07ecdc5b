use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::AppError;

/// Largest declared cargo value accepted for pricing
pub const MAX_CARGO_VALUE: Decimal = dec!(1000000000000);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cargo {
    pub id: String,
    /// Kilograms
    pub weight: f64,
    pub value: Decimal,
    pub hazmat: bool,
    pub special_requirements: BTreeMap<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl Cargo {
    /// Whether the named special requirement is present with a truthy value
    pub fn requires(&self, requirement: &str) -> bool {
        self.special_requirements
            .get(requirement)
            .is_some_and(is_truthy)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => {
            let s = s.trim();
            !s.is_empty() && !matches!(s.to_ascii_lowercase().as_str(), "false" | "no" | "0")
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCargoRequest {
    #[serde(default)]
    pub id: Option<String>,
    pub weight: f64,
    pub value: Decimal,
    #[serde(default)]
    pub hazmat: bool,
    #[serde(default)]
    pub special_requirements: BTreeMap<String, Value>,
}

impl CreateCargoRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(id) = &self.id {
            if id.trim().is_empty() {
                return Err(AppError::validation("id", "Cargo id must not be blank"));
            }
        }
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(AppError::validation(
                "weight",
                format!("Weight must be greater than 0, got {}", self.weight),
            ));
        }
        if self.value < Decimal::ZERO {
            return Err(AppError::validation(
                "value",
                format!("Value must not be negative, got {}", self.value),
            ));
        }
        if self.value > MAX_CARGO_VALUE {
            return Err(AppError::validation(
                "value",
                format!("Value must be at most {}, got {}", MAX_CARGO_VALUE, self.value),
            ));
        }
        Ok(())
    }

    pub fn into_cargo(self) -> Cargo {
        Cargo {
            id: self
                .id
                .map(|id| id.trim().to_string())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            weight: self.weight,
            value: self.value,
            hazmat: self.hazmat,
            special_requirements: self.special_requirements,
            created_at: Utc::now(),
        }
    }
}
