use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::AppError;

pub const DEFAULT_CURRENCY: &str = "EUR";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// Round a monetary amount to cents
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Full cost settings payload accepted by the settings update endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSettingsUpdate {
    pub fuel_price_per_liter: Decimal,
    pub driver_daily_salary: Decimal,
    /// Per-country toll rate per km, overriding the built-in table
    #[serde(default)]
    pub toll_rates: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub overheads: BTreeMap<String, Decimal>,
    #[serde(default)]
    pub cargo_factors: BTreeMap<String, Decimal>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl CostSettingsUpdate {
    /// Check every rate and factor, normalizing country and currency codes
    pub fn validate(mut self) -> Result<Self, AppError> {
        require_positive("fuel_price_per_liter", self.fuel_price_per_liter)?;
        require_positive("driver_daily_salary", self.driver_daily_salary)?;

        let mut toll_rates = BTreeMap::new();
        for (country, rate) in self.toll_rates {
            let code = country.trim().to_ascii_uppercase();
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(AppError::validation(
                    format!("toll_rates.{country}"),
                    "Toll rate keys must be two-letter country codes",
                ));
            }
            require_positive(&format!("toll_rates.{code}"), rate)?;
            toll_rates.insert(code, rate);
        }
        self.toll_rates = toll_rates;

        for (name, amount) in &self.overheads {
            require_non_negative(&format!("overheads.{name}"), *amount)?;
        }
        for (name, factor) in &self.cargo_factors {
            require_non_negative(&format!("cargo_factors.{name}"), *factor)?;
        }

        let currency = self.currency.trim().to_ascii_uppercase();
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AppError::validation(
                "currency",
                format!("Expected a three-letter currency code, got '{}'", self.currency),
            ));
        }
        self.currency = currency;

        Ok(self)
    }
}

/// One version of the cost settings. Only the newest version is in effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostSettings {
    pub version: i64,
    pub fuel_price_per_liter: Decimal,
    pub driver_daily_salary: Decimal,
    pub toll_rates: BTreeMap<String, Decimal>,
    pub overheads: BTreeMap<String, Decimal>,
    pub cargo_factors: BTreeMap<String, Decimal>,
    pub currency: String,
    pub last_modified: DateTime<Utc>,
}

impl CostSettings {
    pub fn from_update(version: i64, update: CostSettingsUpdate) -> Self {
        Self {
            version,
            fuel_price_per_liter: update.fuel_price_per_liter,
            driver_daily_salary: update.driver_daily_salary,
            toll_rates: update.toll_rates,
            overheads: update.overheads,
            cargo_factors: update.cargo_factors,
            currency: update.currency,
            last_modified: Utc::now(),
        }
    }
}

/// How a cargo factor is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorKind {
    /// Added as-is
    Flat,
    /// Multiplied by the cargo value
    ValueRate,
}

/// When a cargo factor applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactorCondition {
    Always,
    Hazmat,
    Requirement(String),
}

/// Interpretation of a cargo factor key.
///
/// `*_rate` keys multiply the cargo value, anything else is a flat fee.
/// `hazmat*` keys only apply to hazardous cargo. `special_<name>_*` keys
/// only apply when the cargo lists `<name>` among its special requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CargoFactor {
    pub kind: FactorKind,
    pub condition: FactorCondition,
}

impl CargoFactor {
    pub fn parse(key: &str) -> Self {
        let kind = if key.ends_with("_rate") {
            FactorKind::ValueRate
        } else {
            FactorKind::Flat
        };

        let condition = if key.starts_with("hazmat") {
            FactorCondition::Hazmat
        } else if let Some(rest) = key.strip_prefix("special_") {
            let requirement = ["_rate", "_fee", "_surcharge"]
                .iter()
                .find_map(|suffix| rest.strip_suffix(*suffix))
                .unwrap_or(rest);
            FactorCondition::Requirement(requirement.to_string())
        } else {
            FactorCondition::Always
        };

        Self { kind, condition }
    }
}

/// Itemized cost of running a route. Computed per request, never stored on
/// its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub fuel_cost: Decimal,
    pub toll_cost: Decimal,
    pub driver_cost: Decimal,
    pub overheads: Decimal,
    pub cargo_specific_costs: BTreeMap<String, Decimal>,
    pub total_cost: Decimal,
    pub currency: String,
}

impl CostBreakdown {
    /// Create a zero-cost breakdown
    pub fn zero(currency: &str) -> Self {
        Self {
            fuel_cost: Decimal::ZERO,
            toll_cost: Decimal::ZERO,
            driver_cost: Decimal::ZERO,
            overheads: Decimal::ZERO,
            cargo_specific_costs: BTreeMap::new(),
            total_cost: Decimal::ZERO,
            currency: currency.to_string(),
        }
    }

    /// Sum of every itemized component
    /// Sum of every component, `None` on overflow
    pub fn itemized_sum(&self) -> Option<Decimal> {
        [self.fuel_cost, self.toll_cost, self.driver_cost, self.overheads]
            .into_iter()
            .chain(self.cargo_specific_costs.values().copied())
            .try_fold(Decimal::ZERO, Decimal::checked_add)
    }

    /// Calculate total cost from components
    pub fn calculate_total(&mut self) -> Result<(), AppError> {
        self.total_cost = self.itemized_sum().ok_or_else(|| {
            AppError::InternalError("Cost component total_cost overflowed".to_string())
        })?;
        Ok(())
    }
}

fn require_positive(field: &str, value: Decimal) -> Result<(), AppError> {
    if value <= Decimal::ZERO {
        return Err(AppError::validation(
            field,
            format!("Must be greater than 0, got {}", value),
        ));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: Decimal) -> Result<(), AppError> {
    if value < Decimal::ZERO {
        return Err(AppError::validation(
            field,
            format!("Must not be negative, got {}", value),
        ));
    }
    Ok(())
}
