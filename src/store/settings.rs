use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

use super::{from_millis, Store};
use crate::error::AppError;
use crate::pricing::models::{CostSettings, CostSettingsUpdate};

#[derive(sqlx::FromRow)]
struct CostSettingsRow {
    version: i64,
    fuel_price_per_liter: String,
    driver_daily_salary: String,
    toll_rates: String,
    overheads: String,
    cargo_factors: String,
    currency: String,
    last_modified: i64,
}

impl TryFrom<CostSettingsRow> for CostSettings {
    type Error = AppError;

    /// Unreadable settings are a configuration problem, not a request problem
    fn try_from(row: CostSettingsRow) -> Result<Self, Self::Error> {
        Ok(CostSettings {
            version: row.version,
            fuel_price_per_liter: config_decimal(
                "fuel_price_per_liter",
                &row.fuel_price_per_liter,
            )?,
            driver_daily_salary: config_decimal("driver_daily_salary", &row.driver_daily_salary)?,
            toll_rates: config_map("toll_rates", &row.toll_rates)?,
            overheads: config_map("overheads", &row.overheads)?,
            cargo_factors: config_map("cargo_factors", &row.cargo_factors)?,
            currency: row.currency,
            last_modified: from_millis("cost_settings.last_modified", row.last_modified)?,
        })
    }
}

fn config_decimal(field: &str, raw: &str) -> Result<Decimal, AppError> {
    Decimal::from_str(raw).map_err(|e| {
        AppError::ConfigError(format!(
            "cost settings field {} is not a number ({}): {}",
            field, raw, e
        ))
    })
}

fn config_map(field: &str, raw: &str) -> Result<BTreeMap<String, Decimal>, AppError> {
    serde_json::from_str(raw).map_err(|e| {
        AppError::ConfigError(format!("cost settings field {} is unreadable: {}", field, e))
    })
}

const SETTINGS_COLUMNS: &str = "version, fuel_price_per_liter, driver_daily_salary, toll_rates, \
                                overheads, cargo_factors, currency, last_modified";

impl Store {
    /// The newest settings version, the one in effect
    pub async fn get_active_cost_settings(&self) -> Result<CostSettings, AppError> {
        let row: Option<CostSettingsRow> = sqlx::query_as(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM cost_settings ORDER BY version DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| {
            AppError::ConfigError("no cost settings have been configured".to_string())
        })?
        .try_into()
    }

    /// Store a validated payload as the next version and return it
    pub async fn insert_cost_settings(
        &self,
        update: CostSettingsUpdate,
    ) -> Result<CostSettings, AppError> {
        let mut tx = self.pool.begin().await?;

        let (latest,): (Option<i64>,) = sqlx::query_as("SELECT MAX(version) FROM cost_settings")
            .fetch_one(&mut *tx)
            .await?;
        let settings = CostSettings::from_update(latest.unwrap_or(0) + 1, update);

        sqlx::query(
            r#"
            INSERT INTO cost_settings (
                version, fuel_price_per_liter, driver_daily_salary, toll_rates,
                overheads, cargo_factors, currency, last_modified
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(settings.version)
        .bind(settings.fuel_price_per_liter.to_string())
        .bind(settings.driver_daily_salary.to_string())
        .bind(serde_json::to_string(&settings.toll_rates)?)
        .bind(serde_json::to_string(&settings.overheads)?)
        .bind(serde_json::to_string(&settings.cargo_factors)?)
        .bind(&settings.currency)
        .bind(settings.last_modified.timestamp_millis())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(settings)
    }

    /// Settings versions, newest first
    pub async fn list_cost_settings(&self, limit: u32) -> Result<Vec<CostSettings>, AppError> {
        let rows: Vec<CostSettingsRow> = sqlx::query_as(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM cost_settings ORDER BY version DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CostSettings::try_from).collect()
    }
}
