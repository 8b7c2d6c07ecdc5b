//! SQLite persistence for routes, cargo, transport types, offers and cost
//! settings.

mod cargo;
mod offers;
mod routes;
mod settings;
mod transport;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::config::DatabaseConfig;
use crate::error::AppError;

/// Row counts shown on the dashboard
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct StoreCounts {
    pub routes: i64,
    pub feasible_routes: i64,
    pub cargo: i64,
    pub offers: i64,
}

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if needed) the database file and run migrations
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        if let Some(parent) = std::path::Path::new(&config.path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Private in-memory database with migrations applied
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        // one connection, otherwise each connection sees its own empty database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn counts(&self) -> Result<StoreCounts, AppError> {
        let (routes, feasible_routes, cargo, offers): (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM routes),
                (SELECT COUNT(*) FROM routes WHERE is_feasible = 1),
                (SELECT COUNT(*) FROM cargo),
                (SELECT COUNT(*) FROM offers)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(StoreCounts {
            routes,
            feasible_routes,
            cargo,
            offers,
        })
    }
}

fn parse_decimal(column: &str, raw: &str) -> Result<Decimal, AppError> {
    Decimal::from_str(raw).map_err(|e| {
        AppError::InternalError(format!("Invalid decimal in {}: {} ({})", column, raw, e))
    })
}

fn parse_json<T: serde::de::DeserializeOwned>(column: &str, raw: &str) -> Result<T, AppError> {
    serde_json::from_str(raw)
        .map_err(|e| AppError::InternalError(format!("Invalid JSON in {}: {}", column, e)))
}

fn from_millis(column: &str, millis: i64) -> Result<DateTime<Utc>, AppError> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        AppError::InternalError(format!("Invalid timestamp in {}: {}", column, millis))
    })
}
