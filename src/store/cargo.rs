use super::{from_millis, parse_decimal, parse_json, Store};
use crate::error::AppError;
use crate::models::Cargo;

#[derive(sqlx::FromRow)]
struct CargoRow {
    id: String,
    weight: f64,
    value: String,
    hazmat: bool,
    special_requirements: String,
    created_at: i64,
}

impl TryFrom<CargoRow> for Cargo {
    type Error = AppError;

    fn try_from(row: CargoRow) -> Result<Self, Self::Error> {
        Ok(Cargo {
            weight: row.weight,
            value: parse_decimal("cargo.value", &row.value)?,
            hazmat: row.hazmat,
            special_requirements: parse_json(
                "cargo.special_requirements",
                &row.special_requirements,
            )?,
            created_at: from_millis("cargo.created_at", row.created_at)?,
            id: row.id,
        })
    }
}

impl Store {
    pub async fn insert_cargo(&self, cargo: &Cargo) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO cargo (id, weight, value, hazmat, special_requirements, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&cargo.id)
        .bind(cargo.weight)
        .bind(cargo.value.to_string())
        .bind(cargo.hazmat)
        .bind(serde_json::to_string(&cargo.special_requirements)?)
        .bind(cargo.created_at.timestamp_millis())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::validation(
                "id",
                format!("Cargo {} already exists", cargo.id),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Absent cargo is not an error here; callers decide
    pub async fn get_cargo(&self, id: &str) -> Result<Option<Cargo>, AppError> {
        let row: Option<CargoRow> = sqlx::query_as(
            "SELECT id, weight, value, hazmat, special_requirements, created_at \
             FROM cargo WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Cargo::try_from).transpose()
    }
}
