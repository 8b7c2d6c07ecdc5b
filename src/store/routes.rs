use super::{from_millis, parse_json, Store};
use crate::error::AppError;
use crate::models::{EmptyDriving, Route};

#[derive(sqlx::FromRow)]
struct RouteRow {
    id: String,
    origin: String,
    destination: String,
    pickup_time: i64,
    delivery_time: i64,
    transport_type: String,
    cargo_id: Option<String>,
    distance_km: f64,
    duration_hours: f64,
    empty_distance_km: f64,
    empty_duration_hours: f64,
    country_segments: String,
    is_feasible: bool,
    created_at: i64,
}

impl TryFrom<RouteRow> for Route {
    type Error = AppError;

    fn try_from(row: RouteRow) -> Result<Self, Self::Error> {
        Ok(Route {
            origin: parse_json("routes.origin", &row.origin)?,
            destination: parse_json("routes.destination", &row.destination)?,
            pickup_time: from_millis("routes.pickup_time", row.pickup_time)?,
            delivery_time: from_millis("routes.delivery_time", row.delivery_time)?,
            transport_type: row.transport_type,
            cargo_id: row.cargo_id,
            distance_km: row.distance_km,
            duration_hours: row.duration_hours,
            empty_driving: EmptyDriving {
                distance_km: row.empty_distance_km,
                duration_hours: row.empty_duration_hours,
            },
            country_segments: parse_json("routes.country_segments", &row.country_segments)?,
            is_feasible: row.is_feasible,
            created_at: from_millis("routes.created_at", row.created_at)?,
            id: row.id,
        })
    }
}

const ROUTE_COLUMNS: &str = r#"
    id, origin, destination, pickup_time, delivery_time, transport_type,
    cargo_id, distance_km, duration_hours, empty_distance_km,
    empty_duration_hours, country_segments, is_feasible, created_at
"#;

impl Store {
    pub async fn insert_route(&self, route: &Route) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO routes (
                id, origin, destination, pickup_time, delivery_time, transport_type,
                cargo_id, distance_km, duration_hours, empty_distance_km,
                empty_duration_hours, country_segments, is_feasible, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&route.id)
        .bind(serde_json::to_string(&route.origin)?)
        .bind(serde_json::to_string(&route.destination)?)
        .bind(route.pickup_time.timestamp_millis())
        .bind(route.delivery_time.timestamp_millis())
        .bind(&route.transport_type)
        .bind(&route.cargo_id)
        .bind(route.distance_km)
        .bind(route.duration_hours)
        .bind(route.empty_driving.distance_km)
        .bind(route.empty_driving.duration_hours)
        .bind(serde_json::to_string(&route.country_segments)?)
        .bind(route.is_feasible)
        .bind(route.created_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fetch a route, failing with not-found when absent
    pub async fn get_route(&self, id: &str) -> Result<Route, AppError> {
        let row: Option<RouteRow> =
            sqlx::query_as(&format!("SELECT {ROUTE_COLUMNS} FROM routes WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.ok_or_else(|| AppError::not_found("Route", id))?.try_into()
    }

    /// Newest routes first
    pub async fn list_routes(&self, limit: u32) -> Result<Vec<Route>, AppError> {
        let rows: Vec<RouteRow> = sqlx::query_as(&format!(
            "SELECT {ROUTE_COLUMNS} FROM routes ORDER BY created_at DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Route::try_from).collect()
    }

    pub async fn update_route_feasibility(
        &self,
        id: &str,
        is_feasible: bool,
    ) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE routes SET is_feasible = ? WHERE id = ?")
            .bind(is_feasible)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Route", id));
        }
        Ok(())
    }

    /// Remove a route that has no offers priced against it
    pub async fn delete_route(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let offers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM offers WHERE route_id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if offers > 0 {
            return Err(AppError::validation(
                "route_id",
                format!("Route {} has {} offer(s) and cannot be deleted", id, offers),
            ));
        }

        let result = sqlx::query("DELETE FROM routes WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Route", id));
        }

        tx.commit().await?;
        Ok(())
    }
}
