use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use super::{AppState, ListQuery};
use crate::error::AppError;
use crate::models::{CreateRouteRequest, Route};
use crate::pricing::CostBreakdown;

pub async fn create_route(
    State(state): State<AppState>,
    payload: Result<Json<CreateRouteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Route>), AppError> {
    let Json(request) = payload?;
    request.validate()?;

    if state.store.get_transport_type(&request.transport_type).await?.is_none() {
        return Err(AppError::validation(
            "transport_type",
            format!("Unknown transport type '{}'", request.transport_type),
        ));
    }

    if let Some(cargo_id) = &request.cargo_id {
        if state.store.get_cargo(cargo_id).await?.is_none() {
            return Err(AppError::validation(
                "cargo_id",
                format!("Unknown cargo '{}'", cargo_id),
            ));
        }
    }

    let route = request.into_route();
    state.store.insert_route(&route).await?;

    tracing::info!(
        route_id = %route.id,
        transport_type = %route.transport_type,
        distance_km = route.distance_km,
        is_feasible = route.is_feasible,
        "Route created"
    );

    Ok((StatusCode::CREATED, Json(route)))
}

pub async fn list_routes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Route>>, AppError> {
    let routes = state.store.list_routes(state.page_size(query.limit)).await?;
    Ok(Json(routes))
}

pub async fn get_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Route>, AppError> {
    Ok(Json(state.store.get_route(&id).await?))
}

pub async fn delete_route(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.store.delete_route(&id).await?;
    tracing::info!(route_id = %id, "Route deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct FeasibilityResponse {
    pub route_id: String,
    pub is_feasible: bool,
    pub window_hours: f64,
    pub duration_hours: f64,
}

/// Re-evaluate and persist whether the route fits its delivery window
pub async fn recompute_feasibility(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FeasibilityResponse>, AppError> {
    let route = state.store.get_route(&id).await?;
    let is_feasible = route.check_feasibility();

    if is_feasible != route.is_feasible {
        state.store.update_route_feasibility(&route.id, is_feasible).await?;
        tracing::info!(route_id = %route.id, is_feasible, "Route feasibility changed");
    }

    Ok(Json(FeasibilityResponse {
        window_hours: route.window_hours(),
        duration_hours: route.duration_hours,
        route_id: route.id,
        is_feasible,
    }))
}

pub async fn calculate_costs(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CostBreakdown>, AppError> {
    let (_, breakdown) = state.quotes.price_route(&id).await?;
    Ok(Json(breakdown))
}
