use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use super::AppState;
use crate::error::AppError;
use crate::models::{Cargo, CreateCargoRequest};

pub async fn create_cargo(
    State(state): State<AppState>,
    payload: Result<Json<CreateCargoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Cargo>), AppError> {
    let Json(request) = payload?;
    request.validate()?;

    let cargo = request.into_cargo();
    state.store.insert_cargo(&cargo).await?;
    tracing::info!(cargo_id = %cargo.id, hazmat = cargo.hazmat, "Cargo registered");

    Ok((StatusCode::CREATED, Json(cargo)))
}

pub async fn get_cargo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Cargo>, AppError> {
    state
        .store
        .get_cargo(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Cargo", id))
}
