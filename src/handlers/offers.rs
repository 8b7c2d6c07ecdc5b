use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::AppState;
use crate::error::AppError;
use crate::models::{CreateOfferRequest, Offer};
use crate::pricing::Margin;

/// Margin is checked before any pricing work; a rejected request stores nothing
pub async fn create_offer(
    State(state): State<AppState>,
    payload: Result<Json<CreateOfferRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Offer>), AppError> {
    let Json(request) = payload?;

    if request.route_id.trim().is_empty() {
        return Err(AppError::validation("route_id", "Route id must not be empty"));
    }
    let margin = Margin::new(request.margin.unwrap_or(state.config.pricing.default_margin))?;

    let offer = state.quotes.create_offer(&request.route_id, margin).await?;
    Ok((StatusCode::CREATED, Json(offer)))
}

pub async fn get_offer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Offer>, AppError> {
    Ok(Json(state.store.get_offer(&id).await?))
}

#[derive(Debug, Deserialize)]
pub struct OfferListQuery {
    pub route_id: Option<String>,
    pub limit: Option<u32>,
}

pub async fn list_offers(
    State(state): State<AppState>,
    Query(query): Query<OfferListQuery>,
) -> Result<Json<Vec<Offer>>, AppError> {
    let offers = state
        .store
        .list_offers(query.route_id.as_deref(), state.page_size(query.limit))
        .await?;
    Ok(Json(offers))
}
