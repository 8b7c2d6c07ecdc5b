use axum::{
    extract::{Path, Query, State},
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::AppError;
use crate::models::TransportType;
use crate::pricing::tolls::{RateSource, TOLL_TABLE};

pub async fn list_transport_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<TransportType>>, AppError> {
    Ok(Json(state.store.list_transport_types().await?))
}

pub async fn get_transport_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TransportType>, AppError> {
    state
        .store
        .get_transport_type(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Transport type", id))
}

#[derive(Debug, Deserialize)]
pub struct TollRateQuery {
    pub country: String,
    #[serde(default = "default_vehicle_type")]
    pub vehicle_type: String,
}

fn default_vehicle_type() -> String {
    "default".to_string()
}

#[derive(Debug, Serialize)]
pub struct TollRateResponse {
    pub country: String,
    pub vehicle_type: String,
    pub rate_per_km: Decimal,
    pub source: RateSource,
}

/// Effective toll rate, including any override from the active settings
pub async fn toll_rate(
    State(state): State<AppState>,
    Query(query): Query<TollRateQuery>,
) -> Json<TollRateResponse> {
    let settings = state.settings.current();
    let (rate, source) =
        TOLL_TABLE.resolve_rate(&query.country, &query.vehicle_type, &settings.toll_rates);

    Json(TollRateResponse {
        country: query.country.trim().to_ascii_uppercase(),
        vehicle_type: query.vehicle_type,
        rate_per_km: rate,
        source,
    })
}

#[derive(Debug, Deserialize)]
pub struct TollRoadQuery {
    pub road: String,
    pub country: String,
}

#[derive(Debug, Serialize)]
pub struct TollRoadResponse {
    pub road: String,
    pub country: String,
    pub is_toll_road: bool,
    /// Free-text hint from words like "autobahn" or "péage"
    pub mentions_toll: bool,
}

pub async fn toll_road(Query(query): Query<TollRoadQuery>) -> Json<TollRoadResponse> {
    Json(TollRoadResponse {
        is_toll_road: TOLL_TABLE.is_toll_road(&query.road, &query.country),
        mentions_toll: TOLL_TABLE.mentions_toll(&query.road),
        road: query.road,
        country: query.country,
    })
}
