use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{AppState, ListQuery};
use crate::error::AppError;
use crate::pricing::{CostSettings, CostSettingsUpdate};

pub async fn get_cost_settings(State(state): State<AppState>) -> Json<CostSettings> {
    Json(state.settings.current().as_ref().clone())
}

#[derive(Debug, Serialize)]
pub struct SettingsUpdated {
    pub version: i64,
    pub last_modified: DateTime<Utc>,
    pub settings: CostSettings,
}

/// Replace the active cost settings with a full payload
pub async fn update_cost_settings(
    State(state): State<AppState>,
    payload: Result<Json<CostSettingsUpdate>, JsonRejection>,
) -> Result<Json<SettingsUpdated>, AppError> {
    let Json(update) = payload?;
    let settings = state.settings.update(update).await?;

    Ok(Json(SettingsUpdated {
        version: settings.version,
        last_modified: settings.last_modified,
        settings: settings.as_ref().clone(),
    }))
}

pub async fn cost_settings_history(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CostSettings>>, AppError> {
    Ok(Json(state.settings.history(state.page_size(query.limit)).await?))
}
