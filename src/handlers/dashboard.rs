//! Dashboard: a static page plus the JSON summary it renders

use axum::extract::State;
use axum::response::{Html, IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::AppState;
use crate::error::AppError;
use crate::models::Offer;
use crate::store::StoreCounts;

const RECENT_OFFERS: u32 = 10;

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub counts: StoreCounts,
    pub cost_settings_version: i64,
    pub cost_settings_modified: DateTime<Utc>,
    pub currency: String,
    pub recent_offers: Vec<Offer>,
}

/// GET /api/dashboard/summary
pub async fn get_summary(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    let settings = state.settings.current();
    let counts = state.store.counts().await?;
    let recent_offers = state.store.list_offers(None, RECENT_OFFERS).await?;

    Ok(Json(DashboardSummary {
        counts,
        cost_settings_version: settings.version,
        cost_settings_modified: settings.last_modified,
        currency: settings.currency.clone(),
        recent_offers,
    }))
}

/// GET / - Serve the dashboard HTML
pub async fn get_dashboard() -> impl IntoResponse {
    Html(include_str!("../../static/dashboard.html"))
}
