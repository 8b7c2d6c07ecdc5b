use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::models::CostBreakdown;

/// A priced quote for a route. Never modified after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offer {
    pub id: String,
    pub route_id: String,
    pub total_cost: Decimal,
    pub margin: Decimal,
    pub final_price: Decimal,
    pub currency: String,
    pub cost_breakdown: CostBreakdown,
    pub fun_fact: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOfferRequest {
    pub route_id: String,
    /// Falls back to the configured default margin
    #[serde(default)]
    pub margin: Option<Decimal>,
}
