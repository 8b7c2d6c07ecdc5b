use super::{from_millis, parse_decimal, parse_json, Store};
use crate::error::AppError;
use crate::models::Offer;

#[derive(sqlx::FromRow)]
struct OfferRow {
    id: String,
    route_id: String,
    total_cost: String,
    margin: String,
    final_price: String,
    currency: String,
    cost_breakdown: String,
    fun_fact: String,
    created_at: i64,
}

impl TryFrom<OfferRow> for Offer {
    type Error = AppError;

    fn try_from(row: OfferRow) -> Result<Self, Self::Error> {
        Ok(Offer {
            total_cost: parse_decimal("offers.total_cost", &row.total_cost)?,
            margin: parse_decimal("offers.margin", &row.margin)?,
            final_price: parse_decimal("offers.final_price", &row.final_price)?,
            cost_breakdown: parse_json("offers.cost_breakdown", &row.cost_breakdown)?,
            created_at: from_millis("offers.created_at", row.created_at)?,
            id: row.id,
            route_id: row.route_id,
            currency: row.currency,
            fun_fact: row.fun_fact,
        })
    }
}

const OFFER_COLUMNS: &str = "id, route_id, total_cost, margin, final_price, currency, \
                             cost_breakdown, fun_fact, created_at";

impl Store {
    pub async fn save_offer(&self, offer: &Offer) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO offers (
                id, route_id, total_cost, margin, final_price, currency,
                cost_breakdown, fun_fact, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&offer.id)
        .bind(&offer.route_id)
        .bind(offer.total_cost.to_string())
        .bind(offer.margin.to_string())
        .bind(offer.final_price.to_string())
        .bind(&offer.currency)
        .bind(serde_json::to_string(&offer.cost_breakdown)?)
        .bind(&offer.fun_fact)
        .bind(offer.created_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_offer(&self, id: &str) -> Result<Offer, AppError> {
        let row: Option<OfferRow> =
            sqlx::query_as(&format!("SELECT {OFFER_COLUMNS} FROM offers WHERE id = ?"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.ok_or_else(|| AppError::not_found("Offer", id))?.try_into()
    }

    /// Newest first, optionally restricted to one route
    pub async fn list_offers(
        &self,
        route_id: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Offer>, AppError> {
        let rows: Vec<OfferRow> = match route_id {
            Some(route_id) => {
                sqlx::query_as(&format!(
                    "SELECT {OFFER_COLUMNS} FROM offers WHERE route_id = ? \
                     ORDER BY created_at DESC LIMIT ?"
                ))
                .bind(route_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {OFFER_COLUMNS} FROM offers ORDER BY created_at DESC LIMIT ?"
                ))
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.into_iter().map(Offer::try_from).collect()
    }
}
