use std::sync::Arc;
use tracing::info;

use crate::error::AppError;
use crate::models::{Offer, Route};
use crate::pricing::calculator::{CostCalculator, CostInputs};
use crate::pricing::fun_facts::FunFactGenerator;
use crate::pricing::models::CostBreakdown;
use crate::pricing::offer::{Margin, OfferBuilder};
use crate::pricing::service::CostSettingsService;
use crate::store::Store;

/// Loads what a route needs from the store and prices it
pub struct QuoteService {
    store: Store,
    settings: Arc<CostSettingsService>,
    calculator: CostCalculator,
    fun_facts: Arc<dyn FunFactGenerator>,
}

impl QuoteService {
    pub fn new(
        store: Store,
        settings: Arc<CostSettingsService>,
        fun_facts: Arc<dyn FunFactGenerator>,
    ) -> Self {
        Self {
            store,
            settings,
            calculator: CostCalculator::default(),
            fun_facts,
        }
    }

    /// Cost breakdown for a stored route under the active settings
    pub async fn price_route(&self, route_id: &str) -> Result<(Route, CostBreakdown), AppError> {
        let route = self.store.get_route(route_id).await?;

        let transport = self
            .store
            .get_transport_type(&route.transport_type)
            .await?
            .ok_or_else(|| {
                AppError::ConfigError(format!(
                    "route {} references unknown transport type {}",
                    route.id, route.transport_type
                ))
            })?;

        let cargo = match &route.cargo_id {
            Some(cargo_id) => Some(
                self.store
                    .get_cargo(cargo_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Cargo", cargo_id.as_str()))?,
            ),
            None => None,
        };

        let settings = self.settings.current();
        let breakdown = self.calculator.calculate(CostInputs {
            route: &route,
            transport: &transport,
            cargo: cargo.as_ref(),
            settings: &settings,
        })?;

        Ok((route, breakdown))
    }

    /// Price the route, apply the margin and persist the offer
    pub async fn create_offer(&self, route_id: &str, margin: Margin) -> Result<Offer, AppError> {
        let (route, breakdown) = self.price_route(route_id).await?;
        let offer = OfferBuilder::new(self.fun_facts.as_ref()).build(&route, breakdown, margin)?;
        self.store.save_offer(&offer).await?;

        info!(
            offer_id = %offer.id,
            route_id = %offer.route_id,
            total_cost = %offer.total_cost,
            margin = %offer.margin,
            final_price = %offer.final_price,
            currency = %offer.currency,
            "Offer created"
        );

        Ok(offer)
    }
}
