use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::AppError;
use crate::models::{Offer, Route};
use crate::pricing::fun_facts::{FunFactContext, FunFactGenerator};
use crate::pricing::models::{round_money, CostBreakdown};

/// Fractional markup in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Margin(Decimal);

impl Margin {
    pub fn new(value: Decimal) -> Result<Self, AppError> {
        if value < Decimal::ZERO || value > Decimal::ONE {
            return Err(AppError::validation(
                "margin",
                format!("Margin must be between 0 and 1, got {}", value),
            ));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    /// `total × (1 + margin)`, rounded to cents
    pub fn apply(self, total: Decimal) -> Result<Decimal, AppError> {
        total
            .checked_mul(Decimal::ONE + self.0)
            .map(round_money)
            .ok_or_else(|| {
                AppError::InternalError(format!(
                    "Final price overflowed for total {} at margin {}",
                    total, self.0
                ))
            })
    }
}

/// Packages a cost breakdown into a priced offer
pub struct OfferBuilder<'a> {
    fun_facts: &'a dyn FunFactGenerator,
}

impl<'a> OfferBuilder<'a> {
    pub fn new(fun_facts: &'a dyn FunFactGenerator) -> Self {
        Self { fun_facts }
    }

    pub fn build(
        &self,
        route: &Route,
        breakdown: CostBreakdown,
        margin: Margin,
    ) -> Result<Offer, AppError> {
        let final_price = margin.apply(breakdown.total_cost)?;
        let fun_fact = self.fun_facts.generate(&FunFactContext {
            origin: &route.origin.address,
            destination: &route.destination.address,
            distance_km: route.distance_km,
        });

        Ok(Offer {
            id: uuid::Uuid::new_v4().to_string(),
            route_id: route.id.clone(),
            total_cost: breakdown.total_cost,
            margin: margin.value(),
            final_price,
            currency: breakdown.currency.clone(),
            cost_breakdown: breakdown,
            fun_fact,
            created_at: Utc::now(),
        })
    }
}
