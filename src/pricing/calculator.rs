use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, error};

use crate::error::AppError;
use crate::models::{Cargo, Route, TransportType};
use crate::pricing::models::{
    round_money, CargoFactor, CostBreakdown, CostSettings, FactorCondition, FactorKind,
};
use crate::pricing::tolls::{TollTable, TOLL_TABLE};

/// Everything a cost calculation reads, borrowed for one calculation
#[derive(Debug, Clone, Copy)]
pub struct CostInputs<'a> {
    pub route: &'a Route,
    pub transport: &'a TransportType,
    pub cargo: Option<&'a Cargo>,
    pub settings: &'a CostSettings,
}

/// Turns a route and a settings snapshot into an itemized cost breakdown
pub struct CostCalculator {
    tolls: &'static TollTable,
}

impl Default for CostCalculator {
    fn default() -> Self {
        Self::new(&TOLL_TABLE)
    }
}

impl CostCalculator {
    pub fn new(tolls: &'static TollTable) -> Self {
        Self { tolls }
    }

    pub fn calculate(&self, inputs: CostInputs<'_>) -> Result<CostBreakdown, AppError> {
        let CostInputs {
            route,
            transport,
            cargo,
            settings,
        } = inputs;

        let loaded_km = to_decimal("distance_km", route.distance_km)?;
        let empty_km = to_decimal("empty_driving.distance_km", route.empty_driving.distance_km)?;
        let loaded_consumption =
            to_decimal("fuel_consumption_loaded", transport.fuel_consumption_loaded)?;
        let empty_consumption =
            to_decimal("fuel_consumption_empty", transport.fuel_consumption_empty)?;
        let hours = to_decimal("duration_hours", route.total_duration_hours())?;

        let mut breakdown = CostBreakdown::zero(&settings.currency);

        let litres = loaded_km
            .checked_mul(loaded_consumption)
            .zip(empty_km.checked_mul(empty_consumption))
            .and_then(|(loaded, empty)| loaded.checked_add(empty));
        breakdown.fuel_cost = money(
            "fuel_cost",
            litres.and_then(|l| l.checked_mul(settings.fuel_price_per_liter)),
        )?;

        let mut toll = Some(Decimal::ZERO);
        for segment in &route.country_segments {
            let km = to_decimal("country_segments.distance_km", segment.distance_km)?;
            let (rate, source) = self.tolls.resolve_rate(
                &segment.country_code,
                &transport.vehicle_class,
                &settings.toll_rates,
            );
            debug!(
                country = %segment.country_code,
                vehicle_class = %transport.vehicle_class,
                %rate,
                ?source,
                "Resolved toll rate"
            );
            toll = toll.zip(km.checked_mul(rate)).and_then(|(sum, part)| sum.checked_add(part));
        }
        breakdown.toll_cost = money("toll_cost", toll)?;

        let days = (hours / Decimal::from(24)).ceil();
        breakdown.driver_cost =
            money("driver_cost", days.checked_mul(settings.driver_daily_salary))?;

        breakdown.overheads = money(
            "overheads",
            settings
                .overheads
                .values()
                .copied()
                .try_fold(Decimal::ZERO, Decimal::checked_add),
        )?;

        if let Some(cargo) = cargo {
            breakdown.cargo_specific_costs = cargo_costs(cargo, &settings.cargo_factors)?;
        }

        breakdown.calculate_total()?;
        check_non_negative(&breakdown, settings.version)?;

        Ok(breakdown)
    }
}

fn cargo_costs(
    cargo: &Cargo,
    factors: &BTreeMap<String, Decimal>,
) -> Result<BTreeMap<String, Decimal>, AppError> {
    factors
        .iter()
        .filter_map(|(key, factor)| {
            let parsed = CargoFactor::parse(key);
            let applies = match &parsed.condition {
                FactorCondition::Always => true,
                FactorCondition::Hazmat => cargo.hazmat,
                FactorCondition::Requirement(name) => cargo.requires(name),
            };
            if !applies {
                return None;
            }

            let amount = match parsed.kind {
                FactorKind::Flat => Some(*factor),
                FactorKind::ValueRate => factor.checked_mul(cargo.value),
            };
            Some(money(key, amount).map(|amount| (key.clone(), amount)))
        })
        .collect()
}

/// Round a component to cents, or report which component overflowed
fn money(component: &str, amount: Option<Decimal>) -> Result<Decimal, AppError> {
    match amount {
        Some(amount) => Ok(round_money(amount)),
        None => {
            error!(component, "Cost component overflowed");
            Err(AppError::InternalError(format!(
                "Cost component {} overflowed",
                component
            )))
        }
    }
}

fn check_non_negative(breakdown: &CostBreakdown, settings_version: i64) -> Result<(), AppError> {
    let components = [
        ("fuel_cost", breakdown.fuel_cost),
        ("toll_cost", breakdown.toll_cost),
        ("driver_cost", breakdown.driver_cost),
        ("overheads", breakdown.overheads),
    ];
    let negative = components
        .into_iter()
        .map(|(name, amount)| (name.to_string(), amount))
        .chain(
            breakdown
                .cargo_specific_costs
                .iter()
                .map(|(name, amount)| (name.clone(), *amount)),
        )
        .find(|(_, amount)| *amount < Decimal::ZERO);

    if let Some((name, amount)) = negative {
        error!(
            component = %name,
            %amount,
            settings_version,
            "Negative cost component, cost settings are corrupt"
        );
        return Err(AppError::InternalError(format!(
            "Cost component {} is negative ({}) under settings version {}",
            name, amount, settings_version
        )));
    }
    Ok(())
}

/// Convert a physical quantity to fixed-point using its shortest decimal form
fn to_decimal(field: &str, value: f64) -> Result<Decimal, AppError> {
    Decimal::from_str(&value.to_string()).map_err(|e| {
        AppError::InternalError(format!("Cannot represent {} = {} as decimal: {}", field, value, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CountrySegment, EmptyDriving, Location};
    use chrono::{Duration, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn paris_frankfurt() -> Route {
        let pickup = Utc.with_ymd_and_hms(2026, 3, 2, 6, 0, 0).unwrap();
        Route {
            id: "r-1".to_string(),
            origin: Location {
                address: "Paris, FR".to_string(),
                latitude: 48.8566,
                longitude: 2.3522,
            },
            destination: Location {
                address: "Frankfurt, DE".to_string(),
                latitude: 50.1109,
                longitude: 8.6821,
            },
            pickup_time: pickup,
            delivery_time: pickup + Duration::hours(12),
            transport_type: "flatbed_truck".to_string(),
            cargo_id: None,
            distance_km: 580.0,
            duration_hours: 7.5,
            empty_driving: EmptyDriving::default(),
            country_segments: vec![CountrySegment {
                country_code: "DE".to_string(),
                distance_km: 580.0,
            }],
            is_feasible: true,
            created_at: pickup,
        }
    }

    fn flatbed() -> TransportType {
        TransportType {
            id: "flatbed_truck".to_string(),
            name: "Flatbed Truck".to_string(),
            vehicle_class: "truck".to_string(),
            capacity: 24000.0,
            emissions_class: "EURO6".to_string(),
            fuel_consumption_empty: 0.25,
            fuel_consumption_loaded: 0.35,
        }
    }

    fn settings() -> CostSettings {
        CostSettings {
            version: 1,
            fuel_price_per_liter: dec!(1.5),
            driver_daily_salary: dec!(200),
            toll_rates: BTreeMap::new(),
            overheads: BTreeMap::new(),
            cargo_factors: BTreeMap::new(),
            currency: "EUR".to_string(),
            last_modified: Utc::now(),
        }
    }

    fn cargo(hazmat: bool, requirements: serde_json::Value) -> Cargo {
        Cargo {
            id: "c-1".to_string(),
            weight: 8000.0,
            value: dec!(50000),
            hazmat,
            special_requirements: serde_json::from_value(requirements).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn calculate(
        route: &Route,
        cargo: Option<&Cargo>,
        settings: &CostSettings,
    ) -> Result<CostBreakdown, AppError> {
        CostCalculator::default().calculate(CostInputs {
            route,
            transport: &flatbed(),
            cargo,
            settings,
        })
    }

    #[test]
    fn test_paris_frankfurt_fuel_and_toll() {
        let breakdown = calculate(&paris_frankfurt(), None, &settings()).unwrap();

        assert_eq!(breakdown.fuel_cost, dec!(304.5));
        assert_eq!(breakdown.toll_cost, dec!(116.0));
        assert_eq!(breakdown.driver_cost, dec!(200));
        assert_eq!(breakdown.currency, "EUR");
        assert_eq!(breakdown.total_cost, dec!(620.5));
    }

    #[test]
    fn test_empty_driving_adds_fuel_and_driver_time() {
        let mut route = paris_frankfurt();
        route.empty_driving = EmptyDriving {
            distance_km: 100.0,
            duration_hours: 17.0,
        };

        let breakdown = calculate(&route, None, &settings()).unwrap();
        // (580 * 0.35 + 100 * 0.25) * 1.5
        assert_eq!(breakdown.fuel_cost, dec!(342.0));
        // 24.5 hours -> 2 days
        assert_eq!(breakdown.driver_cost, dec!(400));
    }

    #[test]
    fn test_partial_day_rounds_up() {
        let mut route = paris_frankfurt();
        route.duration_hours = 0.5;
        let breakdown = calculate(&route, None, &settings()).unwrap();
        assert_eq!(breakdown.driver_cost, dec!(200));

        route.duration_hours = 24.0;
        let breakdown = calculate(&route, None, &settings()).unwrap();
        assert_eq!(breakdown.driver_cost, dec!(200));
    }

    #[test]
    fn test_settings_toll_rate_overrides_table() {
        let mut settings = settings();
        settings.toll_rates.insert("DE".to_string(), dec!(0.30));

        let breakdown = calculate(&paris_frankfurt(), None, &settings).unwrap();
        assert_eq!(breakdown.toll_cost, dec!(174.0));
    }

    #[test]
    fn test_mixed_country_segments() {
        let mut route = paris_frankfurt();
        route.country_segments = vec![
            CountrySegment {
                country_code: "FR".to_string(),
                distance_km: 380.0,
            },
            CountrySegment {
                country_code: "DE".to_string(),
                distance_km: 200.0,
            },
        ];

        let breakdown = calculate(&route, None, &settings()).unwrap();
        // 380 * 0.25 + 200 * 0.20
        assert_eq!(breakdown.toll_cost, dec!(135.0));
    }

    #[test]
    fn test_overheads_are_summed() {
        let mut settings = settings();
        settings.overheads.insert("admin_fee".to_string(), dec!(50));
        settings.overheads.insert("insurance".to_string(), dec!(25.5));

        let breakdown = calculate(&paris_frankfurt(), None, &settings).unwrap();
        assert_eq!(breakdown.overheads, dec!(75.5));
    }

    #[test]
    fn test_cargo_factor_semantics() {
        let mut settings = settings();
        settings.cargo_factors = BTreeMap::from([
            ("insurance_rate".to_string(), dec!(0.001)),
            ("handling_fee".to_string(), dec!(30)),
            ("hazmat_surcharge".to_string(), dec!(150)),
            ("special_temperature_control_fee".to_string(), dec!(80)),
        ]);

        let plain = cargo(false, json!({}));
        let breakdown = calculate(&paris_frankfurt(), Some(&plain), &settings).unwrap();
        assert_eq!(
            breakdown.cargo_specific_costs,
            BTreeMap::from([
                ("handling_fee".to_string(), dec!(30)),
                ("insurance_rate".to_string(), dec!(50)),
            ])
        );

        let dangerous = cargo(true, json!({"temperature_control": true}));
        let breakdown = calculate(&paris_frankfurt(), Some(&dangerous), &settings).unwrap();
        assert_eq!(breakdown.cargo_specific_costs.len(), 4);
        assert_eq!(breakdown.cargo_specific_costs["hazmat_surcharge"], dec!(150));
        assert_eq!(
            breakdown.cargo_specific_costs["special_temperature_control_fee"],
            dec!(80)
        );
    }

    #[test]
    fn test_no_cargo_means_no_cargo_costs() {
        let mut settings = settings();
        settings.cargo_factors.insert("handling_fee".to_string(), dec!(30));

        let breakdown = calculate(&paris_frankfurt(), None, &settings).unwrap();
        assert!(breakdown.cargo_specific_costs.is_empty());
    }

    #[test]
    fn test_total_equals_sum_of_components() {
        let mut route = paris_frankfurt();
        route.distance_km = 333.333;
        route.country_segments[0].distance_km = 333.333;
        let mut settings = settings();
        settings.fuel_price_per_liter = dec!(1.777);
        settings.overheads.insert("admin_fee".to_string(), dec!(12.345));
        settings.cargo_factors.insert("insurance_rate".to_string(), dec!(0.0013));

        let goods = cargo(false, json!({}));
        let breakdown = calculate(&route, Some(&goods), &settings).unwrap();
        assert_eq!(Some(breakdown.total_cost), breakdown.itemized_sum());
    }

    #[test]
    fn test_overflowing_component_is_internal_error() {
        let mut settings = settings();
        settings.driver_daily_salary = Decimal::MAX;
        let mut route = paris_frankfurt();
        route.duration_hours = 100.0;

        let err = calculate(&route, None, &settings).unwrap_err();
        match err {
            AppError::InternalError(message) => assert!(message.contains("driver_cost")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_negative_component_is_internal_error() {
        let mut settings = settings();
        settings.overheads.insert("rebate".to_string(), dec!(-10));

        let err = calculate(&paris_frankfurt(), None, &settings).unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
    }
}
