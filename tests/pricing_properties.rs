/// Property tests for the pricing core
use chrono::{Duration, TimeZone, Utc};
use freight_quote::{
    models::{Cargo, CountrySegment, EmptyDriving, Location, Route, TransportType},
    pricing::{
        get_toll_rate, is_toll_road, tolls::TOLL_TABLE, CostCalculator, CostInputs, CostSettings,
        Margin,
    },
};
use proptest::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;

fn cents(max: i64) -> impl Strategy<Value = Decimal> {
    (0..=max).prop_map(|c| Decimal::new(c, 2))
}

fn margin() -> impl Strategy<Value = Decimal> {
    (0..=10_000i64).prop_map(|bp| Decimal::new(bp, 4))
}

fn route(
    distance_km: f64,
    duration_hours: f64,
    empty_km: f64,
    segments: Vec<(String, f64)>,
) -> Route {
    let pickup = Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap();
    Route {
        id: "prop".to_string(),
        origin: Location {
            address: "A".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        },
        destination: Location {
            address: "B".to_string(),
            latitude: 1.0,
            longitude: 1.0,
        },
        pickup_time: pickup,
        delivery_time: pickup + Duration::hours(48),
        transport_type: "truck".to_string(),
        cargo_id: None,
        distance_km,
        duration_hours,
        empty_driving: EmptyDriving {
            distance_km: empty_km,
            duration_hours: 0.0,
        },
        country_segments: segments
            .into_iter()
            .map(|(country_code, distance_km)| CountrySegment {
                country_code,
                distance_km,
            })
            .collect(),
        is_feasible: true,
        created_at: pickup,
    }
}

proptest! {
    #[test]
    fn final_price_never_below_total(total in cents(10_000_000), m in margin()) {
        let margin = Margin::new(m).unwrap();
        let price = margin.apply(total).unwrap();

        prop_assert!(price >= total);
        prop_assert_eq!(
            price,
            (total * (Decimal::ONE + m))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        );
    }

    #[test]
    fn margin_outside_unit_interval_is_rejected(excess in 1..1_000_000i64) {
        prop_assert!(Margin::new(Decimal::ONE + Decimal::new(excess, 4)).is_err());
        prop_assert!(Margin::new(-Decimal::new(excess, 4)).is_err());
    }

    #[test]
    fn toll_rate_always_comes_from_the_table(
        country in "[A-Za-z]{0,3}",
        vehicle in "[a-zA-Z ]{0,10}",
    ) {
        let rate = get_toll_rate(&country, &vehicle);
        prop_assert!(TOLL_TABLE.all_rates().any(|known| known == rate));
    }

    #[test]
    fn toll_road_ignores_case_and_whitespace(
        road in prop::sample::select(vec!["A1", "A99", "S17", "D11", "A23", "B7"]),
        country in prop::sample::select(vec!["DE", "FR", "PL", "CZ", "AT", "ES"]),
        pad in " {0,3}",
    ) {
        let messy = format!("{pad}{}{pad}", road.to_lowercase());
        prop_assert_eq!(is_toll_road(&messy, &country), is_toll_road(road, &country));
    }

    #[test]
    fn breakdown_total_equals_sum_of_items(
        distance in 1.0f64..3000.0,
        duration in 0.5f64..96.0,
        empty in 0.0f64..300.0,
        de_share in 0.0f64..1.0,
        fuel_price in cents(500).prop_filter("positive", |d| *d > Decimal::ZERO),
        salary in cents(100_000).prop_filter("positive", |d| *d > Decimal::ZERO),
        overhead in cents(50_000),
        insurance_rate in (0..100i64).prop_map(|r| Decimal::new(r, 4)),
        hazmat in any::<bool>(),
    ) {
        let de_km = distance * de_share;
        let segments = vec![("DE".to_string(), de_km), ("FR".to_string(), distance - de_km)];
        let route = route(distance, duration, empty, segments);

        let transport = TransportType {
            id: "truck".to_string(),
            name: "Truck".to_string(),
            vehicle_class: "truck".to_string(),
            capacity: 24000.0,
            emissions_class: "EURO6".to_string(),
            fuel_consumption_empty: 0.25,
            fuel_consumption_loaded: 0.32,
        };
        let settings = CostSettings {
            version: 1,
            fuel_price_per_liter: fuel_price,
            driver_daily_salary: salary,
            toll_rates: BTreeMap::new(),
            overheads: BTreeMap::from([("admin_fee".to_string(), overhead)]),
            cargo_factors: BTreeMap::from([
                ("insurance_rate".to_string(), insurance_rate),
                ("hazmat_surcharge".to_string(), Decimal::new(15_000, 2)),
            ]),
            currency: "EUR".to_string(),
            last_modified: Utc::now(),
        };
        let cargo = Cargo {
            id: "c".to_string(),
            weight: 1000.0,
            value: Decimal::new(2_500_000, 2),
            hazmat,
            special_requirements: BTreeMap::new(),
            created_at: Utc::now(),
        };

        let breakdown = CostCalculator::default()
            .calculate(CostInputs {
                route: &route,
                transport: &transport,
                cargo: Some(&cargo),
                settings: &settings,
            })
            .unwrap();

        prop_assert_eq!(Some(breakdown.total_cost), breakdown.itemized_sum());
        prop_assert!(breakdown.total_cost >= Decimal::ZERO);
        prop_assert_eq!(breakdown.cargo_specific_costs.contains_key("hazmat_surcharge"), hazmat);
    }
}
