//! Built-in toll data: which roads are tolled in each country and the
//! per-km rate charged to each vehicle class.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

const DEFAULT_KEY: &str = "default";

/// Process-wide toll table, built on first use and never mutated
pub static TOLL_TABLE: LazyLock<TollTable> = LazyLock::new(TollTable::builtin);

/// Where a resolved toll rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// Per-country override from the active cost settings
    Settings,
    /// Country table, exact vehicle class
    Country,
    /// Country table, `default` entry
    CountryDefault,
    /// Global table, exact vehicle class
    Global,
    /// Global table, `default` entry
    GlobalDefault,
}

type RateTable = HashMap<&'static str, Decimal>;

pub struct TollTable {
    roads: HashMap<&'static str, HashSet<&'static str>>,
    rates: HashMap<&'static str, RateTable>,
    fallback: RateTable,
    keywords: Vec<&'static str>,
}

impl TollTable {
    fn builtin() -> Self {
        let roads = HashMap::from([
            (
                "DE",
                HashSet::from([
                    "A1", "A2", "A3", "A4", "A5", "A6", "A7", "A8", "A9", "A10", "A11", "A12",
                    "A13", "A14", "A15", "A19", "A20", "A24", "A25", "A26", "A27", "A28", "A29",
                    "A30", "A31", "A33", "A37", "A38", "A39", "A40", "A42", "A43", "A44", "A45",
                    "A46", "A48", "A49", "A52", "A57", "A59", "A60", "A61", "A62", "A63", "A64",
                    "A65", "A66", "A67", "A70", "A71", "A72", "A73", "A81", "A92", "A93", "A94",
                    "A95", "A96", "A98", "A99",
                ]),
            ),
            (
                "FR",
                HashSet::from([
                    "A1", "A2", "A3", "A4", "A5", "A6", "A7", "A8", "A9", "A10", "A11", "A13",
                    "A14", "A16", "A19", "A20", "A26", "A29", "A31", "A35", "A36", "A40", "A41",
                    "A42", "A43", "A46", "A48", "A49", "A51", "A52", "A54", "A61", "A62", "A63",
                    "A64", "A71", "A75", "A77", "A81", "A83", "A85", "A87", "A89",
                ]),
            ),
            (
                "PL",
                HashSet::from([
                    "A1", "A2", "A4", "S1", "S3", "S5", "S7", "S8", "S17", "S19", "S61",
                ]),
            ),
            ("CZ", HashSet::from(["D1", "D2", "D3", "D5", "D8", "D11"])),
            (
                "AT",
                HashSet::from([
                    "A1", "A2", "A3", "A4", "A5", "A6", "A7", "A8", "A9", "A10", "A11", "A12",
                    "A13", "A14", "A21", "A22", "A23", "A25",
                ]),
            ),
        ]);

        let rates = HashMap::from([
            ("DE", rate_table(dec!(0.20), dec!(0.15), dec!(0.25), dec!(0.15))),
            ("FR", rate_table(dec!(0.25), dec!(0.18), dec!(0.30), dec!(0.18))),
            ("PL", rate_table(dec!(0.15), dec!(0.10), dec!(0.20), dec!(0.10))),
            ("CZ", rate_table(dec!(0.18), dec!(0.12), dec!(0.22), dec!(0.12))),
            ("AT", rate_table(dec!(0.22), dec!(0.16), dec!(0.28), dec!(0.16))),
        ]);

        Self {
            roads,
            rates,
            fallback: rate_table(dec!(0.20), dec!(0.15), dec!(0.25), dec!(0.15)),
            keywords: vec![
                "toll", "maut", "péage", "peage", "autostrada", "dálnice", "dalnice", "motorway",
                "autobahn", "highway", "autoroute", "vignette",
            ],
        }
    }

    /// Whether `road_name` is a known toll road in `country_code`.
    /// Whitespace and case are ignored. Unknown countries have no toll roads.
    pub fn is_toll_road(&self, road_name: &str, country_code: &str) -> bool {
        let road: String = road_name
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();

        self.roads
            .get(normalize_country(country_code).as_str())
            .is_some_and(|roads| roads.contains(road.as_str()))
    }

    /// Whether a free-text route description mentions a tolled road type
    pub fn mentions_toll(&self, description: &str) -> bool {
        let text = description.to_lowercase();
        self.keywords.iter().any(|keyword| text.contains(keyword))
    }

    /// Per-km rate for a vehicle class in a country. Always resolves.
    pub fn get_toll_rate(&self, country_code: &str, vehicle_type: &str) -> Decimal {
        self.lookup(country_code, vehicle_type).0
    }

    /// Rate lookup with its source. The settings override for a country wins
    /// over the built-in table for every vehicle class.
    pub fn resolve_rate(
        &self,
        country_code: &str,
        vehicle_type: &str,
        overrides: &BTreeMap<String, Decimal>,
    ) -> (Decimal, RateSource) {
        let country = normalize_country(country_code);
        match overrides.get(&country) {
            Some(rate) => (*rate, RateSource::Settings),
            None => self.lookup(&country, vehicle_type),
        }
    }

    fn lookup(&self, country_code: &str, vehicle_type: &str) -> (Decimal, RateSource) {
        let vehicle = vehicle_type.trim().to_lowercase();
        let country = normalize_country(country_code);
        let (table, exact, default) = match self.rates.get(country.as_str()) {
            Some(table) => (table, RateSource::Country, RateSource::CountryDefault),
            None => (&self.fallback, RateSource::Global, RateSource::GlobalDefault),
        };

        match table.get(vehicle.as_str()) {
            Some(rate) => (*rate, exact),
            // Every built-in table carries a default entry
            None => (table.get(DEFAULT_KEY).copied().unwrap_or_default(), default),
        }
    }

    /// Every rate the table can return, for auditing
    pub fn all_rates(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.rates
            .values()
            .chain(std::iter::once(&self.fallback))
            .flat_map(|table| table.values().copied())
    }
}

fn rate_table(truck: Decimal, van: Decimal, trailer: Decimal, default: Decimal) -> RateTable {
    HashMap::from([
        ("truck", truck),
        ("van", van),
        ("trailer", trailer),
        (DEFAULT_KEY, default),
    ])
}

fn normalize_country(country_code: &str) -> String {
    country_code.trim().to_ascii_uppercase()
}

/// See [`TollTable::is_toll_road`]
pub fn is_toll_road(road_name: &str, country_code: &str) -> bool {
    TOLL_TABLE.is_toll_road(road_name, country_code)
}

/// See [`TollTable::get_toll_rate`]
pub fn get_toll_rate(country_code: &str, vehicle_type: &str) -> Decimal {
    TOLL_TABLE.get_toll_rate(country_code, vehicle_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_toll_road_ignores_case_and_spaces() {
        assert!(is_toll_road("A1", "DE"));
        assert_eq!(is_toll_road("a1 ", "DE"), is_toll_road("A1", "DE"));
        assert!(is_toll_road(" s 17", "pl"));
        assert!(is_toll_road("d11", "CZ"));
    }

    #[test]
    fn test_is_toll_road_unknown_road_or_country() {
        assert!(!is_toll_road("A16", "DE"));
        assert!(!is_toll_road("A1", "ES"));
        assert!(!is_toll_road("", "DE"));
    }

    #[test]
    fn test_get_toll_rate_country_and_vehicle() {
        assert_eq!(get_toll_rate("DE", "truck"), dec!(0.20));
        assert_eq!(get_toll_rate("FR", "TRAILER"), dec!(0.30));
        assert_eq!(get_toll_rate("at", "Van"), dec!(0.16));
    }

    #[test]
    fn test_get_toll_rate_falls_back() {
        // unknown vehicle -> country default
        assert_eq!(get_toll_rate("PL", "bicycle"), dec!(0.10));
        // unknown country -> global table
        assert_eq!(get_toll_rate("ES", "truck"), dec!(0.20));
        // both unknown -> global default
        assert_eq!(get_toll_rate("ZZ", "hovercraft"), dec!(0.15));
    }

    #[test]
    fn test_resolve_rate_sources() {
        let overrides = BTreeMap::from([("FR".to_string(), dec!(0.40))]);

        assert_eq!(
            TOLL_TABLE.resolve_rate("fr", "van", &overrides),
            (dec!(0.40), RateSource::Settings)
        );
        assert_eq!(
            TOLL_TABLE.resolve_rate("DE", "truck", &overrides),
            (dec!(0.20), RateSource::Country)
        );
        assert_eq!(
            TOLL_TABLE.resolve_rate("DE", "bus", &overrides),
            (dec!(0.15), RateSource::CountryDefault)
        );
        assert_eq!(
            TOLL_TABLE.resolve_rate("SE", "van", &overrides),
            (dec!(0.15), RateSource::Global)
        );
        assert_eq!(
            TOLL_TABLE.resolve_rate("SE", "bus", &overrides),
            (dec!(0.15), RateSource::GlobalDefault)
        );
    }

    #[test]
    fn test_mentions_toll() {
        assert!(TOLL_TABLE.mentions_toll("Take the Autobahn towards Köln"));
        assert!(TOLL_TABLE.mentions_toll("Sortie péage Saint-Arnoult"));
        assert!(!TOLL_TABLE.mentions_toll("Country road through the village"));
    }
}
