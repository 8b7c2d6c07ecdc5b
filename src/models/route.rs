use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Tolerance for comparing summed segment distances against the route distance
const DISTANCE_EPSILON_KM: f64 = 1e-6;
/// Longest accepted leg, about two and a half times around the equator
pub const MAX_DISTANCE_KM: f64 = 100_000.0;
/// Longest accepted driving time, one year
pub const MAX_DURATION_HOURS: f64 = 8_760.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn validate(&self, field: &str) -> Result<(), AppError> {
        if self.address.trim().is_empty() {
            return Err(AppError::validation(
                format!("{field}.address"),
                "Address must not be empty",
            ));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AppError::validation(
                format!("{field}.latitude"),
                format!("Latitude must be between -90 and 90, got {}", self.latitude),
            ));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AppError::validation(
                format!("{field}.longitude"),
                format!("Longitude must be between -180 and 180, got {}", self.longitude),
            ));
        }
        Ok(())
    }

    fn same_place(&self, other: &Location) -> bool {
        self.latitude == other.latitude
            && self.longitude == other.longitude
            && self.address.trim().eq_ignore_ascii_case(other.address.trim())
    }
}

/// Distance driven inside one country, used for toll pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountrySegment {
    pub country_code: String,
    pub distance_km: f64,
}

/// Distance and time driven without cargo before or after the loaded leg
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptyDriving {
    #[serde(default)]
    pub distance_km: f64,
    #[serde(default)]
    pub duration_hours: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub origin: Location,
    pub destination: Location,
    pub pickup_time: DateTime<Utc>,
    pub delivery_time: DateTime<Utc>,
    pub transport_type: String,
    pub cargo_id: Option<String>,
    pub distance_km: f64,
    pub duration_hours: f64,
    pub empty_driving: EmptyDriving,
    pub country_segments: Vec<CountrySegment>,
    pub is_feasible: bool,
    pub created_at: DateTime<Utc>,
}

impl Route {
    /// Hours available between pickup and delivery
    pub fn window_hours(&self) -> f64 {
        (self.delivery_time - self.pickup_time).num_seconds() as f64 / 3600.0
    }

    /// Loaded plus empty driving time, the hours a driver is paid for
    pub fn total_duration_hours(&self) -> f64 {
        self.duration_hours + self.empty_driving.duration_hours
    }

    /// A route is feasible when the loaded leg fits in the delivery window
    pub fn check_feasibility(&self) -> bool {
        self.duration_hours <= self.window_hours()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRouteRequest {
    pub origin: Location,
    pub destination: Location,
    pub pickup_time: DateTime<Utc>,
    pub delivery_time: DateTime<Utc>,
    pub transport_type: String,
    #[serde(default)]
    pub cargo_id: Option<String>,
    pub distance_km: f64,
    pub duration_hours: f64,
    #[serde(default)]
    pub empty_driving: EmptyDriving,
    #[serde(default)]
    pub country_segments: Vec<CountrySegment>,
}

impl CreateRouteRequest {
    /// Field-level checks that need no database access
    pub fn validate(&self) -> Result<(), AppError> {
        self.origin.validate("origin")?;
        self.destination.validate("destination")?;

        if self.origin.same_place(&self.destination) {
            return Err(AppError::validation(
                "destination",
                "Origin and destination must be different",
            ));
        }

        if self.delivery_time <= self.pickup_time {
            return Err(AppError::validation(
                "delivery_time",
                format!(
                    "Delivery time {} must be after pickup time {}",
                    self.delivery_time, self.pickup_time
                ),
            ));
        }

        if self.transport_type.trim().is_empty() {
            return Err(AppError::validation(
                "transport_type",
                "Transport type must not be empty",
            ));
        }

        require_positive("distance_km", self.distance_km, MAX_DISTANCE_KM)?;
        require_positive("duration_hours", self.duration_hours, MAX_DURATION_HOURS)?;
        require_non_negative(
            "empty_driving.distance_km",
            self.empty_driving.distance_km,
            MAX_DISTANCE_KM,
        )?;
        require_non_negative(
            "empty_driving.duration_hours",
            self.empty_driving.duration_hours,
            MAX_DURATION_HOURS,
        )?;

        let mut segment_total = 0.0;
        for (idx, segment) in self.country_segments.iter().enumerate() {
            let code = segment.country_code.trim();
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(AppError::validation(
                    format!("country_segments[{idx}].country_code"),
                    format!("Expected a two-letter country code, got '{}'", segment.country_code),
                ));
            }
            require_non_negative(
                &format!("country_segments[{idx}].distance_km"),
                segment.distance_km,
                MAX_DISTANCE_KM,
            )?;
            segment_total += segment.distance_km;
        }

        if segment_total > self.distance_km + DISTANCE_EPSILON_KM {
            return Err(AppError::validation(
                "country_segments",
                format!(
                    "Segment distances sum to {:.3} km, exceeding route distance {:.3} km",
                    segment_total, self.distance_km
                ),
            ));
        }

        Ok(())
    }

    pub fn into_route(self) -> Route {
        let country_segments = self
            .country_segments
            .into_iter()
            .map(|segment| CountrySegment {
                country_code: segment.country_code.trim().to_ascii_uppercase(),
                distance_km: segment.distance_km,
            })
            .collect();

        let mut route = Route {
            id: uuid::Uuid::new_v4().to_string(),
            origin: self.origin,
            destination: self.destination,
            pickup_time: self.pickup_time,
            delivery_time: self.delivery_time,
            transport_type: self.transport_type.trim().to_string(),
            cargo_id: self.cargo_id,
            distance_km: self.distance_km,
            duration_hours: self.duration_hours,
            empty_driving: self.empty_driving,
            country_segments,
            is_feasible: false,
            created_at: Utc::now(),
        };
        route.is_feasible = route.check_feasibility();
        route
    }
}

fn require_positive(field: &str, value: f64, max: f64) -> Result<(), AppError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AppError::validation(
            field,
            format!("Must be greater than 0, got {}", value),
        ));
    }
    require_at_most(field, value, max)
}

fn require_non_negative(field: &str, value: f64, max: f64) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::validation(
            field,
            format!("Must not be negative, got {}", value),
        ));
    }
    require_at_most(field, value, max)
}

fn require_at_most(field: &str, value: f64, max: f64) -> Result<(), AppError> {
    if value > max {
        return Err(AppError::validation(
            field,
            format!("Must be at most {}, got {}", max, value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn request() -> CreateRouteRequest {
        let pickup = Utc.with_ymd_and_hms(2026, 3, 2, 6, 0, 0).unwrap();
        CreateRouteRequest {
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
                country_code: "de".to_string(),
                distance_km: 580.0,
            }],
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_rejects_delivery_not_after_pickup() {
        let mut req = request();
        req.delivery_time = req.pickup_time;
        let err = req.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "delivery_time"));

        let mut req = request();
        req.delivery_time = req.pickup_time - Duration::minutes(1);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        let mut req = request();
        req.origin.latitude = 91.0;
        let err = req.validate().unwrap_err();
        assert!(
            matches!(err, AppError::Validation { ref field, .. } if field == "origin.latitude")
        );
    }

    #[test]
    fn test_rejects_non_positive_distance() {
        let mut req = request();
        req.distance_km = 0.0;
        assert!(req.validate().is_err());

        let mut req = request();
        req.duration_hours = f64::NAN;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_rejects_implausibly_large_quantities() {
        let mut req = request();
        req.duration_hours = 1e28;
        let err = req.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "duration_hours"));

        let mut req = request();
        req.distance_km = MAX_DISTANCE_KM * 2.0;
        let err = req.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "distance_km"));

        let mut req = request();
        req.empty_driving.distance_km = f64::MAX;
        let err = req.validate().unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation { ref field, .. } if field == "empty_driving.distance_km"
        ));
    }

    #[test]
    fn test_rejects_segments_longer_than_route() {
        let mut req = request();
        req.country_segments.push(CountrySegment {
            country_code: "FR".to_string(),
            distance_km: 10.0,
        });
        let err = req.validate().unwrap_err();
        assert!(
            matches!(err, AppError::Validation { ref field, .. } if field == "country_segments")
        );
    }

    #[test]
    fn test_into_route_normalizes_and_checks_feasibility() {
        let route = request().into_route();
        assert_eq!(route.country_segments[0].country_code, "DE");
        assert!(route.is_feasible);

        let mut req = request();
        req.duration_hours = 13.0;
        assert!(!req.into_route().is_feasible);
    }
}
