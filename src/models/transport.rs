use serde::{Deserialize, Serialize};

/// A vehicle profile from the transport catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TransportType {
    pub id: String,
    pub name: String,
    /// Toll class used for rate lookup (truck, van, trailer)
    pub vehicle_class: String,
    /// Payload capacity in kilograms
    pub capacity: f64,
    pub emissions_class: String,
    /// Litres per km when driving without cargo
    pub fuel_consumption_empty: f64,
    /// Litres per km when loaded
    pub fuel_consumption_loaded: f64,
}
