use super::Store;
use crate::error::AppError;
use crate::models::TransportType;

const TRANSPORT_COLUMNS: &str = "id, name, vehicle_class, capacity, emissions_class, \
                                 fuel_consumption_empty, fuel_consumption_loaded";

impl Store {
    pub async fn get_transport_type(&self, id: &str) -> Result<Option<TransportType>, AppError> {
        let transport = sqlx::query_as::<_, TransportType>(&format!(
            "SELECT {TRANSPORT_COLUMNS} FROM transport_types WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(transport)
    }

    pub async fn list_transport_types(&self) -> Result<Vec<TransportType>, AppError> {
        let transports = sqlx::query_as::<_, TransportType>(&format!(
            "SELECT {TRANSPORT_COLUMNS} FROM transport_types ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(transports)
    }
}
