use arc_swap::ArcSwap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::error::AppError;
use crate::pricing::models::{CostSettings, CostSettingsUpdate};
use crate::store::Store;

/// Owns the cost settings in effect.
///
/// Readers take an `Arc` snapshot and keep it for the whole calculation;
/// an update swaps in a new snapshot without touching the old one.
pub struct CostSettingsService {
    store: Store,
    active: ArcSwap<CostSettings>,
    /// Serializes updates so versions are assigned in order
    update_lock: Mutex<()>,
}

impl CostSettingsService {
    /// Load the newest persisted settings version
    pub async fn load(store: Store) -> Result<Self, AppError> {
        let settings = store.get_active_cost_settings().await?;
        info!(
            version = settings.version,
            currency = %settings.currency,
            "Loaded cost settings"
        );

        Ok(Self {
            store,
            active: ArcSwap::from_pointee(settings),
            update_lock: Mutex::new(()),
        })
    }

    pub fn current(&self) -> Arc<CostSettings> {
        self.active.load_full()
    }

    /// Validate, persist as a new version, then make it the active settings
    pub async fn update(&self, update: CostSettingsUpdate) -> Result<Arc<CostSettings>, AppError> {
        let update = update.validate()?;

        let _guard = self.update_lock.lock().await;
        let previous = self.active.load().version;
        let settings = Arc::new(self.store.insert_cost_settings(update).await?);
        self.active.store(settings.clone());

        info!(
            previous_version = previous,
            version = settings.version,
            fuel_price_per_liter = %settings.fuel_price_per_liter,
            driver_daily_salary = %settings.driver_daily_salary,
            toll_overrides = settings.toll_rates.len(),
            "Cost settings updated"
        );

        Ok(settings)
    }

    pub async fn history(&self, limit: u32) -> Result<Vec<CostSettings>, AppError> {
        self.store.list_cost_settings(limit).await
    }
}
