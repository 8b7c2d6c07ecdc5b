pub mod cargo;
pub mod dashboard;
pub mod health;
pub mod offers;
pub mod routes;
pub mod settings;
pub mod transport;

use serde::Deserialize;
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::pricing::{CostSettingsService, FunFactGenerator, QuoteService};
use crate::store::Store;

const DEFAULT_PAGE_SIZE: u32 = 50;

/// Shared state for every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Store,
    pub settings: Arc<CostSettingsService>,
    pub quotes: Arc<QuoteService>,
}

impl AppState {
    pub async fn new(
        config: Config,
        store: Store,
        fun_facts: Arc<dyn FunFactGenerator>,
    ) -> Result<Self, AppError> {
        let settings = Arc::new(CostSettingsService::load(store.clone()).await?);
        let quotes = Arc::new(QuoteService::new(store.clone(), settings.clone(), fun_facts));

        Ok(Self {
            config: Arc::new(config),
            store,
            settings,
            quotes,
        })
    }

    fn page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, self.config.pricing.max_page_size)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}
