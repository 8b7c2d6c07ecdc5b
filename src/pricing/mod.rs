pub mod calculator;
pub mod fun_facts;
pub mod models;
pub mod offer;
pub mod quote;
pub mod service;
pub mod tolls;

pub use calculator::{CostCalculator, CostInputs};
pub use fun_facts::{FixedFunFact, FunFactGenerator, TemplateFunFacts};
pub use models::{CostBreakdown, CostSettings, CostSettingsUpdate};
pub use offer::{Margin, OfferBuilder};
pub use quote::QuoteService;
pub use service::CostSettingsService;
pub use tolls::{get_toll_rate, is_toll_road};
