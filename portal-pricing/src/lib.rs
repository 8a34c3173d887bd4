pub mod app_config;
pub mod engine;

pub use app_config::Config;
pub use engine::{
    builtin_brand_table, EngineOptions, OverridePrecedence, PricingEngine, EXTRA_DISCOUNT_POINTS,
};
