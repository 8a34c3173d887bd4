use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use crate::engine::EngineOptions;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub pricing: EngineOptions,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StoreConfig {
    /// Path of the JSON settings file. Unset keeps settings in memory.
    pub path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Layered files, all optional: base, per-environment, local
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            // Environment wins, e.g. PORTAL__PRICING__CLAMP_PERCENTAGE=true
            .add_source(config::Environment::with_prefix("PORTAL").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
