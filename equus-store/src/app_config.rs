use equus_booking::{BookingPolicy, OnSiteMarkers, RuleEngine, ValidationRule};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Without a database the service runs on the in-memory store
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// JSON file the in-memory catalog is filled from
    pub seed_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Benefit-name fragments that mark an on-site visit
    #[serde(default)]
    pub on_site_markers: Vec<String>,
}

fn default_currency() -> String {
    "SAR".to_string()
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            on_site_markers: Vec::new(),
        }
    }
}

impl BookingConfig {
    pub fn markers(&self) -> OnSiteMarkers {
        if self.on_site_markers.is_empty() {
            OnSiteMarkers::default()
        } else {
            OnSiteMarkers::new(&self.on_site_markers)
        }
    }

    pub fn policy(&self, rules: Vec<ValidationRule>) -> BookingPolicy {
        BookingPolicy::new(RuleEngine::new(rules, self.markers()), self.currency.clone())
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `EQUUS__DATABASE__URL=postgres://...`
            .add_source(config::Environment::with_prefix("EQUUS").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
