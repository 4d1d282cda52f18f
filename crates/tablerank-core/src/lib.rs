//! Shared domain types and configuration for tablerank.

pub mod app_config;
pub mod config;
pub mod geo;
pub mod pagespeed;
pub mod restaurant;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::haversine_km;
pub use pagespeed::{PageSpeedMetrics, PageSpeedResult, PageSpeedSource};
pub use restaurant::{
    is_fresh, Competitor, LatLng, OpeningHours, OwnerResponse, Photo, Restaurant, Review,
    FRESHNESS_WINDOW_HOURS,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
