use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_PLACES_BASE_URL: &str = "https://places.googleapis.com/v1";
pub const DEFAULT_PAGESPEED_BASE_URL: &str =
    "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;
    use std::str::FromStr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    fn parse_value<T>(var: &str, raw: &str) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    }

    let places_api_key = require("GOOGLE_PLACES_API_KEY")?;

    let env = parse_environment(&or_default("TABLERANK_ENV", "development"));
    let bind_addr: SocketAddr = parse_value(
        "TABLERANK_BIND_ADDR",
        &or_default("TABLERANK_BIND_ADDR", "0.0.0.0:3001"),
    )?;
    let log_level = or_default("TABLERANK_LOG_LEVEL", "info");

    let places_base_url = or_default("TABLERANK_PLACES_BASE_URL", DEFAULT_PLACES_BASE_URL);
    let pagespeed_base_url =
        or_default("TABLERANK_PAGESPEED_BASE_URL", DEFAULT_PAGESPEED_BASE_URL);

    let request_timeout_secs: u64 = parse_value(
        "TABLERANK_REQUEST_TIMEOUT_SECS",
        &or_default("TABLERANK_REQUEST_TIMEOUT_SECS", "10"),
    )?;
    let pagespeed_timeout_secs: u64 = parse_value(
        "TABLERANK_PAGESPEED_TIMEOUT_SECS",
        &or_default("TABLERANK_PAGESPEED_TIMEOUT_SECS", "30"),
    )?;
    let max_retries: u32 = parse_value(
        "TABLERANK_MAX_RETRIES",
        &or_default("TABLERANK_MAX_RETRIES", "2"),
    )?;
    let retry_backoff_base_ms: u64 = parse_value(
        "TABLERANK_RETRY_BACKOFF_BASE_MS",
        &or_default("TABLERANK_RETRY_BACKOFF_BASE_MS", "500"),
    )?;
    let cache_ttl_hours: u64 = parse_value(
        "TABLERANK_CACHE_TTL_HOURS",
        &or_default("TABLERANK_CACHE_TTL_HOURS", "24"),
    )?;
    let rate_limit_per_hour: usize = parse_value(
        "TABLERANK_RATE_LIMIT_PER_HOUR",
        &or_default("TABLERANK_RATE_LIMIT_PER_HOUR", "1000"),
    )?;
    let competitor_radius_m: u32 = parse_value(
        "TABLERANK_COMPETITOR_RADIUS_M",
        &or_default("TABLERANK_COMPETITOR_RADIUS_M", "1000"),
    )?;
    let max_competitors: usize = parse_value(
        "TABLERANK_MAX_COMPETITORS",
        &or_default("TABLERANK_MAX_COMPETITORS", "5"),
    )?;

    let average_order_value: f64 =
        parse_value("DEFAULT_AOV", &or_default("DEFAULT_AOV", "28"))?;
    let conversion_rate: f64 = parse_value(
        "DEFAULT_CONVERSION_RATE",
        &or_default("DEFAULT_CONVERSION_RATE", "0.03"),
    )?;
    let monthly_visitors: u32 = parse_value(
        "DEFAULT_MONTHLY_VISITORS",
        &or_default("DEFAULT_MONTHLY_VISITORS", "1000"),
    )?;

    if !(0.0..=1.0).contains(&conversion_rate) {
        return Err(ConfigError::InvalidEnvVar {
            var: "DEFAULT_CONVERSION_RATE".to_string(),
            reason: format!("{conversion_rate} is outside 0.0..=1.0"),
        });
    }

    let weights_path = lookup("TABLERANK_WEIGHTS_PATH")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        places_api_key,
        places_base_url,
        pagespeed_base_url,
        request_timeout_secs,
        pagespeed_timeout_secs,
        max_retries,
        retry_backoff_base_ms,
        cache_ttl_hours,
        rate_limit_per_hour,
        competitor_radius_m,
        max_competitors,
        average_order_value,
        conversion_rate,
        monthly_visitors,
        weights_path,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
