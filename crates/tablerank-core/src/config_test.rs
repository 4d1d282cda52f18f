use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated with valid values.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("GOOGLE_PLACES_API_KEY", "test-places-key");
    m
}

#[test]
fn parse_environment_development() {
    assert_eq!(parse_environment("development"), Environment::Development);
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test"), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(parse_environment("production"), Environment::Production);
}

#[test]
fn parse_environment_unknown_falls_back_to_development() {
    assert_eq!(parse_environment("staging"), Environment::Development);
}

#[test]
fn build_app_config_fails_without_places_api_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GOOGLE_PLACES_API_KEY"),
        "expected MissingEnvVar(GOOGLE_PLACES_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_blank_places_api_key() {
    let mut map = full_env();
    map.insert("GOOGLE_PLACES_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "GOOGLE_PLACES_API_KEY"),
        "expected MissingEnvVar(GOOGLE_PLACES_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_succeeds_with_all_required_vars() {
    let map = full_env();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.places_api_key, "test-places-key");
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3001");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.places_base_url, DEFAULT_PLACES_BASE_URL);
    assert_eq!(cfg.pagespeed_base_url, DEFAULT_PAGESPEED_BASE_URL);
    assert_eq!(cfg.request_timeout_secs, 10);
    assert_eq!(cfg.pagespeed_timeout_secs, 30);
    assert_eq!(cfg.max_retries, 2);
    assert_eq!(cfg.retry_backoff_base_ms, 500);
    assert_eq!(cfg.cache_ttl_hours, 24);
    assert_eq!(cfg.rate_limit_per_hour, 1000);
    assert_eq!(cfg.competitor_radius_m, 1000);
    assert_eq!(cfg.max_competitors, 5);
    assert!((cfg.average_order_value - 28.0).abs() < f64::EPSILON);
    assert!((cfg.conversion_rate - 0.03).abs() < f64::EPSILON);
    assert_eq!(cfg.monthly_visitors, 1000);
    assert!(cfg.weights_path.is_none());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = full_env();
    map.insert("TABLERANK_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TABLERANK_BIND_ADDR"),
        "expected InvalidEnvVar(TABLERANK_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_rate_limit_override() {
    let mut map = full_env();
    map.insert("TABLERANK_RATE_LIMIT_PER_HOUR", "60");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.rate_limit_per_hour, 60);
}

#[test]
fn build_app_config_rate_limit_invalid() {
    let mut map = full_env();
    map.insert("TABLERANK_RATE_LIMIT_PER_HOUR", "lots");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TABLERANK_RATE_LIMIT_PER_HOUR"),
        "expected InvalidEnvVar(TABLERANK_RATE_LIMIT_PER_HOUR), got: {result:?}"
    );
}

#[test]
fn build_app_config_max_retries_override() {
    let mut map = full_env();
    map.insert("TABLERANK_MAX_RETRIES", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_retries, 0);
}

#[test]
fn build_app_config_cache_ttl_invalid() {
    let mut map = full_env();
    map.insert("TABLERANK_CACHE_TTL_HOURS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "TABLERANK_CACHE_TTL_HOURS"),
        "expected InvalidEnvVar(TABLERANK_CACHE_TTL_HOURS), got: {result:?}"
    );
}

#[test]
fn build_app_config_revenue_defaults_override() {
    let mut map = full_env();
    map.insert("DEFAULT_AOV", "42.5");
    map.insert("DEFAULT_CONVERSION_RATE", "0.05");
    map.insert("DEFAULT_MONTHLY_VISITORS", "2500");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!((cfg.average_order_value - 42.5).abs() < f64::EPSILON);
    assert!((cfg.conversion_rate - 0.05).abs() < f64::EPSILON);
    assert_eq!(cfg.monthly_visitors, 2500);
}

#[test]
fn build_app_config_rejects_conversion_rate_above_one() {
    let mut map = full_env();
    map.insert("DEFAULT_CONVERSION_RATE", "1.5");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "DEFAULT_CONVERSION_RATE"),
        "expected InvalidEnvVar(DEFAULT_CONVERSION_RATE), got: {result:?}"
    );
}

#[test]
fn build_app_config_reads_weights_path() {
    let mut map = full_env();
    map.insert("TABLERANK_WEIGHTS_PATH", "./config/weights.yaml");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(
        cfg.weights_path.as_deref(),
        Some(std::path::Path::new("./config/weights.yaml"))
    );
}

#[test]
fn build_app_config_production_env() {
    let mut map = full_env();
    map.insert("TABLERANK_ENV", "production");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.env.to_string(), "production");
}

#[test]
fn app_config_debug_redacts_api_key() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("test-places-key"));
    assert!(rendered.contains("[redacted]"));
}
