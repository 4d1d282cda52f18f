use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub places_api_key: String,
    pub places_base_url: String,
    pub pagespeed_base_url: String,
    pub request_timeout_secs: u64,
    pub pagespeed_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    pub cache_ttl_hours: u64,
    pub rate_limit_per_hour: usize,
    pub competitor_radius_m: u32,
    pub max_competitors: usize,
    pub average_order_value: f64,
    pub conversion_rate: f64,
    pub monthly_visitors: u32,
    /// Optional YAML file overriding the default ranking weights.
    pub weights_path: Option<PathBuf>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("places_api_key", &"[redacted]")
            .field("places_base_url", &self.places_base_url)
            .field("pagespeed_base_url", &self.pagespeed_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("pagespeed_timeout_secs", &self.pagespeed_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("cache_ttl_hours", &self.cache_ttl_hours)
            .field("rate_limit_per_hour", &self.rate_limit_per_hour)
            .field("competitor_radius_m", &self.competitor_radius_m)
            .field("max_competitors", &self.max_competitors)
            .field("average_order_value", &self.average_order_value)
            .field("conversion_rate", &self.conversion_rate)
            .field("monthly_visitors", &self.monthly_visitors)
            .field("weights_path", &self.weights_path)
            .finish()
    }
}
