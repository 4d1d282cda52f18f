//! PageSpeed Insights client.
//!
//! [`PageSpeedClient::analyze`] never fails: a missing website yields
//! [`PageSpeedResult::no_website`] and any API failure yields
//! [`PageSpeedResult::estimated`].

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;
use tablerank_core::config::DEFAULT_PAGESPEED_BASE_URL;
use tablerank_core::{AppConfig, PageSpeedMetrics, PageSpeedResult, PageSpeedSource};

use crate::error::PlacesError;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpeedResponse {
    #[serde(default)]
    pub lighthouse_result: Option<LighthouseResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LighthouseResult {
    #[serde(default)]
    pub audits: HashMap<String, LighthouseAudit>,
    #[serde(default)]
    pub categories: LighthouseCategories,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LighthouseAudit {
    #[serde(default)]
    pub numeric_value: Option<f64>,
    #[serde(default)]
    pub display_value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LighthouseCategories {
    #[serde(default)]
    pub performance: Option<LighthouseCategory>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LighthouseCategory {
    /// 0.0-1.0.
    #[serde(default)]
    pub score: Option<f64>,
}

/// Raw audit value: the numeric value, else the digits of the display value,
/// else 0.
fn audit_value(audits: &HashMap<String, LighthouseAudit>, key: &str) -> f64 {
    let Some(audit) = audits.get(key) else {
        return 0.0;
    };
    if let Some(v) = audit.numeric_value.filter(|v| v.is_finite() && *v != 0.0) {
        return v;
    }
    audit
        .display_value
        .as_deref()
        .map(|d| {
            d.chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect::<String>()
        })
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn ms_to_secs(ms: f64) -> f64 {
    (ms / 100.0).round() / 10.0
}

/// Maps a Lighthouse report onto a measured [`PageSpeedResult`]. Load time is
/// the largest contentful paint, or the speed index when LCP is missing.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn result_from_lighthouse(
    response: &PageSpeedResponse,
    url: &str,
    analyzed_at: DateTime<Utc>,
) -> PageSpeedResult {
    let empty = LighthouseResult::default();
    let lighthouse = response.lighthouse_result.as_ref().unwrap_or(&empty);
    let audits = &lighthouse.audits;

    let lcp = audit_value(audits, "largest-contentful-paint");
    let speed_index = audit_value(audits, "speed-index");
    let load_time_ms = if lcp > 0.0 { lcp } else { speed_index };

    let score = lighthouse
        .categories
        .performance
        .as_ref()
        .and_then(|p| p.score)
        .filter(|s| s.is_finite())
        .map_or(0, |s| (s * 100.0).round().clamp(0.0, 100.0) as u8);

    PageSpeedResult {
        score,
        load_time_secs: ms_to_secs(load_time_ms),
        metrics: PageSpeedMetrics {
            first_contentful_paint: ms_to_secs(audit_value(audits, "first-contentful-paint")),
            largest_contentful_paint: ms_to_secs(lcp),
            cumulative_layout_shift: (audit_value(audits, "cumulative-layout-shift") * 100.0)
                .round()
                / 100.0,
            total_blocking_time: ms_to_secs(audit_value(audits, "total-blocking-time")),
            speed_index: ms_to_secs(speed_index),
            time_to_interactive: ms_to_secs(audit_value(audits, "interactive")),
        },
        source: PageSpeedSource::Measured,
        url: Some(url.to_owned()),
        analyzed_at: Some(analyzed_at),
    }
}

/// Adds `https://` when the scheme is missing.
#[must_use]
pub fn normalize_url(website: &str) -> String {
    let trimmed = website.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_owned()
    } else {
        format!("https://{trimmed}")
    }
}

/// Client for the PageSpeed Insights `runPagespeed` endpoint.
#[derive(Debug, Clone)]
pub struct PageSpeedClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl PageSpeedClient {
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_PAGESPEED_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`PlacesError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let parsed = Url::parse(base_url).map_err(|e| PlacesError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("tablerank/0.1 (restaurant-audit)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
        })
    }

    /// # Errors
    ///
    /// See [`PageSpeedClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Self::with_base_url(
            &config.places_api_key,
            config.pagespeed_timeout_secs,
            &config.pagespeed_base_url,
        )
    }

    fn build_url(&self, target: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("url", target)
            .append_pair("key", &self.api_key)
            .append_pair("category", "performance")
            .append_pair("strategy", "mobile");
        url
    }

    /// Mobile performance analysis of `website`.
    pub async fn analyze(&self, website: Option<&str>) -> PageSpeedResult {
        let Some(website) = website.filter(|w| !w.trim().is_empty()) else {
            return PageSpeedResult::no_website();
        };
        let target = normalize_url(website);
        tracing::info!(url = %target, "running PageSpeed analysis");

        match self.fetch(&target).await {
            Ok(response) => {
                let result = result_from_lighthouse(&response, &target, Utc::now());
                tracing::info!(
                    url = %target,
                    score = result.score,
                    load_time_secs = result.load_time_secs,
                    "PageSpeed analysis complete"
                );
                result
            }
            Err(err) => {
                tracing::warn!(url = %target, error = %err, "PageSpeed analysis failed, using estimate");
                PageSpeedResult::estimated(target)
            }
        }
    }

    async fn fetch(&self, target: &str) -> Result<PageSpeedResponse, PlacesError> {
        let url = self.build_url(target);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }
        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: format!("runPagespeed({target})"),
            source: e,
        })
    }
}
