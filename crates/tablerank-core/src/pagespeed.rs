use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Load time assumed for a restaurant that has no website at all.
pub const NO_WEBSITE_LOAD_TIME_SECS: f64 = 5.0;

const ESTIMATED_SCORE: u8 = 65;
const ESTIMATED_LOAD_TIME_SECS: f64 = 3.5;

/// Lighthouse timings in seconds (layout shift is unitless).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageSpeedMetrics {
    pub first_contentful_paint: f64,
    pub largest_contentful_paint: f64,
    pub cumulative_layout_shift: f64,
    pub total_blocking_time: f64,
    pub speed_index: f64,
    pub time_to_interactive: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSpeedSource {
    /// Measured by PageSpeed Insights.
    Measured,
    /// The analysis failed; figures are typical averages.
    Estimated,
    NoWebsite,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSpeedResult {
    /// Lighthouse performance score, 0-100.
    pub score: u8,
    pub load_time_secs: f64,
    pub metrics: PageSpeedMetrics,
    pub source: PageSpeedSource,
    pub url: Option<String>,
    pub analyzed_at: Option<DateTime<Utc>>,
}

impl PageSpeedResult {
    #[must_use]
    pub fn no_website() -> Self {
        Self {
            score: 0,
            load_time_secs: NO_WEBSITE_LOAD_TIME_SECS,
            metrics: PageSpeedMetrics::default(),
            source: PageSpeedSource::NoWebsite,
            url: None,
            analyzed_at: None,
        }
    }

    /// Average-site figures used when the measurement could not be taken.
    #[must_use]
    pub fn estimated(url: impl Into<String>) -> Self {
        Self {
            score: ESTIMATED_SCORE,
            load_time_secs: ESTIMATED_LOAD_TIME_SECS,
            metrics: PageSpeedMetrics {
                first_contentful_paint: 1.8,
                largest_contentful_paint: 2.8,
                cumulative_layout_shift: 0.15,
                total_blocking_time: 0.3,
                speed_index: 3.0,
                time_to_interactive: 3.5,
            },
            source: PageSpeedSource::Estimated,
            url: Some(url.into()),
            analyzed_at: None,
        }
    }

    #[must_use]
    pub fn has_website(&self) -> bool {
        self.source != PageSpeedSource::NoWebsite
    }
}
