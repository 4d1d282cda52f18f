//! Visitor estimates derived from public listing signals.

use serde::{Deserialize, Serialize};
use tablerank_core::Restaurant;

const DEFAULT_BASE_MONTHLY_VISITORS: f64 = 800.0;
const VIEWS_PER_REVIEW: f64 = 75.0;
const WEEKS_PER_MONTH: f64 = 4.33;

const HIGH_TRAFFIC_TYPES: &[&str] = &[
    "fast_food_restaurant",
    "coffee_shop",
    "cafe",
    "pizza_restaurant",
    "sandwich_shop",
];
const MEDIUM_TRAFFIC_TYPES: &[&str] = &[
    "american_restaurant",
    "mexican_restaurant",
    "chinese_restaurant",
    "italian_restaurant",
];
const LOW_VOLUME_TYPES: &[&str] = &["fine_dining_restaurant", "steak_house"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
    VeryLow,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrafficFactors {
    pub rating: f64,
    pub review_volume: f64,
    pub price_level: f64,
    pub restaurant_type: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficEstimate {
    pub monthly: u32,
    pub weekly: u32,
    pub daily: u32,
    pub factors: TrafficFactors,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficDirection {
    New,
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficTrend {
    pub change: i64,
    pub change_percent: f64,
    pub trend: TrafficDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoImpact {
    pub visitors: i64,
    pub percentage: f64,
    pub score_change: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
    VeryWeak,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub coefficient: f64,
    pub strength: CorrelationStrength,
}

#[must_use]
pub fn rating_factor(rating: f64) -> f64 {
    if rating >= 4.5 {
        1.5
    } else if rating >= 4.0 {
        1.2
    } else if rating >= 3.5 {
        1.0
    } else if rating >= 3.0 {
        0.8
    } else {
        0.6
    }
}

#[must_use]
pub fn review_volume_factor(total_ratings: u32) -> f64 {
    match total_ratings {
        n if n >= 500 => 2.0,
        n if n >= 200 => 1.7,
        n if n >= 100 => 1.4,
        n if n >= 50 => 1.2,
        n if n >= 25 => 1.0,
        _ => 0.8,
    }
}

/// Cheaper places see more covers.
#[must_use]
pub fn price_level_factor(price_level: u8) -> f64 {
    match price_level {
        0 => 1.3,
        1 => 1.4,
        3 => 0.8,
        4 => 0.6,
        _ => 1.0,
    }
}

#[must_use]
pub fn restaurant_type_factor<S: AsRef<str>>(types: &[S]) -> f64 {
    let has_any = |list: &[&str]| types.iter().any(|t| list.contains(&t.as_ref()));
    if has_any(HIGH_TRAFFIC_TYPES) {
        1.3
    } else if has_any(MEDIUM_TRAFFIC_TYPES) {
        1.1
    } else if has_any(LOW_VOLUME_TYPES) {
        0.7
    } else {
        1.0
    }
}

#[must_use]
pub fn confidence(total_ratings: u32) -> Confidence {
    match total_ratings {
        n if n >= 100 => Confidence::High,
        n if n >= 50 => Confidence::Medium,
        n if n >= 25 => Confidence::Low,
        _ => Confidence::VeryLow,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_u32(v: f64) -> u32 {
    v.round().clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Estimates traffic from rating, review volume, price level and cuisine.
#[derive(Debug, Clone, Copy)]
pub struct TrafficEstimator {
    base_monthly_visitors: f64,
}

impl Default for TrafficEstimator {
    fn default() -> Self {
        Self {
            base_monthly_visitors: DEFAULT_BASE_MONTHLY_VISITORS,
        }
    }
}

impl TrafficEstimator {
    #[must_use]
    pub fn with_base(base_monthly_visitors: f64) -> Self {
        Self {
            base_monthly_visitors,
        }
    }

    #[must_use]
    pub fn estimate_monthly_visitors(&self, restaurant: &Restaurant) -> TrafficEstimate {
        let factors = TrafficFactors {
            rating: rating_factor(restaurant.rating),
            review_volume: review_volume_factor(restaurant.total_ratings),
            price_level: price_level_factor(restaurant.price_level),
            restaurant_type: restaurant_type_factor(&restaurant.types),
        };
        let monthly = self.base_monthly_visitors
            * factors.rating
            * factors.review_volume
            * factors.price_level
            * factors.restaurant_type;
        let monthly = monthly.round();

        tracing::debug!(
            restaurant = %restaurant.name,
            rating_factor = factors.rating,
            review_factor = factors.review_volume,
            price_factor = factors.price_level,
            type_factor = factors.restaurant_type,
            monthly,
            "traffic estimated"
        );

        TrafficEstimate {
            monthly: round_u32(monthly),
            weekly: round_u32(monthly / WEEKS_PER_MONTH),
            daily: round_u32(monthly / 30.0),
            factors,
            confidence: confidence(restaurant.total_ratings),
        }
    }

    /// Monthly search impressions, assuming about 75 listing views per review.
    #[must_use]
    pub fn search_impressions(&self, restaurant: &Restaurant) -> u32 {
        let boost = if restaurant.rating >= 4.5 {
            1.3
        } else if restaurant.rating >= 4.0 {
            1.1
        } else {
            1.0
        };
        round_u32(f64::from(restaurant.total_ratings) * VIEWS_PER_REVIEW * boost)
    }

    /// Expected click-through rate in percent (one decimal) for a result at
    /// `rank`.
    #[must_use]
    pub fn estimate_ctr(&self, rating: f64, rank: usize) -> f64 {
        let base: f64 = match rank {
            1 => 0.284,
            2 => 0.153,
            3 => 0.098,
            4 => 0.067,
            5 => 0.048,
            _ => 0.03,
        };
        let modifier: f64 = if rating >= 4.5 {
            1.2
        } else if rating >= 4.0 {
            1.0
        } else if rating >= 3.5 {
            0.85
        } else {
            0.7
        };
        (base * modifier * 1000.0).round() / 10.0
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn traffic_trend(&self, current: u32, previous: Option<u32>) -> TrafficTrend {
        let Some(previous) = previous.filter(|p| *p > 0) else {
            return TrafficTrend {
                change: 0,
                change_percent: 0.0,
                trend: TrafficDirection::New,
            };
        };
        let change = i64::from(current) - i64::from(previous);
        let pct = (f64::from(current) - f64::from(previous)) / f64::from(previous) * 100.0;
        let trend = if pct > 5.0 {
            TrafficDirection::Up
        } else if pct < -5.0 {
            TrafficDirection::Down
        } else {
            TrafficDirection::Stable
        };
        TrafficTrend {
            change,
            change_percent: (pct * 10.0).round() / 10.0,
            trend,
        }
    }

    /// Visitors gained or lost from an SEO score change, at 1 % per point.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn seo_impact(&self, current_score: f64, previous_score: Option<f64>, traffic: u32) -> SeoImpact {
        let Some(previous) = previous_score.filter(|p| *p != 0.0) else {
            return SeoImpact {
                visitors: 0,
                percentage: 0.0,
                score_change: 0.0,
            };
        };
        let diff = current_score - previous;
        SeoImpact {
            visitors: (f64::from(traffic) * diff / 100.0).round() as i64,
            percentage: (diff * 10.0).round() / 10.0,
            score_change: diff,
        }
    }

    /// Pearson correlation between overall score and estimated visitors over
    /// `(score, visitors)` history points.
    #[must_use]
    pub fn correlation(&self, history: &[(f64, f64)]) -> Correlation {
        if history.len() < 3 {
            return Correlation {
                coefficient: 0.0,
                strength: CorrelationStrength::InsufficientData,
            };
        }
        let r = pearson(history);
        Correlation {
            coefficient: (r * 100.0).round() / 100.0,
            strength: correlation_strength(r),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn pearson(points: &[(f64, f64)]) -> f64 {
    let n = points.len() as f64;
    let (mut sx, mut sy, mut sxy, mut sx2, mut sy2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for &(x, y) in points {
        sx += x;
        sy += y;
        sxy += x * y;
        sx2 += x * x;
        sy2 += y * y;
    }
    let numerator = n * sxy - sx * sy;
    let denominator = ((n * sx2 - sx * sx) * (n * sy2 - sy * sy)).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        numerator / denominator
    }
}

#[must_use]
pub fn correlation_strength(coefficient: f64) -> CorrelationStrength {
    match coefficient.abs() {
        a if a >= 0.8 => CorrelationStrength::VeryStrong,
        a if a >= 0.6 => CorrelationStrength::Strong,
        a if a >= 0.4 => CorrelationStrength::Moderate,
        a if a >= 0.2 => CorrelationStrength::Weak,
        _ => CorrelationStrength::VeryWeak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pizzeria() -> Restaurant {
        let mut r = Restaurant::new("p", "Slice");
        r.rating = 4.6;
        r.total_ratings = 250;
        r.price_level = 1;
        r.types = vec!["pizza_restaurant".to_string(), "restaurant".to_string()];
        r
    }

    #[test]
    fn monthly_estimate_multiplies_factors() {
        let e = TrafficEstimator::default().estimate_monthly_visitors(&pizzeria());
        // 800 * 1.5 * 1.7 * 1.4 * 1.3
        assert_eq!(e.monthly, 3713);
        assert_eq!(e.weekly, 858);
        assert_eq!(e.daily, 124);
        assert_eq!(e.confidence, Confidence::High);
    }

    #[test]
    fn unknown_listing_uses_low_factors() {
        let e = TrafficEstimator::default().estimate_monthly_visitors(&Restaurant::new("x", "X"));
        // 800 * 0.6 * 0.8 * 1.3 * 1.0
        assert_eq!(e.monthly, 499);
        assert_eq!(e.confidence, Confidence::VeryLow);
    }

    #[test]
    fn type_factor_prefers_high_traffic() {
        assert!((restaurant_type_factor(&["steak_house", "cafe"]) - 1.3).abs() < f64::EPSILON);
        assert!((restaurant_type_factor(&["steak_house"]) - 0.7).abs() < f64::EPSILON);
        let none: [&str; 0] = [];
        assert!((restaurant_type_factor(&none) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn impressions_include_rating_boost() {
        let est = TrafficEstimator::default();
        assert_eq!(est.search_impressions(&pizzeria()), 24_375);
    }

    #[test]
    fn ctr_by_position() {
        let est = TrafficEstimator::default();
        assert!((est.estimate_ctr(4.6, 1) - 34.1).abs() < 1e-9);
        assert!((est.estimate_ctr(4.0, 3) - 9.8).abs() < 1e-9);
        assert!((est.estimate_ctr(3.0, 12) - 2.1).abs() < 1e-9);
    }

    #[test]
    fn trend_uses_five_percent_band() {
        let est = TrafficEstimator::default();
        assert_eq!(est.traffic_trend(1000, None).trend, TrafficDirection::New);
        assert_eq!(est.traffic_trend(1040, Some(1000)).trend, TrafficDirection::Stable);
        let up = est.traffic_trend(1100, Some(1000));
        assert_eq!(up.trend, TrafficDirection::Up);
        assert_eq!(up.change, 100);
        assert!((up.change_percent - 10.0).abs() < 1e-9);
        assert_eq!(est.traffic_trend(800, Some(1000)).trend, TrafficDirection::Down);
    }

    #[test]
    fn seo_impact_is_one_percent_per_point() {
        let impact = TrafficEstimator::default().seo_impact(70.0, Some(60.0), 2000);
        assert_eq!(impact.visitors, 200);
        assert!((impact.percentage - 10.0).abs() < 1e-9);
        assert_eq!(
            TrafficEstimator::default().seo_impact(70.0, None, 2000).visitors,
            0
        );
    }

    #[test]
    fn correlation_needs_three_points() {
        let est = TrafficEstimator::default();
        let c = est.correlation(&[(50.0, 900.0), (60.0, 1000.0)]);
        assert_eq!(c.strength, CorrelationStrength::InsufficientData);
    }

    #[test]
    fn perfectly_linear_history_is_very_strong() {
        let est = TrafficEstimator::default();
        let c = est.correlation(&[(50.0, 900.0), (60.0, 1000.0), (70.0, 1100.0)]);
        assert!((c.coefficient - 1.0).abs() < 1e-9);
        assert_eq!(c.strength, CorrelationStrength::VeryStrong);
    }

    #[test]
    fn flat_history_has_zero_correlation() {
        let est = TrafficEstimator::default();
        let c = est.correlation(&[(50.0, 900.0), (50.0, 1000.0), (50.0, 1100.0)]);
        assert!(c.coefficient.abs() < f64::EPSILON);
        assert_eq!(c.strength, CorrelationStrength::VeryWeak);
    }
}
