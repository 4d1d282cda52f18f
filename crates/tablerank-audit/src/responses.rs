//! How quickly and how often an owner answers reviews.

use serde::{Deserialize, Serialize};
use tablerank_core::Review;

/// Response delays at or beyond a year are treated as bad timestamps.
const MAX_RESPONSE_HOURS: f64 = 8760.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponseBreakdown {
    /// Answered within a day.
    pub fast: usize,
    /// Between one and three days.
    pub medium: usize,
    pub slow: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseAnalysis {
    pub score: u8,
    /// Mean hours from review to owner response, rounded.
    pub avg_response_hours: f64,
    /// Fraction of reviews with an owner response, two decimals.
    pub response_rate: f64,
    pub total_reviews: usize,
    pub responded_reviews: usize,
    pub has_data: bool,
    pub breakdown: ResponseBreakdown,
    pub message: String,
}

fn rate_penalty(rate: f64) -> i32 {
    if rate == 0.0 {
        50
    } else if rate < 0.3 {
        40
    } else if rate < 0.5 {
        30
    } else if rate < 0.7 {
        20
    } else if rate < 0.9 {
        10
    } else {
        0
    }
}

fn time_penalty(avg_hours: f64) -> i32 {
    if avg_hours <= 0.0 {
        0
    } else if avg_hours > 168.0 {
        40
    } else if avg_hours > 72.0 {
        30
    } else if avg_hours > 48.0 {
        20
    } else if avg_hours > 24.0 {
        10
    } else if avg_hours > 12.0 {
        5
    } else {
        0
    }
}

#[allow(clippy::cast_precision_loss)]
fn response_hours(review: &Review) -> Option<f64> {
    let published = review.publish_time?;
    let answered = review.owner_response.as_ref()?.publish_time?;
    let hours = answered.signed_duration_since(published).num_seconds() as f64 / 3600.0;
    (0.0..MAX_RESPONSE_HOURS).contains(&hours).then_some(hours)
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn analyze_response_time(reviews: &[Review]) -> ResponseAnalysis {
    if reviews.is_empty() {
        return ResponseAnalysis {
            score: 0,
            avg_response_hours: 0.0,
            response_rate: 0.0,
            total_reviews: 0,
            responded_reviews: 0,
            has_data: false,
            breakdown: ResponseBreakdown::default(),
            message: "No reviews available to analyze".to_string(),
        };
    }

    let responded = reviews.iter().filter(|r| r.has_owner_response()).count();
    let hours: Vec<f64> = reviews.iter().filter_map(response_hours).collect();

    let rate = responded as f64 / reviews.len() as f64;
    let avg = if hours.is_empty() {
        0.0
    } else {
        hours.iter().sum::<f64>() / hours.len() as f64
    };

    let score = (100 - rate_penalty(rate) - time_penalty(avg)).max(0);
    let breakdown = ResponseBreakdown {
        fast: hours.iter().filter(|h| **h <= 24.0).count(),
        medium: hours.iter().filter(|h| **h > 24.0 && **h <= 72.0).count(),
        slow: hours.iter().filter(|h| **h > 72.0).count(),
    };

    let message = if responded == 0 {
        "No responses to customer reviews detected".to_string()
    } else if rate < 0.5 {
        format!("Only {}% of reviews have responses", (rate * 100.0).round())
    } else if avg > 72.0 {
        format!("Average response time of {}h is too slow", avg.round())
    } else if rate >= 0.9 && avg <= 24.0 {
        "Excellent response rate and speed!".to_string()
    } else {
        "Good customer engagement".to_string()
    };

    tracing::debug!(
        total = reviews.len(),
        responded,
        avg_hours = avg.round(),
        "review responses analyzed"
    );

    ResponseAnalysis {
        score: u8::try_from(score).unwrap_or(0),
        avg_response_hours: avg.round(),
        response_rate: (rate * 100.0).round() / 100.0,
        total_reviews: reviews.len(),
        responded_reviews: responded,
        has_data: true,
        breakdown,
        message,
    }
}
