//! Star-rating sentiment, keyword themes and reviews needing a reply.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tablerank_core::Review;

/// Low-rated reviews newer than this still need an answer.
const URGENT_WINDOW_DAYS: i64 = 7;

/// Recent reviews compared against older ones for the trend.
const TREND_RECENT: usize = 5;

const THEMES: &[(&str, &[&str])] = &[
    (
        "Food Quality",
        &["food", "dish", "meal", "taste", "flavor", "delicious", "fresh", "quality"],
    ),
    (
        "Service",
        &["service", "waiter", "waitress", "staff", "server", "friendly", "attentive", "rude", "slow"],
    ),
    (
        "Ambiance",
        &["ambiance", "atmosphere", "decor", "music", "noise", "cozy", "romantic", "loud"],
    ),
    (
        "Value/Pricing",
        &["price", "expensive", "cheap", "value", "worth", "overpriced", "affordable"],
    ),
    (
        "Cleanliness",
        &["clean", "dirty", "hygiene", "sanitary", "spotless", "messy"],
    ),
    (
        "Wait Times",
        &["wait", "waiting", "slow", "quick", "fast", "long wait", "prompt"],
    ),
];

const COMPLAINTS: &[(&str, &[&str])] = &[
    ("Slow service", &["slow", "wait", "waiting", "long time", "forever"]),
    (
        "Poor food quality",
        &["bad", "terrible", "awful", "disgusting", "cold", "undercooked", "overcooked"],
    ),
    ("Rude staff", &["rude", "disrespectful", "mean", "unprofessional", "attitude"]),
    ("Overpriced", &["expensive", "overpriced", "too much", "rip off", "not worth"]),
    ("Dirty/unclean", &["dirty", "filthy", "gross", "unclean", "messy"]),
    ("Wrong order", &["wrong", "mistake", "incorrect", "missing", "forgot"]),
    ("Noisy/loud", &["loud", "noisy", "too loud", "can't hear"]),
];

const PRAISE: &[(&str, &[&str])] = &[
    (
        "Excellent food",
        &["delicious", "amazing", "excellent", "best", "incredible", "fantastic"],
    ),
    (
        "Great service",
        &["friendly", "attentive", "helpful", "professional", "excellent service"],
    ),
    ("Good value", &["affordable", "reasonable", "good value", "worth it"]),
    ("Nice atmosphere", &["cozy", "beautiful", "nice ambiance", "lovely", "romantic"]),
    ("Fast service", &["quick", "fast", "prompt", "efficient"]),
    ("Fresh ingredients", &["fresh", "quality", "authentic", "homemade"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallSentiment {
    VeryPositive,
    Positive,
    Mixed,
    Negative,
    NoReviews,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bucket {
    pub count: usize,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeMention {
    pub theme: String,
    pub mention_count: usize,
    pub positive_count: usize,
    pub negative_count: usize,
    pub positive: bool,
    pub percentage: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub label: String,
    pub count: usize,
    pub percentage: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
    InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub trend: Trend,
    pub recent_average: f64,
    pub previous_average: f64,
    pub change: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub total_reviews: usize,
    pub positive: Bucket,
    pub neutral: Bucket,
    pub negative: Bucket,
    /// Mean star rating to one decimal.
    pub average_rating: f64,
    pub overall: OverallSentiment,
    pub themes: Vec<ThemeMention>,
    pub top_complaints: Vec<KeywordCount>,
    pub top_praise: Vec<KeywordCount>,
    pub trend: TrendAnalysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgentReview {
    pub author: String,
    pub rating: f64,
    pub text: String,
    pub publish_time: Option<DateTime<Utc>>,
    pub relative_time: String,
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round().clamp(0.0, 100.0) as u8
}

fn mentions(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

fn keyword_counts(reviews: &[&Review], table: &[(&str, &[&str])]) -> Vec<KeywordCount> {
    let texts: Vec<String> = reviews.iter().map(|r| r.text.to_lowercase()).collect();
    let mut counts: Vec<KeywordCount> = table
        .iter()
        .map(|(label, keywords)| {
            let count = texts.iter().filter(|t| mentions(t, keywords)).count();
            KeywordCount {
                label: (*label).to_string(),
                count,
                percentage: percent(count, reviews.len()),
            }
        })
        .filter(|c| c.count > 0)
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(5);
    counts
}

fn themes(reviews: &[Review]) -> Vec<ThemeMention> {
    let texts: Vec<(String, bool)> = reviews
        .iter()
        .map(|r| (r.text.to_lowercase(), r.rating >= 4.0))
        .collect();
    let mut out: Vec<ThemeMention> = THEMES
        .iter()
        .map(|(theme, keywords)| {
            let (mut pos, mut neg) = (0, 0);
            for (text, is_positive) in &texts {
                if mentions(text, keywords) {
                    if *is_positive {
                        pos += 1;
                    } else {
                        neg += 1;
                    }
                }
            }
            ThemeMention {
                theme: (*theme).to_string(),
                mention_count: pos + neg,
                positive_count: pos,
                negative_count: neg,
                positive: pos >= neg,
                percentage: percent(pos + neg, reviews.len()),
            }
        })
        .filter(|t| t.mention_count > 0)
        .collect();
    out.sort_by(|a, b| b.mention_count.cmp(&a.mention_count));
    out
}

#[allow(clippy::cast_precision_loss)]
fn mean_rating(reviews: &[&Review]) -> f64 {
    reviews.iter().map(|r| r.rating).sum::<f64>() / reviews.len() as f64
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn trend(reviews: &[Review]) -> TrendAnalysis {
    if reviews.is_empty() {
        return TrendAnalysis {
            trend: Trend::InsufficientData,
            recent_average: 0.0,
            previous_average: 0.0,
            change: 0.0,
        };
    }
    // Newest first; undated reviews sort last.
    let mut sorted: Vec<&Review> = reviews.iter().collect();
    sorted.sort_by(|a, b| b.publish_time.cmp(&a.publish_time));
    let split = TREND_RECENT.min(sorted.len());
    let (recent, older) = sorted.split_at(split);

    let recent_avg = mean_rating(recent);
    let older_avg = if older.is_empty() {
        recent_avg
    } else {
        mean_rating(older)
    };
    let diff = recent_avg - older_avg;
    let trend = if diff > 0.3 {
        Trend::Improving
    } else if diff < -0.3 {
        Trend::Declining
    } else {
        Trend::Stable
    };
    TrendAnalysis {
        trend,
        recent_average: round2(recent_avg),
        previous_average: round2(older_avg),
        change: round2(diff),
    }
}

fn overall(positive: u8, negative: u8) -> OverallSentiment {
    if positive >= 70 {
        OverallSentiment::VeryPositive
    } else if positive >= 50 {
        OverallSentiment::Positive
    } else if negative >= 40 {
        OverallSentiment::Negative
    } else {
        OverallSentiment::Mixed
    }
}

/// Positive is four stars and up, neutral three up to four, negative the rest.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sentiment_breakdown(reviews: &[Review]) -> SentimentBreakdown {
    let total = reviews.len();
    if total == 0 {
        return SentimentBreakdown {
            total_reviews: 0,
            positive: Bucket::default(),
            neutral: Bucket::default(),
            negative: Bucket::default(),
            average_rating: 0.0,
            overall: OverallSentiment::NoReviews,
            themes: Vec::new(),
            top_complaints: Vec::new(),
            top_praise: Vec::new(),
            trend: trend(reviews),
        };
    }

    let positive = reviews.iter().filter(|r| r.rating >= 4.0).count();
    let neutral = reviews
        .iter()
        .filter(|r| (3.0..4.0).contains(&r.rating))
        .count();
    let negative = total - positive - neutral;
    let average = reviews.iter().map(|r| r.rating).sum::<f64>() / total as f64;

    let low: Vec<&Review> = reviews.iter().filter(|r| r.rating <= 2.0).collect();
    let high: Vec<&Review> = reviews.iter().filter(|r| r.rating >= 4.0).collect();

    let positive = Bucket {
        count: positive,
        percentage: percent(positive, total),
    };
    let negative = Bucket {
        count: negative,
        percentage: percent(negative, total),
    };

    SentimentBreakdown {
        total_reviews: total,
        overall: overall(positive.percentage, negative.percentage),
        positive,
        neutral: Bucket {
            count: neutral,
            percentage: percent(neutral, total),
        },
        negative,
        average_rating: (average * 10.0).round() / 10.0,
        themes: themes(reviews),
        top_complaints: keyword_counts(&low, COMPLAINTS),
        top_praise: keyword_counts(&high, PRAISE),
        trend: trend(reviews),
    }
}

/// Low-rated, unanswered reviews published within the last week.
#[must_use]
pub fn urgent_reviews(reviews: &[Review], now: DateTime<Utc>) -> Vec<UrgentReview> {
    let window = Duration::days(URGENT_WINDOW_DAYS);
    reviews
        .iter()
        .filter(|r| r.rating <= 2.0 && !r.has_owner_response())
        .filter(|r| {
            r.publish_time
                .is_some_and(|t| now.signed_duration_since(t) <= window)
        })
        .map(|r| UrgentReview {
            author: if r.author.trim().is_empty() {
                "Anonymous".to_string()
            } else {
                r.author.clone()
            },
            rating: r.rating,
            text: r.text.clone(),
            publish_time: r.publish_time,
            relative_time: r.relative_time.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tablerank_core::OwnerResponse;

    fn review(rating: f64, text: &str, days_ago: i64) -> Review {
        let now = Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap();
        Review {
            author: "guest".to_string(),
            rating,
            text: text.to_string(),
            publish_time: Some(now - Duration::days(days_ago)),
            relative_time: format!("{days_ago} days ago"),
            owner_response: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn empty_reviews_have_no_sentiment() {
        let s = sentiment_breakdown(&[]);
        assert_eq!(s.overall, OverallSentiment::NoReviews);
        assert_eq!(s.trend.trend, Trend::InsufficientData);
    }

    #[test]
    fn buckets_and_average() {
        let reviews = [
            review(5.0, "Delicious pasta, friendly staff", 1),
            review(4.0, "Great value", 2),
            review(3.0, "Okay", 3),
            review(1.0, "Rude waiter and cold food", 4),
        ];
        let s = sentiment_breakdown(&reviews);
        assert_eq!(s.positive.count, 2);
        assert_eq!(s.neutral.count, 1);
        assert_eq!(s.negative.count, 1);
        assert_eq!(s.positive.percentage, 50);
        assert!((s.average_rating - 3.3).abs() < 1e-9);
        assert_eq!(s.overall, OverallSentiment::Positive);
    }

    #[test]
    fn themes_split_by_review_polarity() {
        let reviews = [
            review(5.0, "Friendly staff", 1),
            review(1.0, "Rude staff", 2),
            review(2.0, "The staff ignored us", 3),
        ];
        let s = sentiment_breakdown(&reviews);
        let service = s.themes.iter().find(|t| t.theme == "Service").unwrap();
        assert_eq!(service.mention_count, 3);
        assert_eq!(service.positive_count, 1);
        assert_eq!(service.negative_count, 2);
        assert!(!service.positive);
    }

    #[test]
    fn complaints_only_come_from_low_ratings() {
        let reviews = [
            review(5.0, "A bit loud but amazing", 1),
            review(1.0, "Too loud and dirty", 2),
        ];
        let s = sentiment_breakdown(&reviews);
        let noisy = s
            .top_complaints
            .iter()
            .find(|c| c.label == "Noisy/loud")
            .unwrap();
        assert_eq!(noisy.count, 1);
        assert_eq!(noisy.percentage, 100);
        assert!(s.top_praise.iter().any(|p| p.label == "Excellent food"));
    }

    #[test]
    fn declining_trend_detected() {
        let mut reviews: Vec<Review> = (0..5).map(|d| review(2.0, "", d)).collect();
        reviews.extend((10..15).map(|d| review(5.0, "", d)));
        let s = sentiment_breakdown(&reviews);
        assert_eq!(s.trend.trend, Trend::Declining);
        assert!((s.trend.change + 3.0).abs() < 1e-9);
    }

    #[test]
    fn urgent_reviews_are_recent_low_and_unanswered() {
        let mut answered = review(1.0, "Awful", 1);
        answered.owner_response = Some(OwnerResponse {
            text: "Sorry".to_string(),
            publish_time: None,
        });
        let reviews = [
            review(1.0, "Awful", 2),
            review(2.0, "Old complaint", 30),
            review(4.0, "Fine", 1),
            answered,
        ];
        let urgent = urgent_reviews(&reviews, now());
        assert_eq!(urgent.len(), 1);
        assert_eq!(urgent[0].text, "Awful");
    }
}
