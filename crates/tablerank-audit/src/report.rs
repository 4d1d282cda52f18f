//! The full audit: every score, the competitor ranking and the revenue
//! picture for one restaurant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tablerank_core::{Competitor, PageSpeedResult, Restaurant};
use tablerank_ranking::{RankInput, RankOutcome, Ranker, WeightsConfig};

use crate::actions::{action_items, average_competitor_rating, ActionItem};
use crate::issues::{detect_issues, total_impact, IssueContext, IssueTotals, SeoIssue};
use crate::responses::{analyze_response_time, ResponseAnalysis};
use crate::revenue::{
    estimate_monthly_visitors, Grade, RevenueCalculator, RevenueMetrics, RevenueParams,
    TotalRevenueLoss,
};
use crate::sentiment::{sentiment_breakdown, urgent_reviews, SentimentBreakdown, UrgentReview};
use crate::seo::{seo_score, SeoScore};
use crate::traffic::{TrafficEstimate, TrafficEstimator};

/// Assumed neighbourhood average when no competitors were found.
const FALLBACK_COMPETITOR_RATING: f64 = 4.2;

#[derive(Debug, Clone)]
pub struct AuditInput {
    pub restaurant: Restaurant,
    pub competitors: Vec<Competitor>,
    pub page_speed: PageSpeedResult,
    pub params: RevenueParams,
    pub weights: WeightsConfig,
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewScore {
    pub score: u8,
    pub rating: f64,
    pub total_reviews: u32,
    pub average_competitor_rating: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditScores {
    pub seo: SeoScore,
    pub page_speed: PageSpeedResult,
    pub reviews: ReviewScore,
    pub response: ResponseAnalysis,
    pub overall: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSummary {
    pub estimate: TrafficEstimate,
    pub search_impressions: u32,
    /// Expected click-through rate at the current rank, in percent.
    pub click_through_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub restaurant: Restaurant,
    pub competitors: Vec<Competitor>,
    pub scores: AuditScores,
    pub ranking: RankOutcome,
    pub sentiment: SentimentBreakdown,
    pub urgent_reviews: Vec<UrgentReview>,
    pub traffic: TrafficSummary,
    pub revenue: TotalRevenueLoss,
    pub grade: Grade,
    pub issues: Vec<SeoIssue>,
    pub issue_totals: IssueTotals,
    pub action_items: Vec<ActionItem>,
    pub audited_at: DateTime<Utc>,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn rating_score(rating: f64) -> u8 {
    (rating / 5.0 * 100.0).round().clamp(0.0, 100.0) as u8
}

#[must_use]
pub fn run_audit(input: AuditInput) -> AuditReport {
    let AuditInput {
        restaurant,
        competitors,
        page_speed,
        params,
        weights,
        now,
    } = input;

    let seo = seo_score(&restaurant);
    let response = analyze_response_time(&restaurant.reviews);

    let candidates: Vec<RankInput> = competitors.iter().map(RankInput::from).collect();
    let ranking = Ranker::new(weights).rank(&RankInput::from(&restaurant), &candidates);

    let monthly_visitors = estimate_monthly_visitors(
        restaurant.rating,
        restaurant.total_ratings,
        restaurant.price_level,
    );
    let metrics = RevenueMetrics {
        seo_score: f64::from(seo.score),
        load_time_secs: page_speed.load_time_secs,
        rating: restaurant.rating,
        total_reviews: restaurant.total_ratings,
        avg_response_hours: response.avg_response_hours,
        response_rate: response.response_rate,
        monthly_visitors: Some(monthly_visitors),
    };
    let revenue = RevenueCalculator::new(params).total_loss(&metrics);

    let issues = detect_issues(&IssueContext {
        restaurant: &restaurant,
        responses: Some(&response),
        page_speed: Some(&page_speed),
        ranking: Some(&ranking),
    });
    let issue_totals = total_impact(&issues);
    let actions = action_items(&seo, &page_speed, &restaurant, &competitors);

    let estimator = TrafficEstimator::default();
    let traffic = TrafficSummary {
        estimate: estimator.estimate_monthly_visitors(&restaurant),
        search_impressions: estimator.search_impressions(&restaurant),
        click_through_rate: estimator.estimate_ctr(restaurant.rating, ranking.rank),
    };

    let avg_competitor = average_competitor_rating(&competitors)
        .map_or(FALLBACK_COMPETITOR_RATING, |avg| (avg * 10.0).round() / 10.0);

    tracing::info!(
        place_id = %restaurant.place_id,
        rank = ranking.rank,
        competitors = competitors.len(),
        overall = revenue.overall_score,
        grade = %revenue.grade,
        monthly_loss = revenue.total_monthly_loss,
        "audit complete"
    );

    AuditReport {
        scores: AuditScores {
            reviews: ReviewScore {
                score: rating_score(restaurant.rating),
                rating: restaurant.rating,
                total_reviews: restaurant.total_ratings,
                average_competitor_rating: avg_competitor,
            },
            seo,
            page_speed,
            response,
            overall: revenue.overall_score,
        },
        sentiment: sentiment_breakdown(&restaurant.reviews),
        urgent_reviews: urgent_reviews(&restaurant.reviews, now),
        grade: revenue.grade,
        restaurant,
        competitors,
        ranking,
        traffic,
        revenue,
        issues,
        issue_totals,
        action_items: actions,
        audited_at: now,
    }
}
