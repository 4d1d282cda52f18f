//! Restaurant SEO audit: listing scores, review analysis, traffic and
//! revenue estimates, issue detection and recommended actions.
//!
//! Everything here is pure computation over data already fetched from the
//! Places and PageSpeed APIs.

pub mod actions;
pub mod issues;
pub mod report;
pub mod responses;
pub mod revenue;
pub mod sentiment;
pub mod seo;
pub mod traffic;

pub use actions::{action_items, average_competitor_rating, ActionItem, Priority};
pub use issues::{
    detect_issues, total_impact, Difficulty, IssueCategory, IssueContext, IssueTotals, Level,
    RevenueImpact, SeoIssue,
};
pub use report::{run_audit, AuditInput, AuditReport, AuditScores, ReviewScore, TrafficSummary};
pub use responses::{analyze_response_time, ResponseAnalysis, ResponseBreakdown};
pub use revenue::{
    estimate_monthly_visitors, Grade, Loss, RevenueCalculator, RevenueMetrics, RevenueParams,
    TotalRevenueLoss,
};
pub use sentiment::{
    sentiment_breakdown, urgent_reviews, OverallSentiment, SentimentBreakdown, Trend,
    UrgentReview,
};
pub use seo::{seo_score, SeoBreakdown, SeoFactors, SeoScore};
pub use traffic::{
    Confidence, Correlation, CorrelationStrength, SeoImpact, TrafficDirection, TrafficEstimate,
    TrafficEstimator, TrafficTrend,
};
