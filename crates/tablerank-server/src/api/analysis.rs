use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tablerank_audit::{RevenueCalculator, RevenueMetrics, TotalRevenueLoss};
use tablerank_ranking::{ranking_change, RankInput, RankOutcome, Ranker, RankingChange};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct RankRequest {
    subject: RankInput,
    #[serde(default)]
    competitors: Vec<RankInput>,
    /// Rank from an earlier run, for the movement summary.
    #[serde(default)]
    previous_rank: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(super) struct RankResponse {
    #[serde(flatten)]
    outcome: RankOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    change: Option<RankingChange>,
}

pub(super) async fn rank_competitors(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<RankRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<RankResponse>>, ApiError> {
    let Json(request) =
        body.map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.body_text()))?;

    let outcome = Ranker::new(*state.weights).rank(&request.subject, &request.competitors);
    let change = request
        .previous_rank
        .map(|previous| ranking_change(outcome.rank, Some(previous)));
    tracing::debug!(
        rank = outcome.rank,
        total_competitors = outcome.total_competitors,
        "ranked subject"
    );

    Ok(Json(ApiResponse::new(req_id.0, RankResponse { outcome, change })))
}

fn validate_metrics(metrics: &RevenueMetrics) -> Result<(), String> {
    let numbers = [
        ("seo_score", metrics.seo_score),
        ("load_time_secs", metrics.load_time_secs),
        ("rating", metrics.rating),
        ("avg_response_hours", metrics.avg_response_hours),
        ("response_rate", metrics.response_rate),
    ];
    if let Some((name, _)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
        return Err(format!("{name} must be a finite number"));
    }
    if !(0.0..=100.0).contains(&metrics.seo_score) {
        return Err("seo_score must be between 0 and 100".to_string());
    }
    if !(0.0..=5.0).contains(&metrics.rating) {
        return Err("rating must be between 0 and 5".to_string());
    }
    if !(0.0..=1.0).contains(&metrics.response_rate) {
        return Err("response_rate must be between 0 and 1".to_string());
    }
    if metrics.load_time_secs < 0.0 || metrics.avg_response_hours < 0.0 {
        return Err("durations must not be negative".to_string());
    }
    Ok(())
}

pub(super) async fn revenue_loss(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<RevenueMetrics>, JsonRejection>,
) -> Result<Json<ApiResponse<TotalRevenueLoss>>, ApiError> {
    let Json(metrics) =
        body.map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.body_text()))?;
    validate_metrics(&metrics)
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let total = RevenueCalculator::new(state.revenue).total_loss(&metrics);
    Ok(Json(ApiResponse::new(req_id.0, total)))
}
