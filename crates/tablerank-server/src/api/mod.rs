mod analysis;
mod restaurants;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tablerank_audit::RevenueParams;
use tablerank_core::AppConfig;
use tablerank_places::{DetailsCache, PageSpeedClient, PlacesClient, PlacesError};
use tablerank_ranking::WeightsConfig;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

/// Process-wide state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub places: PlacesClient,
    pub pagespeed: PageSpeedClient,
    pub cache: DetailsCache,
    pub weights: Arc<WeightsConfig>,
    pub revenue: RevenueParams,
    pub competitor_radius_m: u32,
    pub max_competitors: u32,
}

impl AppState {
    /// Builds the API clients and cache from config.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] if either HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig, weights: WeightsConfig) -> Result<Self, PlacesError> {
        Ok(Self {
            places: PlacesClient::from_config(config)?,
            pagespeed: PageSpeedClient::from_config(config)?,
            cache: DetailsCache::with_ttl_hours(config.cache_ttl_hours),
            weights: Arc::new(weights),
            revenue: RevenueParams {
                average_order_value: config.average_order_value,
                conversion_rate: config.conversion_rate,
                monthly_visitors: config.monthly_visitors,
            },
            competitor_radius_m: config.competitor_radius_m,
            max_competitors: u32::try_from(config.max_competitors).unwrap_or(u32::MAX),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    version: &'static str,
    cached_restaurants: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(request_id: String, data: T) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_places_error(request_id: String, error: &PlacesError) -> ApiError {
    match error {
        PlacesError::NotFound(_) => ApiError::new(request_id, "not_found", "restaurant not found"),
        _ => {
            tracing::error!(error = %error, "Places API request failed");
            ApiError::new(request_id, "upstream_error", "Google Places request failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn limited_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/restaurants/search",
            get(restaurants::search_restaurants),
        )
        .route(
            "/api/v1/restaurants/{place_id}",
            get(restaurants::get_restaurant),
        )
        .route(
            "/api/v1/restaurants/{place_id}/audit",
            post(restaurants::audit_restaurant),
        )
        .route("/api/v1/ranking", post(analysis::rank_competitors))
        .route("/api/v1/revenue", post(analysis::revenue_loss))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(limited_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse::new(
        req_id.0,
        HealthData {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            cached_restaurants: state.cache.len().await,
        },
    ))
}

/// One hour windows, sized from config.
pub fn rate_limit_state(config: &AppConfig) -> RateLimitState {
    RateLimitState::new(config.rate_limit_per_hour, Duration::from_secs(3600))
}
