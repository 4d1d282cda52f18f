use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tablerank_audit::{run_audit, AuditInput, AuditReport};
use tablerank_core::Restaurant;
use tablerank_places::{NearbyOptions, PlacesError, SearchOptions};

use crate::middleware::RequestId;

use super::{map_places_error, ApiError, ApiResponse, AppState};

const MIN_QUERY_CHARS: usize = 2;
const DEFAULT_SEARCH_LIMIT: u32 = 10;
const MAX_SEARCH_LIMIT: u32 = 20;

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    pub query: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchResults {
    results: Vec<Restaurant>,
    count: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct RestaurantDetails {
    restaurant: Restaurant,
    cached: bool,
    fetched_at: DateTime<Utc>,
}

/// Validated search parameters: trimmed query and a limit within bounds.
fn validate_search(query: &SearchQuery) -> Result<(String, u32), String> {
    let text = query.query.as_deref().map(str::trim).unwrap_or_default();
    if text.chars().count() < MIN_QUERY_CHARS {
        return Err(format!(
            "query must be at least {MIN_QUERY_CHARS} characters"
        ));
    }

    let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    if !(1..=MAX_SEARCH_LIMIT).contains(&limit) {
        return Err(format!("limit must be between 1 and {MAX_SEARCH_LIMIT}"));
    }

    Ok((text.to_owned(), limit))
}

pub(super) async fn search_restaurants(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<SearchResults>>, ApiError> {
    let Query(query) =
        query.map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.body_text()))?;
    let (text, limit) = validate_search(&query)
        .map_err(|message| ApiError::new(req_id.0.clone(), "validation_error", message))?;

    let options = SearchOptions {
        max_results: limit,
        ..SearchOptions::default()
    };
    let results = state
        .places
        .search_restaurants(&text, &options)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    let count = results.len();
    Ok(Json(ApiResponse::new(
        req_id.0,
        SearchResults { results, count },
    )))
}

/// Details from the cache when fresh, otherwise from Google (and cached).
async fn load_details(
    state: &AppState,
    place_id: &str,
    now: DateTime<Utc>,
) -> Result<RestaurantDetails, PlacesError> {
    if let Some(hit) = state.cache.get(place_id, now).await {
        tracing::debug!(place_id, "details served from cache");
        return Ok(RestaurantDetails {
            restaurant: hit.restaurant,
            cached: true,
            fetched_at: hit.fetched_at,
        });
    }

    let restaurant = state.places.get_restaurant_details(place_id).await?;
    state.cache.insert(restaurant.clone(), now).await;
    Ok(RestaurantDetails {
        restaurant,
        cached: false,
        fetched_at: now,
    })
}

pub(super) async fn get_restaurant(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(place_id): Path<String>,
) -> Result<Json<ApiResponse<RestaurantDetails>>, ApiError> {
    let details = load_details(&state, &place_id, Utc::now())
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;
    Ok(Json(ApiResponse::new(req_id.0, details)))
}

pub(super) async fn audit_restaurant(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(place_id): Path<String>,
) -> Result<Json<ApiResponse<AuditReport>>, ApiError> {
    let now = Utc::now();
    let restaurant = load_details(&state, &place_id, now)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?
        .restaurant;

    let competitors = match restaurant.location {
        Some(location) => {
            let options = NearbyOptions {
                radius_m: state.competitor_radius_m,
                max_results: state.max_competitors,
                exclude_place_id: Some(place_id.clone()),
            };
            match state
                .places
                .find_nearby_competitors(location.lat, location.lng, &options)
                .await
            {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!(place_id = %place_id, error = %e, "competitor search failed; auditing without competitors");
                    Vec::new()
                }
            }
        }
        None => Vec::new(),
    };

    let page_speed = state.pagespeed.analyze(restaurant.website.as_deref()).await;

    let report = run_audit(AuditInput {
        restaurant,
        competitors,
        page_speed,
        params: state.revenue,
        weights: *state.weights,
        now,
    });

    Ok(Json(ApiResponse::new(req_id.0, report)))
}
