//! HTTP client for the Google Places API (New).
//!
//! Every request carries the API key and a field mask as headers. Responses
//! are parsed into [`crate::types`] and normalized into core domain types.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;
use tablerank_core::config::DEFAULT_PLACES_BASE_URL;
use tablerank_core::{AppConfig, Competitor, LatLng, Restaurant};

use crate::error::PlacesError;
use crate::normalize;
use crate::retry::retry_with_backoff;
use crate::types::{
    ApiLatLng, ApiPlace, Circle, CircleArea, PlacesResponse, SearchNearbyRequest,
    SearchTextRequest,
};

const SEARCH_FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,\
places.rating,places.userRatingCount,places.priceLevel,places.photos,places.location,places.types";
const DETAILS_FIELD_MASK: &str = "id,displayName,formattedAddress,nationalPhoneNumber,\
websiteUri,rating,userRatingCount,reviews,regularOpeningHours,photos,location,priceLevel,\
types,googleMapsUri";
const NEARBY_FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,\
places.rating,places.userRatingCount,places.priceLevel,places.location,places.types";

const MAX_ERROR_BODY_CHARS: usize = 500;

/// Options for [`PlacesClient::search_restaurants`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub max_results: u32,
    /// Centre of the location bias circle.
    pub location: LatLng,
    pub radius_m: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: 10,
            location: LatLng {
                lat: 25.7617,
                lng: -80.1918,
            },
            radius_m: 50_000.0,
        }
    }
}

/// Options for [`PlacesClient::find_nearby_competitors`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearbyOptions {
    pub radius_m: u32,
    pub max_results: u32,
    /// The subject restaurant, left out of the results.
    pub exclude_place_id: Option<String>,
}

impl Default for NearbyOptions {
    fn default() -> Self {
        Self {
            radius_m: 1000,
            max_results: 5,
            exclude_place_id: None,
        }
    }
}

/// Client for the Places API. Use [`PlacesClient::new`] for production or
/// [`PlacesClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl PlacesClient {
    /// Creates a client pointed at the production Places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::MissingApiKey`] for a blank key, or
    /// [`PlacesError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_PLACES_BASE_URL)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::MissingApiKey`] for a blank key,
    /// [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse, or
    /// [`PlacesError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        if api_key.trim().is_empty() {
            return Err(PlacesError::MissingApiKey);
        }

        let trimmed = base_url.trim_end_matches('/');
        Url::parse(trimmed).map_err(|e| PlacesError::InvalidBaseUrl {
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
            base_url: trimmed.to_owned(),
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Builds a client from the application config, retries included.
    ///
    /// # Errors
    ///
    /// See [`PlacesClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Ok(Self::with_base_url(
            &config.places_api_key,
            config.request_timeout_secs,
            &config.places_base_url,
        )?
        .with_retry(config.max_retries, config.retry_backoff_base_ms))
    }

    /// Retries transient failures up to `max_retries` extra times.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Text search restricted to restaurants, biased towards a circle.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure.
    /// - [`PlacesError::UnexpectedStatus`] for a non-2xx answer.
    /// - [`PlacesError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub async fn search_restaurants(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<Restaurant>, PlacesError> {
        tracing::info!(query, max_results = options.max_results, "searching restaurants");

        let body = SearchTextRequest {
            text_query: query,
            included_type: "restaurant",
            max_result_count: options.max_results,
            location_bias: circle(options.location, options.radius_m),
        };
        let url = self.endpoint("places:searchText");
        let response: PlacesResponse = self
            .request_json(Method::POST, &url, SEARCH_FIELD_MASK, Some(&body))
            .await?;

        Ok(response
            .places
            .into_iter()
            .filter_map(normalize::restaurant)
            .collect())
    }

    /// Full details for one place.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::NotFound`] when the place does not exist.
    /// - [`PlacesError::Http`], [`PlacesError::UnexpectedStatus`] and
    ///   [`PlacesError::Deserialize`] as for search.
    pub async fn get_restaurant_details(&self, place_id: &str) -> Result<Restaurant, PlacesError> {
        tracing::info!(place_id, "fetching restaurant details");

        let url = self.endpoint(&format!("places/{place_id}"));
        let place: ApiPlace = self
            .request_json::<ApiPlace, ()>(Method::GET, &url, DETAILS_FIELD_MASK, None)
            .await?;

        normalize::restaurant(place).ok_or_else(|| PlacesError::NotFound(place_id.to_owned()))
    }

    /// Restaurants within `radius_m` of a point, nearest data first as
    /// returned by Google. Asks for twice the wanted count so that dropping
    /// the subject still leaves enough results.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::search_restaurants`].
    pub async fn find_nearby_competitors(
        &self,
        lat: f64,
        lng: f64,
        options: &NearbyOptions,
    ) -> Result<Vec<Competitor>, PlacesError> {
        tracing::info!(lat, lng, radius_m = options.radius_m, "finding nearby competitors");

        let origin = LatLng { lat, lng };
        let body = SearchNearbyRequest {
            included_types: ["restaurant"],
            max_result_count: options.max_results.saturating_mul(2),
            location_restriction: circle(origin, f64::from(options.radius_m)),
        };
        let url = self.endpoint("places:searchNearby");
        let response: PlacesResponse = self
            .request_json(Method::POST, &url, NEARBY_FIELD_MASK, Some(&body))
            .await?;

        let limit = usize::try_from(options.max_results).unwrap_or(usize::MAX);
        let competitors: Vec<Competitor> = response
            .places
            .into_iter()
            .filter_map(|place| normalize::competitor(place, origin))
            .filter(|c| options.exclude_place_id.as_deref() != Some(c.place_id.as_str()))
            .take(limit)
            .collect();

        tracing::debug!(count = competitors.len(), "competitors found");
        Ok(competitors)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    /// Sends a request with the auth and field-mask headers, retrying
    /// transient failures, and parses a 2xx body as `T`.
    async fn request_json<T, B>(
        &self,
        method: Method,
        url: &str,
        field_mask: &str,
        body: Option<&B>,
    ) -> Result<T, PlacesError>
    where
        B: Serialize + ?Sized + Sync,
        T: serde::de::DeserializeOwned,
    {
        let text = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let method = method.clone();
            async move {
                let mut request = self
                    .client
                    .request(method, url)
                    .header("X-Goog-Api-Key", &self.api_key)
                    .header("X-Goog-FieldMask", field_mask);
                if let Some(body) = body {
                    request = request.json(body);
                }

                let response = request.send().await?;
                let status = response.status();
                let text = response.text().await?;
                if status == StatusCode::NOT_FOUND {
                    return Err(PlacesError::NotFound(url.to_owned()));
                }
                if !status.is_success() {
                    tracing::error!(status = status.as_u16(), url, "Places API error");
                    return Err(PlacesError::UnexpectedStatus {
                        status: status.as_u16(),
                        body: text.chars().take(MAX_ERROR_BODY_CHARS).collect(),
                    });
                }
                Ok(text)
            }
        })
        .await?;

        serde_json::from_str(&text).map_err(|e| PlacesError::Deserialize {
            context: url.to_owned(),
            source: e,
        })
    }
}

fn circle(center: LatLng, radius: f64) -> CircleArea {
    CircleArea {
        circle: Circle {
            center: ApiLatLng {
                latitude: center.lat,
                longitude: center.lng,
            },
            radius,
        },
    }
}
