//! Google Places API (New) request and response types.
//!
//! Every response field is optional; [`crate::normalize`] turns these into
//! the core domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Body of `places:searchText` and `places:searchNearby`. Google omits
/// `places` entirely when nothing matched.
#[derive(Debug, Default, Deserialize)]
pub struct PlacesResponse {
    #[serde(default)]
    pub places: Vec<ApiPlace>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPlace {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<LocalizedText>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub national_phone_number: Option<String>,
    #[serde(default)]
    pub website_uri: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_rating_count: Option<u32>,
    /// e.g. `PRICE_LEVEL_MODERATE`.
    #[serde(default)]
    pub price_level: Option<String>,
    #[serde(default)]
    pub location: Option<ApiLatLng>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub photos: Vec<ApiPhoto>,
    #[serde(default)]
    pub reviews: Vec<ApiReview>,
    #[serde(default)]
    pub regular_opening_hours: Option<ApiOpeningHours>,
    #[serde(default)]
    pub google_maps_uri: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ApiLatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPhoto {
    /// Resource name, `places/{place_id}/photos/{photo_id}`.
    pub name: String,
    #[serde(default)]
    pub width_px: Option<u32>,
    #[serde(default)]
    pub height_px: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReview {
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub text: Option<LocalizedText>,
    #[serde(default)]
    pub publish_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub relative_publish_time_description: Option<String>,
    #[serde(default)]
    pub author_attribution: Option<AuthorAttribution>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorAttribution {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiOpeningHours {
    #[serde(default)]
    pub open_now: Option<bool>,
    #[serde(default)]
    pub periods: Vec<ApiPeriod>,
    #[serde(default)]
    pub weekday_descriptions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiPeriod {
    #[serde(default)]
    pub open: Option<ApiTimePoint>,
    #[serde(default)]
    pub close: Option<ApiTimePoint>,
}

/// `day` is 0 for Sunday.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct ApiTimePoint {
    #[serde(default)]
    pub day: Option<u8>,
    #[serde(default)]
    pub hour: Option<u8>,
    #[serde(default)]
    pub minute: Option<u8>,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct Circle {
    pub center: ApiLatLng,
    pub radius: f64,
}

#[derive(Debug, Serialize)]
pub struct CircleArea {
    pub circle: Circle,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchTextRequest<'a> {
    pub text_query: &'a str,
    pub included_type: &'a str,
    pub max_result_count: u32,
    pub location_bias: CircleArea,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchNearbyRequest<'a> {
    pub included_types: [&'a str; 1],
    pub max_result_count: u32,
    pub location_restriction: CircleArea,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_search_response_has_no_places() {
        let parsed: PlacesResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.places.is_empty());
    }

    #[test]
    fn place_parses_camel_case_fields() {
        let json = serde_json::json!({
            "id": "abc",
            "displayName": { "text": "Trattoria", "languageCode": "en" },
            "userRatingCount": 120,
            "priceLevel": "PRICE_LEVEL_MODERATE",
            "location": { "latitude": 25.76, "longitude": -80.19 },
            "reviews": [{
                "rating": 5,
                "publishTime": "2025-03-01T12:00:00.123456Z",
                "authorAttribution": { "displayName": "Sam" }
            }]
        });
        let place: ApiPlace = serde_json::from_value(json).unwrap();
        assert_eq!(place.id.as_deref(), Some("abc"));
        assert_eq!(place.user_rating_count, Some(120));
        assert_eq!(place.reviews.len(), 1);
        assert!(place.reviews[0].publish_time.is_some());
        assert!(place.types.is_empty());
    }

    #[test]
    fn nearby_request_serializes_in_api_shape() {
        let body = SearchNearbyRequest {
            included_types: ["restaurant"],
            max_result_count: 10,
            location_restriction: CircleArea {
                circle: Circle {
                    center: ApiLatLng {
                        latitude: 1.0,
                        longitude: 2.0,
                    },
                    radius: 1000.0,
                },
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["includedTypes"][0], "restaurant");
        assert_eq!(json["maxResultCount"], 10);
        assert_eq!(json["locationRestriction"]["circle"]["center"]["latitude"], 1.0);
    }
}
