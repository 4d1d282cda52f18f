use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a fetched restaurant snapshot is considered current.
pub const FRESHNESS_WINDOW_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub name: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OpeningHours {
    pub open_now: Option<bool>,
    pub weekday_text: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerResponse {
    pub text: String,
    pub publish_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub rating: f64,
    #[serde(default)]
    pub text: String,
    pub publish_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub relative_time: String,
    pub owner_response: Option<OwnerResponse>,
}

impl Review {
    #[must_use]
    pub fn has_owner_response(&self) -> bool {
        self.owner_response.is_some()
    }
}

/// A restaurant as returned by a Places lookup, normalized into plain fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub location: Option<LatLng>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_ratings: u32,
    #[serde(default)]
    pub price_level: u8,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub photos: Vec<Photo>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    pub hours: Option<OpeningHours>,
    pub google_maps_uri: Option<String>,
}

impl Restaurant {
    /// Minimal restaurant with only an id and name set.
    #[must_use]
    pub fn new(place_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            place_id: place_id.into(),
            name: name.into(),
            address: String::new(),
            phone: None,
            website: None,
            location: None,
            rating: 0.0,
            total_ratings: 0,
            price_level: 0,
            types: Vec::new(),
            photos: Vec::new(),
            reviews: Vec::new(),
            hours: None,
            google_maps_uri: None,
        }
    }

    #[must_use]
    pub fn has_website(&self) -> bool {
        self.website.as_deref().is_some_and(|w| !w.trim().is_empty())
    }
}

/// A nearby restaurant competing with the subject, with its distance from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_ratings: u32,
    #[serde(default)]
    pub price_level: u8,
    #[serde(default)]
    pub types: Vec<String>,
    pub location: Option<LatLng>,
    #[serde(default)]
    pub distance_km: f64,
}

/// Returns true when a snapshot fetched at `fetched_at` is still younger than
/// `window` at `now`.
#[must_use]
pub fn is_fresh(fetched_at: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    now.signed_duration_since(fetched_at) < window
}
