//! Converts Places API shapes into the core domain types.

use tablerank_core::{
    haversine_km, Competitor, LatLng, OpeningHours, Photo, Restaurant, Review,
};

use crate::types::{ApiLatLng, ApiOpeningHours, ApiPlace, ApiReview, ApiTimePoint, LocalizedText};

const UNKNOWN_NAME: &str = "Unknown";
const ANONYMOUS: &str = "Anonymous";
const DAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Maps the `PRICE_LEVEL_*` enum to the legacy 0-4 scale. Unknown or
/// missing values are 0.
#[must_use]
pub fn price_level(value: Option<&str>) -> u8 {
    match value {
        Some("PRICE_LEVEL_INEXPENSIVE") => 1,
        Some("PRICE_LEVEL_MODERATE") => 2,
        Some("PRICE_LEVEL_EXPENSIVE") => 3,
        Some("PRICE_LEVEL_VERY_EXPENSIVE") => 4,
        _ => 0,
    }
}

/// `9:05 AM` style clock time. Returns `None` without an hour.
#[must_use]
pub fn format_time(point: &ApiTimePoint) -> Option<String> {
    let hour = point.hour?;
    let minute = point.minute.unwrap_or(0);
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    Some(format!("{display_hour}:{minute:02} {period}"))
}

/// One line per day, Sunday first. Days without an opening period are
/// `Closed`; an open period without a close runs to `11:59 PM`.
#[must_use]
pub fn opening_hours(hours: &ApiOpeningHours) -> Option<OpeningHours> {
    if hours.periods.is_empty() {
        if hours.weekday_descriptions.is_empty() {
            return None;
        }
        return Some(OpeningHours {
            open_now: hours.open_now,
            weekday_text: hours.weekday_descriptions.clone(),
        });
    }

    let weekday_text = DAYS
        .iter()
        .zip(0u8..)
        .map(|(name, day)| {
            let spans: Vec<String> = hours
                .periods
                .iter()
                .filter_map(|p| p.open.filter(|open| open.day == Some(day)).map(|o| (o, p.close)))
                .map(|(open, close)| {
                    let from = format_time(&open).unwrap_or_default();
                    let to = close
                        .and_then(|c| format_time(&c))
                        .unwrap_or_else(|| "11:59 PM".to_string());
                    format!("{from} - {to}")
                })
                .collect();
            if spans.is_empty() {
                format!("{name}: Closed")
            } else {
                format!("{name}: {}", spans.join(", "))
            }
        })
        .collect();

    Some(OpeningHours {
        open_now: hours.open_now,
        weekday_text,
    })
}

fn text(value: Option<LocalizedText>) -> Option<String> {
    value.and_then(|t| t.text).filter(|t| !t.trim().is_empty())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn lat_lng(value: ApiLatLng) -> LatLng {
    LatLng {
        lat: value.latitude,
        lng: value.longitude,
    }
}

fn rating(value: Option<f64>) -> f64 {
    value.filter(|r| r.is_finite()).map_or(0.0, |r| r.clamp(0.0, 5.0))
}

fn review(api: ApiReview) -> Review {
    Review {
        author: api
            .author_attribution
            .and_then(|a| non_blank(a.display_name))
            .unwrap_or_else(|| ANONYMOUS.to_string()),
        rating: rating(api.rating),
        text: text(api.text).unwrap_or_default(),
        publish_time: api.publish_time,
        relative_time: api.relative_publish_time_description.unwrap_or_default(),
        // The Places API does not expose owner replies.
        owner_response: None,
    }
}

/// Normalizes a place into a [`Restaurant`]. Places without an id are
/// dropped.
#[must_use]
pub fn restaurant(place: ApiPlace) -> Option<Restaurant> {
    let place_id = non_blank(place.id)?;
    Some(Restaurant {
        place_id,
        name: text(place.display_name).unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        address: place.formatted_address.unwrap_or_default(),
        phone: non_blank(place.national_phone_number),
        website: non_blank(place.website_uri),
        location: place.location.map(lat_lng),
        rating: rating(place.rating),
        total_ratings: place.user_rating_count.unwrap_or(0),
        price_level: price_level(place.price_level.as_deref()),
        types: place.types,
        photos: place
            .photos
            .into_iter()
            .map(|p| Photo {
                name: p.name,
                width: p.width_px,
                height: p.height_px,
            })
            .collect(),
        reviews: place.reviews.into_iter().map(review).collect(),
        hours: place.regular_opening_hours.as_ref().and_then(opening_hours),
        google_maps_uri: non_blank(place.google_maps_uri),
    })
}

/// Normalizes a nearby place into a [`Competitor`] with its distance from
/// `origin`. Places without an id or a location are dropped.
#[must_use]
pub fn competitor(place: ApiPlace, origin: LatLng) -> Option<Competitor> {
    let place_id = non_blank(place.id)?;
    let location = lat_lng(place.location?);
    Some(Competitor {
        place_id,
        name: text(place.display_name).unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        address: place.formatted_address.unwrap_or_default(),
        rating: rating(place.rating),
        total_ratings: place.user_rating_count.unwrap_or(0),
        price_level: price_level(place.price_level.as_deref()),
        types: place.types,
        location: Some(location),
        distance_km: haversine_km(origin, location),
    })
}
