//! Heuristic local-SEO score from the completeness of a Places listing.

use serde::{Deserialize, Serialize};
use tablerank_core::Restaurant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SeoFactors {
    /// Out of 40.
    pub google_business: u8,
    /// Out of 30.
    pub review_management: u8,
    /// Out of 20.
    pub website_optimization: u8,
    /// Out of 10.
    pub online_presence: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoBreakdown {
    pub google_business: String,
    pub review_management: String,
    pub website_optimization: String,
    pub online_presence: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoScore {
    pub score: u8,
    pub factors: SeoFactors,
    pub breakdown: SeoBreakdown,
}

fn google_business_points(r: &Restaurant) -> u8 {
    let mut points = 0;
    if !r.name.trim().is_empty() {
        points += 5;
    }
    if !r.address.trim().is_empty() {
        points += 5;
    }
    if r.phone.as_deref().is_some_and(|p| !p.trim().is_empty()) {
        points += 5;
    }
    if r.hours.is_some() {
        points += 5;
    }
    if !r.photos.is_empty() {
        points += 10;
    }
    if r.photos.len() > 5 {
        points += 5;
    }
    if !r.types.is_empty() {
        points += 5;
    }
    points
}

fn review_points(rating: f64, total_ratings: u32) -> u8 {
    let rating_points = if rating >= 4.5 {
        15
    } else if rating >= 4.0 {
        12
    } else if rating >= 3.5 {
        8
    } else {
        4
    };
    let volume_points = match total_ratings {
        n if n >= 100 => 15,
        n if n >= 50 => 10,
        n if n >= 25 => 5,
        _ => 0,
    };
    rating_points + volume_points
}

#[must_use]
pub fn seo_score(restaurant: &Restaurant) -> SeoScore {
    let factors = SeoFactors {
        google_business: google_business_points(restaurant),
        review_management: review_points(restaurant.rating, restaurant.total_ratings),
        website_optimization: if restaurant.has_website() { 15 } else { 0 },
        // Being listed on Google at all counts for most of this bucket.
        online_presence: 8,
    };
    let total = u16::from(factors.google_business)
        + u16::from(factors.review_management)
        + u16::from(factors.website_optimization)
        + u16::from(factors.online_presence);

    SeoScore {
        score: u8::try_from(total.min(100)).unwrap_or(100),
        breakdown: SeoBreakdown {
            google_business: format!("{}/40", factors.google_business),
            review_management: format!("{}/30", factors.review_management),
            website_optimization: format!("{}/20", factors.website_optimization),
            online_presence: format!("{}/10", factors.online_presence),
        },
        factors,
    }
}
