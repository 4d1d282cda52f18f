//! Individual 0-100 sub-scores feeding the combined ranking.

use std::collections::HashSet;

use crate::weights::ProminenceWeights;

/// Per-kilometre decay rate of the distance score.
const DISTANCE_DECAY: f64 = 0.15;

/// Round and clamp a raw score into `0..=100`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn to_score(raw: f64) -> u8 {
    if !raw.is_finite() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as u8
}

/// Replace NaN/infinite values with zero.
pub(crate) fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Star ratings outside `0..=5` are clamped; non-finite ratings become 0.
pub(crate) fn sanitize_rating(rating: f64) -> f64 {
    finite_or_zero(rating).clamp(0.0, 5.0)
}

/// Jaccard similarity of two cuisine tag lists, scaled to 0-100.
///
/// Tags are compared as sets. Returns 0 when either side is empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn food_type_similarity<S: AsRef<str>>(a: &[S], b: &[S]) -> u8 {
    let a: HashSet<&str> = a.iter().map(AsRef::as_ref).collect();
    let b: HashSet<&str> = b.iter().map(AsRef::as_ref).collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let matches = a.intersection(&b).count();
    if matches == 0 {
        return 0;
    }
    let union = a.union(&b).count();
    to_score(matches as f64 / union as f64 * 100.0)
}

/// Exponential distance decay: 100 at 0 km, about 86 at 1 km, 47 at 5 km.
///
/// Negative or non-finite distances count as 0 km.
#[must_use]
pub fn distance_score(distance_km: f64) -> u8 {
    let d = finite_or_zero(distance_km).max(0.0);
    if d == 0.0 {
        return 100;
    }
    to_score(100.0 * (-DISTANCE_DECAY * d).exp())
}

/// Engagement bonus for places that are both well reviewed and well rated.
#[must_use]
pub fn engagement_bonus(total_reviews: u32, rating: f64) -> f64 {
    if total_reviews > 100 && rating >= 4.5 {
        15.0
    } else if total_reviews > 50 && rating >= 4.0 {
        10.0
    } else if total_reviews > 20 && rating >= 3.5 {
        5.0
    } else {
        0.0
    }
}

/// Prominence with the default review-count / rating weights.
#[must_use]
pub fn prominence_score(total_reviews: u32, rating: f64) -> u8 {
    prominence_score_with(&ProminenceWeights::default(), total_reviews, rating)
}

/// How well known a place is, from review volume, star rating and an
/// engagement bonus.
#[must_use]
pub fn prominence_score_with(weights: &ProminenceWeights, total_reviews: u32, rating: f64) -> u8 {
    let rating = sanitize_rating(rating);
    let review_count_score = (f64::from(total_reviews) + 1.0).log10() * 33.0;
    let review_count_score = review_count_score.min(100.0);
    let rating_score = rating / 5.0 * 100.0;
    let bonus = engagement_bonus(total_reviews, rating);

    to_score(review_count_score * weights.review_count + rating_score * weights.rating + bonus)
}

/// Rating-weighted quality score. Reported only; the ranking never sorts on it.
#[must_use]
pub fn quality_score(rating: f64, total_reviews: u32) -> u8 {
    let rating_score = sanitize_rating(rating) / 5.0 * 100.0;
    let review_score = ((f64::from(total_reviews) + 1.0).log10() * 30.0).min(100.0);
    to_score(rating_score * 0.6 + review_score * 0.4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similarity_identical_sets_is_100() {
        let a = ["italian_restaurant", "pizza_restaurant"];
        assert_eq!(food_type_similarity(&a, &a), 100);
    }

    #[test]
    fn similarity_empty_side_is_zero() {
        let a = ["italian_restaurant"];
        let empty: [&str; 0] = [];
        assert_eq!(food_type_similarity(&a, &empty), 0);
        assert_eq!(food_type_similarity(&empty, &a), 0);
        assert_eq!(food_type_similarity(&empty, &empty), 0);
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = ["italian_restaurant", "pizza_restaurant", "bar"];
        let b = ["pizza_restaurant", "cafe"];
        assert_eq!(food_type_similarity(&a, &b), food_type_similarity(&b, &a));
    }

    #[test]
    fn similarity_partial_overlap() {
        // 1 shared out of 3 distinct
        let a = ["italian_restaurant", "pizza_restaurant"];
        let b = ["pizza_restaurant", "cafe"];
        assert_eq!(food_type_similarity(&a, &b), 33);
    }

    #[test]
    fn similarity_disjoint_is_zero() {
        let a = ["thai_restaurant"];
        let b = ["sushi_restaurant"];
        assert_eq!(food_type_similarity(&a, &b), 0);
    }

    #[test]
    fn similarity_ignores_duplicates() {
        let a = ["bar", "bar", "cafe"];
        let b = ["bar"];
        assert_eq!(food_type_similarity(&a, &b), 50);
    }

    #[test]
    fn distance_zero_is_100() {
        assert_eq!(distance_score(0.0), 100);
    }

    #[test]
    fn distance_known_values() {
        assert_eq!(distance_score(1.0), 86);
        assert_eq!(distance_score(5.0), 47);
        assert_eq!(distance_score(10.0), 22);
    }

    #[test]
    fn distance_decreases_until_zero() {
        let mut prev = distance_score(0.0);
        for step in 1..=40 {
            let d = f64::from(step);
            let s = distance_score(d);
            assert!(s <= prev, "increased at {d} km: {s} > {prev}");
            if d <= 20.0 {
                assert!(s < prev, "not strictly decreasing at {d} km");
            }
            prev = s;
        }
        assert_eq!(distance_score(1000.0), 0);
    }

    #[test]
    fn distance_negative_or_nan_treated_as_zero() {
        assert_eq!(distance_score(-3.0), 100);
        assert_eq!(distance_score(f64::NAN), 100);
        assert_eq!(distance_score(f64::INFINITY), 100);
    }

    #[test]
    fn prominence_no_reviews_no_rating_is_zero() {
        assert_eq!(prominence_score(0, 0.0), 0);
    }

    #[test]
    fn prominence_top_tier_bonus() {
        // log10(121)*33*0.5 + 92*0.4 + 15 = 86.17
        assert_eq!(prominence_score(120, 4.6), 86);
    }

    #[test]
    fn prominence_low_tier_bonus() {
        // log10(31)*33*0.5 + 80*0.4 + 5 = 61.61
        assert_eq!(prominence_score(30, 4.0), 62);
    }

    #[test]
    fn prominence_is_bounded() {
        for reviews in [0, 1, 10, 100, 1_000, 100_000, u32::MAX] {
            for rating in [0.0, 1.0, 2.5, 4.0, 4.5, 5.0] {
                let p = prominence_score(reviews, rating);
                assert!(p <= 100, "prominence {p} for {reviews}/{rating}");
            }
        }
    }

    #[test]
    fn prominence_clamps_out_of_range_rating() {
        assert_eq!(prominence_score(10, 9.0), prominence_score(10, 5.0));
        assert_eq!(prominence_score(10, f64::NAN), prominence_score(10, 0.0));
    }

    #[test]
    fn engagement_bonus_tiers() {
        assert!((engagement_bonus(101, 4.5) - 15.0).abs() < f64::EPSILON);
        assert!((engagement_bonus(100, 4.5) - 10.0).abs() < f64::EPSILON);
        assert!((engagement_bonus(51, 4.0) - 10.0).abs() < f64::EPSILON);
        assert!((engagement_bonus(21, 3.5) - 5.0).abs() < f64::EPSILON);
        assert!(engagement_bonus(20, 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn quality_known_value() {
        // 92*0.6 + log10(121)*30*0.4 = 80.19
        assert_eq!(quality_score(4.6, 120), 80);
        assert_eq!(quality_score(0.0, 0), 0);
    }
}
