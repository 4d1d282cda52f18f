//! Cuisine tag filtering.
//!
//! Places tags mix cuisine labels with generic ones (`restaurant`, `food`,
//! `point_of_interest`). Only the cuisine labels carry signal for similarity.

/// Place types that describe what a restaurant serves.
pub const FOOD_TYPES: &[&str] = &[
    "american_restaurant",
    "bakery",
    "bar",
    "barbecue_restaurant",
    "brazilian_restaurant",
    "breakfast_restaurant",
    "brunch_restaurant",
    "cafe",
    "chinese_restaurant",
    "coffee_shop",
    "fast_food_restaurant",
    "french_restaurant",
    "greek_restaurant",
    "hamburger_restaurant",
    "ice_cream_shop",
    "indian_restaurant",
    "indonesian_restaurant",
    "italian_restaurant",
    "japanese_restaurant",
    "korean_restaurant",
    "lebanese_restaurant",
    "meal_delivery",
    "meal_takeaway",
    "mediterranean_restaurant",
    "mexican_restaurant",
    "middle_eastern_restaurant",
    "pizza_restaurant",
    "ramen_restaurant",
    "sandwich_shop",
    "seafood_restaurant",
    "spanish_restaurant",
    "steak_house",
    "sushi_restaurant",
    "thai_restaurant",
    "turkish_restaurant",
    "vegan_restaurant",
    "vegetarian_restaurant",
    "vietnamese_restaurant",
];

#[must_use]
pub fn is_food_type(tag: &str) -> bool {
    FOOD_TYPES.contains(&tag)
}

/// Keep only whitelisted cuisine tags, in input order.
#[must_use]
pub fn extract_food_types<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    tags.iter()
        .map(AsRef::as_ref)
        .filter(|t| is_food_type(t))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_cuisine_tags_in_order() {
        let tags = ["restaurant", "pizza_restaurant", "food", "italian_restaurant"];
        assert_eq!(
            extract_food_types(&tags),
            vec!["pizza_restaurant", "italian_restaurant"]
        );
    }

    #[test]
    fn generic_tags_are_dropped() {
        let tags = ["restaurant", "food", "point_of_interest", "establishment"];
        assert!(extract_food_types(&tags).is_empty());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let tags: [&str; 0] = [];
        assert!(extract_food_types(&tags).is_empty());
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert!(!is_food_type("Italian_Restaurant"));
        assert!(is_food_type("italian_restaurant"));
    }

    #[test]
    fn whitelist_has_no_duplicates() {
        let mut sorted = FOOD_TYPES.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), FOOD_TYPES.len());
    }
}
