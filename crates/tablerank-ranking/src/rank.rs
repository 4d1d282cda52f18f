//! Combined competitor ranking.
//!
//! Every candidate (the subject first, then its competitors in input order) is
//! scored on similarity to the subject's cuisine, distance and prominence. The
//! weighted sum orders the field; the subject's 1-based position is its rank.

use serde::{Deserialize, Serialize};
use tablerank_core::{Competitor, Restaurant};

use crate::scores::{
    distance_score, finite_or_zero, food_type_similarity, prominence_score_with, quality_score,
    sanitize_rating,
};
use crate::tags::extract_food_types;
use crate::weights::WeightsConfig;

/// Rows shown when printing a ranking table.
pub const DEFAULT_TOP_N: usize = 10;

/// Threshold above which a competitor counts as serving similar food.
pub const SIMILAR_THRESHOLD: u8 = 50;

/// Loosely-typed candidate as accepted from callers. Missing numbers are 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub total_reviews: Option<f64>,
    #[serde(default)]
    pub distance_km: Option<f64>,
}

impl RankInput {
    fn rating(&self) -> f64 {
        sanitize_rating(self.rating.unwrap_or(0.0))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn total_reviews(&self) -> u32 {
        let n = finite_or_zero(self.total_reviews.unwrap_or(0.0)).max(0.0);
        n.floor().min(f64::from(u32::MAX)) as u32
    }

    fn distance_km(&self) -> f64 {
        finite_or_zero(self.distance_km.unwrap_or(0.0)).max(0.0)
    }
}

impl From<&Restaurant> for RankInput {
    fn from(r: &Restaurant) -> Self {
        Self {
            id: Some(r.place_id.clone()),
            name: Some(r.name.clone()),
            tags: r.types.clone(),
            rating: Some(r.rating),
            total_reviews: Some(f64::from(r.total_ratings)),
            distance_km: Some(0.0),
        }
    }
}

impl From<&Competitor> for RankInput {
    fn from(c: &Competitor) -> Self {
        Self {
            id: Some(c.place_id.clone()),
            name: Some(c.name.clone()),
            tags: c.types.clone(),
            rating: Some(c.rating),
            total_reviews: Some(f64::from(c.total_ratings)),
            distance_km: Some(c.distance_km),
        }
    }
}

/// A candidate annotated with its sub-scores and combined ranking score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    pub id: Option<String>,
    pub name: Option<String>,
    pub food_types: Vec<String>,
    pub rating: f64,
    pub total_reviews: u32,
    pub distance_km: f64,
    pub similarity: u8,
    pub distance: u8,
    pub prominence: u8,
    pub quality: u8,
    pub ranking_score: f64,
    pub is_subject: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankOutcome {
    /// 1-based position of the subject.
    pub rank: usize,
    pub total_competitors: usize,
    /// All candidates, best first. Exactly one has `is_subject` set.
    pub scored: Vec<CandidateScore>,
    pub similar_restaurants: usize,
    pub stronger_competitors: usize,
}

impl RankOutcome {
    /// The subject's entry, or `None` when `rank` does not point into
    /// `scored` (possible for hand-built or deserialized outcomes).
    #[must_use]
    pub fn subject(&self) -> Option<&CandidateScore> {
        self.rank.checked_sub(1).and_then(|i| self.scored.get(i))
    }

    /// The best `n` candidates (fewer if the field is smaller).
    #[must_use]
    pub fn top(&self, n: usize) -> &[CandidateScore] {
        &self.scored[..n.min(self.scored.len())]
    }
}

/// Ranks a subject against its competitors with a fixed set of weights.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker {
    weights: WeightsConfig,
}

impl Ranker {
    #[must_use]
    pub fn new(weights: WeightsConfig) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &WeightsConfig {
        &self.weights
    }

    #[must_use]
    pub fn rank(&self, subject: &RankInput, competitors: &[RankInput]) -> RankOutcome {
        let subject_types = extract_food_types(&subject.tags);

        if competitors.is_empty() {
            let only = self.score(subject, subject_types, 100, 100, true);
            return RankOutcome {
                rank: 1,
                total_competitors: 0,
                scored: vec![only],
                similar_restaurants: 0,
                stronger_competitors: 0,
            };
        }

        let mut scored = Vec::with_capacity(competitors.len() + 1);
        scored.push(self.score(
            subject,
            subject_types.clone(),
            food_type_similarity(&subject_types, &subject_types),
            distance_score(subject.distance_km()),
            true,
        ));
        for candidate in competitors {
            let food_types = extract_food_types(&candidate.tags);
            let similarity = food_type_similarity(&subject_types, &food_types);
            let distance = distance_score(candidate.distance_km());
            scored.push(self.score(candidate, food_types, similarity, distance, false));
        }

        // Stable: the subject sits first and keeps its place on exact ties.
        scored.sort_by(|a, b| b.ranking_score.total_cmp(&a.ranking_score));

        let position = scored.iter().position(|c| c.is_subject).unwrap_or(0);
        let subject_score = scored[position].ranking_score;
        let similar_restaurants = scored
            .iter()
            .filter(|c| !c.is_subject && c.similarity > SIMILAR_THRESHOLD)
            .count();
        let stronger_competitors = scored
            .iter()
            .filter(|c| c.ranking_score > subject_score)
            .count();

        tracing::debug!(
            subject = subject.name.as_deref().unwrap_or("unknown"),
            rank = position + 1,
            total = scored.len(),
            "ranking calculated"
        );

        RankOutcome {
            rank: position + 1,
            total_competitors: competitors.len(),
            scored,
            similar_restaurants,
            stronger_competitors,
        }
    }

    fn score(
        &self,
        input: &RankInput,
        food_types: Vec<String>,
        similarity: u8,
        distance: u8,
        is_subject: bool,
    ) -> CandidateScore {
        let rating = input.rating();
        let total_reviews = input.total_reviews();
        let prominence = prominence_score_with(&self.weights.prominence, total_reviews, rating);
        let w = &self.weights.ranking;
        // Weights built in code skip validation; keep the score in range.
        let ranking_score = (f64::from(similarity) * w.similarity
            + f64::from(distance) * w.distance
            + f64::from(prominence) * w.prominence)
            .clamp(0.0, 100.0);

        CandidateScore {
            id: input.id.clone(),
            name: input.name.clone(),
            food_types,
            rating,
            total_reviews,
            distance_km: input.distance_km(),
            similarity,
            distance,
            prominence,
            quality: quality_score(rating, total_reviews),
            ranking_score,
            is_subject,
        }
    }
}

/// Rank with the default weights.
#[must_use]
pub fn compute_rank(subject: &RankInput, competitors: &[RankInput]) -> RankOutcome {
    Ranker::default().rank(subject, competitors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::RankingWeights;

    fn input(id: &str, tags: &[&str], rating: f64, reviews: f64, km: f64) -> RankInput {
        RankInput {
            id: Some(id.to_string()),
            name: Some(id.to_string()),
            tags: tags.iter().map(|t| (*t).to_string()).collect(),
            rating: Some(rating),
            total_reviews: Some(reviews),
            distance_km: Some(km),
        }
    }

    #[test]
    fn zero_competitors_ranks_first() {
        let subject = input("me", &["italian_restaurant"], 4.2, 40.0, 0.0);
        let outcome = compute_rank(&subject, &[]);
        assert_eq!(outcome.rank, 1);
        assert_eq!(outcome.total_competitors, 0);
        assert_eq!(outcome.scored.len(), 1);
        let me = outcome.subject().expect("subject scored");
        assert_eq!(me.similarity, 100);
        assert_eq!(me.distance, 100);
        assert!(me.ranking_score.is_finite());
        let expected = 40.0 + 25.0 + f64::from(me.prominence) * 0.35;
        assert!((me.ranking_score - expected).abs() < 1e-9);
    }

    #[test]
    fn zero_competitors_without_any_data_has_no_nan() {
        let outcome = compute_rank(&RankInput::default(), &[]);
        assert_eq!(outcome.rank, 1);
        let me = outcome.subject().expect("subject scored");
        assert_eq!(me.prominence, 0);
        assert_eq!(me.quality, 0);
        assert!(me.ranking_score.is_finite());
    }

    #[test]
    fn strong_subject_beats_weaker_italian_neighbour() {
        let subject = input("me", &["restaurant", "italian_restaurant"], 4.6, 120.0, 0.0);
        let rival = input("rival", &["italian_restaurant", "food"], 4.0, 30.0, 1.0);
        let outcome = compute_rank(&subject, std::slice::from_ref(&rival));

        let rival_score = outcome
            .scored
            .iter()
            .find(|c| c.id.as_deref() == Some("rival"))
            .unwrap();
        let me = outcome.subject().expect("subject scored");

        assert_eq!(rival_score.similarity, 100);
        assert!(me.prominence > rival_score.prominence);
        assert!(me.ranking_score > rival_score.ranking_score);
        assert_eq!(outcome.rank, 1);
        assert_eq!(outcome.similar_restaurants, 1);
        assert_eq!(outcome.stronger_competitors, 0);
    }

    #[test]
    fn stronger_competitors_push_rank_down() {
        let subject = input("me", &["thai_restaurant"], 3.2, 8.0, 0.0);
        let competitors = vec![
            input("a", &["thai_restaurant"], 4.8, 900.0, 0.2),
            input("b", &["thai_restaurant"], 4.7, 400.0, 0.3),
            input("c", &["sushi_restaurant"], 2.0, 2.0, 9.0),
        ];
        let outcome = compute_rank(&subject, &competitors);
        assert_eq!(outcome.rank, 3);
        assert_eq!(outcome.stronger_competitors, 2);
        assert_eq!(outcome.total_competitors, 3);
        assert_eq!(outcome.scored[0].id.as_deref(), Some("a"));
        assert!(outcome.subject().expect("subject scored").is_subject);
    }

    #[test]
    fn scored_is_sorted_descending() {
        let subject = input("me", &["cafe"], 4.0, 50.0, 0.0);
        let competitors = vec![
            input("a", &["cafe"], 3.0, 5.0, 3.0),
            input("b", &["bakery", "cafe"], 4.9, 2000.0, 0.1),
            input("c", &[], 1.0, 0.0, 12.0),
        ];
        let outcome = compute_rank(&subject, &competitors);
        for pair in outcome.scored.windows(2) {
            assert!(pair[0].ranking_score >= pair[1].ranking_score);
        }
    }

    #[test]
    fn exact_tie_keeps_subject_ahead() {
        let subject = input("me", &["bar"], 4.0, 60.0, 0.0);
        let twin = input("twin", &["bar"], 4.0, 60.0, 0.0);
        let outcome = compute_rank(&subject, std::slice::from_ref(&twin));
        assert_eq!(outcome.rank, 1);
        assert_eq!(outcome.stronger_competitors, 0);
    }

    #[test]
    fn exact_ties_between_competitors_keep_input_order() {
        let subject = input("me", &["bar"], 1.0, 0.0, 30.0);
        let competitors = vec![
            input("first", &["bar"], 4.0, 60.0, 0.5),
            input("second", &["bar"], 4.0, 60.0, 0.5),
        ];
        let outcome = compute_rank(&subject, &competitors);
        assert_eq!(outcome.scored[0].id.as_deref(), Some("first"));
        assert_eq!(outcome.scored[1].id.as_deref(), Some("second"));
    }

    #[test]
    fn missing_and_non_finite_fields_become_zero() {
        let subject = input("me", &["cafe"], 4.0, 10.0, 0.0);
        let broken = RankInput {
            id: Some("broken".to_string()),
            name: None,
            tags: vec!["cafe".to_string()],
            rating: Some(f64::NAN),
            total_reviews: Some(-5.0),
            distance_km: Some(f64::INFINITY),
        };
        let outcome = compute_rank(&subject, std::slice::from_ref(&broken));
        let scored = outcome
            .scored
            .iter()
            .find(|c| c.id.as_deref() == Some("broken"))
            .unwrap();
        assert!(scored.rating.abs() < f64::EPSILON);
        assert_eq!(scored.total_reviews, 0);
        assert_eq!(scored.distance, 100);
        assert_eq!(scored.prominence, 0);
        assert!(scored.ranking_score.is_finite());
    }

    #[test]
    fn rating_above_five_is_clamped() {
        let subject = input("me", &["cafe"], 11.0, 10.0, 0.0);
        let outcome = compute_rank(&subject, &[]);
        let me = outcome.subject().expect("subject scored");
        assert!((me.rating - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn subject_without_cuisine_tags_has_zero_similarity() {
        let subject = input("me", &["restaurant"], 4.0, 10.0, 0.0);
        let rival = input("rival", &["cafe"], 4.0, 10.0, 0.5);
        let outcome = compute_rank(&subject, std::slice::from_ref(&rival));
        assert_eq!(outcome.subject().expect("subject scored").similarity, 0);
        assert_eq!(outcome.similar_restaurants, 0);
    }

    #[test]
    fn top_truncates_to_available() {
        let subject = input("me", &["cafe"], 4.0, 10.0, 0.0);
        let competitors: Vec<RankInput> = (0..15)
            .map(|i| input(&format!("c{i}"), &["cafe"], 3.5, f64::from(i), 1.0))
            .collect();
        let outcome = compute_rank(&subject, &competitors);
        assert_eq!(outcome.top(DEFAULT_TOP_N).len(), 10);
        assert_eq!(outcome.top(100).len(), 16);
    }

    #[test]
    fn unnormalised_weights_keep_scores_in_range() {
        let subject = input("me", &["cafe"], 5.0, 5000.0, 0.0);
        let rival = input("rival", &["cafe"], 4.5, 800.0, 0.2);
        let doubled = WeightsConfig {
            ranking: RankingWeights {
                similarity: 2.0,
                distance: 2.0,
                prominence: 2.0,
            },
            ..WeightsConfig::default()
        };
        let outcome = Ranker::new(doubled).rank(&subject, std::slice::from_ref(&rival));
        for candidate in &outcome.scored {
            assert!(
                (0.0..=100.0).contains(&candidate.ranking_score),
                "{:?} scored {}",
                candidate.name,
                candidate.ranking_score
            );
        }
        let me = outcome.subject().expect("subject scored");
        assert!((me.ranking_score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn weights_within_sum_tolerance_never_exceed_100() {
        let yaml = "ranking:\n  similarity: 0.4000009\n  distance: 0.25\n  prominence: 0.35\n";
        let weights = WeightsConfig::from_yaml(yaml).expect("within tolerance");
        let subject = input("me", &["cafe"], 5.0, 100_000.0, 0.0);
        let outcome = Ranker::new(weights).rank(&subject, &[]);
        let me = outcome.subject().expect("subject scored");
        assert!(me.ranking_score <= 100.0, "score {}", me.ranking_score);
    }

    #[test]
    fn subject_is_none_for_out_of_range_rank() {
        let mut outcome = compute_rank(&input("me", &["cafe"], 4.0, 10.0, 0.0), &[]);
        outcome.rank = 0;
        assert!(outcome.subject().is_none());
        outcome.rank = 2;
        assert!(outcome.subject().is_none());
    }

    #[test]
    fn custom_weights_change_the_order() {
        let subject = input("me", &["cafe"], 5.0, 2000.0, 0.0);
        let near = input("near", &["cafe"], 3.0, 5.0, 0.0);
        let distance_only = WeightsConfig {
            ranking: RankingWeights {
                similarity: 0.0,
                distance: 1.0,
                prominence: 0.0,
            },
            ..WeightsConfig::default()
        };
        let outcome = Ranker::new(distance_only).rank(&subject, std::slice::from_ref(&near));
        // Equal distance scores; the tie resolves in the subject's favour.
        assert_eq!(outcome.rank, 1);
        assert!((outcome.scored[0].ranking_score - 100.0).abs() < 1e-9);
        assert!((outcome.scored[1].ranking_score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn restaurant_conversion_uses_zero_distance() {
        let mut r = Restaurant::new("p1", "Trattoria");
        r.rating = 4.4;
        r.total_ratings = 77;
        r.types = vec!["italian_restaurant".to_string()];
        let input = RankInput::from(&r);
        assert_eq!(input.distance_km, Some(0.0));
        assert_eq!(input.total_reviews, Some(77.0));
    }
}
