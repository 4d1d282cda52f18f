//! Competitor ranking for restaurants: cuisine similarity, distance decay and
//! prominence combined into a single local-search position.

pub mod change;
pub mod rank;
pub mod scores;
pub mod tags;
pub mod weights;

pub use change::{ranking_change, Direction, RankingChange};
pub use rank::{compute_rank, CandidateScore, RankInput, RankOutcome, Ranker, DEFAULT_TOP_N};
pub use scores::{
    distance_score, food_type_similarity, prominence_score, prominence_score_with, quality_score,
};
pub use tags::{extract_food_types, FOOD_TYPES};
pub use weights::{load_weights, ProminenceWeights, RankingWeights, WeightsConfig, WeightsError};
