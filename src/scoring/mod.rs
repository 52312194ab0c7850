pub mod config;
pub mod constants;
pub mod matcher;
pub mod normalize;
pub mod pipeline;
pub mod ranking;
pub mod recency;
pub mod variety;
pub mod weights;

pub use config::{MatchPolicy, MealTargets, NutrientReference, ScoringConfig, VisitPolicy};
pub use matcher::{FuzzyMealMatcher, MatchOutcome, Resolution};
pub use normalize::{meal_health, normalize, NutrientSignals};
pub use pipeline::{
    analyze_meals, build_knowledge_base, enrich_meals, hall_averages, rank_meals,
    recommend_dining_halls, resolve_preference, update_dining_halls,
};
pub use ranking::{rank_by_score, round_to, top_k, MenuSummary, RankedHall, ScoredHall};
pub use weights::{MultiSignalWeights, Preference, PreferenceWeights};
