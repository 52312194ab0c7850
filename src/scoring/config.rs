use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DiningError, Result};
use crate::models::NutritionRecord;
use crate::scoring::constants::*;
use crate::scoring::weights::MultiSignalWeights;

/// Reference values for nutrient normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientReference {
    pub max_calories: f64,
    pub reference_protein: f64,
    pub reference_carbs: f64,
    pub reference_fat: f64,
}

impl Default for NutrientReference {
    fn default() -> Self {
        Self {
            max_calories: MAX_CALORIES,
            reference_protein: REFERENCE_PROTEIN,
            reference_carbs: REFERENCE_CARBS,
            reference_fat: REFERENCE_FAT,
        }
    }
}

/// Thresholds for the visit-history signals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisitPolicy {
    pub variety_threshold: f64,
    pub punishment_factor: f64,
    pub days_threshold: i64,
    pub recency_penalty: f64,
}

impl Default for VisitPolicy {
    fn default() -> Self {
        Self {
            variety_threshold: VARIETY_THRESHOLD,
            punishment_factor: PUNISHMENT_FACTOR,
            days_threshold: DAYS_THRESHOLD,
            recency_penalty: RECENCY_PENALTY,
        }
    }
}

/// Fuzzy matching threshold and the record used when nothing matches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPolicy {
    pub fuzzy_threshold: f64,
    pub default_record: NutritionRecord,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            fuzzy_threshold: FUZZY_MATCH_THRESHOLD,
            default_record: DEFAULT_NUTRITION,
        }
    }
}

/// Per-meal targets used by the multi-signal regime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MealTargets {
    pub calories_per_meal: f64,
    pub protein_per_meal: f64,
    pub min_menu_items: f64,
}

impl Default for MealTargets {
    fn default() -> Self {
        Self {
            calories_per_meal: TARGET_CALORIES_PER_MEAL,
            protein_per_meal: TARGET_PROTEIN_PER_MEAL,
            min_menu_items: TARGET_MIN_MENU_ITEMS,
        }
    }
}

/// Every tunable value of the scoring pipeline.
///
/// Built once (defaults or a JSON override file) and passed by reference into
/// each component; nothing reads scoring constants from global state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub nutrients: NutrientReference,
    pub visits: VisitPolicy,
    pub matching: MatchPolicy,
    pub targets: MealTargets,
    pub weights: MultiSignalWeights,
}

impl ScoringConfig {
    /// Load overrides from a JSON file. Missing keys keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the [0,1] signal bounds.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("max_calories", self.nutrients.max_calories),
            ("reference_protein", self.nutrients.reference_protein),
            ("reference_carbs", self.nutrients.reference_carbs),
            ("reference_fat", self.nutrients.reference_fat),
            ("calories_per_meal", self.targets.calories_per_meal),
            ("protein_per_meal", self.targets.protein_per_meal),
            ("min_menu_items", self.targets.min_menu_items),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(DiningError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let factors = [
            ("punishment_factor", self.visits.punishment_factor),
            ("recency_penalty", self.visits.recency_penalty),
        ];
        for (name, value) in factors {
            if !(value > 0.0 && value <= 1.0) {
                return Err(DiningError::InvalidConfig(format!(
                    "{} must be in (0, 1], got {}",
                    name, value
                )));
            }
        }

        if !(0.0..=100.0).contains(&self.matching.fuzzy_threshold) {
            return Err(DiningError::InvalidConfig(format!(
                "fuzzy_threshold must be in [0, 100], got {}",
                self.matching.fuzzy_threshold
            )));
        }

        if self.matching.default_record.has_nan() {
            return Err(DiningError::InvalidConfig(
                "default_record must not contain NaN".to_string(),
            ));
        }

        self.weights.validate()
    }
}
