use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DiningError, Result};
use crate::models::DiningHallStats;
use crate::scoring::config::{MealTargets, NutrientReference};
use crate::scoring::constants::*;
use crate::scoring::normalize::{calorie_minimization_signal, clamp_unit};

fn check_sum(name: &str, weights: &[f64]) -> Result<()> {
    if weights.iter().any(|w| !(*w >= 0.0)) {
        return Err(DiningError::InvalidConfig(format!(
            "{} weights must be non-negative",
            name
        )));
    }
    let sum: f64 = weights.iter().sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(DiningError::InvalidConfig(format!(
            "{} weights sum to {}, expected 1.0",
            name, sum
        )));
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Preference-keyed regime
// ─────────────────────────────────────────────────────────────────────────────

/// Weights over {meal health, calorie minimization, food variety}.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreferenceWeights {
    health: f64,
    calorie: f64,
    variety: f64,
}

impl PreferenceWeights {
    pub fn new(health: f64, calorie: f64, variety: f64) -> Result<Self> {
        check_sum("preference", &[health, calorie, variety])?;
        Ok(Self {
            health,
            calorie,
            variety,
        })
    }

    pub const fn health(&self) -> f64 {
        self.health
    }

    pub const fn calorie(&self) -> f64 {
        self.calorie
    }

    pub const fn variety(&self) -> f64 {
        self.variety
    }

    pub fn sum(&self) -> f64 {
        self.health + self.calorie + self.variety
    }
}

const HEALTHY_WEIGHTS: PreferenceWeights = PreferenceWeights {
    health: 0.5,
    calorie: 0.3,
    variety: 0.2,
};

const VARIETY_WEIGHTS: PreferenceWeights = PreferenceWeights {
    health: 0.3,
    calorie: 0.2,
    variety: 0.5,
};

const BALANCED_WEIGHTS: PreferenceWeights = PreferenceWeights {
    health: 0.4,
    calorie: 0.3,
    variety: 0.3,
};

/// A user's dining preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Healthy,
    Variety,
    #[default]
    Balanced,
}

impl Preference {
    pub const ALL: [Preference; 3] = [Preference::Healthy, Preference::Variety, Preference::Balanced];

    /// Parse a preference name (case-insensitive, surrounding whitespace ignored).
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "healthy" => Some(Preference::Healthy),
            "variety" => Some(Preference::Variety),
            "balanced" => Some(Preference::Balanced),
            _ => None,
        }
    }

    /// Parse, substituting `Balanced` for unrecognized input.
    ///
    /// The flag is true when a substitution happened so the caller can tell
    /// the user.
    pub fn resolve(input: &str) -> (Self, bool) {
        match Self::parse(input) {
            Some(pref) => (pref, false),
            None => (Preference::Balanced, true),
        }
    }

    pub const fn weights(self) -> PreferenceWeights {
        match self {
            Preference::Healthy => HEALTHY_WEIGHTS,
            Preference::Variety => VARIETY_WEIGHTS,
            Preference::Balanced => BALANCED_WEIGHTS,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Preference::Healthy => "healthy",
            Preference::Variety => "variety",
            Preference::Balanced => "balanced",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Preference::Healthy => "prioritize healthy food (high meal_health and low calories)",
            Preference::Variety => "prioritize a wide selection of food",
            Preference::Balanced => "a mix of both",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Score a hall under a preference: weighted signals times the recency penalty.
pub fn preference_score(
    stats: &DiningHallStats,
    weights: &PreferenceWeights,
    reference: &NutrientReference,
) -> f64 {
    let health = clamp_unit(stats.mean_health_score);
    let calorie = calorie_minimization_signal(stats.mean_calories, reference);
    let variety = clamp_unit(stats.food_variety);
    let penalty = if stats.recent_penalty.is_nan() {
        1.0
    } else {
        stats.recent_penalty
    };

    let base = weights.health * health + weights.calorie * calorie + weights.variety * variety;
    base * penalty
}

// ─────────────────────────────────────────────────────────────────────────────
// Fixed multi-signal regime
// ─────────────────────────────────────────────────────────────────────────────

/// Weights over {health, protein, variety, calorie balance}.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiSignalWeights {
    pub health: f64,
    pub protein: f64,
    pub variety: f64,
    pub calorie: f64,
}

impl Default for MultiSignalWeights {
    fn default() -> Self {
        Self {
            health: MULTI_SIGNAL_HEALTH_WEIGHT,
            protein: MULTI_SIGNAL_PROTEIN_WEIGHT,
            variety: MULTI_SIGNAL_VARIETY_WEIGHT,
            calorie: MULTI_SIGNAL_CALORIE_WEIGHT,
        }
    }
}

impl MultiSignalWeights {
    pub fn validate(&self) -> Result<()> {
        check_sum(
            "multi-signal",
            &[self.health, self.protein, self.variety, self.calorie],
        )
    }

    pub fn sum(&self) -> f64 {
        self.health + self.protein + self.variety + self.calorie
    }
}

/// Mean protein relative to the per-meal target.
pub fn protein_target_signal(mean_protein: f64, targets: &MealTargets) -> f64 {
    clamp_unit(mean_protein / targets.protein_per_meal)
}

/// Menu size relative to the minimum for good variety.
pub fn menu_count_signal(menu_items: usize, targets: &MealTargets) -> f64 {
    clamp_unit(menu_items as f64 / targets.min_menu_items)
}

/// Closeness of mean calories to the per-meal target; 1 at the target.
pub fn calorie_target_proximity_signal(mean_calories: f64, targets: &MealTargets) -> f64 {
    clamp_unit(
        1.0 - (mean_calories - targets.calories_per_meal).abs() / targets.calories_per_meal,
    )
}

/// The four clamped inputs of the multi-signal regime.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MultiSignals {
    pub health: f64,
    pub protein: f64,
    pub variety: f64,
    pub calorie_balance: f64,
}

impl MultiSignals {
    /// Build from per-hall aggregates. Every signal is clamped; NaN becomes 0.
    pub fn from_hall(
        mean_health: f64,
        mean_protein: f64,
        menu_items: usize,
        mean_calories: f64,
        targets: &MealTargets,
    ) -> Self {
        Self {
            health: clamp_unit(mean_health),
            protein: protein_target_signal(mean_protein, targets),
            variety: menu_count_signal(menu_items, targets),
            calorie_balance: calorie_target_proximity_signal(mean_calories, targets),
        }
    }
}

/// Weighted sum of the four signals. Not re-clamped: inputs are bounded and
/// the weights sum to 1.
pub fn multi_signal_score(signals: &MultiSignals, weights: &MultiSignalWeights) -> f64 {
    weights.health * clamp_unit(signals.health)
        + weights.protein * clamp_unit(signals.protein)
        + weights.variety * clamp_unit(signals.variety)
        + weights.calorie * clamp_unit(signals.calorie_balance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hall(calories: f64, health: f64, variety: f64, penalty: f64) -> DiningHallStats {
        DiningHallStats {
            dining_hall: "Hall".to_string(),
            mean_calories: calories,
            mean_protein: 0.0,
            mean_carbs: 0.0,
            mean_fat: 0.0,
            mean_health_score: health,
            food_variety: variety,
            recent_penalty: penalty,
        }
    }

    #[test]
    fn test_preference_weights_sum_to_one() {
        for pref in Preference::ALL {
            assert!((pref.weights().sum() - 1.0).abs() <= 1e-9, "{}", pref);
        }
        assert!((MultiSignalWeights::default().sum() - 1.0).abs() <= 1e-9);
        assert!(MultiSignalWeights::default().validate().is_ok());
    }

    #[test]
    fn test_weight_construction_rejects_bad_sum() {
        assert!(PreferenceWeights::new(0.5, 0.5, 0.5).is_err());
        assert!(PreferenceWeights::new(1.2, -0.1, -0.1).is_err());
        assert!(PreferenceWeights::new(0.2, 0.3, 0.5).is_ok());
    }

    #[test]
    fn test_preference_resolve() {
        assert_eq!(Preference::resolve(" Healthy "), (Preference::Healthy, false));
        assert_eq!(Preference::resolve("variety"), (Preference::Variety, false));
        assert_eq!(Preference::resolve("cheap"), (Preference::Balanced, true));
        assert_eq!(Preference::resolve(""), (Preference::Balanced, true));
    }

    #[test]
    fn test_healthy_scores() {
        let reference = NutrientReference::default();
        let weights = Preference::Healthy.weights();
        let a = preference_score(&hall(450.0, 0.85, 1.0, 1.0), &weights, &reference);
        let b = preference_score(&hall(600.0, 0.70, 1.0, 1.0), &weights, &reference);
        assert!((a - 0.835).abs() < 1e-9);
        assert!((b - 0.73).abs() < 1e-9);
    }

    #[test]
    fn test_recent_penalty_multiplies() {
        let reference = NutrientReference::default();
        let weights = Preference::Balanced.weights();
        let fresh = preference_score(&hall(500.0, 0.8, 1.0, 1.0), &weights, &reference);
        let recent = preference_score(&hall(500.0, 0.8, 1.0, 0.8), &weights, &reference);
        assert!((recent - fresh * 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_multi_signal_definitions() {
        let targets = MealTargets::default();
        assert_eq!(protein_target_signal(50.0, &targets), 1.0);
        assert!((protein_target_signal(20.0, &targets) - 0.8).abs() < 1e-12);
        assert_eq!(menu_count_signal(0, &targets), 0.0);
        assert!((menu_count_signal(3, &targets) - 0.6).abs() < 1e-12);
        assert_eq!(menu_count_signal(12, &targets), 1.0);
        assert_eq!(calorie_target_proximity_signal(600.0, &targets), 1.0);
        assert!((calorie_target_proximity_signal(450.0, &targets) - 0.75).abs() < 1e-12);
        assert!((calorie_target_proximity_signal(750.0, &targets) - 0.75).abs() < 1e-12);
        assert_eq!(calorie_target_proximity_signal(1300.0, &targets), 0.0);
    }

    #[test]
    fn test_multi_signal_nan_is_zero() {
        let signals = MultiSignals {
            health: f64::NAN,
            protein: 1.0,
            variety: 1.0,
            calorie_balance: 1.0,
        };
        let score = multi_signal_score(&signals, &MultiSignalWeights::default());
        assert!((score - 0.6).abs() < 1e-12);
    }
}
