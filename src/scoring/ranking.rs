use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::{DiningError, Result};
use crate::models::{
    DiningHallStats, Insights, MacroAverages, Recommendation, ScoreBreakdown, ScoredMeal,
};
use crate::scoring::config::ScoringConfig;
use crate::scoring::constants::{MACRO_DECIMALS, SCORE_DECIMALS};
use crate::scoring::weights::{
    multi_signal_score, preference_score, MultiSignals, PreferenceWeights,
};

/// Round to a fixed number of decimals. Only used when emitting output.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn descending(a: f64, b: f64) -> Ordering {
    let fix = |v: f64| if v.is_nan() { 0.0 } else { v };
    fix(b).total_cmp(&fix(a))
}

/// Sort by score, highest first. Equal scores keep their input order.
pub fn rank_by_score<T, F>(mut items: Vec<T>, score: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    // sort_by is stable
    items.sort_by(|a, b| descending(score(a), score(b)));
    items
}

/// Keep the first `k` ranked entries. `k` must be at least 1.
pub fn top_k<T>(mut ranked: Vec<T>, k: usize) -> Result<Vec<T>> {
    if k == 0 {
        return Err(DiningError::InvalidInput(
            "top-k must be at least 1".to_string(),
        ));
    }
    ranked.truncate(k);
    Ok(ranked)
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregated-hall ranking (preference-keyed regime)
// ─────────────────────────────────────────────────────────────────────────────

/// A dining hall with its preference-regime score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredHall {
    pub stats: DiningHallStats,
    pub score: f64,
}

/// Score and rank halls under a preference's weights.
pub fn rank_halls(
    halls: Vec<DiningHallStats>,
    weights: &PreferenceWeights,
    config: &ScoringConfig,
) -> Vec<ScoredHall> {
    let scored: Vec<ScoredHall> = halls
        .into_iter()
        .map(|stats| {
            let score = preference_score(&stats, weights, &config.nutrients);
            ScoredHall { stats, score }
        })
        .collect();
    rank_by_score(scored, |h: &ScoredHall| h.score)
}

// ─────────────────────────────────────────────────────────────────────────────
// Meal-inventory ranking (fixed multi-signal regime)
// ─────────────────────────────────────────────────────────────────────────────

/// Unrounded per-hall means over the menu.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MenuSummary {
    pub menu_size: usize,
    pub mean_health: f64,
    pub mean_macros: MacroAverages,
}

impl MenuSummary {
    pub fn from_meals(meals: &[&ScoredMeal]) -> Self {
        let menu_size = meals.len();
        if menu_size == 0 {
            return Self::default();
        }

        let n = menu_size as f64;
        let mean = |f: fn(&ScoredMeal) -> f64| meals.iter().map(|&m| f(m)).sum::<f64>() / n;

        Self {
            menu_size,
            mean_health: mean(|m| m.meal_health),
            mean_macros: MacroAverages {
                calories: mean(|m| m.nutrition.calories),
                protein: mean(|m| m.nutrition.protein_g),
                carbs: mean(|m| m.nutrition.carbohydrate_g),
                fat: mean(|m| m.nutrition.fat_g),
            },
        }
    }
}

/// A ranked hall with unrounded scores.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedHall {
    pub dining_hall: String,
    pub breakdown: ScoreBreakdown,
    pub summary: MenuSummary,
}

impl RankedHall {
    /// Presentation form: scores to 3 places, macro grams to 1 place.
    pub fn to_recommendation(&self) -> Recommendation {
        let s = |v: f64| round_to(if v.is_nan() { 0.0 } else { v }, SCORE_DECIMALS);
        let g = |v: f64| round_to(if v.is_nan() { 0.0 } else { v }, MACRO_DECIMALS);
        let b = &self.breakdown;
        let macros = &self.summary.mean_macros;

        Recommendation {
            dining_hall: self.dining_hall.clone(),
            score: s(b.final_score),
            scores: ScoreBreakdown {
                health: s(b.health),
                protein: s(b.protein),
                variety: s(b.variety),
                calorie_balance: s(b.calorie_balance),
                final_score: s(b.final_score),
            },
            insights: Insights {
                dining_hall: self.dining_hall.clone(),
                menu_size: self.summary.menu_size,
                avg_health_score: s(self.summary.mean_health),
                avg_macros: MacroAverages {
                    calories: g(macros.calories),
                    protein: g(macros.protein),
                    carbs: g(macros.carbs),
                    fat: g(macros.fat),
                },
            },
        }
    }
}

/// Group meals by hall, halls in order of first appearance.
pub fn group_by_hall(meals: &[ScoredMeal]) -> Vec<(&str, Vec<&ScoredMeal>)> {
    let mut order: Vec<(&str, Vec<&ScoredMeal>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for meal in meals {
        let hall = meal.dining_hall.as_str();
        match index.get(hall) {
            Some(&i) => order[i].1.push(meal),
            None => {
                index.insert(hall, order.len());
                order.push((hall, vec![meal]));
            }
        }
    }

    order
}

/// Score every hall's menu with the fixed multi-signal weights and rank.
pub fn rank_meal_inventory(meals: &[ScoredMeal], config: &ScoringConfig) -> Vec<RankedHall> {
    let halls: Vec<RankedHall> = group_by_hall(meals)
        .into_iter()
        .map(|(hall, menu)| {
            let summary = MenuSummary::from_meals(&menu);
            let signals = MultiSignals::from_hall(
                summary.mean_health,
                summary.mean_macros.protein,
                summary.menu_size,
                summary.mean_macros.calories,
                &config.targets,
            );
            let final_score = multi_signal_score(&signals, &config.weights);

            RankedHall {
                dining_hall: hall.to_string(),
                breakdown: ScoreBreakdown {
                    health: signals.health,
                    protein: signals.protein,
                    variety: signals.variety,
                    calorie_balance: signals.calorie_balance,
                    final_score,
                },
                summary,
            }
        })
        .collect();

    rank_by_score(halls, |h: &RankedHall| h.breakdown.final_score)
}
