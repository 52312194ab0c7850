use crate::models::NutritionRecord;
use crate::scoring::config::NutrientReference;

/// Clamp to [0, 1]. NaN maps to 0 so it can never reach a weighted sum.
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// The four normalized nutrient-quality signals of one meal.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NutrientSignals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl NutrientSignals {
    /// Mean of the four signals: the meal health score.
    pub fn meal_health(&self) -> f64 {
        (self.calories + self.protein + self.carbs + self.fat) / 4.0
    }
}

/// Lower calories score higher; at or above `max_calories` the signal is 0.
pub fn calorie_minimization_signal(calories: f64, reference: &NutrientReference) -> f64 {
    clamp_unit((reference.max_calories - calories) / reference.max_calories)
}

/// Normalize raw nutrients onto [0, 1] quality signals.
pub fn normalize(record: &NutritionRecord, reference: &NutrientReference) -> NutrientSignals {
    NutrientSignals {
        calories: calorie_minimization_signal(record.calories, reference),
        protein: clamp_unit(record.protein_g / reference.reference_protein),
        carbs: clamp_unit(1.0 - record.carbohydrate_g / reference.reference_carbs),
        fat: clamp_unit(1.0 - record.fat_g / reference.reference_fat),
    }
}

/// Health score of one meal, in [0, 1].
pub fn meal_health(record: &NutritionRecord, reference: &NutrientReference) -> f64 {
    normalize(record, reference).meal_health()
}
