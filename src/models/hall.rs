use serde::{Deserialize, Serialize};

use crate::models::NutritionRecord;

/// A row of the dining hall nutrition table as read from disk.
///
/// `food_variety` and `recent_penalty` are only present on tables that were
/// already updated once; they are resolved to neutral values in
/// [`DiningHallStats::from_record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiningHallRecord {
    pub dining_hall: String,
    pub calories: f64,
    pub protein: f64,
    pub total_carbohydrate: f64,
    pub total_fat: f64,
    pub meal_health: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_variety: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_penalty: Option<f64>,
}

impl DiningHallRecord {
    pub fn new(dining_hall: &str, nutrition: NutritionRecord, meal_health: f64) -> Self {
        Self {
            dining_hall: dining_hall.to_string(),
            calories: nutrition.calories,
            protein: nutrition.protein_g,
            total_carbohydrate: nutrition.carbohydrate_g,
            total_fat: nutrition.fat_g,
            meal_health,
            food_variety: None,
            recent_penalty: None,
        }
    }
}

/// Per-hall statistics used by the preference-keyed regime.
///
/// Recomputed on every run; the CSV copy on disk is a cache. Serializes with
/// the table's column names so the updated table keeps the input schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiningHallStats {
    pub dining_hall: String,

    #[serde(rename = "calories")]
    pub mean_calories: f64,

    #[serde(rename = "protein")]
    pub mean_protein: f64,

    #[serde(rename = "total_carbohydrate")]
    pub mean_carbs: f64,

    #[serde(rename = "total_fat")]
    pub mean_fat: f64,

    #[serde(rename = "meal_health")]
    pub mean_health_score: f64,

    pub food_variety: f64,
    pub recent_penalty: f64,
}

/// A cached signal from a re-read table, clamped to [0, 1]. Missing or NaN
/// values are neutral.
fn cached_signal(value: Option<f64>) -> f64 {
    match value {
        Some(v) if !v.is_nan() => v.clamp(0.0, 1.0),
        _ => 1.0,
    }
}

impl DiningHallStats {
    /// Build stats from a table row, defaulting missing signals to 1.0.
    pub fn from_record(record: &DiningHallRecord) -> Self {
        Self {
            dining_hall: record.dining_hall.clone(),
            mean_calories: record.calories,
            mean_protein: record.protein,
            mean_carbs: record.total_carbohydrate,
            mean_fat: record.total_fat,
            mean_health_score: record.meal_health,
            food_variety: cached_signal(record.food_variety),
            recent_penalty: cached_signal(record.recent_penalty),
        }
    }
}
