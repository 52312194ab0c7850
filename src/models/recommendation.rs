use serde::{Deserialize, Serialize};

use crate::models::NutritionRecord;

/// A menu item with its resolved nutrition and health score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMeal {
    pub dining_hall: String,
    pub meal_name: String,
    pub nutrition: NutritionRecord,
    pub meal_health: f64,
}

/// Component signals and final score for one dining hall.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub health: f64,
    pub protein: f64,
    pub variety: f64,
    pub calorie_balance: f64,
    #[serde(skip)]
    pub final_score: f64,
}

/// Mean macro values across a hall's menu.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroAverages {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub dining_hall: String,
    pub menu_size: usize,
    pub avg_health_score: f64,
    pub avg_macros: MacroAverages,
}

/// Output record of meal-inventory ranking. Values are rounded for presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub dining_hall: String,
    pub score: f64,
    pub scores: ScoreBreakdown,
    pub insights: Insights,
}
