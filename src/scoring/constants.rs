use crate::models::NutritionRecord;

// ─────────────────────────────────────────────────────────────────────────────
// Nutrient normalization references
// ─────────────────────────────────────────────────────────────────────────────

/// Calories at or above this normalize to 0.
pub const MAX_CALORIES: f64 = 1500.0;

/// Protein (g) that earns a full protein signal.
pub const REFERENCE_PROTEIN: f64 = 50.0;

/// Carbohydrate (g) at which the carb signal reaches 0.
pub const REFERENCE_CARBS: f64 = 150.0;

/// Fat (g) at which the fat signal reaches 0.
pub const REFERENCE_FAT: f64 = 70.0;

// ─────────────────────────────────────────────────────────────────────────────
// Visit history
// ─────────────────────────────────────────────────────────────────────────────

/// Raw variety (unique meals / visits) below this is punished.
pub const VARIETY_THRESHOLD: f64 = 0.5;

/// Multiplier applied to raw variety below the threshold.
pub const PUNISHMENT_FACTOR: f64 = 0.8;

/// Visits fewer than this many days ago trigger the recency penalty.
pub const DAYS_THRESHOLD: i64 = 0;

/// Score multiplier for recently visited halls.
pub const RECENCY_PENALTY: f64 = 0.8;

// ─────────────────────────────────────────────────────────────────────────────
// Meal matching
// ─────────────────────────────────────────────────────────────────────────────

/// Minimum similarity (0-100) for a fuzzy knowledge-base match.
pub const FUZZY_MATCH_THRESHOLD: f64 = 85.0;

/// Record used when a meal cannot be resolved.
pub const DEFAULT_NUTRITION: NutritionRecord = NutritionRecord::new(250.0, 8.0, 30.0, 10.0);

// ─────────────────────────────────────────────────────────────────────────────
// Meal-inventory targets
// ─────────────────────────────────────────────────────────────────────────────

pub const TARGET_CALORIES_PER_MEAL: f64 = 600.0;
pub const TARGET_PROTEIN_PER_MEAL: f64 = 25.0;
pub const TARGET_MIN_MENU_ITEMS: f64 = 5.0;

// ─────────────────────────────────────────────────────────────────────────────
// Weights
// ─────────────────────────────────────────────────────────────────────────────

/// Allowed drift of a weight set's sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

pub const MULTI_SIGNAL_HEALTH_WEIGHT: f64 = 0.4;
pub const MULTI_SIGNAL_PROTEIN_WEIGHT: f64 = 0.2;
pub const MULTI_SIGNAL_VARIETY_WEIGHT: f64 = 0.2;
pub const MULTI_SIGNAL_CALORIE_WEIGHT: f64 = 0.2;

// ─────────────────────────────────────────────────────────────────────────────
// Output precision
// ─────────────────────────────────────────────────────────────────────────────

/// Decimal places for reported scores.
pub const SCORE_DECIMALS: u32 = 3;

/// Decimal places for reported macro grams.
pub const MACRO_DECIMALS: u32 = 1;

/// Decimal places for the hall averages table.
pub const AVERAGES_DECIMALS: u32 = 2;
