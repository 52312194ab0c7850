mod hall;
mod menu;
mod nutrition;
mod recommendation;

pub use hall::{DiningHallRecord, DiningHallStats};
pub use menu::{parse_visit_date, MenuItem, Visit, PLACEHOLDER_MEAL_NAMES};
pub use nutrition::{KnowledgeEntry, NutritionRecord};
pub use recommendation::{Insights, MacroAverages, Recommendation, ScoreBreakdown, ScoredMeal};
