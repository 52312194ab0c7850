pub mod cli;
pub mod error;
pub mod lookup;
pub mod models;
pub mod report;
pub mod scoring;
pub mod state;

pub use error::{DiningError, Result};
pub use models::{DiningHallStats, MenuItem, NutritionRecord, Recommendation};
