pub mod events;
pub mod prompts;
pub mod render;

pub use events::{EventSink, RunSummary, ScoringEvent};
pub use prompts::prompt_preference;
pub use render::{
    display_recommendations, display_summary, display_updated_halls, log_recommendations,
    log_score_breakdown,
};
