use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::lookup::{LookupConfig, CALORIE_OFFSET, DEFAULT_ENDPOINT};

/// Dining hall recommender: scores halls on nutrition, variety and recency.
#[derive(Parser, Debug)]
#[command(name = "dining_recommender")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// JSON file overriding the scoring constants.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level (overridden by DINING_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Args, Debug, Clone)]
pub struct HallFiles {
    /// Per-hall averages table.
    #[arg(long, default_value = "dining_hall_averages.csv")]
    pub halls: PathBuf,

    /// Visit log (dining_hall, meal_name, visit_date).
    #[arg(long, default_value = "dining_visits.csv")]
    pub visits: PathBuf,

    /// Where to write the updated table.
    #[arg(long, default_value = "dining_halls_updated.csv")]
    pub output: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct LookupArgs {
    #[arg(long, env = "NUTRITIONIX_APP_ID", hide_env_values = true)]
    pub app_id: Option<String>,

    #[arg(long, env = "NUTRITIONIX_APP_KEY", hide_env_values = true)]
    pub app_key: Option<String>,

    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Pause between requests in milliseconds (defaults per command).
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

impl LookupArgs {
    pub fn to_config(&self, default_delay_ms: u64) -> LookupConfig {
        LookupConfig {
            endpoint: self.endpoint.clone(),
            app_id: self.app_id.clone(),
            app_key: self.app_key.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            delay: Duration::from_millis(self.delay_ms.unwrap_or(default_delay_ms)),
            calorie_offset: CALORIE_OFFSET,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Update the hall table from the visit log and recommend halls.
    Recommend {
        /// healthy, variety or balanced. Prompts when omitted.
        #[arg(short, long)]
        preference: Option<String>,

        /// Number of halls to show.
        #[arg(short = 'k', long, default_value_t = 1)]
        top_k: usize,

        #[command(flatten)]
        files: HallFiles,
    },

    /// Recompute food variety and recency penalties only.
    Update {
        #[command(flatten)]
        files: HallFiles,
    },

    /// Rank halls from a JSON menu on stdin; writes JSON to stdout.
    RankMeals {
        /// Nutrition knowledge base.
        #[arg(long, default_value = "nutritionix_db.json")]
        db: PathBuf,

        /// Emit only the best N halls.
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        #[command(flatten)]
        lookup: LookupArgs,
    },

    /// Rebuild the nutrition knowledge base from a JSON menu on stdin.
    BuildDb {
        #[arg(long, default_value = "nutritionix_db.json")]
        db: PathBuf,

        #[command(flatten)]
        lookup: LookupArgs,
    },

    /// Look up every meal in a CSV list and write per-hall averages.
    Enrich {
        /// Meal list (dining_hall, meal_name).
        #[arg(long, default_value = "meals.csv")]
        meals: PathBuf,

        /// Per-meal nutrients and health scores.
        #[arg(long, default_value = "meals_with_nutrients_and_health.csv")]
        output: PathBuf,

        /// Per-hall averages, the input of `recommend`.
        #[arg(long, default_value = "dining_hall_averages.csv")]
        averages: PathBuf,

        #[command(flatten)]
        lookup: LookupArgs,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Recommend {
            preference: None,
            top_k: 1,
            files: HallFiles {
                halls: PathBuf::from("dining_hall_averages.csv"),
                visits: PathBuf::from("dining_visits.csv"),
                output: PathBuf::from("dining_halls_updated.csv"),
            },
        }
    }
}
