use clap::Parser;
use std::io;
use std::path::Path;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dining_recommender_rs::cli::{Cli, Command, HallFiles, LookupArgs};
use dining_recommender_rs::error::Result;
use dining_recommender_rs::lookup::build_lookup;
use dining_recommender_rs::models::{DiningHallStats, Recommendation};
use dining_recommender_rs::report::{
    display_recommendations, display_summary, display_updated_halls, log_recommendations,
    log_score_breakdown, prompt_preference, RunSummary,
};
use dining_recommender_rs::scoring::{
    analyze_meals, build_knowledge_base, enrich_meals, hall_averages, rank_meals,
    recommend_dining_halls, resolve_preference, update_dining_halls, ScoringConfig,
};
use dining_recommender_rs::state::{
    load_knowledge_base_or_discard, load_meal_list, load_or_create_dining_halls,
    load_visits_if_present, read_menu_items, save_dining_hall_stats, save_hall_averages,
    save_knowledge_base, save_scored_meals,
};

const KNOWLEDGE_BASE_DELAY_MS: u64 = 500;
const ENRICH_DELAY_MS: u64 = 1000;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env("DINING_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => ScoringConfig::load(path)?,
        None => ScoringConfig::default(),
    };
    let today = Local::now().date_naive();
    let mut summary = RunSummary::new();

    let result = match cli.command.unwrap_or_default() {
        Command::Recommend {
            preference,
            top_k,
            files,
        } => cmd_recommend(&files, preference, top_k, today, &config, &mut summary),
        Command::Update { files } => {
            cmd_update(&files, today, &config, &mut summary).map(|_| ())
        }
        Command::RankMeals { db, top_k, lookup } => {
            cmd_rank_meals(&db, top_k, &lookup, today, &config, &mut summary)
        }
        Command::BuildDb { db, lookup } => cmd_build_db(&db, &lookup, today, &config, &mut summary),
        Command::Enrich {
            meals,
            output,
            averages,
            lookup,
        } => cmd_enrich(&meals, &output, &averages, &lookup, &config, &mut summary),
    };

    display_summary(&summary);
    result
}

/// Recompute variety and recency from the visit log and save the table.
fn cmd_update(
    files: &HallFiles,
    today: NaiveDate,
    config: &ScoringConfig,
    summary: &mut RunSummary,
) -> Result<Vec<DiningHallStats>> {
    let halls = load_or_create_dining_halls(&files.halls, summary)?;
    let visits = load_visits_if_present(&files.visits, summary)?;

    let updated = update_dining_halls(&halls, visits.as_deref(), today, config);
    save_dining_hall_stats(&files.output, &updated)?;
    info!(path = %files.output.display(), halls = updated.len(), "saved updated dining halls");

    display_updated_halls(&updated);
    Ok(updated)
}

/// Update the table, then rank halls under the chosen preference.
fn cmd_recommend(
    files: &HallFiles,
    preference: Option<String>,
    top_k: usize,
    today: NaiveDate,
    config: &ScoringConfig,
    summary: &mut RunSummary,
) -> Result<()> {
    let updated = cmd_update(files, today, config, summary)?;

    let input = match preference {
        Some(p) => p,
        None => prompt_preference()?,
    };
    let preference = resolve_preference(&input, summary);
    info!(%preference, "ranking dining halls");

    let ranked = recommend_dining_halls(updated, preference, top_k, config)?;
    display_recommendations(&ranked);
    Ok(())
}

/// Read a JSON menu from stdin and write ranked halls as JSON to stdout.
fn cmd_rank_meals(
    db: &Path,
    top_k: Option<usize>,
    lookup: &LookupArgs,
    today: NaiveDate,
    config: &ScoringConfig,
    summary: &mut RunSummary,
) -> Result<()> {
    let items = read_menu_items(io::stdin().lock())?;
    info!(items = items.len(), "read menu items");

    let kb = match load_knowledge_base_or_discard(db, summary) {
        Some(kb) => kb,
        None => {
            let service = build_lookup(&lookup.to_config(KNOWLEDGE_BASE_DELAY_MS))?;
            let kb = build_knowledge_base(&items, service.as_ref(), config, summary);
            if let Err(e) = save_knowledge_base(db, &kb, today) {
                warn!(path = %db.display(), error = %e, "could not save knowledge base");
            }
            kb
        }
    };

    let meals = analyze_meals(&items, &kb, config, summary);
    let ranked = rank_meals(&meals, top_k, config)?;
    log_score_breakdown(&ranked);

    let recommendations: Vec<Recommendation> =
        ranked.iter().map(|hall| hall.to_recommendation()).collect();
    log_recommendations(&recommendations);

    println!("{}", serde_json::to_string_pretty(&recommendations)?);
    Ok(())
}

/// Query the lookup service for every menu item on stdin and save the result.
fn cmd_build_db(
    db: &Path,
    lookup: &LookupArgs,
    today: NaiveDate,
    config: &ScoringConfig,
    summary: &mut RunSummary,
) -> Result<()> {
    let items = read_menu_items(io::stdin().lock())?;
    let service = build_lookup(&lookup.to_config(KNOWLEDGE_BASE_DELAY_MS))?;

    let kb = build_knowledge_base(&items, service.as_ref(), config, summary);
    save_knowledge_base(db, &kb, today)?;

    println!("Saved {} meals to {}", kb.len(), db.display());
    Ok(())
}

/// Look up every listed meal and write per-meal and per-hall tables.
fn cmd_enrich(
    meals_path: &Path,
    output: &Path,
    averages: &Path,
    lookup: &LookupArgs,
    config: &ScoringConfig,
    summary: &mut RunSummary,
) -> Result<()> {
    let items = load_meal_list(meals_path)?;
    let lookup_config = lookup.to_config(ENRICH_DELAY_MS);
    let service = build_lookup(&lookup_config)?;

    let meals = enrich_meals(
        &items,
        service.as_ref(),
        lookup_config.calorie_offset,
        config,
        summary,
    );
    save_scored_meals(output, &meals)?;
    println!("Saved {} meals to {}", meals.len(), output.display());

    let halls = hall_averages(&meals);
    save_hall_averages(averages, &halls)?;
    println!("Saved {} dining halls to {}", halls.len(), averages.display());
    Ok(())
}
