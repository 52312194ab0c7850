use crate::models::{DiningHallStats, Recommendation};
use crate::report::RunSummary;
use crate::scoring::ranking::{RankedHall, ScoredHall};

/// Print the recommended halls (preference-keyed ranking).
pub fn display_recommendations(ranked: &[ScoredHall]) {
    if ranked.is_empty() {
        println!("No dining halls to recommend.");
        return;
    }

    println!();
    println!("=== Recommended Dining Hall(s) ===");
    println!();

    for hall in ranked {
        let stats = &hall.stats;
        println!("Dining Hall: {}", stats.dining_hall);
        println!("Average Calories: {}", stats.mean_calories);
        println!("Meal Health: {}", stats.mean_health_score);
        println!("Food Variety: {:.2}", stats.food_variety);
        println!("Recent Penalty: {}", stats.recent_penalty);
        println!("Combined Score: {:.2}", hall.score);
        println!("{}", "-".repeat(40));
    }
}

/// Print the variety/recency columns of an updated table.
pub fn display_updated_halls(halls: &[DiningHallStats]) {
    let width = halls
        .iter()
        .map(|h| h.dining_hall.len())
        .max()
        .unwrap_or(11)
        .max(11);

    println!();
    println!(
        "{:<width$}  {:>12}  {:>14}",
        "dining_hall",
        "food_variety",
        "recent_penalty",
        width = width
    );
    for hall in halls {
        println!(
            "{:<width$}  {:>12.3}  {:>14.2}",
            hall.dining_hall,
            hall.food_variety,
            hall.recent_penalty,
            width = width
        );
    }
    println!();
}

/// Write per-signal scores and the final order to stderr.
pub fn log_score_breakdown(ranked: &[RankedHall]) {
    eprintln!();
    eprintln!("Raw dining hall scores:");
    eprintln!("------------------------");
    for hall in ranked {
        let b = &hall.breakdown;
        eprintln!("{}:", hall.dining_hall);
        eprintln!("  Health: {:.3}", b.health);
        eprintln!("  Protein: {:.3}", b.protein);
        eprintln!("  Variety: {:.3}", b.variety);
        eprintln!("  Calorie Balance: {:.3}", b.calorie_balance);
        eprintln!("  Final Score: {:.3}", b.final_score);
    }

    eprintln!();
    eprintln!("Final Rankings:");
    eprintln!("---------------");
    for (i, hall) in ranked.iter().enumerate() {
        eprintln!(
            "{}. {} (Score: {:.3})",
            i + 1,
            hall.dining_hall,
            hall.breakdown.final_score
        );
    }
}

/// Write the emitted recommendations to stderr.
pub fn log_recommendations(recommendations: &[Recommendation]) {
    eprintln!();
    eprintln!("Top dining hall recommendations:");
    for (i, rec) in recommendations.iter().enumerate() {
        eprintln!();
        eprintln!("{}. {}", i + 1, rec.dining_hall);
        eprintln!("   Overall Score: {}", rec.score);
        eprintln!("   Health Score: {}", rec.scores.health);
        eprintln!("   Protein Score: {}", rec.scores.protein);
        eprintln!("   Variety Score: {}", rec.scores.variety);
        eprintln!("   Calorie Balance: {}", rec.scores.calorie_balance);
        eprintln!("   Menu Size: {}", rec.insights.menu_size);
        eprintln!("   Avg Health Score: {}", rec.insights.avg_health_score);
        eprintln!("   Avg Calories: {}", rec.insights.avg_macros.calories);
    }
}

/// Human summary of recovered conditions, always written to stderr.
pub fn display_summary(summary: &RunSummary) {
    eprintln!();
    eprintln!("--- Run Summary ---");
    eprintln!("Unmatched meals (default record): {}", summary.unmatched_meals());
    eprintln!("Fuzzy-matched meals: {}", summary.fuzzy_matches());
    eprintln!("Lookup misses: {}", summary.lookup_misses());
    eprintln!("Skipped placeholder entries: {}", summary.skipped_placeholders());
    eprintln!("Substituted preferences: {}", summary.substituted_preferences());
    eprintln!("File fallbacks: {}", summary.file_fallbacks());
}
