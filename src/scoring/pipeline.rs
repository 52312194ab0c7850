use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::error::Result;
use crate::lookup::{first_food_entry, meal_tags, summed_meal_record, NutritionLookup};
use crate::models::{DiningHallRecord, DiningHallStats, KnowledgeEntry, MenuItem, ScoredMeal, Visit};
use crate::report::{EventSink, ScoringEvent};
use crate::scoring::config::ScoringConfig;
use crate::scoring::matcher::{FuzzyMealMatcher, MatchOutcome};
use crate::scoring::normalize::meal_health;
use crate::scoring::ranking::{
    group_by_hall, rank_halls, rank_meal_inventory, top_k, MenuSummary, RankedHall, ScoredHall,
};
use crate::scoring::recency::recent_penalty_or_neutral;
use crate::scoring::variety::food_variety;
use crate::scoring::weights::Preference;
use crate::state::KnowledgeBase;

// ─────────────────────────────────────────────────────────────────────────────
// Aggregated-hall flow
// ─────────────────────────────────────────────────────────────────────────────

/// Recompute `food_variety` and `recent_penalty` for every hall.
///
/// Without a visit log the table's own values (or neutral defaults) are kept.
/// With one, halls absent from the log get 1.0 for both. Row order follows
/// the table.
pub fn update_dining_halls(
    halls: &[DiningHallRecord],
    visits: Option<&[Visit]>,
    today: NaiveDate,
    config: &ScoringConfig,
) -> Vec<DiningHallStats> {
    let Some(visits) = visits else {
        return halls.iter().map(DiningHallStats::from_record).collect();
    };

    let mut by_hall: HashMap<&str, Vec<&Visit>> = HashMap::new();
    for visit in visits {
        by_hall.entry(visit.dining_hall.as_str()).or_default().push(visit);
    }

    halls
        .iter()
        .map(|record| {
            let mut stats = DiningHallStats::from_record(record);
            let hall_visits = by_hall
                .get(record.dining_hall.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);

            stats.food_variety = food_variety(hall_visits, &config.visits).unwrap_or(1.0);
            let last_visit = hall_visits.iter().map(|v| v.visit_date).max();
            stats.recent_penalty = recent_penalty_or_neutral(last_visit, today, &config.visits);
            stats
        })
        .collect()
}

/// Parse a preference, substituting `balanced` (with an event) when invalid.
pub fn resolve_preference(input: &str, sink: &mut dyn EventSink) -> Preference {
    let (preference, substituted) = Preference::resolve(input);
    if substituted {
        sink.record(ScoringEvent::PreferenceSubstituted {
            given: input.to_string(),
        });
    }
    preference
}

/// Rank halls under a preference and keep the top `k`.
pub fn recommend_dining_halls(
    halls: Vec<DiningHallStats>,
    preference: Preference,
    k: usize,
    config: &ScoringConfig,
) -> Result<Vec<ScoredHall>> {
    let ranked = rank_halls(halls, &preference.weights(), config);
    top_k(ranked, k)
}

// ─────────────────────────────────────────────────────────────────────────────
// Meal-inventory flow
// ─────────────────────────────────────────────────────────────────────────────

/// Unique, non-placeholder meals in first-seen order.
fn unique_meals<'a>(items: &'a [MenuItem], sink: &mut dyn EventSink) -> Vec<&'a MenuItem> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for item in items {
        if item.is_placeholder() {
            sink.record(ScoringEvent::PlaceholderSkipped {
                meal: item.meal_name.clone(),
            });
            continue;
        }
        if seen.insert(item.meal_name.as_str()) {
            unique.push(item);
        }
    }
    unique
}

/// Query the lookup service for every unique meal and build a knowledge base.
///
/// Meals the service cannot resolve are stored with the default record.
pub fn build_knowledge_base(
    items: &[MenuItem],
    lookup: &dyn NutritionLookup,
    config: &ScoringConfig,
    sink: &mut dyn EventSink,
) -> KnowledgeBase {
    let meals = unique_meals(items, sink);
    info!(count = meals.len(), "building nutrition database");

    let mut kb = KnowledgeBase::new();
    for item in meals {
        let found = lookup
            .lookup_foods(&item.meal_name)
            .and_then(|foods| first_food_entry(&foods));

        let entry = match found {
            Some(mut entry) => {
                entry.tags = meal_tags(
                    &entry.record,
                    &item.meal_name,
                    &item.dining_hall,
                    item.meal_type.as_deref(),
                );
                lookup.throttle();
                entry
            }
            None => {
                sink.record(ScoringEvent::LookupMissed {
                    query: item.meal_name.clone(),
                });
                KnowledgeEntry::from(config.matching.default_record)
            }
        };
        kb.insert(&item.meal_name, entry);
    }

    kb
}

/// Resolve nutrition for every menu item and compute its health score.
///
/// Placeholder entries are skipped. Unresolvable names get the default record
/// and are reported through the sink.
pub fn analyze_meals(
    items: &[MenuItem],
    kb: &KnowledgeBase,
    config: &ScoringConfig,
    sink: &mut dyn EventSink,
) -> Vec<ScoredMeal> {
    let matcher = FuzzyMealMatcher::new(kb, &config.matching);
    let mut meals = Vec::with_capacity(items.len());

    for item in items {
        if item.is_placeholder() {
            sink.record(ScoringEvent::PlaceholderSkipped {
                meal: item.meal_name.clone(),
            });
            continue;
        }

        let resolution = matcher.resolve(&item.meal_name);
        match &resolution.outcome {
            MatchOutcome::Exact => {}
            MatchOutcome::Fuzzy { matched, score } => sink.record(ScoringEvent::FuzzyMatched {
                query: item.meal_name.clone(),
                matched: matched.clone(),
                score: *score,
            }),
            MatchOutcome::Default { .. } => sink.record(ScoringEvent::DefaultRecordUsed {
                meal: item.meal_name.clone(),
            }),
        }

        let nutrition = resolution.record.sanitized();
        meals.push(ScoredMeal {
            dining_hall: item.dining_hall.clone(),
            meal_name: item.meal_name.clone(),
            nutrition,
            meal_health: meal_health(&nutrition, &config.nutrients),
        });
    }

    for (hall, menu) in group_by_hall(&meals) {
        debug!(hall, meals = menu.len(), "meal count");
    }

    meals
}

/// Rank halls by their meal inventory, optionally keeping the top `k`.
pub fn rank_meals(
    meals: &[ScoredMeal],
    k: Option<usize>,
    config: &ScoringConfig,
) -> Result<Vec<RankedHall>> {
    let ranked = rank_meal_inventory(meals, config);
    match k {
        Some(k) => top_k(ranked, k),
        None => Ok(ranked),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hall averages flow
// ─────────────────────────────────────────────────────────────────────────────

/// Query every listed meal (summed foods, calorie offset) and score it.
///
/// Each row is queried separately, duplicates included.
pub fn enrich_meals(
    items: &[MenuItem],
    lookup: &dyn NutritionLookup,
    calorie_offset: f64,
    config: &ScoringConfig,
    sink: &mut dyn EventSink,
) -> Vec<ScoredMeal> {
    let mut meals = Vec::with_capacity(items.len());

    for item in items {
        let nutrition = match lookup.lookup_foods(&item.meal_name) {
            Some(foods) => summed_meal_record(&foods, calorie_offset),
            None => {
                sink.record(ScoringEvent::LookupMissed {
                    query: item.meal_name.clone(),
                });
                config.matching.default_record
            }
        };
        lookup.throttle();

        debug!(
            meal = %item.meal_name,
            calories = nutrition.calories,
            protein = nutrition.protein_g,
            carbs = nutrition.carbohydrate_g,
            fat = nutrition.fat_g,
            "enriched meal"
        );

        meals.push(ScoredMeal {
            dining_hall: item.dining_hall.clone(),
            meal_name: item.meal_name.clone(),
            nutrition,
            meal_health: meal_health(&nutrition, &config.nutrients),
        });
    }

    meals
}

/// Mean nutrients and health per hall, halls in first-seen order.
pub fn hall_averages(meals: &[ScoredMeal]) -> Vec<DiningHallRecord> {
    group_by_hall(meals)
        .into_iter()
        .map(|(hall, menu)| {
            let summary = MenuSummary::from_meals(&menu);
            let macros = summary.mean_macros;
            DiningHallRecord {
                dining_hall: hall.to_string(),
                calories: macros.calories,
                protein: macros.protein,
                total_carbohydrate: macros.carbs,
                total_fat: macros.fat,
                meal_health: summary.mean_health,
                food_variety: None,
                recent_penalty: None,
            }
        })
        .collect()
}
