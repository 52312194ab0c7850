#[macro_use]
extern crate assert_float_eq;

use chrono::NaiveDate;

use dining_recommender_rs::models::{DiningHallRecord, DiningHallStats, NutritionRecord, Visit};
use dining_recommender_rs::scoring::normalize::calorie_minimization_signal;
use dining_recommender_rs::scoring::recency::recent_penalty;
use dining_recommender_rs::scoring::variety::{raw_variety, variety_ratio_signal};
use dining_recommender_rs::scoring::{
    meal_health, normalize, rank_by_score, recommend_dining_halls, update_dining_halls,
    MultiSignalWeights, NutrientReference, Preference, ScoringConfig, VisitPolicy,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn stats(name: &str, calories: f64, health: f64) -> DiningHallStats {
    DiningHallStats::from_record(&DiningHallRecord::new(
        name,
        NutritionRecord::new(calories, 30.0, 40.0, 15.0),
        health,
    ))
}

#[test]
fn test_normalizer_bounds() {
    let reference = NutrientReference::default();
    let records = [
        NutritionRecord::new(0.0, 0.0, 0.0, 0.0),
        NutritionRecord::new(5000.0, 400.0, 900.0, 300.0),
        NutritionRecord::new(-20.0, -5.0, -1.0, -3.0),
        NutritionRecord::new(450.0, 30.0, 15.0, 10.0),
    ];

    for record in &records {
        let signals = normalize(record, &reference);
        for v in [signals.calories, signals.protein, signals.carbs, signals.fat] {
            assert!((0.0..=1.0).contains(&v), "{:?} -> {}", record, v);
        }
        let health = meal_health(record, &reference);
        assert!((0.0..=1.0).contains(&health));
    }
}

#[test]
fn test_calorie_signal_at_reference() {
    let reference = NutrientReference::default();
    assert_float_absolute_eq!(calorie_minimization_signal(1500.0, &reference), 0.0, 1e-12);
    assert_float_absolute_eq!(calorie_minimization_signal(600.0, &reference), 0.6, 1e-12);
}

#[test]
fn test_variety_threshold_boundary() {
    let policy = VisitPolicy::default();

    // 2 unique over 4 visits sits exactly on the threshold: no punishment
    let at = raw_variety(["Pasta", "Pasta", "Soup", "Soup"]).unwrap();
    assert_float_absolute_eq!(variety_ratio_signal(at, &policy), 0.5, 1e-12);

    // 1 unique over 4 visits is punished
    let below = raw_variety(["Pasta", "Pasta", "Pasta", "Pasta"]).unwrap();
    assert_float_absolute_eq!(variety_ratio_signal(below, &policy), 0.2, 1e-12);
}

#[test]
fn test_recency_boundary_is_strict() {
    let policy = VisitPolicy::default();
    let today = date(2025, 3, 10);
    assert_eq!(recent_penalty(today, today, &policy), 1.0);
    assert_eq!(recent_penalty(date(2025, 3, 1), today, &policy), 1.0);
    assert_eq!(recent_penalty(date(2025, 3, 11), today, &policy), 0.8);
}

#[test]
fn test_zero_visits_is_neutral() {
    let halls = vec![DiningHallRecord::new(
        "Ferris",
        NutritionRecord::new(500.0, 20.0, 40.0, 12.0),
        0.75,
    )];
    let visits: Vec<Visit> = vec![Visit::new("John Jay", "Pasta", date(2025, 3, 1))];

    let updated = update_dining_halls(
        &halls,
        Some(&visits),
        date(2025, 3, 10),
        &ScoringConfig::default(),
    );
    assert_eq!(updated[0].food_variety, 1.0);
    assert_eq!(updated[0].recent_penalty, 1.0);
}

#[test]
fn test_weight_sets_sum_to_one() {
    for pref in Preference::ALL {
        assert_float_absolute_eq!(pref.weights().sum(), 1.0, 1e-9);
    }
    assert_float_absolute_eq!(MultiSignalWeights::default().sum(), 1.0, 1e-9);
}

#[test]
fn test_healthy_ranks_lighter_hall_first() {
    let halls = vec![stats("B", 600.0, 0.70), stats("A", 450.0, 0.85)];
    let ranked =
        recommend_dining_halls(halls, Preference::Healthy, 2, &ScoringConfig::default()).unwrap();

    assert_eq!(ranked[0].stats.dining_hall, "A");
    assert_float_absolute_eq!(ranked[0].score, 0.835, 1e-9);
    assert_eq!(ranked[1].stats.dining_hall, "B");
    assert_float_absolute_eq!(ranked[1].score, 0.73, 1e-9);
}

#[test]
fn test_top_k_zero_is_rejected() {
    let halls = vec![stats("A", 450.0, 0.85)];
    assert!(recommend_dining_halls(halls, Preference::Balanced, 0, &ScoringConfig::default()).is_err());
}

#[test]
fn test_ranking_is_stable_for_ties() {
    let items = vec![("first", 0.5), ("second", 0.9), ("third", 0.5), ("fourth", f64::NAN)];
    let ranked = rank_by_score(items, |&(_, s)| s);
    let names: Vec<&str> = ranked.iter().map(|(n, _)| *n).collect();
    assert_eq!(names, vec!["second", "first", "third", "fourth"]);
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = ScoringConfig::default();
    config.weights.health = 0.9;
    assert!(config.validate().is_err());

    let mut config = ScoringConfig::default();
    config.nutrients.max_calories = 0.0;
    assert!(config.validate().is_err());
}
