use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{DiningError, Result};
use crate::models::{
    DiningHallRecord, DiningHallStats, KnowledgeEntry, MenuItem, NutritionRecord, ScoredMeal,
    Visit,
};
use crate::report::{EventSink, ScoringEvent};
use crate::scoring::constants::AVERAGES_DECIMALS;
use crate::scoring::ranking::round_to;
use crate::state::KnowledgeBase;

// ─────────────────────────────────────────────────────────────────────────────
// Dining hall table
// ─────────────────────────────────────────────────────────────────────────────

/// The fixed four-hall dataset written when no table exists.
pub fn sample_dining_halls() -> Vec<DiningHallRecord> {
    vec![
        DiningHallRecord::new("Dining Hall A", NutritionRecord::new(450.0, 30.0, 15.0, 10.0), 0.85),
        DiningHallRecord::new("Dining Hall B", NutritionRecord::new(600.0, 25.0, 50.0, 35.0), 0.70),
        DiningHallRecord::new("Dining Hall C", NutritionRecord::new(350.0, 20.0, 60.0, 15.0), 0.90),
        DiningHallRecord::new("Dining Hall D", NutritionRecord::new(500.0, 18.0, 40.0, 12.0), 0.80),
    ]
}

/// Load the dining hall nutrition table from CSV.
pub fn load_dining_halls<P: AsRef<Path>>(path: P) -> Result<Vec<DiningHallRecord>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut halls = Vec::new();
    for row in rdr.deserialize() {
        let record: DiningHallRecord = row?;
        halls.push(record);
    }
    Ok(halls)
}

/// Load the table, writing the sample dataset first if the file is absent.
pub fn load_or_create_dining_halls<P: AsRef<Path>>(
    path: P,
    sink: &mut dyn EventSink,
) -> Result<Vec<DiningHallRecord>> {
    let path = path.as_ref();
    if path.exists() {
        return load_dining_halls(path);
    }

    let halls = sample_dining_halls();
    save_dining_hall_records(path, &halls)?;
    sink.record(ScoringEvent::SampleDatasetCreated {
        path: path.display().to_string(),
    });
    Ok(halls)
}

/// Write table rows as-is.
pub fn save_dining_hall_records<P: AsRef<Path>>(path: P, halls: &[DiningHallRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for hall in halls {
        wtr.serialize(hall)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the updated table: input columns plus `food_variety` and
/// `recent_penalty`, in the given row order.
pub fn save_dining_hall_stats<P: AsRef<Path>>(path: P, halls: &[DiningHallStats]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for hall in halls {
        wtr.serialize(hall)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write per-hall averages, rounded to two decimals.
pub fn save_hall_averages<P: AsRef<Path>>(path: P, halls: &[DiningHallRecord]) -> Result<()> {
    let rounded: Vec<DiningHallRecord> = halls
        .iter()
        .map(|h| DiningHallRecord {
            dining_hall: h.dining_hall.clone(),
            calories: round_to(h.calories, AVERAGES_DECIMALS),
            protein: round_to(h.protein, AVERAGES_DECIMALS),
            total_carbohydrate: round_to(h.total_carbohydrate, AVERAGES_DECIMALS),
            total_fat: round_to(h.total_fat, AVERAGES_DECIMALS),
            meal_health: round_to(h.meal_health, AVERAGES_DECIMALS),
            food_variety: None,
            recent_penalty: None,
        })
        .collect();
    save_dining_hall_records(path, &rounded)
}

// ─────────────────────────────────────────────────────────────────────────────
// Visit log
// ─────────────────────────────────────────────────────────────────────────────

pub fn load_visits<P: AsRef<Path>>(path: P) -> Result<Vec<Visit>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut visits = Vec::new();
    for row in rdr.deserialize() {
        let visit: Visit = row?;
        visits.push(visit);
    }
    Ok(visits)
}

/// Load the visit log, or `None` (with an event) when the file is absent.
pub fn load_visits_if_present<P: AsRef<Path>>(
    path: P,
    sink: &mut dyn EventSink,
) -> Result<Option<Vec<Visit>>> {
    let path = path.as_ref();
    if !path.exists() {
        sink.record(ScoringEvent::VisitLogMissing {
            path: path.display().to_string(),
        });
        return Ok(None);
    }
    let visits = load_visits(path)?;
    debug!(count = visits.len(), "loaded visit log");
    Ok(Some(visits))
}

// ─────────────────────────────────────────────────────────────────────────────
// Menu input
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a JSON array of menu items.
///
/// Anything that is not an array of objects carrying `dining_hall` and
/// `meal_name` strings is a [`DiningError::MalformedInput`].
pub fn parse_menu_items(input: &str) -> Result<Vec<MenuItem>> {
    serde_json::from_str(input).map_err(|e| DiningError::MalformedInput(e.to_string()))
}

/// Read and parse menu items from a reader (stdin in practice).
pub fn read_menu_items<R: Read>(mut reader: R) -> Result<Vec<MenuItem>> {
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    debug!(bytes = input.len(), "read menu input");
    parse_menu_items(&input)
}

/// Load a `dining_hall,meal_name` CSV.
pub fn load_meal_list<P: AsRef<Path>>(path: P) -> Result<Vec<MenuItem>> {
    let mut rdr = csv::Reader::from_path(path)?;
    let headers = rdr.headers()?.clone();
    for required in ["dining_hall", "meal_name"] {
        if !headers.iter().any(|h| h == required) {
            return Err(DiningError::MalformedInput(format!(
                "meal list is missing required column: {}",
                required
            )));
        }
    }

    let mut items = Vec::new();
    for row in rdr.deserialize() {
        let item: MenuItem = row?;
        items.push(item);
    }
    Ok(items)
}

/// Write meals with their nutrients and health score.
pub fn save_scored_meals<P: AsRef<Path>>(path: P, meals: &[ScoredMeal]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record([
        "dining_hall",
        "meal_name",
        "calories",
        "protein",
        "total_carbohydrate",
        "total_fat",
        "meal_health",
    ])?;
    for meal in meals {
        wtr.write_record([
            meal.dining_hall.clone(),
            meal.meal_name.clone(),
            meal.nutrition.calories.to_string(),
            meal.nutrition.protein_g.to_string(),
            meal.nutrition.carbohydrate_g.to_string(),
            meal.nutrition.fat_g.to_string(),
            meal.meal_health.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Nutrition knowledge base
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeMetadata {
    pub last_updated: String,
    pub version: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_meals: Option<usize>,
}

#[derive(Deserialize)]
struct KnowledgeFile {
    meals: Map<String, Value>,
}

/// Parse knowledge-base JSON, keeping the file's key order.
pub fn parse_knowledge_base(content: &str) -> Result<KnowledgeBase> {
    let file: KnowledgeFile = serde_json::from_str(content)?;
    let mut kb = KnowledgeBase::new();
    for (name, value) in file.meals {
        let entry: KnowledgeEntry = serde_json::from_value(value)?;
        kb.insert(&name, entry);
    }
    Ok(kb)
}

pub fn load_knowledge_base<P: AsRef<Path>>(path: P) -> Result<KnowledgeBase> {
    let content = fs::read_to_string(path)?;
    parse_knowledge_base(&content)
}

/// Load the knowledge base if it exists and parses.
///
/// A corrupt file is discarded (reported through the sink) so the caller can
/// rebuild it; only an absent or unreadable file yields `None`.
pub fn load_knowledge_base_or_discard<P: AsRef<Path>>(
    path: P,
    sink: &mut dyn EventSink,
) -> Option<KnowledgeBase> {
    let path = path.as_ref();
    if !path.exists() {
        return None;
    }

    match load_knowledge_base(path) {
        Ok(kb) => {
            info!(meals = kb.len(), "loaded nutrition knowledge base");
            Some(kb)
        }
        Err(e) => {
            sink.record(ScoringEvent::KnowledgeBaseDiscarded {
                path: path.display().to_string(),
                reason: e.to_string(),
            });
            None
        }
    }
}

/// Save the knowledge base with its metadata block.
pub fn save_knowledge_base<P: AsRef<Path>>(
    path: P,
    kb: &KnowledgeBase,
    updated: NaiveDate,
) -> Result<()> {
    let mut meals = Map::new();
    for (name, entry) in kb.iter() {
        meals.insert(name.to_string(), serde_json::to_value(entry)?);
    }

    let metadata = KnowledgeMetadata {
        last_updated: updated.format("%Y-%m-%d").to_string(),
        version: "1.0".to_string(),
        source: "Nutritionix API".to_string(),
        total_meals: Some(kb.len()),
    };

    let output = serde_json::json!({
        "meals": meals,
        "metadata": metadata,
    });
    fs::write(path, serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::RunSummary;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_sample_created_when_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("halls.csv");
        let mut summary = RunSummary::new();

        let halls = load_or_create_dining_halls(&path, &mut summary).unwrap();
        assert_eq!(halls.len(), 4);
        assert!(path.exists());
        assert_eq!(summary.file_fallbacks(), 1);

        // Second load reads the file back.
        let reloaded = load_or_create_dining_halls(&path, &mut summary).unwrap();
        assert_eq!(reloaded, halls);
        assert_eq!(summary.file_fallbacks(), 1);
    }

    #[test]
    fn test_visits_csv() {
        let csv = "dining_hall,meal_name,visit_date\nHall A,Pasta,2025-02-01\nHall A,Soup,2025-02-03\n";
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(csv.as_bytes()).unwrap();

        let visits = load_visits(file.path()).unwrap();
        assert_eq!(visits.len(), 2);
        assert_eq!(visits[1].visit_date, NaiveDate::from_ymd_opt(2025, 2, 3).unwrap());
    }

    #[test]
    fn test_missing_visit_log_is_not_an_error() {
        let dir = tempdir().unwrap();
        let mut summary = RunSummary::new();
        let visits = load_visits_if_present(dir.path().join("none.csv"), &mut summary).unwrap();
        assert!(visits.is_none());
        assert_eq!(summary.file_fallbacks(), 1);
    }

    #[test]
    fn test_parse_menu_items_malformed() {
        assert!(parse_menu_items(r#"[{"dining_hall": "A", "meal_name": "B"}]"#).is_ok());
        let err = parse_menu_items(r#"[{"meal_name": "B"}]"#).unwrap_err();
        assert!(matches!(err, DiningError::MalformedInput(_)));
        let err = parse_menu_items(r#"{"dining_hall": "A"}"#).unwrap_err();
        assert!(matches!(err, DiningError::MalformedInput(_)));
    }

    #[test]
    fn test_meal_list_requires_columns() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"hall,meal\nA,Pasta\n").unwrap();
        let err = load_meal_list(file.path()).unwrap_err();
        assert!(matches!(err, DiningError::MalformedInput(_)));
    }

    #[test]
    fn test_knowledge_base_preserves_file_order() {
        let json = r#"{"meals": {
            "Zucchini Bake": {"calories": 210, "protein": 6, "total_carbohydrate": 18, "total_fat": 12},
            "Apple Pie": {"calories": 410, "protein": 3, "total_carbohydrate": 58, "total_fat": 19, "tags": ["low-carb"]}
        }, "metadata": {"last_updated": "2025-01-01", "version": "1.0", "source": "Nutritionix API"}}"#;
        let kb = parse_knowledge_base(json).unwrap();
        let names: Vec<&str> = kb.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Zucchini Bake", "Apple Pie"]);
    }

    #[test]
    fn test_null_nutrients_keep_the_knowledge_base() {
        let json = r#"{"meals": {
            "Soup": {"calories": 120, "protein": null, "total_carbohydrate": 15, "total_fat": null},
            "Burger": {"calories": 650, "protein": 30, "total_carbohydrate": 40, "total_fat": 35}
        }, "metadata": {}}"#;
        let kb = parse_knowledge_base(json).unwrap();
        assert_eq!(kb.len(), 2);
        assert_eq!(
            kb.get("Soup").unwrap().record,
            NutritionRecord::new(120.0, 0.0, 15.0, 0.0)
        );

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        let mut summary = RunSummary::new();
        let loaded = load_knowledge_base_or_discard(file.path(), &mut summary).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(summary.file_fallbacks(), 0);
    }

    #[test]
    fn test_knowledge_base_roundtrip() {
        let mut kb = KnowledgeBase::new();
        kb.insert("Soup", KnowledgeEntry::from(NutritionRecord::new(120.0, 4.0, 15.0, 3.5)));
        kb.insert("Burger", KnowledgeEntry::from(NutritionRecord::new(650.0, 30.0, 40.0, 35.0)));

        let file = NamedTempFile::new().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        save_knowledge_base(file.path(), &kb, date).unwrap();

        let reloaded = load_knowledge_base(file.path()).unwrap();
        assert_eq!(reloaded, kb);

        let raw: Value = serde_json::from_str(&fs::read_to_string(file.path()).unwrap()).unwrap();
        assert_eq!(raw["metadata"]["total_meals"], 2);
        assert_eq!(raw["metadata"]["last_updated"], "2025-05-01");
    }

    #[test]
    fn test_corrupt_knowledge_base_is_discarded() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        let mut summary = RunSummary::new();

        assert!(load_knowledge_base_or_discard(file.path(), &mut summary).is_none());
        assert_eq!(summary.file_fallbacks(), 1);
    }
}
