use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Menu names the scraper emits when a hall serves nothing.
pub const PLACEHOLDER_MEAL_NAMES: [&str; 2] = ["Closed", "No items available"];

/// One offering on a dining hall menu.
///
/// Identity is `(dining_hall, meal_name)`. The same pair may appear more than
/// once; each occurrence is a separate offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    #[serde(alias = "diningHall")]
    pub dining_hall: String,

    #[serde(alias = "foodName")]
    pub meal_name: String,

    #[serde(alias = "mealType", default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
}

impl MenuItem {
    pub fn new(dining_hall: &str, meal_name: &str) -> Self {
        Self {
            dining_hall: dining_hall.to_string(),
            meal_name: meal_name.to_string(),
            meal_type: None,
        }
    }

    /// True for "Closed"-style entries and blank names.
    pub fn is_placeholder(&self) -> bool {
        let name = self.meal_name.trim();
        name.is_empty() || PLACEHOLDER_MEAL_NAMES.contains(&name)
    }
}

/// A row of the visit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub dining_hall: String,
    pub meal_name: String,
    #[serde(deserialize_with = "deserialize_visit_date")]
    pub visit_date: NaiveDate,
}

impl Visit {
    pub fn new(dining_hall: &str, meal_name: &str, visit_date: NaiveDate) -> Self {
        Self {
            dining_hall: dining_hall.to_string(),
            meal_name: meal_name.to_string(),
            visit_date,
        }
    }
}

/// Parse an ISO date, also accepting a full timestamp (the date part is kept).
pub fn parse_visit_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

fn deserialize_visit_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_visit_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid visit_date '{}'", raw)))
}
