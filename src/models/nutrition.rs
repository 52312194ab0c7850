use serde::{Deserialize, Deserializer, Serialize};

/// Macronutrient values for one meal.
///
/// Field names on the wire follow the knowledge-base JSON
/// (`calories`, `protein`, `total_carbohydrate`, `total_fat`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub calories: f64,

    #[serde(rename = "protein", default, deserialize_with = "null_as_zero")]
    pub protein_g: f64,

    #[serde(rename = "total_carbohydrate", default, deserialize_with = "null_as_zero")]
    pub carbohydrate_g: f64,

    #[serde(rename = "total_fat", default, deserialize_with = "null_as_zero")]
    pub fat_g: f64,
}

/// Knowledge-base files may carry `null` for nutrients the service did not
/// report; those count as 0.
fn null_as_zero<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl NutritionRecord {
    pub const fn new(calories: f64, protein_g: f64, carbohydrate_g: f64, fat_g: f64) -> Self {
        Self {
            calories,
            protein_g,
            carbohydrate_g,
            fat_g,
        }
    }

    /// True when any field is NaN. Such records must not reach the normalizer.
    pub fn has_nan(&self) -> bool {
        [self.calories, self.protein_g, self.carbohydrate_g, self.fat_g]
            .iter()
            .any(|v| v.is_nan())
    }

    /// Replace NaN fields with zero.
    pub fn sanitized(self) -> Self {
        let fix = |v: f64| if v.is_nan() { 0.0 } else { v };
        Self {
            calories: fix(self.calories),
            protein_g: fix(self.protein_g),
            carbohydrate_g: fix(self.carbohydrate_g),
            fat_g: fix(self.fat_g),
        }
    }
}

/// A knowledge-base entry: the nutrition record plus lookup metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    #[serde(flatten)]
    pub record: NutritionRecord,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_unit: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl From<NutritionRecord> for KnowledgeEntry {
    fn from(record: NutritionRecord) -> Self {
        Self {
            record,
            serving_size: None,
            serving_unit: None,
            tags: Vec::new(),
        }
    }
}
