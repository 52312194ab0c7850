use serde::Deserialize;

use crate::models::{KnowledgeEntry, NutritionRecord};

/// One food in a lookup response. Missing or null nutrients count as 0.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FoodNutrients {
    #[serde(default)]
    pub nf_calories: Option<f64>,
    #[serde(default)]
    pub nf_protein: Option<f64>,
    #[serde(default)]
    pub nf_total_carbohydrate: Option<f64>,
    #[serde(default)]
    pub nf_total_fat: Option<f64>,
    #[serde(default)]
    pub serving_weight_grams: Option<f64>,
    #[serde(default)]
    pub serving_unit: Option<String>,
}

impl FoodNutrients {
    pub fn record(&self) -> NutritionRecord {
        NutritionRecord::new(
            self.nf_calories.unwrap_or(0.0),
            self.nf_protein.unwrap_or(0.0),
            self.nf_total_carbohydrate.unwrap_or(0.0),
            self.nf_total_fat.unwrap_or(0.0),
        )
        .sanitized()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub foods: Vec<FoodNutrients>,
}

/// Knowledge-base path: the first food of the response, no offset.
pub fn first_food_entry(foods: &[FoodNutrients]) -> Option<KnowledgeEntry> {
    foods.first().map(|food| KnowledgeEntry {
        record: food.record(),
        serving_size: Some(food.serving_weight_grams.unwrap_or(100.0)),
        serving_unit: Some(food.serving_unit.clone().unwrap_or_else(|| "g".to_string())),
        tags: Vec::new(),
    })
}

/// Meal-averaging path: sum every food in the response, then add
/// `calorie_offset` to the calories.
pub fn summed_meal_record(foods: &[FoodNutrients], calorie_offset: f64) -> NutritionRecord {
    let total = foods.iter().map(FoodNutrients::record).fold(
        NutritionRecord::new(0.0, 0.0, 0.0, 0.0),
        |acc, r| {
            NutritionRecord::new(
                acc.calories + r.calories,
                acc.protein_g + r.protein_g,
                acc.carbohydrate_g + r.carbohydrate_g,
                acc.fat_g + r.fat_g,
            )
        },
    );
    NutritionRecord {
        calories: total.calories + calorie_offset,
        ..total
    }
}

/// Descriptive tags for a knowledge-base entry.
pub fn meal_tags(
    record: &NutritionRecord,
    meal_name: &str,
    dining_hall: &str,
    meal_type: Option<&str>,
) -> Vec<String> {
    let mut tags = Vec::new();

    if let Some(kind) = meal_type.filter(|k| !k.is_empty()) {
        tags.push(kind.to_lowercase());
    }

    if record.protein_g > 20.0 {
        tags.push("high-protein".to_string());
    }
    if record.calories < 300.0 {
        tags.push("low-calorie".to_string());
    }
    if record.carbohydrate_g < 20.0 {
        tags.push("low-carb".to_string());
    }

    let name = meal_name.to_lowercase();
    if ["vegetarian", "vegan", "tofu"].iter().any(|w| name.contains(w)) {
        tags.push("vegetarian".to_string());
    }
    if name.contains("vegan") {
        tags.push("vegan".to_string());
    }
    if name.contains("salad") {
        tags.push("salad".to_string());
    }
    if name.contains("grill") {
        tags.push("grilled".to_string());
    }

    if !dining_hall.is_empty() {
        tags.push(dining_hall.to_lowercase().replace(' ', "-"));
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(cal: f64, p: f64, c: f64, f: f64) -> FoodNutrients {
        FoodNutrients {
            nf_calories: Some(cal),
            nf_protein: Some(p),
            nf_total_carbohydrate: Some(c),
            nf_total_fat: Some(f),
            ..FoodNutrients::default()
        }
    }

    #[test]
    fn test_response_with_nulls() {
        let json = r#"{"foods": [{"nf_calories": 210.5, "nf_protein": null, "serving_unit": "bowl"}]}"#;
        let response: LookupResponse = serde_json::from_str(json).unwrap();
        let entry = first_food_entry(&response.foods).unwrap();
        assert_eq!(entry.record, NutritionRecord::new(210.5, 0.0, 0.0, 0.0));
        assert_eq!(entry.serving_unit.as_deref(), Some("bowl"));
        assert_eq!(entry.serving_size, Some(100.0));
    }

    #[test]
    fn test_first_food_ignores_the_rest() {
        let foods = vec![food(100.0, 5.0, 10.0, 2.0), food(900.0, 50.0, 90.0, 40.0)];
        let entry = first_food_entry(&foods).unwrap();
        assert_eq!(entry.record.calories, 100.0);
        assert!(first_food_entry(&[]).is_none());
    }

    #[test]
    fn test_summed_record_adds_offset_once() {
        let foods = vec![food(100.0, 5.0, 10.0, 2.0), food(300.0, 20.0, 30.0, 8.0)];
        let record = summed_meal_record(&foods, 200.0);
        assert_eq!(record, NutritionRecord::new(600.0, 25.0, 40.0, 10.0));

        let empty = summed_meal_record(&[], 200.0);
        assert_eq!(empty, NutritionRecord::new(200.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_meal_tags() {
        let record = NutritionRecord::new(250.0, 22.0, 12.0, 8.0);
        let tags = meal_tags(&record, "Grilled Tofu Salad", "John Jay", Some("Lunch"));
        assert_eq!(
            tags,
            vec![
                "lunch",
                "high-protein",
                "low-calorie",
                "low-carb",
                "vegetarian",
                "salad",
                "grilled",
                "john-jay"
            ]
        );
    }
}
