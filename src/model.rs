use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Title used when the source markup does not name the recipe
pub const UNTITLED_RECIPE: &str = "Untitled Recipe";

/// A normalized recipe, as returned to callers.
///
/// Field names are camelCase on the wire; any renaming for persistence is
/// left to the consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRecord {
    pub id: String,
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    /// Taken verbatim from the source's yield field, which may be a number,
    /// a string or a list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookbook_id: Option<String>,
}

/// Identity used to drop duplicate recipes within one crawl.
///
/// Two recipes collide when their titles match and their ingredient lists
/// hold the same lines in any order, ignoring case and surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    title: String,
    ingredients: Vec<String>,
}

impl RecipeRecord {
    /// A record with at least one ingredient or one step is worth emitting.
    pub fn has_content(&self) -> bool {
        !self.ingredients.is_empty() || !self.instructions.is_empty()
    }

    pub fn dedup_key(&self) -> DedupKey {
        let mut ingredients: Vec<String> =
            self.ingredients.iter().map(|i| normalize(i)).collect();
        ingredients.sort();
        DedupKey {
            title: normalize(&self.title),
            ingredients,
        }
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Deterministic id for recipes whose source does not provide one.
///
/// The same page always yields the same ids, so re-running extraction on
/// identical HTML gives identical records.
pub fn generate_id(page_url: &str, title: &str, ordinal: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(page_url.as_bytes());
    hasher.update([0u8]);
    hasher.update(title.as_bytes());
    hasher.update([0u8]);
    hasher.update(ordinal.to_le_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("recipe-{}", &digest[..16])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(title: &str, ingredients: &[&str]) -> RecipeRecord {
        RecipeRecord {
            id: "id".to_string(),
            title: title.to_string(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            instructions: vec![],
            url: "https://example.com/recipe/1".to_string(),
            image: None,
            cook_time: None,
            servings: None,
            meal_type: None,
            cookbook_id: None,
        }
    }

    #[test]
    fn test_duplicate_ignores_order_case_and_whitespace() {
        let a = record("Chili", &["beans", "beef"]);
        let b = record("  chili ", &["  BEEF", "Beans  "]);
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_different_ingredients_are_not_duplicates() {
        let a = record("Chili", &["beans", "beef"]);
        let b = record("Chili", &["beans", "turkey"]);
        assert_ne!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_different_titles_are_not_duplicates() {
        let a = record("Chili", &["beans"]);
        let b = record("White Chili", &["beans"]);
        assert_ne!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_has_content() {
        assert!(!record("Empty", &[]).has_content());
        assert!(record("Soup", &["water"]).has_content());

        let mut steps_only = record("Toast", &[]);
        steps_only.instructions.push("Toast the bread".to_string());
        assert!(steps_only.has_content());
    }

    #[test]
    fn test_serializes_camel_case_and_skips_absent_fields() {
        let mut recipe = record("Chili", &["beans"]);
        recipe.cook_time = Some("PT1H".to_string());
        recipe.meal_type = Some("Dinner".to_string());
        recipe.servings = Some(json!(4));

        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value["cookTime"], "PT1H");
        assert_eq!(value["mealType"], "Dinner");
        assert_eq!(value["servings"], 4);
        assert!(value.get("image").is_none());
        assert!(value.get("cookbookId").is_none());
    }

    #[test]
    fn test_generate_id_is_stable_and_distinct() {
        let first = generate_id("https://example.com/a", "Chili", 0);
        assert_eq!(first, generate_id("https://example.com/a", "Chili", 0));
        assert_ne!(first, generate_id("https://example.com/a", "Chili", 1));
        assert_ne!(first, generate_id("https://example.com/b", "Chili", 0));
        assert!(first.starts_with("recipe-"));
        assert_eq!(first.len(), "recipe-".len() + 16);
    }
}
