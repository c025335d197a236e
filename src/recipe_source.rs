//! # Recipe Source Module
//!
//! Recipes arrive as JSON documents exported by the recipe-management
//! service. This module holds the recipe shape the card consumes and loads it
//! from disk.

use crate::ingredient_model::{lenient_text, RawIngredient};
use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::path::Path;

/// A recipe as delivered by the recipe service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default, deserialize_with = "lenient_name")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub recipe_yield: Option<String>,
    /// Ingredients in the order the service lists them; unreadable entries stay as empty records
    #[serde(
        default,
        rename = "recipeIngredient",
        alias = "ingredients",
        deserialize_with = "lenient_ingredients"
    )]
    pub ingredients: Vec<RawIngredient>,
}

fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

/// Read the ingredient list entry by entry, so one odd entry cannot sink the recipe
fn lenient_ingredients<'de, D>(deserializer: D) -> Result<Vec<RawIngredient>, D::Error>
where
    D: Deserializer<'de>,
{
    let ingredients = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(entries)) => entries.into_iter().map(RawIngredient::from_value).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            warn!("Ingredient list is not an array ({}), ignoring it", other);
            Vec::new()
        }
    };
    Ok(ingredients)
}

impl Recipe {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_ingredients(mut self, ingredients: Vec<RawIngredient>) -> Self {
        self.ingredients = ingredients;
        self
    }
}

/// Parse a recipe from its JSON text
pub fn parse_recipe(json: &str) -> Result<Recipe> {
    serde_json::from_str(json).context("Failed to parse recipe JSON")
}

/// Read and parse a recipe JSON file
pub async fn load_recipe(path: impl AsRef<Path>) -> Result<Recipe> {
    let path = path.as_ref();
    info!("Loading recipe from: {}", path.display());

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read recipe file {}", path.display()))?;

    let recipe = parse_recipe(&content)
        .with_context(|| format!("Invalid recipe file {}", path.display()))?;

    info!(
        "Loaded recipe '{}' with {} ingredients",
        recipe.name,
        recipe.ingredients.len()
    );

    Ok(recipe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient_model::UnitValue;

    #[test]
    fn test_parse_service_recipe() {
        let recipe = parse_recipe(
            r#"{
                "name": "Pancakes",
                "slug": "pancakes",
                "recipeYield": "4 servings",
                "recipeIngredient": [
                    {"quantity": 2, "unit": {"name": "cup"}, "food": {"name": "Flour"}, "note": "sifted"},
                    {"quantity": 1, "unit": "{'name': 'tablespoon'}", "food": null, "display": "Sugar"}
                ],
                "dateAdded": "2024-01-01"
            }"#,
        )
        .unwrap();

        assert_eq!(recipe.name, "Pancakes");
        assert_eq!(recipe.recipe_yield.as_deref(), Some("4 servings"));
        assert_eq!(recipe.ingredients.len(), 2);
        assert!(matches!(recipe.ingredients[1].unit, Some(UnitValue::Text(_))));
    }

    #[test]
    fn test_parse_ingredients_alias() {
        let recipe = parse_recipe(r#"{"name": "Toast", "ingredients": [{"display": "Bread"}]}"#).unwrap();
        assert_eq!(recipe.ingredients[0].display.as_deref(), Some("Bread"));
    }

    #[test]
    fn test_parse_missing_ingredients() {
        let recipe = parse_recipe(r#"{"name": "Water"}"#).unwrap();
        assert!(recipe.ingredients.is_empty());
    }

    #[test]
    fn test_parse_tolerates_odd_ingredient_fields() {
        let recipe = parse_recipe(
            r#"{"name": "X", "recipeIngredient": [
                {"display": "Flour"},
                {"quantity": "2", "display": "Salt"},
                {"food": {"name": 5}},
                ["not", "an", "ingredient"]
            ]}"#,
        )
        .unwrap();

        assert_eq!(recipe.ingredients.len(), 4);
        assert_eq!(recipe.ingredients[0].display.as_deref(), Some("Flour"));
        assert_eq!(recipe.ingredients[1].quantity, Some(2.0));
        assert_eq!(recipe.ingredients[1].display.as_deref(), Some("Salt"));
        assert_eq!(recipe.ingredients[2].food_name(), Some("5"));
        assert_eq!(recipe.ingredients[3], RawIngredient::new());
    }

    #[test]
    fn test_parse_null_name_and_list() {
        let recipe = parse_recipe(r#"{"name": null, "slug": 3, "recipeIngredient": null}"#).unwrap();
        assert_eq!(recipe.name, "");
        assert_eq!(recipe.slug.as_deref(), Some("3"));
        assert!(recipe.ingredients.is_empty());

        let recipe = parse_recipe(r#"{"name": "Soup", "recipeIngredient": "salt"}"#).unwrap();
        assert!(recipe.ingredients.is_empty());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_recipe("{not json").is_err());
    }
}
