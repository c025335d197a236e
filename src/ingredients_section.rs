//! # Ingredients Section
//!
//! This module assembles the ingredients part of the recipe card: a heading
//! and one list item per ingredient, each made of an optional quantity
//! element, a name element and an optional note element, in that order.

use crate::card_config::CardConfig;
use crate::ingredient_model::{PresentationRecord, RawIngredient, PLACEHOLDER_NAME};
use crate::localization::{detect_language, LocalizationManager};
use crate::presentation::resolve_all;
use crate::recipe_source::Recipe;
use log::{debug, info};

const HEADING_KEY: &str = "common.ingredients";
const HEADING_DEFAULT: &str = "Ingredients";
const PLACEHOLDER_KEY: &str = "common.ingredient";

/// One element inside an ingredient list item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemElement {
    Quantity(String),
    /// Name text; `muted` marks the fallback placeholder
    Name { text: String, muted: bool },
    Note(String),
}

/// A rendered list item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientListItem {
    pub elements: Vec<ItemElement>,
}

/// The rendered ingredients section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientsSection {
    pub heading: String,
    pub items: Vec<IngredientListItem>,
}

impl IngredientListItem {
    /// Lay out a presentation record, using `placeholder_label` for unnamed ingredients
    pub fn from_record(record: &PresentationRecord, placeholder_label: &str) -> Self {
        let mut elements = Vec::with_capacity(3);

        if let Some(quantity) = &record.quantity_line {
            elements.push(ItemElement::Quantity(quantity.clone()));
        }

        let name = if record.is_placeholder {
            placeholder_label.to_string()
        } else {
            record.name_segment.clone()
        };
        elements.push(ItemElement::Name {
            text: name,
            muted: record.is_placeholder,
        });

        if let Some(note) = &record.note_segment {
            elements.push(ItemElement::Note(note.clone()));
        }

        Self { elements }
    }

    /// Single-line text form of the item
    pub fn to_plain_text(&self) -> String {
        self.elements
            .iter()
            .map(|element| match element {
                ItemElement::Quantity(quantity) => quantity.trim().to_string(),
                ItemElement::Name { text, muted: true } => format!("[{}]", text),
                ItemElement::Name { text, muted: false } => text.clone(),
                ItemElement::Note(note) => format!("({})", note),
            })
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl IngredientsSection {
    /// Text form of the whole section, one bullet per ingredient
    pub fn to_plain_text(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", self.heading));
        for item in &self.items {
            output.push_str(&format!("• {}\n", item.to_plain_text()));
        }
        output
    }
}

/// Render the ingredients section of a recipe.
///
/// Returns `None` when the section is disabled or the recipe lists no
/// ingredients.
pub fn render_ingredients(
    recipe: &Recipe,
    config: &CardConfig,
    localization: &LocalizationManager,
) -> Option<IngredientsSection> {
    if let Some(json) = payload_dump(&recipe.ingredients, config) {
        debug!("Raw ingredient payload:\n{}", json);
    }

    if !config.show_ingredients || recipe.ingredients.is_empty() {
        debug!(
            "Skipping ingredients section for '{}' (enabled={}, count={})",
            recipe.name,
            config.show_ingredients,
            recipe.ingredients.len()
        );
        return None;
    }

    let language = detect_language(Some(config.language.as_str()));
    let heading = localization.label_or(HEADING_KEY, language, HEADING_DEFAULT);
    let placeholder_label = match &config.placeholder_label {
        Some(label) => label.clone(),
        None => localization.label_or(PLACEHOLDER_KEY, language, PLACEHOLDER_NAME),
    };

    let records = resolve_all(&recipe.ingredients);
    let placeholders = records.iter().filter(|r| r.is_placeholder).count();
    info!(
        "Rendered {} ingredients for '{}' ({} without a name)",
        records.len(),
        recipe.name,
        placeholders
    );

    let items = records
        .iter()
        .map(|record| IngredientListItem::from_record(record, &placeholder_label))
        .collect();

    Some(IngredientsSection { heading, items })
}

/// Pretty JSON of the raw payload, produced only when `config.debug` is set
pub fn payload_dump(ingredients: &[RawIngredient], config: &CardConfig) -> Option<String> {
    if !config.debug {
        return None;
    }
    match serde_json::to_string_pretty(ingredients) {
        Ok(json) => Some(json),
        Err(e) => {
            debug!("Could not serialize ingredient payload: {}", e);
            None
        }
    }
}
