//! # Ingredient Data Model
//!
//! This module defines the data structures that flow through the ingredient
//! presentation engine: the raw records handed over by the recipe service,
//! the mapping recovered from legacy unit text, and the render-ready
//! presentation record.
//!
//! ## Core Concepts
//!
//! - **RawIngredient**: An untrusted ingredient record as the recipe service sends it
//! - **UnitValue**: A unit that is either a structured record or a piece of text
//! - **DecodedUnit**: The mapping recovered from legacy dictionary-literal unit text
//! - **PresentationRecord**: The canonical quantity / name / note triple shown in the card
//!
//! ## Usage
//!
//! ```rust
//! use recipe_card::ingredient_model::{FoodRef, RawIngredient, UnitValue};
//!
//! let flour = RawIngredient::new()
//!     .with_quantity(2.0)
//!     .with_unit(UnitValue::Text("cup".to_string()))
//!     .with_food(FoodRef::named("Flour"));
//!
//! assert_eq!(flour.food_name(), Some("Flour"));
//! ```

use log::{trace, warn};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Literal name shown when an ingredient carries no usable name at all
pub const PLACEHOLDER_NAME: &str = "Ingredient";

/// An ingredient record exactly as the recipe service delivers it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawIngredient {
    /// Amount of the ingredient; zero and null both mean "no amount"
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: Option<f64>,

    /// Unit as a structured record, a plain name, or legacy serialized text
    #[serde(default)]
    pub unit: Option<UnitValue>,

    /// Structured food reference
    #[serde(default, deserialize_with = "lenient_food")]
    pub food: Option<FoodRef>,

    /// Precomputed fallback label used when no food reference exists
    #[serde(default, deserialize_with = "lenient_text")]
    pub display: Option<String>,

    /// Free-text annotation, may repeat the food name
    #[serde(default, deserialize_with = "lenient_text")]
    pub note: Option<String>,
}

/// The shapes a unit field arrives in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitValue {
    /// Structured unit object (e.g. `{"name": "cup", "abbreviation": "c"}`)
    Record(UnitRecord),
    /// Plain unit name, or a dictionary literal serialized as text
    Text(String),
    /// Anything else the service sends (numbers, arrays); carries no name
    Other(Value),
}

/// Structured unit object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,

    /// Remaining fields (abbreviation, id, ...) kept untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Structured food reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodRef {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
}

/// Mapping recovered from legacy unit text.
///
/// Values are restricted to strings, numbers and booleans; `None` entries are
/// dropped while decoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedUnit {
    entries: Map<String, Value>,
}

/// Render-ready representation of one ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationRecord {
    /// `"<quantity> <unit>"`, present only for a non-zero quantity
    pub quantity_line: Option<String>,

    /// Name shown for the ingredient, never empty
    pub name_segment: String,

    /// Whether `name_segment` is the fallback placeholder
    pub is_placeholder: bool,

    /// Extra note, absent when it was promoted to the name or repeats it
    pub note_segment: Option<String>,
}

impl RawIngredient {
    /// Create an ingredient with every field absent
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_unit(mut self, unit: UnitValue) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_food(mut self, food: FoodRef) -> Self {
        self.food = Some(food);
        self
    }

    pub fn with_display(mut self, display: &str) -> Self {
        self.display = Some(display.to_string());
        self
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }

    /// Name of the structured food reference, if any
    pub fn food_name(&self) -> Option<&str> {
        self.food.as_ref()?.name.as_deref()
    }
}

impl FoodRef {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
        }
    }
}

impl UnitRecord {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            extra: Map::new(),
        }
    }
}

impl DecodedUnit {
    pub(crate) fn from_entries(entries: Map<String, Value>) -> Self {
        Self { entries }
    }

    /// Look up a decoded value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Text of the `name` entry, empty when the entry is missing
    pub fn name(&self) -> String {
        match self.entries.get("name") {
            Some(Value::String(name)) => name.clone(),
            Some(Value::Number(number)) => number.to_string(),
            Some(Value::Bool(flag)) => flag.to_string(),
            _ => String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Consume the mapping into a JSON object
    pub fn into_map(self) -> Map<String, Value> {
        self.entries
    }
}

impl PresentationRecord {
    /// Record shown when an ingredient has no usable name
    pub fn placeholder(quantity_line: Option<String>) -> Self {
        Self {
            quantity_line,
            name_segment: PLACEHOLDER_NAME.to_string(),
            is_placeholder: true,
            note_segment: None,
        }
    }

    pub fn has_quantity(&self) -> bool {
        self.quantity_line.is_some()
    }

    pub fn has_note(&self) -> bool {
        self.note_segment.is_some()
    }
}

impl fmt::Display for PresentationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(quantity) = &self.quantity_line {
            let quantity = quantity.trim_end();
            if !quantity.is_empty() {
                write!(f, "{} ", quantity)?;
            }
        }

        write!(f, "{}", self.name_segment)?;

        if let Some(note) = &self.note_segment {
            write!(f, " ({})", note)?;
        }

        Ok(())
    }
}

impl RawIngredient {
    /// Build an ingredient from one untrusted list entry.
    ///
    /// A bare string becomes the display label; anything that is not an
    /// object yields an empty ingredient so the list keeps its length.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => Self::new().with_display(&text),
            Value::Object(_) => serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("Unreadable ingredient entry, rendering it empty: {}", e);
                Self::new()
            }),
            other => {
                warn!("Unexpected ingredient entry {}, rendering it empty", other);
                Self::new()
            }
        }
    }
}

/// Text of a scalar JSON value; numbers and booleans use their text form
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Accept any JSON value for a text field, keeping only scalar text
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_text))
}

/// Accept numbers and numeric strings (`"2"`, `" 0.5 "`) as a quantity
fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let quantity = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => {
            let parsed = text.trim().parse::<f64>().ok();
            if parsed.is_none() {
                trace!("Ignoring non-numeric quantity '{}'", text);
            }
            parsed
        }
        _ => None,
    };
    Ok(quantity)
}

/// Accept a food object, a bare food name, or nothing usable
fn lenient_food<'de, D>(deserializer: D) -> Result<Option<FoodRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let food = match Option::<Value>::deserialize(deserializer)? {
        Some(value @ Value::Object(_)) => serde_json::from_value(value).ok(),
        Some(Value::String(name)) => Some(FoodRef { name: Some(name) }),
        _ => None,
    };
    Ok(food)
}
