//! # Ingredient Presentation Resolver
//!
//! Turns one raw ingredient record into the quantity / name / note triple the
//! card shows. Every input yields exactly one record; missing or malformed
//! data is absorbed by a fixed fallback chain instead of failing.
//!
//! ## Resolution order
//!
//! - **Unit**: structured record, else decoded legacy text, else the text verbatim, else empty
//! - **Name**: food name, else display label, else the note, else the placeholder
//! - **Note**: shown only when it was not promoted to the name and differs from it
//! - **Quantity**: shown only for a non-zero, non-NaN amount
//!
//! ## Usage
//!
//! ```rust
//! use recipe_card::ingredient_model::{FoodRef, RawIngredient, UnitValue};
//! use recipe_card::presentation::resolve;
//!
//! let raw = RawIngredient::new()
//!     .with_quantity(1.0)
//!     .with_unit(UnitValue::Text("{'name': 'tablespoon'}".to_string()))
//!     .with_food(FoodRef::named("Oil"));
//!
//! let record = resolve(&raw);
//! assert_eq!(record.quantity_line.as_deref(), Some("1 tablespoon"));
//! assert_eq!(record.name_segment, "Oil");
//! ```

use crate::ingredient_model::{
    DecodedUnit, PresentationRecord, RawIngredient, UnitRecord, UnitValue,
};
use crate::legacy_unit::{decode, is_dict_shaped};
use log::trace;

/// A unit after the shape of the raw field has been settled
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedUnit<'a> {
    /// Structured unit object sent by the service
    Record(&'a UnitRecord),
    /// Mapping recovered from legacy dictionary-literal text
    Decoded(DecodedUnit),
    /// Plain unit name, or legacy text that failed to decode
    Text(&'a str),
    /// No usable unit
    Absent,
}

impl ResolvedUnit<'_> {
    /// Name shown after the quantity, empty when unknown
    pub fn name(&self) -> String {
        match self {
            ResolvedUnit::Record(record) => record.name.clone().unwrap_or_default(),
            ResolvedUnit::Decoded(unit) => unit.name(),
            ResolvedUnit::Text(text) => text.to_string(),
            ResolvedUnit::Absent => String::new(),
        }
    }
}

/// Settle which shape the unit field has
pub fn resolve_unit(unit: Option<&UnitValue>) -> ResolvedUnit<'_> {
    match unit {
        Some(UnitValue::Record(record)) => ResolvedUnit::Record(record),
        Some(UnitValue::Text(text)) if is_dict_shaped(text) => match decode(text) {
            Some(decoded) => ResolvedUnit::Decoded(decoded),
            None => {
                trace!("Legacy unit text did not decode, using it verbatim");
                ResolvedUnit::Text(text)
            }
        },
        Some(UnitValue::Text(text)) => ResolvedUnit::Text(text),
        Some(UnitValue::Other(_)) | None => ResolvedUnit::Absent,
    }
}

/// Build the quantity line, or `None` when the amount is zero, null or NaN
pub fn quantity_line(quantity: Option<f64>, unit_name: &str) -> Option<String> {
    let amount = quantity.filter(|q| *q != 0.0 && !q.is_nan())?;
    Some(format!("{} {}", amount, unit_name))
}

/// Resolve one raw ingredient into its presentation record
pub fn resolve(raw: &RawIngredient) -> PresentationRecord {
    let unit_name = resolve_unit(raw.unit.as_ref()).name();
    let quantity_line = quantity_line(raw.quantity, &unit_name);

    let food_name = non_empty(raw.food_name()).or_else(|| non_empty(raw.display.as_deref()));
    let note = non_empty(raw.note.as_deref());

    match (food_name, note) {
        (Some(name), note) => PresentationRecord {
            quantity_line,
            name_segment: name.to_string(),
            is_placeholder: false,
            note_segment: note.filter(|n| *n != name).map(str::to_string),
        },
        (None, Some(note)) => PresentationRecord {
            quantity_line,
            name_segment: note.to_string(),
            is_placeholder: false,
            note_segment: None,
        },
        (None, None) => PresentationRecord::placeholder(quantity_line),
    }
}

/// Resolve a whole ingredient list, one record per item in input order
pub fn resolve_all(ingredients: &[RawIngredient]) -> Vec<PresentationRecord> {
    ingredients.iter().map(resolve).collect()
}

fn non_empty(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.is_empty())
}
