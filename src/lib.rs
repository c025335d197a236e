//! # Recipe Card
//!
//! Ingredient normalization and presentation for a dashboard recipe card.
//! Raw ingredient records from a recipe-management service, including units
//! stored as legacy dictionary-literal text, are turned into canonical
//! quantity / name / note lines.

pub mod card_config;
pub mod ingredient_model;
pub mod ingredients_section;
pub mod legacy_unit;
pub mod localization;
pub mod presentation;
pub mod recipe_source;
