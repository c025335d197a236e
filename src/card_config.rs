//! # Card Configuration Module
//!
//! This module defines the configuration of the recipe card: which sections
//! are shown, which language labels come from, and whether raw ingredient
//! payloads are dumped for debugging.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::Deserialize;
use std::env;

// Constants for card configuration
pub const DEFAULT_LANGUAGE: &str = "en";
pub const ENV_SHOW_INGREDIENTS: &str = "RECIPE_CARD_SHOW_INGREDIENTS";
pub const ENV_DEBUG: &str = "RECIPE_CARD_DEBUG";
pub const ENV_LANGUAGE: &str = "RECIPE_CARD_LANGUAGE";

/// Configuration structure for the recipe card
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CardConfig {
    /// Whether the ingredients section is rendered at all
    pub show_ingredients: bool,
    /// Dump raw ingredient payloads at debug level before rendering
    pub debug: bool,
    /// Language code used for labels (e.g., "en", "fr")
    pub language: String,
    /// Overrides the label shown for ingredients without a name
    pub placeholder_label: Option<String>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            show_ingredients: true,
            debug: false,
            language: DEFAULT_LANGUAGE.to_string(),
            placeholder_label: None,
        }
    }
}

impl CardConfig {
    /// Build a configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = read_env(ENV_SHOW_INGREDIENTS) {
            config.show_ingredients = parse_flag(&value)
                .with_context(|| format!("Invalid value for {ENV_SHOW_INGREDIENTS}"))?;
        }

        if let Some(value) = read_env(ENV_DEBUG) {
            config.debug =
                parse_flag(&value).with_context(|| format!("Invalid value for {ENV_DEBUG}"))?;
        }

        if let Some(value) = read_env(ENV_LANGUAGE) {
            config.language = value;
        }

        if config.debug {
            warn!("Ingredient payload dumping is enabled");
        }

        info!(
            "Card configuration: show_ingredients={}, debug={}, language={}",
            config.show_ingredients, config.debug, config.language
        );

        Ok(config)
    }

    /// Parse a card configuration from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse card configuration")
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse a boolean flag as written in env files
pub fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow::anyhow!("Expected a boolean flag, got '{}'", other)),
    }
}
