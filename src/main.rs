use anyhow::{Context, Result};
use log::{info, warn};
use recipe_card::card_config::CardConfig;
use recipe_card::ingredients_section::render_ingredients;
use recipe_card::localization::LocalizationManager;
use recipe_card::recipe_source::load_recipe;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    info!("Starting recipe card renderer");

    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = CardConfig::from_env()?;

    // Recipe path comes from the first argument, or RECIPE_JSON
    let recipe_path = env::args()
        .nth(1)
        .or_else(|| env::var("RECIPE_JSON").ok())
        .context("Usage: recipe_card <recipe.json> (or set RECIPE_JSON)")?;

    let recipe = load_recipe(&recipe_path).await?;
    let localization = LocalizationManager::new()?;

    println!("{}", recipe.name);
    match render_ingredients(&recipe, &config, &localization) {
        Some(section) => print!("{}", section.to_plain_text()),
        None => warn!("No ingredients to show for '{}'", recipe.name),
    }

    Ok(())
}
