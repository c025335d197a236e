use anyhow::{anyhow, Result};
use fluent_bundle::{FluentBundle, FluentResource};
use log::{debug, warn};
use std::collections::HashMap;
use unic_langid::LanguageIdentifier;

const FALLBACK_LANGUAGE: &str = "en";

/// Embedded message resources, keyed by language code
const RESOURCES: &[(&str, &str)] = &[
    (
        "en",
        "common-ingredients = Ingredients\n\
         common-ingredient = Ingredient\n\
         common-instructions = Instructions\n\
         common-servings = Servings\n",
    ),
    (
        "fr",
        "common-ingredients = Ingrédients\n\
         common-ingredient = Ingrédient\n\
         common-instructions = Instructions\n\
         common-servings = Portions\n",
    ),
];

/// Localized label lookup for the recipe card
pub struct LocalizationManager {
    bundles: HashMap<String, FluentBundle<FluentResource>>,
}

impl LocalizationManager {
    /// Create a new localization manager with every embedded language loaded
    pub fn new() -> Result<Self> {
        let mut bundles = HashMap::new();

        for (language, source) in RESOURCES {
            let locale: LanguageIdentifier = language.parse()?;
            let bundle = Self::create_bundle(&locale, source)?;
            bundles.insert(language.to_string(), bundle);
        }

        Ok(Self { bundles })
    }

    /// Create a fluent bundle for a specific locale
    fn create_bundle(locale: &LanguageIdentifier, source: &str) -> Result<FluentBundle<FluentResource>> {
        let mut bundle = FluentBundle::new(vec![locale.clone()]);
        // Labels are rendered as plain text, no bidi isolation marks
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid resource for {}: {:?}", locale, errors))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Duplicate messages for {}: {:?}", locale, errors))?;

        Ok(bundle)
    }

    /// Look up a label by dotted path (e.g. `common.ingredients`) in English
    pub fn lookup(&self, path: &str) -> Option<String> {
        self.lookup_in_language(path, FALLBACK_LANGUAGE)
    }

    /// Look up a label by dotted path, falling back to English for unknown languages or keys
    pub fn lookup_in_language(&self, path: &str, language: &str) -> Option<String> {
        let key = message_id(path);

        if let Some(value) = self.bundles.get(language).and_then(|b| format_message(b, &key)) {
            return Some(value);
        }

        if language != FALLBACK_LANGUAGE {
            debug!("No '{}' label for language '{}', using {}", path, language, FALLBACK_LANGUAGE);
            return self
                .bundles
                .get(FALLBACK_LANGUAGE)
                .and_then(|b| format_message(b, &key));
        }

        None
    }

    /// Look up a label, or use `default` when it is missing everywhere
    pub fn label_or(&self, path: &str, language: &str, default: &str) -> String {
        self.lookup_in_language(path, language).unwrap_or_else(|| {
            warn!("Missing translation: {}", path);
            default.to_string()
        })
    }

    pub fn supports_language(&self, language: &str) -> bool {
        self.bundles.contains_key(language)
    }
}

/// Reduce a language tag such as `fr-CA` to a supported base language, defaulting to English
pub fn detect_language(language_code: Option<&str>) -> &'static str {
    let base = language_code
        .and_then(|code| code.split(['-', '_']).next())
        .map(|base| base.to_lowercase())
        .unwrap_or_default();

    RESOURCES
        .iter()
        .map(|(language, _)| *language)
        .find(|language| *language == base)
        .unwrap_or(FALLBACK_LANGUAGE)
}

/// Fluent identifiers cannot contain dots
fn message_id(path: &str) -> String {
    path.replace('.', "-")
}

fn format_message(bundle: &FluentBundle<FluentResource>, key: &str) -> Option<String> {
    let pattern = bundle.get_message(key)?.value()?;
    let mut errors = vec![];
    let value = bundle.format_pattern(pattern, None, &mut errors);
    if !errors.is_empty() {
        warn!("Errors formatting '{}': {:?}", key, errors);
    }
    Some(value.into_owned())
}
