//! # Presentation Tests
//!
//! End-to-end checks of the ingredient presentation engine through the
//! public API: legacy unit decoding, name and note fallback, quantity gating.

use recipe_card::ingredient_model::{FoodRef, RawIngredient, UnitRecord, UnitValue, PLACEHOLDER_NAME};
use recipe_card::legacy_unit::decode;
use recipe_card::presentation::{resolve, resolve_all};
use recipe_card::recipe_source::parse_recipe;

fn text_unit(text: &str) -> Option<UnitValue> {
    Some(UnitValue::Text(text.to_string()))
}

#[test]
fn test_decoder_only_returns_scalars_or_nothing() {
    let inputs = [
        "{'name': 'cup'}",
        "{'name': 'cup', 'plural': None, 'fraction': True, 'ratio': 0.5}",
        "{'nested': {'name': 'x'}, 'list': [1, 2, None]}",
        "{not valid",
        "{'unterminated: 1}",
        "{'a': bogus}",
        "{}}",
        "{",
        "",
        "   ",
    ];

    for input in inputs {
        if let Some(unit) = decode(input) {
            for (key, value) in unit.iter() {
                assert!(
                    value.is_string() || value.is_number() || value.is_boolean(),
                    "unexpected value for '{}' in {:?}",
                    key,
                    input
                );
            }
        }
    }
}

#[test]
fn test_decoder_canonical_text() {
    let unit = decode("{'name': 'cup'}").expect("canonical legacy text should decode");
    assert_eq!(unit.name(), "cup");
}

#[test]
fn test_resolve_all_keeps_count_and_order() {
    let raws: Vec<RawIngredient> = (0..5)
        .map(|i| RawIngredient::new().with_display(&format!("Item {}", i)))
        .chain(std::iter::once(RawIngredient::new()))
        .collect();

    let records = resolve_all(&raws);
    assert_eq!(records.len(), raws.len());
    for (i, record) in records.iter().take(5).enumerate() {
        assert_eq!(record.name_segment, format!("Item {}", i));
    }
    assert_eq!(records[5].name_segment, PLACEHOLDER_NAME);

    assert!(resolve_all(&[]).is_empty());
}

#[test]
fn test_name_fallback_priority() {
    let raw = RawIngredient {
        food: Some(FoodRef::named("Flour")),
        display: Some("ignored".to_string()),
        note: Some("ignored".to_string()),
        ..Default::default()
    };
    assert_eq!(resolve(&raw).name_segment, "Flour");

    let raw = RawIngredient {
        food: None,
        display: Some("Flour".to_string()),
        ..Default::default()
    };
    assert_eq!(resolve(&raw).name_segment, "Flour");

    let raw = RawIngredient {
        note: Some("Salt to taste".to_string()),
        ..Default::default()
    };
    let record = resolve(&raw);
    assert_eq!(record.name_segment, "Salt to taste");
    assert!(record.note_segment.is_none());

    let record = resolve(&RawIngredient::default());
    assert_eq!(record.name_segment, PLACEHOLDER_NAME);
    assert!(record.is_placeholder);
}

#[test]
fn test_note_dedup() {
    let raw = RawIngredient::new()
        .with_food(FoodRef::named("Flour"))
        .with_note("Flour");
    assert!(resolve(&raw).note_segment.is_none());

    let raw = RawIngredient::new()
        .with_food(FoodRef::named("Flour"))
        .with_note("sifted");
    assert_eq!(resolve(&raw).note_segment.as_deref(), Some("sifted"));
}

#[test]
fn test_quantity_gating() {
    let zero = RawIngredient {
        quantity: Some(0.0),
        unit: text_unit("cup"),
        ..Default::default()
    };
    assert!(resolve(&zero).quantity_line.is_none());

    let missing = RawIngredient {
        quantity: None,
        unit: text_unit("cup"),
        ..Default::default()
    };
    assert!(resolve(&missing).quantity_line.is_none());

    let two_cups = RawIngredient {
        quantity: Some(2.0),
        unit: Some(UnitValue::Record(UnitRecord::named("cup"))),
        ..Default::default()
    };
    assert_eq!(resolve(&two_cups).quantity_line.unwrap().trim(), "2 cup");
}

#[test]
fn test_legacy_unit_end_to_end() {
    let raw = RawIngredient {
        quantity: Some(1.0),
        unit: text_unit("{'name': 'tablespoon'}"),
        food: Some(FoodRef::named("Oil")),
        ..Default::default()
    };

    let record = resolve(&raw);
    assert_eq!(record.quantity_line.unwrap().trim(), "1 tablespoon");
    assert_eq!(record.name_segment, "Oil");
}

#[test]
fn test_malformed_legacy_unit_degrades() {
    assert!(decode("{not valid").is_none());

    let raw = RawIngredient {
        quantity: Some(1.0),
        unit: text_unit("{not valid"),
        food: Some(FoodRef::named("Oil")),
        ..Default::default()
    };

    let record = resolve(&raw);
    assert_eq!(record.quantity_line.unwrap().trim(), "1 {not valid");
    assert_eq!(record.name_segment, "Oil");
}

#[test]
fn test_service_payload_end_to_end() {
    let recipe = parse_recipe(
        r#"{
            "name": "Vinaigrette",
            "recipeIngredient": [
                {"quantity": 3, "unit": "{'id': 'a1', 'name': 'tablespoon', 'fraction': True, 'aliases': []}", "food": {"name": "Olive oil"}, "note": "extra virgin"},
                {"quantity": 1, "unit": {"name": "tablespoon"}, "food": null, "display": "Vinegar", "note": "Vinegar"},
                {"quantity": 0, "unit": null, "food": null, "display": null, "note": "Salt and pepper to taste"},
                {"quantity": 0.5, "unit": "teaspoon", "food": {"name": "Mustard"}, "display": null, "note": null},
                {"quantity": null, "unit": null, "food": null, "display": "", "note": ""}
            ]
        }"#,
    )
    .unwrap();

    let lines: Vec<String> = resolve_all(&recipe.ingredients)
        .iter()
        .map(|record| record.to_string())
        .collect();

    assert_eq!(
        lines,
        vec![
            "3 tablespoon Olive oil (extra virgin)",
            "1 tablespoon Vinegar",
            "Salt and pepper to taste",
            "0.5 teaspoon Mustard",
            "Ingredient",
        ]
    );
}
