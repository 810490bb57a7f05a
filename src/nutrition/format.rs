//! Nutrition text formatter
//!
//! Renders a `NutritionRecord` into the fixed-layout text block used as the
//! factual payload of the analysis prompt. This is a one-way projection; no
//! information round-trips back out of the text.

use super::{NutritionRecord, Nutrients, NOT_SPECIFIED, NUTRIENT_KEYS};

/// Serialize a record into the four-section prompt block.
///
/// Nutrients whose value is the "Not specified" sentinel are omitted; an
/// empty allergen list renders as "None listed"; `en:` tag prefixes are
/// stripped. The result is trimmed.
pub fn format_nutrition(record: &NutritionRecord) -> String {
    let mut out = String::new();

    out.push_str("Nutrition Facts:\n");
    out.push_str(&format!("Product: {}\n", record.product_name));
    out.push_str(&format!("Serving Size: {}\n", record.serving_size));
    out.push_str(&format!("Calories: {}\n", record.calories));

    out.push_str("\nIngredients:\n");
    out.push_str(record.ingredients_text.trim());
    out.push('\n');

    out.push_str("\nAllergen Information:\n");
    if record.allergens.is_empty() {
        out.push_str("None listed\n");
    } else {
        let listed: Vec<&str> = record
            .allergens
            .iter()
            .map(|tag| tag.strip_prefix("en:").unwrap_or(tag))
            .collect();
        out.push_str(&listed.join(", "));
        out.push('\n');
    }

    out.push_str("\nNutrient Information:\n");
    match &record.nutrients {
        Nutrients::PerHundredGrams(map) => {
            for key in NUTRIENT_KEYS {
                match map.get(key) {
                    Some(value) if value != NOT_SPECIFIED => {
                        out.push_str(&format!("{}: {}g per 100g\n", capitalize(key), value));
                    }
                    _ => {}
                }
            }
        }
        Nutrients::RawLines(lines) => {
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
        }
    }

    out.trim().to_string()
}

/// Uppercase the first character of a nutrient key.
fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
