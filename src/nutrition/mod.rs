//! Nutrition Data Model
//!
//! The single structured entity shared by the label parser and the product
//! lookup client. Absent data is represented by explicit sentinel values,
//! never by omitting a key, so the formatter never fails on missing fields.

pub mod format;
pub mod parser;

pub use format::format_nutrition;
pub use parser::{parse_label_text, LabelFields, ParserOptions};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Placeholder meaning "field absent", distinct from an empty string.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Default product name when the source reports none.
pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

/// Nutrient keys reported per 100g by the product database, in display order.
pub const NUTRIENT_KEYS: [&str; 6] = [
    "fat",
    "proteins",
    "carbohydrates",
    "sugars",
    "fiber",
    "sodium",
];

/// Nutrient data in one of the two shapes the pipeline produces.
///
/// The lookup client reports named per-100g values; the label parser only
/// captures raw nutrient lines as they appeared on the label. Both flow into
/// the same record so the formatter has a single input shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Nutrients {
    /// Named values keyed by the entries of [`NUTRIENT_KEYS`], each either a
    /// numeric string or the [`NOT_SPECIFIED`] sentinel.
    PerHundredGrams(BTreeMap<String, String>),
    /// Verbatim nutrient lines from OCR text, e.g. `"0.5g Fiber"`.
    RawLines(Vec<String>),
}

impl Nutrients {
    /// A per-100g map with every known nutrient set to the sentinel.
    pub fn unspecified() -> Self {
        let map = NUTRIENT_KEYS
            .iter()
            .map(|k| (k.to_string(), NOT_SPECIFIED.to_string()))
            .collect();
        Nutrients::PerHundredGrams(map)
    }
}

/// Structured nutrition data for one product.
///
/// Created fresh per scan/lookup attempt and discarded once formatted;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionRecord {
    /// Product display name
    pub product_name: String,
    /// Free-text serving size, may be empty
    pub serving_size: String,
    /// Energy value as text; [`NOT_SPECIFIED`] when unavailable
    pub calories: String,
    /// Free-text ingredient list, possibly empty
    pub ingredients_text: String,
    /// Allergen tags; may carry an `en:` prefix that is stripped at
    /// formatting time. Empty when none detected/reported.
    pub allergens: Vec<String>,
    /// Nutrient data (see [`Nutrients`])
    pub nutrients: Nutrients,
}

impl Default for NutritionRecord {
    fn default() -> Self {
        Self {
            product_name: UNKNOWN_PRODUCT.to_string(),
            serving_size: String::new(),
            calories: NOT_SPECIFIED.to_string(),
            ingredients_text: String::new(),
            allergens: Vec::new(),
            nutrients: Nutrients::unspecified(),
        }
    }
}

impl NutritionRecord {
    /// Build a record from the fields the label parser extracted.
    pub fn from_label_fields(fields: LabelFields) -> Self {
        Self {
            product_name: UNKNOWN_PRODUCT.to_string(),
            serving_size: fields.serving_size,
            calories: if fields.calories.is_empty() {
                NOT_SPECIFIED.to_string()
            } else {
                fields.calories
            },
            ingredients_text: fields.ingredients,
            allergens: fields.allergens.into_iter().collect(),
            nutrients: Nutrients::RawLines(fields.nutrients),
        }
    }
}
