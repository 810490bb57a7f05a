//! Nutrition-label text parser
//!
//! Segments raw OCR output into structured fields with a single forward pass
//! over the trimmed lines. The rules form a priority cascade: each line is
//! claimed by the first rule that matches, so the order of checks is part of
//! the contract, not an implementation detail.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Fields extracted from a nutrition-label text block.
///
/// Intermediate shape; convert with `NutritionRecord::from_label_fields`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelFields {
    /// Serving size text with the leading label stripped, e.g. `"30g"`
    pub serving_size: String,
    /// Calorie text with the leading label stripped, e.g. `"120"`
    pub calories: String,
    /// Accumulated ingredient text; entries are space-prefixed as appended
    pub ingredients: String,
    /// The full allergen statement line, verbatim (last match wins)
    pub allergens: Option<String>,
    /// Verbatim lines matching the leading numeric-plus-unit pattern
    pub nutrients: Vec<String>,
}

/// Parser behavior switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParserOptions {
    /// The legacy behavior leaves the ingredients section open until end of
    /// input once a heading is seen, so later free-text lines keep
    /// accumulating into the ingredient text. Setting this closes the section
    /// at the first blank line instead.
    pub close_ingredients_at_blank_line: bool,
}

/// Allergen keywords that qualify a "contains" line as an allergen statement.
const ALLERGEN_TOKENS: [&str; 5] = ["allergen", "milk", "soy", "nuts", "wheat"];

fn serving_size_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)serving size[: ]*").unwrap())
}

fn calories_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)calories[: ]*").unwrap())
}

fn ingredients_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)ingredients[: ]*").unwrap())
}

fn nutrient_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+(\.\d+)?\s?(g|mg|%)").unwrap())
}

/// Parse a raw OCR text block into label fields.
///
/// Repeated serving-size/calories/allergen matches overwrite earlier ones;
/// lines claimed by no rule are dropped.
pub fn parse_label_text(text: &str, options: &ParserOptions) -> LabelFields {
    let mut fields = LabelFields::default();
    let mut in_ingredients = false;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            if options.close_ingredients_at_blank_line && in_ingredients {
                in_ingredients = false;
            }
            continue;
        }
        let lower = line.to_lowercase();

        if lower.contains("serving size") {
            fields.serving_size = serving_size_re().replace(line, "").trim().to_string();
        } else if lower.contains("calories") {
            fields.calories = calories_re().replace(line, "").trim().to_string();
        } else if lower.contains("ingredients") {
            in_ingredients = true;
            // Text following the heading on the same line belongs to the
            // ingredient list.
            let rest = ingredients_re().replace(line, "");
            let rest = rest.trim_end();
            if !rest.is_empty() {
                fields.ingredients.push(' ');
                fields.ingredients.push_str(rest);
            }
        } else if lower.contains("contains")
            && ALLERGEN_TOKENS.iter().any(|t| lower.contains(t))
        {
            fields.allergens = Some(line.to_string());
        } else if nutrient_line_re().is_match(line) {
            fields.nutrients.push(line.to_string());
        } else if in_ingredients {
            fields.ingredients.push(' ');
            fields.ingredients.push_str(line);
        } else {
            debug!(line, "unclassified label line dropped");
        }
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> LabelFields {
        parse_label_text(text, &ParserOptions::default())
    }

    #[test]
    fn test_serving_size_label_stripped() {
        let fields = parse("Serving Size: 30g");
        assert_eq!(fields.serving_size, "30g");
    }

    #[test]
    fn test_calories_label_stripped_without_colon() {
        let fields = parse("Calories 120");
        assert_eq!(fields.calories, "120");
    }

    #[test]
    fn test_repeated_matches_last_wins() {
        let fields = parse("Serving Size: 30g\nServing Size: 55g");
        assert_eq!(fields.serving_size, "55g");
    }

    #[test]
    fn test_nutrient_line_requires_numeric_prefix() {
        let fields = parse("2.5g Total Fat\nTotal Fat 2.5g");
        // Leading numeric+unit is captured; the reversed form is not.
        assert_eq!(fields.nutrients, vec!["2.5g Total Fat".to_string()]);
    }

    #[test]
    fn test_nutrient_units() {
        let fields = parse("120mg Sodium\n10% Daily Value\n3 g Protein");
        assert_eq!(
            fields.nutrients,
            vec![
                "120mg Sodium".to_string(),
                "10% Daily Value".to_string(),
                "3 g Protein".to_string(),
            ]
        );
    }

    #[test]
    fn test_allergen_line_requires_keyword() {
        let fields = parse("Contains: milk\nContains real fruit");
        // "Contains real fruit" lacks an allergen token and is dropped.
        assert_eq!(fields.allergens, Some("Contains: milk".to_string()));
    }

    #[test]
    fn test_allergen_statement_token() {
        let fields = parse("Contains allergens: see ingredients");
        assert_eq!(
            fields.allergens,
            Some("Contains allergens: see ingredients".to_string())
        );
    }

    #[test]
    fn test_full_label() {
        let text =
            "Serving Size: 100g\nCalories: 200\nIngredients: water, sugar\nContains: milk\n0.5g Fiber";
        let fields = parse(text);
        assert_eq!(fields.serving_size, "100g");
        assert_eq!(fields.calories, "200");
        assert_eq!(fields.ingredients, " water, sugar");
        assert_eq!(fields.allergens, Some("Contains: milk".to_string()));
        assert_eq!(fields.nutrients, vec!["0.5g Fiber".to_string()]);
    }

    #[test]
    fn test_ingredients_accumulate_across_lines() {
        let text = "Ingredients:\nwater, sugar,\nsalt";
        let fields = parse(text);
        assert_eq!(fields.ingredients, " water, sugar, salt");
    }

    #[test]
    fn test_ingredients_section_never_closes_by_default() {
        let text = "Ingredients: water\n\nbest served chilled";
        let fields = parse(text);
        assert_eq!(fields.ingredients, " water best served chilled");
    }

    #[test]
    fn test_ingredients_section_closes_at_blank_line_when_enabled() {
        let options = ParserOptions {
            close_ingredients_at_blank_line: true,
        };
        let text = "Ingredients: water\n\nbest served chilled";
        let fields = parse_label_text(text, &options);
        assert_eq!(fields.ingredients, " water");
    }

    #[test]
    fn test_priority_over_open_ingredients_section() {
        // Serving-size and calories lines after an ingredients heading are
        // still claimed by their own rules, not accumulated.
        let text = "Ingredients: water\nCalories: 90\nServing Size: 25g";
        let fields = parse(text);
        assert_eq!(fields.ingredients, " water");
        assert_eq!(fields.calories, "90");
        assert_eq!(fields.serving_size, "25g");
    }

    #[test]
    fn test_unmatched_lines_dropped() {
        let fields = parse("NUTRITION FACTS\nBest before 2026");
        assert_eq!(fields, LabelFields::default());
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), LabelFields::default());
    }
}
