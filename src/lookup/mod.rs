//! Product Lookup Client
//!
//! Queries the Open Food Facts product database by barcode and maps the
//! response into the shared [`NutritionRecord`] shape. The outcome is a
//! tagged value so callers can tell "product doesn't exist" from "service
//! unreachable" — the two used to be conflated behind a single `None`.

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::LookupSettings;
use crate::error::ScanError;
use crate::nutrition::{NutritionRecord, Nutrients, NOT_SPECIFIED, NUTRIENT_KEYS, UNKNOWN_PRODUCT};

/// Result of a product lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// The database knows the barcode
    Found(NutritionRecord),
    /// The database reports no match (`status == 0`)
    NotFound,
    /// Transport/protocol failure; carries a human-readable reason
    ServiceError(String),
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    product: Option<Product>,
}

#[derive(Debug, Default, Deserialize)]
struct Product {
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    serving_size: Option<String>,
    #[serde(default)]
    ingredients_text: Option<String>,
    #[serde(default)]
    allergens_hierarchy: Vec<String>,
    /// Kept as raw JSON: the database reports nutrient values as numbers or
    /// strings depending on the product, and keys are frequently missing.
    #[serde(default)]
    nutriments: BTreeMap<String, Value>,
}

/// HTTP client for the product database.
#[derive(Debug, Clone)]
pub struct ProductLookupClient {
    client: Client,
    base_url: String,
}

impl ProductLookupClient {
    /// Build a client with the configured endpoint and timeout.
    pub fn new(settings: &LookupSettings) -> Result<Self, ScanError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ScanError::Lookup(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch product data for a barcode.
    pub async fn fetch_product(&self, barcode: &str) -> LookupOutcome {
        let url = format!("{}/api/v0/product/{}.json", self.base_url, barcode);
        debug!(barcode, "looking up product");

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(barcode, error = %e, "product lookup request failed");
                return LookupOutcome::ServiceError(format!("request failed: {e}"));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            warn!(barcode, %status, "product lookup returned error status");
            return LookupOutcome::ServiceError(format!("service returned {status}"));
        }

        let body: ProductResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                warn!(barcode, error = %e, "product lookup response was not valid JSON");
                return LookupOutcome::ServiceError(format!("invalid response: {e}"));
            }
        };

        outcome_from_response(body)
    }
}

/// Map a parsed response body into a lookup outcome.
fn outcome_from_response(body: ProductResponse) -> LookupOutcome {
    if body.status != 1 {
        debug!("product not in database");
        return LookupOutcome::NotFound;
    }
    LookupOutcome::Found(record_from_product(body.product.unwrap_or_default()))
}

/// Map a product payload into a nutrition record, substituting sentinels for
/// anything the source omits.
fn record_from_product(product: Product) -> NutritionRecord {
    let nutrients = NUTRIENT_KEYS
        .iter()
        .map(|key| {
            let value = nutriment_value(&product.nutriments, &format!("{key}_100g"));
            (key.to_string(), value)
        })
        .collect();

    NutritionRecord {
        product_name: product
            .product_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
        serving_size: product.serving_size.unwrap_or_default(),
        calories: nutriment_value(&product.nutriments, "energy-kcal_100g"),
        ingredients_text: product.ingredients_text.unwrap_or_default(),
        allergens: product.allergens_hierarchy,
        nutrients: Nutrients::PerHundredGrams(nutrients),
    }
}

/// Render a nutriment value as text, or the sentinel when absent/malformed.
fn nutriment_value(nutriments: &BTreeMap<String, Value>, key: &str) -> String {
    match nutriments.get(key) {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => NOT_SPECIFIED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_response(json: &str) -> ProductResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_full_product_mapping() {
        let body = parse_response(
            r#"{
                "status": 1,
                "product": {
                    "product_name": "Choco Crunch",
                    "serving_size": "30g",
                    "ingredients_text": "wheat flour, sugar, cocoa",
                    "allergens_hierarchy": ["en:milk", "en:gluten"],
                    "nutriments": {
                        "energy-kcal_100g": 480,
                        "fat_100g": 22.5,
                        "proteins_100g": 6,
                        "carbohydrates_100g": 60,
                        "sugars_100g": 35,
                        "fiber_100g": 3.2,
                        "sodium_100g": 0.3
                    }
                }
            }"#,
        );
        let record = record_from_product(body.product.unwrap());

        assert_eq!(record.product_name, "Choco Crunch");
        assert_eq!(record.serving_size, "30g");
        assert_eq!(record.calories, "480");
        assert_eq!(record.ingredients_text, "wheat flour, sugar, cocoa");
        assert_eq!(record.allergens, vec!["en:milk", "en:gluten"]);

        match record.nutrients {
            Nutrients::PerHundredGrams(map) => {
                assert_eq!(map.get("fat").unwrap(), "22.5");
                assert_eq!(map.get("sodium").unwrap(), "0.3");
            }
            Nutrients::RawLines(_) => panic!("lookup should produce per-100g nutrients"),
        }
    }

    #[test]
    fn test_missing_nutriments_become_sentinels() {
        let body = parse_response(
            r#"{"status": 1, "product": {"product_name": "Mystery Snack"}}"#,
        );
        let record = record_from_product(body.product.unwrap());

        assert_eq!(record.calories, NOT_SPECIFIED);
        match record.nutrients {
            Nutrients::PerHundredGrams(map) => {
                for key in NUTRIENT_KEYS {
                    assert_eq!(map.get(key).unwrap(), NOT_SPECIFIED);
                }
            }
            Nutrients::RawLines(_) => panic!("lookup should produce per-100g nutrients"),
        }
    }

    #[test]
    fn test_missing_product_name_defaults() {
        let body = parse_response(r#"{"status": 1, "product": {"product_name": "  "}}"#);
        let record = record_from_product(body.product.unwrap());
        assert_eq!(record.product_name, UNKNOWN_PRODUCT);
    }

    #[test]
    fn test_string_nutriment_values_pass_through() {
        let body = parse_response(
            r#"{"status": 1, "product": {"nutriments": {"fat_100g": "12.5"}}}"#,
        );
        let record = record_from_product(body.product.unwrap());
        match record.nutrients {
            Nutrients::PerHundredGrams(map) => {
                assert_eq!(map.get("fat").unwrap(), "12.5");
            }
            Nutrients::RawLines(_) => panic!("lookup should produce per-100g nutrients"),
        }
    }

    #[test]
    fn test_malformed_nutriment_value_becomes_sentinel() {
        let body = parse_response(
            r#"{"status": 1, "product": {"nutriments": {"fat_100g": [1, 2]}}}"#,
        );
        let record = record_from_product(body.product.unwrap());
        match record.nutrients {
            Nutrients::PerHundredGrams(map) => {
                assert_eq!(map.get("fat").unwrap(), NOT_SPECIFIED);
            }
            Nutrients::RawLines(_) => panic!("lookup should produce per-100g nutrients"),
        }
    }

    #[test]
    fn test_status_zero_is_not_found() {
        let body = parse_response(r#"{"status": 0, "status_verbose": "product not found"}"#);
        assert_eq!(outcome_from_response(body), LookupOutcome::NotFound);
    }

    #[test]
    fn test_status_one_is_found() {
        let body = parse_response(r#"{"status": 1, "product": {"product_name": "Oat Bar"}}"#);
        match outcome_from_response(body) {
            LookupOutcome::Found(record) => assert_eq!(record.product_name, "Oat Bar"),
            other => panic!("expected Found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_service_is_a_service_error() {
        let settings = LookupSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
        };
        let client = ProductLookupClient::new(&settings).unwrap();
        let outcome = client.fetch_product("737628064502").await;
        assert!(matches!(outcome, LookupOutcome::ServiceError(_)));
    }
}
