//! User health profile
//!
//! Collected by the wizard and passed through, read-only, to prompt
//! construction. Validation mirrors the form rules: name required, age in a
//! sane range, positive body measurements.

use serde::{Deserialize, Serialize};

/// Dietary restriction options offered by the wizard.
pub const DIETARY_RESTRICTIONS: [&str; 7] = [
    "Vegetarian",
    "Vegan",
    "Gluten-Free",
    "Dairy-Free",
    "Halal",
    "Kosher",
    "None",
];

/// A user's health and dietary profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Display name
    pub name: String,
    /// Age in years, 1..=120
    pub age: u32,
    /// Height in centimeters
    pub height_cm: f32,
    /// Weight in kilograms
    pub weight_kg: f32,
    /// Free-text health conditions, comma separated
    pub health_conditions: String,
    /// Free-text allergies, comma separated
    pub allergies: String,
    /// Selected dietary-restriction tags
    pub dietary_restrictions: Vec<String>,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            age: 25,
            height_cm: 170.0,
            weight_kg: 70.0,
            health_conditions: String::new(),
            allergies: String::new(),
            dietary_restrictions: vec!["None".to_string()],
        }
    }
}

impl UserProfile {
    /// Validate the profile fields, returning a user-facing message on the
    /// first violation.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if self.age == 0 || self.age > 120 {
            return Err("Please enter a valid age".to_string());
        }
        if self.height_cm <= 0.0 || self.weight_kg <= 0.0 {
            return Err("Height and weight must be positive numbers".to_string());
        }
        Ok(())
    }

    /// Dietary restrictions as a single display string.
    pub fn restrictions_text(&self) -> String {
        if self.dietary_restrictions.is_empty() {
            "None".to_string()
        } else {
            self.dietary_restrictions.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_profile() -> UserProfile {
        UserProfile {
            name: "Alex".to_string(),
            age: 34,
            health_conditions: "diabetes".to_string(),
            allergies: "peanuts".to_string(),
            dietary_restrictions: vec!["Vegetarian".to_string()],
            ..UserProfile::default()
        }
    }

    #[test]
    fn test_valid_profile_passes() {
        assert!(valid_profile().validate().is_ok());
    }

    #[test]
    fn test_name_required() {
        let mut profile = valid_profile();
        profile.name = "  ".to_string();
        assert_eq!(profile.validate(), Err("Name is required".to_string()));
    }

    #[test]
    fn test_age_bounds() {
        let mut profile = valid_profile();
        profile.age = 0;
        assert!(profile.validate().is_err());

        profile.age = 121;
        assert!(profile.validate().is_err());

        profile.age = 120;
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_measurements_must_be_positive() {
        let mut profile = valid_profile();
        profile.height_cm = 0.0;
        assert!(profile.validate().is_err());

        let mut profile = valid_profile();
        profile.weight_kg = -1.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_restrictions_text() {
        let mut profile = valid_profile();
        assert_eq!(profile.restrictions_text(), "Vegetarian");

        profile.dietary_restrictions =
            vec!["Vegan".to_string(), "Gluten-Free".to_string()];
        assert_eq!(profile.restrictions_text(), "Vegan, Gluten-Free");

        profile.dietary_restrictions.clear();
        assert_eq!(profile.restrictions_text(), "None");
    }
}
