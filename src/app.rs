//! Wizard Coordinator
//!
//! Drives the interactive flow: prompts for each step, runs the scan and
//! lookup pipelines, and feeds events into the wizard state machine. All
//! side effects live here; the state machine itself stays pure.

use anyhow::Result;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::analysis::{analyze_product, GeminiClient};
use crate::config::AppConfig;
use crate::lookup::{LookupOutcome, ProductLookupClient};
use crate::nutrition::{
    format_nutrition, parse_label_text, NutritionRecord, ParserOptions,
};
use crate::profile::{UserProfile, DIETARY_RESTRICTIONS};
use crate::storage;
use crate::vision::ScanPipeline;
use crate::wizard::{transition, WizardEvent, WizardState};

/// Interactive wizard application.
pub struct WizardApp {
    config: AppConfig,
    pipeline: ScanPipeline,
    lookup: ProductLookupClient,
    /// Skip the LLM call and show the formatted nutrition block instead
    offline: bool,
    profile: UserProfile,
    current_product: Option<NutritionRecord>,
    analysis_results: Option<String>,
}

impl WizardApp {
    /// Create the wizard, loading any saved profile as prefill data.
    pub fn new(config: AppConfig, offline: bool) -> Result<Self> {
        let pipeline = ScanPipeline::new(config.enhance.clone(), config.ocr.clone());
        let lookup = ProductLookupClient::new(&config.lookup)?;
        let profile = load_saved_profile().unwrap_or_default();

        Ok(Self {
            config,
            pipeline,
            lookup,
            offline,
            profile,
            current_product: None,
            analysis_results: None,
        })
    }

    /// Run the wizard until the user exits.
    pub async fn run(&mut self) -> Result<()> {
        let mut state = WizardState::Welcome;

        loop {
            let event = match state {
                WizardState::Welcome => self.step_welcome()?,
                WizardState::PersonalInfo => self.step_personal_info()?,
                WizardState::HealthInfo => self.step_health_info()?,
                WizardState::Scanning => self.step_scanning().await?,
                WizardState::ConfirmProduct => self.step_confirm().await?,
                WizardState::Results => self.step_results()?,
            };

            let Some(event) = event else {
                break;
            };

            if event == WizardEvent::StartOver {
                self.profile = UserProfile::default();
                self.current_product = None;
                self.analysis_results = None;
            }

            state = transition(state, event);
        }

        info!("wizard session finished");
        Ok(())
    }

    fn step_welcome(&self) -> Result<Option<WizardEvent>> {
        if self.profile.name.is_empty() {
            println!("\nWelcome! Let's analyze your food products for better dietary choices.");
        } else {
            println!(
                "\nWelcome back, {}! Let's analyze your food products for better dietary choices.",
                self.profile.name
            );
        }

        let ready = Confirm::new()
            .with_prompt("Ready to analyze a product?")
            .default(true)
            .interact()?;

        Ok(ready.then_some(WizardEvent::Continue))
    }

    fn step_personal_info(&mut self) -> Result<Option<WizardEvent>> {
        println!("\n== Tell Us About Yourself ==");

        loop {
            let name: String = Input::new()
                .with_prompt("Name")
                .default(self.profile.name.clone())
                .allow_empty(true)
                .interact_text()?;
            let age: u32 = Input::new()
                .with_prompt("Age")
                .default(self.profile.age)
                .interact_text()?;
            let height_cm: f32 = Input::new()
                .with_prompt("Height (cm)")
                .default(self.profile.height_cm)
                .interact_text()?;
            let weight_kg: f32 = Input::new()
                .with_prompt("Weight (kg)")
                .default(self.profile.weight_kg)
                .interact_text()?;

            let candidate = UserProfile {
                name,
                age,
                height_cm,
                weight_kg,
                ..self.profile.clone()
            };

            match candidate.validate() {
                Ok(()) => {
                    self.profile = candidate;
                    return Ok(Some(WizardEvent::Continue));
                }
                Err(message) => println!("Error: {message}"),
            }
        }
    }

    fn step_health_info(&mut self) -> Result<Option<WizardEvent>> {
        println!("\n== Health & Dietary Information ==");

        let health_conditions: String = Input::new()
            .with_prompt("Health conditions (comma separated, empty for none)")
            .default(self.profile.health_conditions.clone())
            .allow_empty(true)
            .interact_text()?;
        let allergies: String = Input::new()
            .with_prompt("Allergies (comma separated, empty for none)")
            .default(self.profile.allergies.clone())
            .allow_empty(true)
            .interact_text()?;

        let defaults: Vec<bool> = DIETARY_RESTRICTIONS
            .iter()
            .map(|r| self.profile.dietary_restrictions.iter().any(|d| d == r))
            .collect();
        let selected = MultiSelect::new()
            .with_prompt("Dietary restrictions (space toggles, enter confirms)")
            .items(&DIETARY_RESTRICTIONS)
            .defaults(&defaults)
            .interact()?;

        let choice = Select::new()
            .with_prompt("Next")
            .items(&["Continue", "Back"])
            .default(0)
            .interact()?;

        if choice == 1 {
            return Ok(Some(WizardEvent::Back));
        }

        self.profile.health_conditions = health_conditions;
        self.profile.allergies = allergies;
        self.profile.dietary_restrictions = selected
            .into_iter()
            .map(|i| DIETARY_RESTRICTIONS[i].to_string())
            .collect();

        save_profile_best_effort(&self.profile);
        Ok(Some(WizardEvent::Continue))
    }

    async fn step_scanning(&mut self) -> Result<Option<WizardEvent>> {
        println!("\n== Scan Product ==");

        let choice = Select::new()
            .with_prompt("Input method")
            .items(&[
                "Barcode image file",
                "Nutrition label photo",
                "Enter barcode digits",
                "Back",
            ])
            .default(0)
            .interact()?;

        match choice {
            0 => {
                let path: String = Input::new()
                    .with_prompt("Path to barcode image")
                    .interact_text()?;
                match self.pipeline.decode_barcode_file(&PathBuf::from(path)) {
                    Ok(Some(barcode)) => Ok(Some(self.lookup_product(&barcode).await)),
                    Ok(None) => {
                        println!(
                            "Could not detect a barcode in the image. Please ensure the barcode is clearly visible."
                        );
                        Ok(Some(WizardEvent::Continue))
                    }
                    Err(e) => {
                        println!("An error occurred: {e}");
                        Ok(Some(WizardEvent::Continue))
                    }
                }
            }
            1 => {
                let path: String = Input::new()
                    .with_prompt("Path to label photo")
                    .interact_text()?;
                match self.pipeline.extract_label_text_file(&PathBuf::from(path)) {
                    Ok(Some(text)) => {
                        let options = ParserOptions {
                            close_ingredients_at_blank_line: self
                                .config
                                .parser
                                .close_ingredients_at_blank_line,
                        };
                        let fields = parse_label_text(&text, &options);
                        self.current_product = Some(NutritionRecord::from_label_fields(fields));
                        Ok(Some(WizardEvent::ProductFound))
                    }
                    Ok(None) => {
                        println!("Could not extract any text from the image. Please try a clearer photo.");
                        Ok(Some(WizardEvent::Continue))
                    }
                    Err(e) => {
                        println!("An error occurred: {e}");
                        Ok(Some(WizardEvent::Continue))
                    }
                }
            }
            2 => {
                let barcode: String = Input::new()
                    .with_prompt("Barcode digits")
                    .interact_text()?;
                Ok(Some(self.lookup_product(barcode.trim()).await))
            }
            _ => Ok(Some(WizardEvent::Back)),
        }
    }

    /// Look up a barcode and stage the record for confirmation.
    async fn lookup_product(&mut self, barcode: &str) -> WizardEvent {
        println!("Retrieving product information...");
        match self.lookup.fetch_product(barcode).await {
            LookupOutcome::Found(record) => {
                self.current_product = Some(record);
                WizardEvent::ProductFound
            }
            LookupOutcome::NotFound => {
                println!("Could not find product information. Please try a different product.");
                WizardEvent::Continue
            }
            LookupOutcome::ServiceError(reason) => {
                println!("Product lookup failed: {reason}");
                WizardEvent::Continue
            }
        }
    }

    async fn step_confirm(&mut self) -> Result<Option<WizardEvent>> {
        let Some(record) = self.current_product.clone() else {
            // Nothing staged; send the user back to scanning.
            return Ok(Some(WizardEvent::RejectProduct));
        };

        println!("\nProduct found! Please verify the details below:");
        println!("  Product:      {}", record.product_name);
        println!("  Serving Size: {}", record.serving_size);
        println!("  Calories:     {} kcal per 100g", record.calories);

        let correct = Confirm::new()
            .with_prompt("Is this the right product?")
            .default(true)
            .interact()?;

        if !correct {
            self.current_product = None;
            return Ok(Some(WizardEvent::RejectProduct));
        }

        let nutrition_text = format_nutrition(&record);

        if self.offline {
            self.analysis_results = Some(nutrition_text);
            return Ok(Some(WizardEvent::AnalysisComplete));
        }

        println!("Analyzing nutritional information...");
        let llm = match GeminiClient::from_settings(&self.config.llm) {
            Ok(client) => client,
            Err(e) => {
                println!("Analysis failed: {e}");
                return Ok(Some(WizardEvent::Continue));
            }
        };

        match analyze_product(&llm, &self.profile, &nutrition_text).await {
            Ok(analysis) => {
                self.analysis_results = Some(analysis);
                self.current_product = None;
                Ok(Some(WizardEvent::AnalysisComplete))
            }
            Err(e) => {
                println!("Analysis failed: {e}");
                Ok(Some(WizardEvent::Continue))
            }
        }
    }

    fn step_results(&mut self) -> Result<Option<WizardEvent>> {
        println!("\n== Analysis Results ==\n");
        if let Some(results) = &self.analysis_results {
            println!("{results}");
        }

        let choice = Select::new()
            .with_prompt("Next")
            .items(&["Analyze another product", "Start over", "Exit"])
            .default(0)
            .interact()?;

        match choice {
            0 => {
                self.analysis_results = None;
                Ok(Some(WizardEvent::AnalyzeAnother))
            }
            1 => Ok(Some(WizardEvent::StartOver)),
            _ => Ok(None),
        }
    }
}

/// Load the saved profile, if any.
pub fn load_saved_profile() -> Option<UserProfile> {
    let path = storage::get_data_dir().ok()?.join(storage::profiles::PROFILE_FILE);
    if !path.exists() {
        return None;
    }
    match storage::profiles::load_profile(&path) {
        Ok(profile) => {
            info!(path = %path.display(), "loaded saved profile");
            Some(profile)
        }
        Err(e) => {
            warn!(error = %e, "ignoring unreadable saved profile");
            None
        }
    }
}

/// Persist the profile; failure only logs, the wizard keeps going.
fn save_profile_best_effort(profile: &UserProfile) {
    let result = storage::get_data_dir().and_then(|dir| {
        storage::profiles::save_profile(profile, &dir.join(storage::profiles::PROFILE_FILE))
    });
    if let Err(e) = result {
        warn!(error = %e, "could not save profile");
    }
}
