//! nutriscan - Food label and barcode scanning with dietary-safety analysis
//!
//! Scans a product barcode or nutrition-label photo, normalizes the data
//! into a structured record, and asks an LLM for a dietary-safety
//! assessment against the user's health profile.

mod analysis;
mod app;
mod config;
mod error;
mod lookup;
mod nutrition;
mod profile;
mod storage;
mod vision;
mod wizard;

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::analysis::{analyze_product, GeminiClient};
use crate::app::WizardApp;
use crate::config::AppConfig;
use crate::lookup::{LookupOutcome, ProductLookupClient};
use crate::nutrition::{format_nutrition, parse_label_text, NutritionRecord, ParserOptions};
use crate::profile::UserProfile;
use crate::vision::ScanPipeline;

/// nutriscan - dietary-safety analysis for scanned food products
#[derive(Parser, Debug)]
#[command(name = "nutriscan")]
#[command(about = "Scan food barcodes or label photos and analyze dietary safety")]
struct Args {
    /// Look up a barcode directly and skip the wizard
    #[arg(long)]
    barcode: Option<String>,

    /// Decode a barcode from an image file and look it up
    #[arg(long, value_name = "PATH")]
    barcode_image: Option<PathBuf>,

    /// Extract nutrition data from a label photo
    #[arg(long, value_name = "PATH")]
    label_image: Option<PathBuf>,

    /// Alternate configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Stop after printing the nutrition block (no LLM call)
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = load_or_create_config(args.config.as_deref());

    // Single-shot modes
    if let Some(barcode) = args.barcode.as_deref() {
        return run_barcode_lookup(&config, barcode, args.offline).await;
    }
    if let Some(path) = args.barcode_image.as_deref() {
        return run_barcode_image(&config, path, args.offline).await;
    }
    if let Some(path) = args.label_image.as_deref() {
        return run_label_image(&config, path, args.offline).await;
    }

    info!("nutriscan starting in wizard mode");
    let mut app = WizardApp::new(config, args.offline)?;
    app.run().await
}

/// Load configuration from an explicit path, the config directory, or fall
/// back to defaults.
fn load_or_create_config(path: Option<&Path>) -> AppConfig {
    if let Some(path) = path {
        match config::load_config(path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", path);
                return config;
            }
            Err(e) => warn!("Could not load {:?}: {e}; using defaults", path),
        }
    } else if let Ok(config_dir) = storage::get_config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            if let Ok(config) = config::load_config(&config_path) {
                info!("Loaded configuration from {:?}", config_path);
                return config;
            }
        }
    }
    info!("Using default configuration");
    AppConfig::default()
}

/// Look up a barcode and print/analyze the result.
async fn run_barcode_lookup(config: &AppConfig, barcode: &str, offline: bool) -> Result<()> {
    let lookup = ProductLookupClient::new(&config.lookup)?;
    match lookup.fetch_product(barcode).await {
        LookupOutcome::Found(record) => print_and_analyze(config, &record, offline).await,
        LookupOutcome::NotFound => {
            println!("Product {barcode} was not found in the database.");
            Ok(())
        }
        LookupOutcome::ServiceError(reason) => {
            anyhow::bail!("product lookup failed: {reason}")
        }
    }
}

/// Decode a barcode image, then look it up.
async fn run_barcode_image(config: &AppConfig, path: &Path, offline: bool) -> Result<()> {
    let pipeline = ScanPipeline::new(config.enhance.clone(), config.ocr.clone());
    match pipeline.decode_barcode_file(path)? {
        Some(barcode) => {
            println!("Decoded barcode: {barcode}");
            run_barcode_lookup(config, &barcode, offline).await
        }
        None => {
            println!("No barcode detected in {}.", path.display());
            Ok(())
        }
    }
}

/// Run the enhance/OCR/parse path over a label photo.
async fn run_label_image(config: &AppConfig, path: &Path, offline: bool) -> Result<()> {
    let pipeline = ScanPipeline::new(config.enhance.clone(), config.ocr.clone());
    let Some(text) = pipeline.extract_label_text_file(path)? else {
        println!("No text could be extracted from {}.", path.display());
        return Ok(());
    };

    let options = ParserOptions {
        close_ingredients_at_blank_line: config.parser.close_ingredients_at_blank_line,
    };
    let record = NutritionRecord::from_label_fields(parse_label_text(&text, &options));
    print_and_analyze(config, &record, offline).await
}

/// Print the formatted nutrition block and, unless offline, the analysis.
async fn print_and_analyze(config: &AppConfig, record: &NutritionRecord, offline: bool) -> Result<()> {
    let nutrition_text = format_nutrition(record);
    println!("{nutrition_text}");

    if offline {
        return Ok(());
    }

    let profile = app::load_saved_profile().unwrap_or_else(|| {
        warn!("no saved profile; analyzing against a default profile");
        UserProfile::default()
    });

    let llm = GeminiClient::from_settings(&config.llm)?;
    let analysis = analyze_product(&llm, &profile, &nutrition_text).await?;
    println!("\n{analysis}");
    Ok(())
}
