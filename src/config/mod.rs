//! Application Configuration
//!
//! User settings and tuning knobs stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Product database lookup settings
    pub lookup: LookupSettings,
    /// OCR engine settings
    pub ocr: OcrSettings,
    /// Label image enhancement settings
    pub enhance: EnhanceSettings,
    /// LLM analysis settings
    pub llm: LlmSettings,
    /// Label parser behavior switches
    pub parser: ParserSettings,
}

/// Product database lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupSettings {
    /// Base URL of the product database
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LookupSettings {
    fn default() -> Self {
        Self {
            base_url: "https://world.openfoodfacts.org".to_string(),
            timeout_secs: 10,
        }
    }
}

/// OCR engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Tesseract language code
    pub language: String,
    /// Page segmentation mode; 6 = single uniform block of text
    pub psm: i32,
    /// OCR engine mode; 3 = default (legacy + neural combined)
    pub oem: i32,
    /// Assumed input DPI
    pub dpi: i32,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            psm: 6,
            oem: 3,
            dpi: 300,
        }
    }
}

/// Label image enhancement settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhanceSettings {
    /// Apply edge-preserving denoising before binarization
    pub denoise: bool,
    /// Bilateral filter window size in pixels
    pub denoise_window: u32,
    /// Bilateral filter color sigma
    pub denoise_sigma_color: f32,
    /// Bilateral filter spatial sigma
    pub denoise_sigma_spatial: f32,
    /// Apply one dilation pass after binarization
    pub dilate: bool,
}

impl Default for EnhanceSettings {
    fn default() -> Self {
        Self {
            denoise: true,
            denoise_window: 7,
            denoise_sigma_color: 25.0,
            denoise_sigma_spatial: 5.0,
            dilate: true,
        }
    }
}

/// LLM analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Model name passed to the generateContent endpoint
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Label parser behavior switches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Close an open ingredients section at the first blank line instead of
    /// leaving it open until end of input (the legacy behavior).
    pub close_ingredients_at_blank_line: bool,
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
