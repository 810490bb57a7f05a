//! OCR text extraction using rusty-tesseract
//!
//! Runs the system Tesseract engine over an enhanced binary image. The
//! engine is configured for a single uniform block of text, which is what a
//! cropped nutrition panel looks like.

use image::{DynamicImage, GrayImage};
use rusty_tesseract::{Args, Image};
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

use crate::config::OcrSettings;
use crate::error::ScanError;

/// Recognize text in an enhanced label image.
///
/// Returns `Ok(None)` when the recognized text is empty after trimming;
/// engine failures map to [`ScanError::ImageProcessing`].
pub fn extract_text(
    image: &GrayImage,
    settings: &OcrSettings,
) -> Result<Option<String>, ScanError> {
    let start = Instant::now();

    let dynamic = DynamicImage::ImageLuma8(image.clone());
    let tess_image = Image::from_dynamic_image(&dynamic)
        .map_err(|e| ScanError::ImageProcessing(format!("failed to prepare OCR input: {e}")))?;

    let args = Args {
        lang: settings.language.clone(),
        config_variables: HashMap::new(),
        dpi: Some(settings.dpi),
        psm: Some(settings.psm),
        oem: Some(settings.oem),
    };

    let text = rusty_tesseract::image_to_string(&tess_image, &args)
        .map_err(|e| ScanError::ImageProcessing(format!("OCR engine failure: {e}")))?;

    debug!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        chars = text.len(),
        "OCR pass complete"
    );

    if text.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}
