//! Vision Layer
//!
//! Image-to-data extraction: barcode decoding on raw frames, and the
//! enhance-then-OCR path for nutrition-label photos.

pub mod barcode;
pub mod enhance;
pub mod ocr;

pub use barcode::decode_symbol;
pub use enhance::enhance_label;
pub use ocr::extract_text;

use image::DynamicImage;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

use crate::config::{EnhanceSettings, OcrSettings};
use crate::error::ScanError;

/// The two image acquisition paths, bundled with their settings.
pub struct ScanPipeline {
    enhance: EnhanceSettings,
    ocr: OcrSettings,
}

impl ScanPipeline {
    /// Create a pipeline with the given settings.
    pub fn new(enhance: EnhanceSettings, ocr: OcrSettings) -> Self {
        Self { enhance, ocr }
    }

    /// Decode a barcode from an image file.
    pub fn decode_barcode_file(&self, path: &Path) -> Result<Option<String>, ScanError> {
        let image = load_image(path)?;
        self.decode_barcode(&image)
    }

    /// Decode a barcode from a loaded image.
    pub fn decode_barcode(&self, image: &DynamicImage) -> Result<Option<String>, ScanError> {
        let start = Instant::now();
        let result = decode_symbol(image)?;
        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            found = result.is_some(),
            "barcode scan complete"
        );
        Ok(result)
    }

    /// Extract raw label text from an image file.
    pub fn extract_label_text_file(&self, path: &Path) -> Result<Option<String>, ScanError> {
        let image = load_image(path)?;
        self.extract_label_text(&image)
    }

    /// Enhance a label photo and run OCR over it.
    pub fn extract_label_text(&self, image: &DynamicImage) -> Result<Option<String>, ScanError> {
        let enhanced = enhance_label(image, &self.enhance)?;
        extract_text(&enhanced, &self.ocr)
    }
}

/// Load an image file, mapping decode failures into the pipeline taxonomy.
fn load_image(path: &Path) -> Result<DynamicImage, ScanError> {
    image::open(path).map_err(|e| {
        ScanError::ImageProcessing(format!("failed to load image {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_image_missing_file() {
        let result = load_image(Path::new("/nonexistent/label.png"));
        assert!(matches!(result, Err(ScanError::ImageProcessing(_))));
    }

    #[test]
    fn test_decode_barcode_file_missing_file() {
        let pipeline = ScanPipeline::new(EnhanceSettings::default(), OcrSettings::default());
        let result = pipeline.decode_barcode_file(Path::new("/nonexistent/barcode.png"));
        assert!(result.is_err());
    }
}
