//! Barcode symbol detection and decoding
//!
//! Runs a full-frame detector over the grayscale image and returns the first
//! decoded symbol's payload as text. Images with several symbols yield
//! whichever the decoder reports first; no "best symbol" selection is
//! attempted.

use image::DynamicImage;
use tracing::debug;

use crate::error::ScanError;

/// Decode a 1D/2D barcode from an image.
///
/// Returns `Ok(None)` when no symbol is present; a library failure maps to
/// [`ScanError::Decode`].
pub fn decode_symbol(image: &DynamicImage) -> Result<Option<String>, ScanError> {
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();
    if width == 0 || height == 0 {
        return Ok(None);
    }

    match rxing::helpers::detect_in_luma(gray.into_raw(), height, width, None) {
        Ok(result) => {
            let payload = result.getText().to_string();
            debug!(format = ?result.getBarcodeFormat(), payload, "barcode decoded");
            Ok(Some(payload))
        }
        Err(rxing::Exceptions::NotFoundException(_)) => Ok(None),
        Err(e) => Err(ScanError::Decode(e.to_string())),
    }
}
