//! Image enhancement for OCR input
//!
//! Normalizes a raw captured/uploaded label photo into a binary image that
//! the OCR engine handles well: grayscale, edge-preserving denoise, global
//! Otsu binarization, then one light dilation pass to thicken strokes.

use image::{DynamicImage, GrayImage};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::filter::bilateral_filter;
use imageproc::morphology::dilate;
use tracing::debug;

use crate::config::EnhanceSettings;
use crate::error::ScanError;

/// Enhance a color image into a binary (black/white) image of the same
/// dimensions. Each step operates on the full image; there is no tiling or
/// region-of-interest logic.
pub fn enhance_label(
    image: &DynamicImage,
    settings: &EnhanceSettings,
) -> Result<GrayImage, ScanError> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(ScanError::ImageProcessing(
            "cannot enhance an empty image".to_string(),
        ));
    }

    // 1. Grayscale via the standard luma transform
    let gray = image.to_luma8();

    // 2. Edge-preserving denoise to suppress sensor/JPEG noise
    let denoised = if settings.denoise {
        bilateral_filter(
            &gray,
            settings.denoise_window,
            settings.denoise_sigma_color,
            settings.denoise_sigma_spatial,
        )
    } else {
        gray
    };

    // 3. Global Otsu binarization
    let level = otsu_level(&denoised);
    let binary = threshold(&denoised, level, ThresholdType::Binary);

    // 4. One dilation pass with a minimal structuring element
    let enhanced = if settings.dilate {
        dilate(&binary, Norm::LInf, 1)
    } else {
        binary
    };

    debug!(width, height, otsu = level, "label image enhanced");
    Ok(enhanced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    /// Half dark / half light test image with mild per-pixel variation.
    fn split_image(width: u32, height: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgb([30, 30, 30])
            } else {
                Rgb([220, 220, 220])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_output_is_strictly_binary() {
        let settings = EnhanceSettings::default();
        let enhanced = enhance_label(&split_image(40, 20), &settings).unwrap();
        for pixel in enhanced.pixels() {
            assert!(pixel == &Luma([0u8]) || pixel == &Luma([255u8]));
        }
    }

    #[test]
    fn test_dimensions_preserved() {
        let settings = EnhanceSettings::default();
        let enhanced = enhance_label(&split_image(33, 17), &settings).unwrap();
        assert_eq!(enhanced.dimensions(), (33, 17));
    }

    #[test]
    fn test_threshold_separates_halves() {
        let settings = EnhanceSettings {
            dilate: false,
            ..EnhanceSettings::default()
        };
        let enhanced = enhance_label(&split_image(40, 20), &settings).unwrap();
        assert_eq!(enhanced.get_pixel(0, 10), &Luma([0u8]));
        assert_eq!(enhanced.get_pixel(39, 10), &Luma([255u8]));
    }

    #[test]
    fn test_empty_image_is_an_error() {
        let settings = EnhanceSettings::default();
        let empty = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        let result = enhance_label(&empty, &settings);
        assert!(matches!(result, Err(ScanError::ImageProcessing(_))));
    }

    #[test]
    fn test_denoise_disabled_still_binarizes() {
        let settings = EnhanceSettings {
            denoise: false,
            ..EnhanceSettings::default()
        };
        let enhanced = enhance_label(&split_image(20, 20), &settings).unwrap();
        for pixel in enhanced.pixels() {
            assert!(pixel == &Luma([0u8]) || pixel == &Luma([255u8]));
        }
    }
}
