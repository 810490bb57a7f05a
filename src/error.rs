//! Error taxonomy for the scan/lookup/analysis pipeline
//!
//! Every external-call boundary (OCR engine, barcode library, HTTP client,
//! LLM client) converts its failures into one of these kinds with a
//! human-readable message. Nothing is retried; failures are surfaced to the
//! user as a displayed error string.

use thiserror::Error;

/// Pipeline error kinds
#[derive(Debug, Error)]
pub enum ScanError {
    /// Image enhancement or OCR failure
    #[error("image processing failed: {0}")]
    ImageProcessing(String),

    /// Barcode library failure (distinct from "no symbol found", which is `None`)
    #[error("barcode decoding failed: {0}")]
    Decode(String),

    /// Product lookup transport/protocol failure. "Product not found" is not
    /// an error; see `lookup::LookupOutcome`.
    #[error("product lookup failed: {0}")]
    Lookup(String),

    /// LLM analysis failure, carries the provider message
    #[error("analysis failed: {0}")]
    Analysis(String),

    /// Configuration problem (missing API key, bad config file)
    #[error("configuration error: {0}")]
    Config(String),
}
