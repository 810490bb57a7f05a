//! Dietary-safety analysis
//!
//! Builds the analysis prompt from the user profile and the formatted
//! nutrition block, and delegates generation to an LLM provider behind the
//! [`LlmClient`] seam.

pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use std::time::Instant;
use tracing::{debug, info};

use crate::error::ScanError;
use crate::profile::UserProfile;

/// Provider seam for text generation.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a free-text completion for the prompt.
    async fn generate(&self, prompt: String) -> Result<String, ScanError>;
}

/// Build the dietary-safety analysis prompt.
pub fn build_analysis_prompt(profile: &UserProfile, nutrition_text: &str) -> String {
    format!(
        "Analyze the following ingredients for dietary safety based on this user profile:\n\
         \n\
         User Profile:\n\
         - Age: {age}\n\
         - Health Conditions: {health_conditions}\n\
         - Allergies: {allergies}\n\
         - Dietary Restrictions: {restrictions}\n\
         \n\
         Ingredients to analyze:\n\
         {nutrition_text}\n\
         \n\
         For each ingredient, provide:\n\
         1. Safety status (Safe/Unsafe/Caution)\n\
         2. Reason for the status\n\
         3. Recommendations or alternatives if unsafe\n\
         \n\
         Format the response as a structured analysis.",
        age = profile.age,
        health_conditions = profile.health_conditions,
        allergies = profile.allergies,
        restrictions = profile.restrictions_text(),
        nutrition_text = nutrition_text,
    )
}

/// Run the analysis for a product against a profile.
///
/// Failures carry the provider message so the caller can display it.
pub async fn analyze_product(
    client: &dyn LlmClient,
    profile: &UserProfile,
    nutrition_text: &str,
) -> Result<String, ScanError> {
    let prompt = build_analysis_prompt(profile, nutrition_text);
    let start = Instant::now();
    let analysis = client.generate(prompt).await?;
    info!(
        elapsed_ms = start.elapsed().as_millis() as u64,
        "analysis complete"
    );
    debug!(chars = analysis.len(), "analysis text received");
    Ok(analysis)
}
