//! Gemini generateContent client
//!
//! Thin wrapper over the Google Generative Language REST API. The prompt is
//! sent as a single text part; the first candidate's first part is the
//! analysis text.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::error;

use super::LlmClient;
use crate::config::LlmSettings;
use crate::error::ScanError;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ContentResponse,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    #[serde(default)]
    text: String,
}

/// Gemini-backed [`LlmClient`] implementation.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    model: String,
    client: Client,
}

impl GeminiClient {
    /// Build a client from settings, reading the API key from the configured
    /// environment variable.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, ScanError> {
        let api_key = std::env::var(&settings.api_key_env).map_err(|_| {
            ScanError::Config(format!(
                "{} environment variable is not set",
                settings.api_key_env
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| ScanError::Analysis(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            model: settings.model.clone(),
            client,
        })
    }

    fn build_request(prompt: String) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        }
    }

    fn extract_text(response: GenerateResponse) -> Result<String, ScanError> {
        response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| ScanError::Analysis("no response from LLM".to_string()))
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, prompt: String) -> Result<String, ScanError> {
        let url = format!(
            "{API_BASE}/{}:generateContent?key={}",
            self.model, self.api_key
        );
        let request = Self::build_request(prompt);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "LLM request failed");
                ScanError::Analysis(format!("LLM API error: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, body, "LLM returned error status");
            return Err(ScanError::Analysis(format!(
                "LLM API returned error: {status} - {body}"
            )));
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse LLM response");
            ScanError::Analysis(format!("failed to parse LLM response: {e}"))
        })?;

        Self::extract_text(parsed)
    }
}
