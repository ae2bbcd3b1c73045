use super::types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::{Error, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Structured-output transport for Gemini's `generateContent`.
///
/// Every call sends one user prompt with a JSON response schema and
/// decodes the first candidate's text as `T`.
pub struct GeminiHttpClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl GeminiHttpClient {
    /// `model` may be given with or without the `models/` prefix.
    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: Client,
    ) -> Self {
        let model = model.trim_start_matches("models/").to_string();
        Self {
            client,
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema: &Value,
    ) -> Result<T> {
        let request = GenerateContentRequest {
            contents: vec![Content::user_text(prompt.to_string())],
            generation_config: GenerationConfig::json(schema.clone()),
        };

        let response = self
            .client
            .post(self.endpoint())
            .timeout(self.timeout)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request did not complete: {}", e);
                e
            })?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!("Gemini answered {}: {}", status, body);
            return Err(Error::AiProvider(format!(
                "Gemini API error (status {}): {}",
                status, body
            )));
        }

        let envelope: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Unexpected Gemini envelope: {}\nBody: {}", e, body);
            Error::AiProvider(format!("Failed to parse Gemini response: {}", e))
        })?;
        let text = envelope
            .first_text()
            .ok_or_else(|| Error::AiProvider("No data returned from AI".to_string()))?;
        debug!("Gemini returned {} chars", text.len());

        serde_json::from_str(text).map_err(|e| {
            error!("Gemini returned malformed JSON: {}\nText: {}", e, text);
            Error::AiProvider(format!("Malformed JSON from Gemini: {}", e))
        })
    }
}
