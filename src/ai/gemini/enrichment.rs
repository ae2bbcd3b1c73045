use super::client::GeminiHttpClient;
use crate::ai::{clean_words, truncate_article, EnrichmentService};
use crate::models::{ArticleWordRecord, GeneratedStory, WordRecord};
use crate::{prompts, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tokio_retry::{strategy::FixedInterval, Retry};
use tracing::{error, info, warn};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1500);

fn word_list_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "word": { "type": "STRING" },
                "definition": { "type": "STRING", "description": "Chinese definition" },
                "phonetic": { "type": "STRING", "description": "IPA phonetic symbol" },
                "example": { "type": "STRING", "description": "A simple example sentence in English" }
            },
            "required": ["word", "definition", "phonetic", "example"]
        }
    })
}

fn article_word_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "word": { "type": "STRING" },
                "phonetic": { "type": "STRING" },
                "translation": { "type": "STRING" },
                "definition": { "type": "STRING" },
                "example": { "type": "STRING" },
                "contextNote": {
                    "type": "STRING",
                    "description": "Explanation of the word's usage in the specific article context."
                }
            },
            "required": ["word", "phonetic", "translation", "definition", "example"]
        }
    })
}

fn story_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "content": { "type": "STRING" },
            "translation": { "type": "STRING" }
        },
        "required": ["title", "content", "translation"]
    })
}

pub struct GeminiEnrichmentClient {
    http: GeminiHttpClient,
    retry_attempts: usize,
    retry_delay: Duration,
}

impl GeminiEnrichmentClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, REQUEST_TIMEOUT, client),
            retry_attempts: 2,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    /// Extra attempts after the first failure, spaced `delay` apart.
    pub fn with_retries(mut self, attempts: usize, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay;
        self
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        label: &str,
        prompt: String,
        schema: Value,
    ) -> Result<T> {
        let retry_strategy = FixedInterval::new(self.retry_delay).take(self.retry_attempts);
        let (prompt, schema) = (&prompt, &schema);

        Retry::spawn(retry_strategy, move || async move {
            match self.http.generate_json::<T>(prompt, schema).await {
                Ok(value) => Ok(value),
                Err(e) => {
                    warn!("[{}] Gemini attempt failed: {}. Will retry...", label, e);
                    Err(e)
                }
            }
        })
        .await
        .map_err(|e| {
            error!("[{}] Gemini request failed after retries: {}", label, e);
            e
        })
    }
}

#[async_trait]
impl EnrichmentService for GeminiEnrichmentClient {
    async fn enrich(&self, words: &[String]) -> Result<Vec<WordRecord>> {
        let words = clean_words(words);
        if words.is_empty() {
            return Ok(Vec::new());
        }

        info!("Enriching {} words with {}", words.len(), self.model());
        let prompt = prompts::enrich(&words);
        self.request_json("enrich", prompt, word_list_schema()).await
    }

    async fn enrich_in_context(
        &self,
        article: &str,
        words: &[String],
    ) -> Result<Vec<ArticleWordRecord>> {
        let words = clean_words(words);
        if words.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            "Enriching {} words in context of a {}-char article",
            words.len(),
            article.chars().count()
        );
        let prompt = prompts::enrich_in_context(truncate_article(article), &words)?;
        self.request_json("enrich_in_context", prompt, article_word_schema())
            .await
    }

    async fn generate_story(&self, words: &[String], style: &str) -> Result<GeneratedStory> {
        let words = clean_words(words);
        info!("Generating {} story with {} words", style, words.len());
        let prompt = prompts::story(&words, style);
        self.request_json("story", prompt, story_schema()).await
    }
}
