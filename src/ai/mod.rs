//! AI enrichment collaborator
//!
//! Turns raw words into study records, enriches words picked from an
//! article in that article's context, and writes practice stories. The
//! Gemini REST client is the production implementation; the mock backs
//! tests and offline runs.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiEnrichmentClient;
pub use mock::MockEnrichmentClient;

use crate::models::{ArticleWordRecord, GeneratedStory, WordRecord};
use crate::Result;
use async_trait::async_trait;

/// Only this many characters of an article are sent for context.
pub const ARTICLE_CONTEXT_CHARS: usize = 5000;

#[async_trait]
pub trait EnrichmentService: Send + Sync {
    /// Definition, phonetic and example for each word.
    async fn enrich(&self, words: &[String]) -> Result<Vec<WordRecord>>;

    /// Records for words picked out of `article`, with optional context notes.
    async fn enrich_in_context(
        &self,
        article: &str,
        words: &[String],
    ) -> Result<Vec<ArticleWordRecord>>;

    /// A story in the given style using every word at least once.
    async fn generate_story(&self, words: &[String], style: &str) -> Result<GeneratedStory>;
}

/// Trimmed, non-blank words in their original order.
pub fn clean_words(words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// First [`ARTICLE_CONTEXT_CHARS`] characters of `article`.
pub fn truncate_article(article: &str) -> &str {
    match article.char_indices().nth(ARTICLE_CONTEXT_CHARS) {
        Some((byte, _)) => &article[..byte],
        None => article,
    }
}
