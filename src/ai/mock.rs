use super::{clean_words, EnrichmentService};
use crate::models::{ArticleWordRecord, GeneratedStory, WordRecord};
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned enrichment for tests and offline runs.
///
/// Queued responses are served first; once a queue is empty the mock
/// synthesizes records from the requested words.
#[derive(Clone)]
pub struct MockEnrichmentClient {
    word_responses: Arc<Mutex<VecDeque<Vec<WordRecord>>>>,
    article_responses: Arc<Mutex<VecDeque<Vec<ArticleWordRecord>>>>,
    story_responses: Arc<Mutex<VecDeque<GeneratedStory>>>,
    failure: Arc<Mutex<Option<String>>>,
    delay: Duration,
    call_count: Arc<Mutex<usize>>,
}

impl MockEnrichmentClient {
    pub fn new() -> Self {
        Self {
            word_responses: Arc::new(Mutex::new(VecDeque::new())),
            article_responses: Arc::new(Mutex::new(VecDeque::new())),
            story_responses: Arc::new(Mutex::new(VecDeque::new())),
            failure: Arc::new(Mutex::new(None)),
            delay: Duration::ZERO,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_word_response(self, response: Vec<WordRecord>) -> Self {
        self.word_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn with_article_response(self, response: Vec<ArticleWordRecord>) -> Self {
        self.article_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn with_story_response(self, response: GeneratedStory) -> Self {
        self.story_responses.lock().unwrap().push_back(response);
        self
    }

    /// Every call fails with `Error::AiProvider(message)` until cleared.
    pub fn with_failure(self, message: &str) -> Self {
        self.fail_with(Some(message.to_string()));
        self
    }

    /// Sleep before answering, to exercise in-flight behavior.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn fail_with(&self, message: Option<String>) {
        *self.failure.lock().unwrap() = message;
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    async fn begin_call(&self) -> Result<()> {
        *self.call_count.lock().unwrap() += 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.failure.lock().unwrap().clone() {
            Some(message) => Err(Error::AiProvider(message)),
            None => Ok(()),
        }
    }
}

impl Default for MockEnrichmentClient {
    fn default() -> Self {
        Self::new()
    }
}

pub fn synthetic_record(word: &str) -> WordRecord {
    WordRecord {
        word: word.to_string(),
        definition: format!("definition of {}", word),
        example: format!("This sentence uses {} once.", word),
        phonetic: format!("/{}/", word),
    }
}

pub fn synthetic_article_record(word: &str) -> ArticleWordRecord {
    ArticleWordRecord {
        word: word.to_string(),
        phonetic: format!("/{}/", word),
        translation: format!("{}-translation", word),
        definition: format!("definition of {}", word),
        example: format!("This sentence uses {} once.", word),
        context_note: None,
    }
}

#[async_trait]
impl EnrichmentService for MockEnrichmentClient {
    async fn enrich(&self, words: &[String]) -> Result<Vec<WordRecord>> {
        let words = clean_words(words);
        if words.is_empty() {
            return Ok(Vec::new());
        }
        self.begin_call().await?;

        if let Some(queued) = self.word_responses.lock().unwrap().pop_front() {
            return Ok(queued);
        }
        Ok(words.iter().map(|w| synthetic_record(w)).collect())
    }

    async fn enrich_in_context(
        &self,
        _article: &str,
        words: &[String],
    ) -> Result<Vec<ArticleWordRecord>> {
        let words = clean_words(words);
        if words.is_empty() {
            return Ok(Vec::new());
        }
        self.begin_call().await?;

        if let Some(queued) = self.article_responses.lock().unwrap().pop_front() {
            return Ok(queued);
        }
        Ok(words.iter().map(|w| synthetic_article_record(w)).collect())
    }

    async fn generate_story(&self, words: &[String], style: &str) -> Result<GeneratedStory> {
        self.begin_call().await?;

        if let Some(queued) = self.story_responses.lock().unwrap().pop_front() {
            return Ok(queued);
        }
        let words = clean_words(words);
        Ok(GeneratedStory {
            title: format!("A {} story", style),
            content: format!("Once upon a time there was {}.", words.join(" and ")),
            translation: "从前……".to_string(),
        })
    }
}
