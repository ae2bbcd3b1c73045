//! Data models and structures
//!
//! Defines the vocabulary records produced by AI enrichment, the persisted
//! word groups and stories, the per-game result type, and runtime
//! configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// An enriched vocabulary entry shared by every game.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordRecord {
    pub word: String,
    pub definition: String,
    pub example: String,
    pub phonetic: String,
}

impl WordRecord {
    /// Case-insensitive identity key.
    pub fn key(&self) -> String {
        self.word.to_lowercase()
    }
}

/// Richer record produced for words picked out of a specific article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleWordRecord {
    pub word: String,
    pub phonetic: String,
    pub translation: String,
    pub definition: String,
    pub example: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_note: Option<String>,
}

impl ArticleWordRecord {
    pub fn key(&self) -> String {
        self.word.to_lowercase()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WordGroup {
    pub id: Uuid,
    pub name: String,
    pub words: Vec<WordRecord>,
    /// Unix timestamp in milliseconds.
    pub created_at: i64,
}

impl WordGroup {
    pub fn new(name: String, words: Vec<WordRecord>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            words,
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Story text returned by the AI collaborator before it is saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedStory {
    pub title: String,
    pub content: String,
    pub translation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedStory {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub translation: String,
    pub style: String,
    pub created_at: i64,
    pub related_words: Vec<String>,
}

/// The five playable mini-games.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameKind {
    Quiz,
    Spelling,
    Match,
    Context,
    Scramble,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::Quiz,
        GameKind::Spelling,
        GameKind::Match,
        GameKind::Context,
        GameKind::Scramble,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GameKind::Quiz => "Quiz",
            GameKind::Spelling => "Spelling",
            GameKind::Match => "Match",
            GameKind::Context => "Context",
            GameKind::Scramble => "Scramble",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub word: String,
    pub is_correct: bool,
}

/// Standardized result every game produces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub mode: GameKind,
    pub score: u32,
    pub total: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<HistoryEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moves: Option<u32>,
}

impl GameStats {
    /// Empty stats for a game that records per-round history.
    pub fn with_history(mode: GameKind) -> Self {
        Self {
            mode,
            score: 0,
            total: 0,
            history: Some(Vec::new()),
            time_seconds: None,
            moves: None,
        }
    }

    /// Count one resolved round.
    pub fn record(&mut self, word: &str, is_correct: bool) {
        if is_correct {
            self.score += 1;
        }
        self.total += 1;
        self.history.get_or_insert_with(Vec::new).push(HistoryEntry {
            word: word.to_string(),
            is_correct,
        });
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub data_dir: PathBuf,
    pub speech_command: Option<String>,
    pub speech_locale: String,
    pub ai_retry_attempts: usize,
}

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        // A missing .env is fine; a malformed one is not.
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(e.into());
            }
        }

        let ai_retry_attempts = match std::env::var("AI_RETRY_ATTEMPTS") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                crate::Error::Generic(format!("AI_RETRY_ATTEMPTS is not a number: {}", raw))
            })?,
            Err(_) => 2,
        };

        Ok(Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .map_err(|_| crate::Error::Generic("GEMINI_API_KEY not set".to_string()))?,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            data_dir: std::env::var("VOCAB_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".vocab-quest")),
            speech_command: std::env::var("SPEECH_COMMAND")
                .ok()
                .filter(|cmd| !cmd.trim().is_empty()),
            speech_locale: std::env::var("SPEECH_LOCALE").unwrap_or_else(|_| "en-US".to_string()),
            ai_retry_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_stats_serialization_uses_camel_case() {
        let stats = GameStats {
            mode: GameKind::Match,
            score: 100,
            total: 3,
            history: None,
            time_seconds: Some(42),
            moves: Some(5),
        };

        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"mode\":\"MATCH\""));
        assert!(json.contains("\"timeSeconds\":42"));
        assert!(!json.contains("history"));

        let back: GameStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn test_record_keeps_score_within_total() {
        let mut stats = GameStats::with_history(GameKind::Quiz);
        stats.record("apple", true);
        stats.record("banana", false);

        assert_eq!(stats.score, 1);
        assert_eq!(stats.total, 2);
        let history = stats.history.unwrap();
        assert_eq!(history.len(), 2);
        assert!(!history[1].is_correct);
    }

    #[test]
    fn test_article_record_context_note_is_optional() {
        let json = r#"{
            "word": "cosmos",
            "phonetic": "/ˈkɒz.mɒs/",
            "translation": "宇宙",
            "definition": "the universe",
            "example": "The cosmos is vast."
        }"#;

        let record: ArticleWordRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.context_note, None);
        assert_eq!(record.key(), "cosmos");
    }

    #[test]
    fn test_word_group_reads_original_library_layout() {
        let json = r#"{
            "id": "7f1b0c44-7a55-4f34-9d0e-2f1c3f1d8a11",
            "name": "Food",
            "words": [{"word": "Apple", "definition": "苹果", "example": "An apple a day.", "phonetic": "/ˈæp.əl/"}],
            "createdAt": 1700000000000
        }"#;

        let group: WordGroup = serde_json::from_str(json).unwrap();
        assert_eq!(group.name, "Food");
        assert_eq!(group.words[0].key(), "apple");
        assert_eq!(group.created_at, 1_700_000_000_000);
    }
}
