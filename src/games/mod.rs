//! Mini-game engines
//!
//! Each engine is a self-contained state machine over a borrowed word set.
//! Engines never mutate the caller's words; they copy and shuffle
//! internally, and every user action is an explicit method call returning
//! what happened. Timed effects (match reveal, mismatch flip-back) are
//! returned as suggested delays for the caller to schedule.

pub mod choice;
pub mod context;
pub mod flashcard;
pub mod matching;
pub mod quiz;
pub mod scramble;
pub mod spelling;

pub use context::ContextEngine;
pub use flashcard::FlashcardDeck;
pub use matching::MatchEngine;
pub use quiz::QuizEngine;
pub use scramble::ScrambleEngine;
pub use spelling::SpellingEngine;

use crate::models::{GameKind, GameStats, WordRecord};
use crate::{Error, Result};
use rand::Rng;

/// Position within a round-based game, 1-based for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
}

/// Result of pressing "next" in a round-based game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The current round has not been resolved yet.
    Locked,
    /// Moved on to the next round.
    Next,
    /// The last round was resolved; final stats attached.
    Finished(GameStats),
}

/// Common contract implemented by all five engines.
pub trait GameEngine: Sized {
    const KIND: GameKind;

    /// Build a fresh game. Fails with [`Error::EmptyWordSet`] on empty input.
    fn start<R: Rng + ?Sized>(words: &[WordRecord], rng: &mut R) -> Result<Self>;

    fn progress(&self) -> Progress;

    /// Final stats once the game is over, `None` while it is still running.
    fn outcome(&self) -> Option<GameStats>;
}

pub(crate) fn ensure_words(words: &[WordRecord]) -> Result<()> {
    if words.is_empty() {
        return Err(Error::EmptyWordSet);
    }
    Ok(())
}

/// Tagged union over the playable engines.
#[derive(Debug)]
pub enum Game {
    Quiz(QuizEngine),
    Spelling(SpellingEngine),
    Match(MatchEngine),
    Context(ContextEngine),
    Scramble(ScrambleEngine),
}

impl Game {
    pub fn start<R: Rng + ?Sized>(
        kind: GameKind,
        words: &[WordRecord],
        rng: &mut R,
    ) -> Result<Self> {
        Ok(match kind {
            GameKind::Quiz => Game::Quiz(QuizEngine::start(words, rng)?),
            GameKind::Spelling => Game::Spelling(SpellingEngine::start(words, rng)?),
            GameKind::Match => Game::Match(MatchEngine::start(words, rng)?),
            GameKind::Context => Game::Context(ContextEngine::start(words, rng)?),
            GameKind::Scramble => Game::Scramble(ScrambleEngine::start(words, rng)?),
        })
    }

    pub fn kind(&self) -> GameKind {
        match self {
            Game::Quiz(_) => GameKind::Quiz,
            Game::Spelling(_) => GameKind::Spelling,
            Game::Match(_) => GameKind::Match,
            Game::Context(_) => GameKind::Context,
            Game::Scramble(_) => GameKind::Scramble,
        }
    }

    pub fn progress(&self) -> Progress {
        match self {
            Game::Quiz(engine) => engine.progress(),
            Game::Spelling(engine) => engine.progress(),
            Game::Match(engine) => engine.progress(),
            Game::Context(engine) => engine.progress(),
            Game::Scramble(engine) => engine.progress(),
        }
    }

    pub fn outcome(&self) -> Option<GameStats> {
        match self {
            Game::Quiz(engine) => engine.outcome(),
            Game::Spelling(engine) => engine.outcome(),
            Game::Match(engine) => engine.outcome(),
            Game::Context(engine) => engine.outcome(),
            Game::Scramble(engine) => engine.outcome(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::WordRecord;

    pub fn record(word: &str, definition: &str) -> WordRecord {
        WordRecord {
            word: word.to_string(),
            definition: definition.to_string(),
            example: format!("I saw a {} yesterday.", word),
            phonetic: format!("/{}/", word),
        }
    }

    pub fn fruit() -> Vec<WordRecord> {
        vec![
            record("apple", "a round red fruit"),
            record("banana", "a long yellow fruit"),
            record("cherry", "a small stone fruit"),
            record("grape", "a fruit growing in bunches"),
            record("lemon", "a sour yellow citrus"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::fruit;
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_every_kind_starts_and_reports_its_kind() {
        let words = fruit();
        let mut rng = StdRng::seed_from_u64(5);

        for kind in GameKind::ALL {
            let game = Game::start(kind, &words, &mut rng).unwrap();
            assert_eq!(game.kind(), kind);
            assert!(game.outcome().is_none());
            assert!(game.progress().total > 0);
        }
    }

    #[test]
    fn test_every_kind_rejects_empty_word_set() {
        let mut rng = StdRng::seed_from_u64(5);
        for kind in GameKind::ALL {
            let err = Game::start(kind, &[], &mut rng).unwrap_err();
            assert!(matches!(err, Error::EmptyWordSet));
        }
    }
}
