//! Typed recall: spell the word from its definition and phonetic.

use super::{ensure_words, Advance, GameEngine, Progress};
use crate::models::{GameKind, GameStats, WordRecord};
use crate::Result;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpellingOutcome {
    /// Blank guess; nothing recorded.
    Empty,
    Checked { is_correct: bool },
    /// The round was already checked. The caller should advance instead.
    AlreadyChecked,
}

/// Trim and case-fold both sides before comparing.
pub fn spelling_matches(guess: &str, target: &str) -> bool {
    guess.trim().to_lowercase() == target.trim().to_lowercase()
}

#[derive(Debug)]
pub struct SpellingEngine {
    words: Vec<WordRecord>,
    index: usize,
    checked: Option<bool>,
    stats: GameStats,
    finished: bool,
}

impl SpellingEngine {
    pub fn current(&self) -> Option<&WordRecord> {
        if self.finished {
            return None;
        }
        self.words.get(self.index)
    }

    /// `Some(correct)` once the current round has been checked.
    pub fn checked(&self) -> Option<bool> {
        self.checked
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn check(&mut self, guess: &str) -> SpellingOutcome {
        if self.checked.is_some() || self.finished {
            return SpellingOutcome::AlreadyChecked;
        }
        if guess.trim().is_empty() {
            return SpellingOutcome::Empty;
        }
        let Some(target) = self.words.get(self.index) else {
            return SpellingOutcome::AlreadyChecked;
        };

        let is_correct = spelling_matches(guess, &target.word);
        let word = target.word.clone();
        self.checked = Some(is_correct);
        self.stats.record(&word, is_correct);
        SpellingOutcome::Checked { is_correct }
    }

    pub fn advance(&mut self) -> Advance {
        if self.finished {
            return Advance::Finished(self.stats.clone());
        }
        if self.checked.is_none() {
            return Advance::Locked;
        }
        if self.index + 1 < self.words.len() {
            self.index += 1;
            self.checked = None;
            Advance::Next
        } else {
            self.finished = true;
            Advance::Finished(self.stats.clone())
        }
    }
}

impl GameEngine for SpellingEngine {
    const KIND: GameKind = GameKind::Spelling;

    fn start<R: Rng + ?Sized>(words: &[WordRecord], _rng: &mut R) -> Result<Self> {
        ensure_words(words)?;
        Ok(Self {
            words: words.to_vec(),
            index: 0,
            checked: None,
            stats: GameStats::with_history(Self::KIND),
            finished: false,
        })
    }

    fn progress(&self) -> Progress {
        Progress {
            current: (self.index + 1).min(self.words.len()),
            total: self.words.len(),
        }
    }

    fn outcome(&self) -> Option<GameStats> {
        self.finished.then(|| self.stats.clone())
    }
}
