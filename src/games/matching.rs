//! Pair-memorization grid: flip two cards, match a word to its definition.

use super::{ensure_words, GameEngine, Progress};
use crate::models::{GameKind, GameStats, WordRecord};
use crate::shuffle::shuffle_in_place;
use crate::Result;
use rand::Rng;
use std::time::Duration;

/// Only the first eight records are dealt (sixteen cards).
pub const MAX_PAIRS: usize = 8;
pub const MATCH_REVEAL_DELAY: Duration = Duration::from_millis(500);
pub const MISMATCH_DELAY: Duration = Duration::from_millis(1000);
pub const COMPLETION_DELAY: Duration = Duration::from_millis(1000);
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
/// Match has no partial credit; a cleared board always scores this.
pub const MATCH_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    Word,
    Definition,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub content: String,
    pub face: CardFace,
    /// Lowercased word both cards of a pair share.
    pub pair_key: String,
    pub matched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Locked, already face up, matched, or no such card.
    Ignored,
    /// First card of a pair turned over.
    Flipped,
    /// Second card turned over. Call [`MatchEngine::resolve`] after `delay`.
    Resolving { is_match: bool, delay: Duration },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing was pending.
    Idle,
    /// Pair marked matched. When `completed`, call [`MatchEngine::finish`]
    /// after [`COMPLETION_DELAY`].
    Matched { completed: bool },
    FlippedBack,
}

#[derive(Debug)]
pub struct MatchEngine {
    cards: Vec<Card>,
    flipped: Vec<usize>,
    pairs: usize,
    matched_pairs: usize,
    moves: u32,
    elapsed_seconds: u64,
    locked: bool,
    completed: bool,
    finished: bool,
}

impl MatchEngine {
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_face_up(&self, index: usize) -> bool {
        self.flipped.contains(&index) || self.cards.get(index).is_some_and(|c| c.matched)
    }

    pub fn matched_count(&self) -> usize {
        self.matched_pairs
    }

    pub fn pairs(&self) -> usize {
        self.pairs
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Every pair has been matched; the result is waiting on [`Self::finish`].
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn select(&mut self, index: usize) -> MatchOutcome {
        if self.locked || self.completed || self.flipped.contains(&index) {
            return MatchOutcome::Ignored;
        }
        match self.cards.get(index) {
            Some(card) if !card.matched => {}
            _ => return MatchOutcome::Ignored,
        }

        self.flipped.push(index);
        if self.flipped.len() < 2 {
            return MatchOutcome::Flipped;
        }

        self.moves += 1;
        self.locked = true;
        let is_match = self.cards[self.flipped[0]].pair_key == self.cards[self.flipped[1]].pair_key;
        tracing::debug!("Match move {}: is_match={}", self.moves, is_match);

        MatchOutcome::Resolving {
            is_match,
            delay: if is_match {
                MATCH_REVEAL_DELAY
            } else {
                MISMATCH_DELAY
            },
        }
    }

    /// Apply the pending pair comparison once its display delay has elapsed.
    pub fn resolve(&mut self) -> Resolution {
        if !self.locked || self.flipped.len() != 2 {
            return Resolution::Idle;
        }

        let (a, b) = (self.flipped[0], self.flipped[1]);
        self.flipped.clear();
        self.locked = false;

        if self.cards[a].pair_key != self.cards[b].pair_key {
            return Resolution::FlippedBack;
        }

        self.cards[a].matched = true;
        self.cards[b].matched = true;
        self.matched_pairs += 1;
        self.completed = self.matched_pairs == self.pairs;
        Resolution::Matched {
            completed: self.completed,
        }
    }

    /// One-second clock tick. Stops counting once the board is cleared.
    pub fn tick(&mut self) {
        if !self.completed {
            self.elapsed_seconds += 1;
        }
    }

    /// Close the game after the completion delay.
    pub fn finish(&mut self) -> Option<GameStats> {
        if !self.completed {
            return None;
        }
        self.finished = true;
        self.outcome()
    }

    fn stats(&self) -> GameStats {
        GameStats {
            mode: Self::KIND,
            score: MATCH_SCORE,
            total: self.pairs as u32,
            history: None,
            time_seconds: Some(self.elapsed_seconds),
            moves: Some(self.moves),
        }
    }
}

impl GameEngine for MatchEngine {
    const KIND: GameKind = GameKind::Match;

    fn start<R: Rng + ?Sized>(words: &[WordRecord], rng: &mut R) -> Result<Self> {
        ensure_words(words)?;

        let dealt = &words[..words.len().min(MAX_PAIRS)];
        let mut cards = Vec::with_capacity(dealt.len() * 2);
        for (i, w) in dealt.iter().enumerate() {
            cards.push(Card {
                id: format!("w-{}", i),
                content: w.word.clone(),
                face: CardFace::Word,
                pair_key: w.key(),
                matched: false,
            });
            cards.push(Card {
                id: format!("d-{}", i),
                content: w.definition.clone(),
                face: CardFace::Definition,
                pair_key: w.key(),
                matched: false,
            });
        }
        shuffle_in_place(&mut cards, rng);

        Ok(Self {
            cards,
            flipped: Vec::with_capacity(2),
            pairs: dealt.len(),
            matched_pairs: 0,
            moves: 0,
            elapsed_seconds: 0,
            locked: false,
            completed: false,
            finished: false,
        })
    }

    fn progress(&self) -> Progress {
        Progress {
            current: self.matched_pairs,
            total: self.pairs,
        }
    }

    fn outcome(&self) -> Option<GameStats> {
        self.finished.then(|| self.stats())
    }
}
