//! Flashcard deck for the custom word path.

use super::{ensure_words, Progress};
use crate::models::WordRecord;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckMove {
    Moved,
    /// Already at the first card.
    Stayed,
    /// Stepped past the last card; the learner moves on to the game hub.
    Finished,
}

#[derive(Debug)]
pub struct FlashcardDeck {
    words: Vec<WordRecord>,
    index: usize,
    flipped: bool,
}

impl FlashcardDeck {
    pub fn new(words: &[WordRecord]) -> Result<Self> {
        ensure_words(words)?;
        Ok(Self {
            words: words.to_vec(),
            index: 0,
            flipped: false,
        })
    }

    pub fn current(&self) -> &WordRecord {
        &self.words[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn next(&mut self) -> DeckMove {
        if self.index + 1 >= self.words.len() {
            return DeckMove::Finished;
        }
        self.index += 1;
        self.flipped = false;
        DeckMove::Moved
    }

    pub fn prev(&mut self) -> DeckMove {
        if self.index == 0 {
            return DeckMove::Stayed;
        }
        self.index -= 1;
        self.flipped = false;
        DeckMove::Moved
    }

    pub fn progress(&self) -> Progress {
        Progress {
            current: self.index + 1,
            total: self.words.len(),
        }
    }
}
