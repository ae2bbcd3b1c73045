//! Letter-tile reconstruction: rebuild each word from its shuffled letters.

use super::{ensure_words, Advance, GameEngine, Progress};
use crate::models::{GameKind, GameStats, WordRecord};
use crate::shuffle::shuffle_in_place;
use crate::Result;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterTile {
    /// Position of the letter in the original word; unique within a round.
    pub id: usize,
    pub ch: char,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileMove {
    /// Round already solved, or no tile at that position.
    Ignored,
    Moved { solved: bool },
}

#[derive(Debug)]
struct Round {
    target: String,
    pool: Vec<LetterTile>,
    answer: Vec<LetterTile>,
    solved: bool,
    reshuffles: u32,
}

impl Round {
    fn deal<R: Rng + ?Sized>(target: &str, rng: &mut R) -> Self {
        let mut round = Self {
            target: target.to_string(),
            pool: Vec::new(),
            answer: Vec::new(),
            solved: false,
            reshuffles: 0,
        };
        round.reset_tiles(rng);
        round
    }

    fn reset_tiles<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.pool = self
            .target
            .chars()
            .enumerate()
            .map(|(id, ch)| LetterTile { id, ch })
            .collect();
        shuffle_in_place(&mut self.pool, rng);
        self.answer.clear();
        self.solved = self.target.is_empty();
    }

    fn answer_text(&self) -> String {
        self.answer.iter().map(|t| t.ch).collect()
    }

    fn recheck(&mut self) -> bool {
        self.solved = self.answer_text().to_lowercase() == self.target.to_lowercase();
        self.solved
    }
}

#[derive(Debug)]
pub struct ScrambleEngine {
    words: Vec<WordRecord>,
    index: usize,
    round: Round,
    stats: GameStats,
    finished: bool,
}

impl ScrambleEngine {
    pub fn current(&self) -> Option<&WordRecord> {
        if self.finished {
            return None;
        }
        self.words.get(self.index)
    }

    pub fn pool(&self) -> &[LetterTile] {
        &self.round.pool
    }

    pub fn answer(&self) -> &[LetterTile] {
        &self.round.answer
    }

    pub fn answer_text(&self) -> String {
        self.round.answer_text()
    }

    pub fn is_solved(&self) -> bool {
        self.round.solved
    }

    /// False once the learner has asked for a reshuffle this round.
    pub fn is_clean(&self) -> bool {
        self.round.reshuffles == 0
    }

    pub fn reshuffles(&self) -> u32 {
        self.round.reshuffles
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Move the pool tile at `position` to the end of the answer.
    pub fn tap_pool(&mut self, position: usize) -> TileMove {
        if self.round.solved || self.finished || position >= self.round.pool.len() {
            return TileMove::Ignored;
        }
        let tile = self.round.pool.remove(position);
        self.round.answer.push(tile);
        TileMove::Moved {
            solved: self.round.recheck(),
        }
    }

    /// Return the answer tile at `position` to the end of the pool.
    pub fn tap_answer(&mut self, position: usize) -> TileMove {
        if self.round.solved || self.finished || position >= self.round.answer.len() {
            return TileMove::Ignored;
        }
        let tile = self.round.answer.remove(position);
        self.round.pool.push(tile);
        TileMove::Moved {
            solved: self.round.recheck(),
        }
    }

    /// Put every tile back in the pool in a fresh order.
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.round.solved || self.finished {
            return false;
        }
        self.round.reset_tiles(rng);
        self.round.reshuffles += 1;
        true
    }

    /// Move past a solved round. Every solved round scores a point,
    /// regardless of reshuffles.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Advance {
        if self.finished {
            return Advance::Finished(self.stats.clone());
        }
        if !self.round.solved {
            return Advance::Locked;
        }

        let word = self.words[self.index].word.clone();
        if self.round.reshuffles > 0 {
            tracing::debug!(
                "Scramble '{}' solved after {} reshuffles",
                word,
                self.round.reshuffles
            );
        }
        self.stats.record(&word, true);

        if self.index + 1 < self.words.len() {
            self.index += 1;
            self.round = Round::deal(&self.words[self.index].word, rng);
            Advance::Next
        } else {
            self.finished = true;
            Advance::Finished(self.stats.clone())
        }
    }
}

impl GameEngine for ScrambleEngine {
    const KIND: GameKind = GameKind::Scramble;

    fn start<R: Rng + ?Sized>(words: &[WordRecord], rng: &mut R) -> Result<Self> {
        ensure_words(words)?;
        Ok(Self {
            round: Round::deal(&words[0].word, rng),
            words: words.to_vec(),
            index: 0,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::test_support::record;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Tap pool tiles so the answer spells `text`.
    fn spell(engine: &mut ScrambleEngine, text: &str) -> TileMove {
        let mut last = TileMove::Ignored;
        for wanted in text.chars() {
            let position = engine
                .pool()
                .iter()
                .position(|t| t.ch.eq_ignore_ascii_case(&wanted))
                .unwrap();
            last = engine.tap_pool(position);
        }
        last
    }

    #[test]
    fn test_dog_has_three_tiles_and_solves() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut engine = ScrambleEngine::start(&[record("dog", "a pet")], &mut rng).unwrap();

        assert_eq!(engine.pool().len(), 3);
        assert_eq!(spell(&mut engine, "dog"), TileMove::Moved { solved: true });
        assert!(engine.is_solved());
    }

    #[test]
    fn test_anagram_does_not_solve() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut engine = ScrambleEngine::start(&[record("dog", "a pet")], &mut rng).unwrap();

        assert_eq!(spell(&mut engine, "god"), TileMove::Moved { solved: false });
        assert!(!engine.is_solved());
        assert_eq!(engine.advance(&mut rng), Advance::Locked);
    }

    #[test]
    fn test_answer_tile_returns_to_pool_end() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut engine = ScrambleEngine::start(&[record("cat", "feline")], &mut rng).unwrap();

        engine.tap_pool(0);
        let moved = engine.answer()[0];
        engine.tap_answer(0);

        assert!(engine.answer().is_empty());
        assert_eq!(*engine.pool().last().unwrap(), moved);
    }

    #[test]
    fn test_solved_round_freezes_tiles() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut engine = ScrambleEngine::start(&[record("ox", "bovine")], &mut rng).unwrap();

        spell(&mut engine, "ox");
        assert_eq!(engine.tap_answer(0), TileMove::Ignored);
        assert!(!engine.reshuffle(&mut rng));
    }

    #[test]
    fn test_case_insensitive_solve() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut engine = ScrambleEngine::start(&[record("Paris", "city")], &mut rng).unwrap();
        assert_eq!(spell(&mut engine, "paris"), TileMove::Moved { solved: true });
    }

    #[test]
    fn test_reshuffle_marks_round_unclean_but_still_scores() {
        let mut rng = StdRng::seed_from_u64(6);
        let words = vec![record("sun", "star"), record("moon", "satellite")];
        let mut engine = ScrambleEngine::start(&words, &mut rng).unwrap();

        engine.tap_pool(0);
        assert!(engine.reshuffle(&mut rng));
        assert!(engine.answer().is_empty());
        assert_eq!(engine.pool().len(), 3);
        assert!(!engine.is_clean());

        spell(&mut engine, "sun");
        assert_eq!(engine.advance(&mut rng), Advance::Next);
        assert!(engine.is_clean());

        spell(&mut engine, "moon");
        match engine.advance(&mut rng) {
            Advance::Finished(stats) => {
                assert_eq!(stats.score, 2);
                assert_eq!(stats.total, 2);
                assert!(stats.history.unwrap().iter().all(|h| h.is_correct));
            }
            other => panic!("expected finish, got {:?}", other),
        }
    }
}
