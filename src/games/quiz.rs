//! Definition quiz: pick the right definition for each word.

use super::choice::{build_options, AnswerOutcome, ChoiceQuestion, ChoiceRounds};
use super::{ensure_words, Advance, GameEngine, Progress};
use crate::models::{GameKind, GameStats, WordRecord};
use crate::shuffle::shuffled;
use crate::Result;
use rand::Rng;

#[derive(Debug)]
pub struct QuizEngine {
    rounds: ChoiceRounds,
}

impl QuizEngine {
    pub fn current(&self) -> Option<&ChoiceQuestion> {
        self.rounds.current()
    }

    pub fn selected(&self) -> Option<usize> {
        self.rounds.selected()
    }

    pub fn score(&self) -> u32 {
        self.rounds.stats().score
    }

    pub fn answer(&mut self, option: usize) -> AnswerOutcome {
        self.rounds.answer(option)
    }

    pub fn advance(&mut self) -> Advance {
        self.rounds.advance()
    }
}

fn question_for<R: Rng + ?Sized>(
    target: &WordRecord,
    words: &[WordRecord],
    rng: &mut R,
) -> ChoiceQuestion {
    let key = target.key();
    let pool = words
        .iter()
        .filter(|w| w.key() != key)
        .map(|w| w.definition.as_str());

    ChoiceQuestion {
        word: target.word.clone(),
        prompt: target.word.clone(),
        hint: Some(target.phonetic.clone()),
        answer: target.definition.clone(),
        options: build_options(&target.definition, pool, str::to_string, rng),
    }
}

impl GameEngine for QuizEngine {
    const KIND: GameKind = GameKind::Quiz;

    fn start<R: Rng + ?Sized>(words: &[WordRecord], rng: &mut R) -> Result<Self> {
        ensure_words(words)?;

        let order = shuffled(words, rng);
        let questions = order
            .iter()
            .map(|target| question_for(target, words, rng))
            .collect();

        tracing::debug!("Quiz started with {} questions", words.len());
        Ok(Self {
            rounds: ChoiceRounds::new(Self::KIND, questions),
        })
    }

    fn progress(&self) -> Progress {
        self.rounds.progress()
    }

    fn outcome(&self) -> Option<GameStats> {
        self.rounds.outcome()
    }
}
