//! Cloze-choice game: pick the word that fills the blank in its example.

use super::choice::{build_options, AnswerOutcome, ChoiceQuestion, ChoiceRounds};
use super::{ensure_words, Advance, GameEngine, Progress};
use crate::models::{GameKind, GameStats, WordRecord};
use crate::shuffle::shuffled;
use crate::Result;
use rand::Rng;
use regex::RegexBuilder;

pub const BLANK: &str = "_______";

/// Replace every case-insensitive occurrence of `word` in `sentence` with
/// [`BLANK`]. The word is matched literally.
pub fn blank_out(sentence: &str, word: &str) -> String {
    if word.is_empty() {
        return sentence.to_string();
    }
    match RegexBuilder::new(&regex::escape(word))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.replace_all(sentence, BLANK).into_owned(),
        Err(e) => {
            tracing::warn!("Could not build blank pattern for '{}': {}", word, e);
            sentence.to_string()
        }
    }
}

fn lowercase(s: &str) -> String {
    s.to_lowercase()
}

#[derive(Debug)]
pub struct ContextEngine {
    rounds: ChoiceRounds,
}

impl ContextEngine {
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

impl GameEngine for ContextEngine {
    const KIND: GameKind = GameKind::Context;

    fn start<R: Rng + ?Sized>(words: &[WordRecord], rng: &mut R) -> Result<Self> {
        ensure_words(words)?;

        let order = shuffled(words, rng);
        let mut questions = Vec::with_capacity(order.len());
        for target in &order {
            let key = target.key();
            let pool = words
                .iter()
                .filter(|w| w.key() != key)
                .map(|w| w.word.as_str());

            questions.push(ChoiceQuestion {
                word: target.word.clone(),
                prompt: blank_out(&target.example, &target.word),
                hint: Some(target.definition.clone()),
                answer: target.word.clone(),
                options: build_options(&target.word, pool, lowercase, rng),
            });
        }

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
