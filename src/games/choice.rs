//! Multiple-choice round machinery shared by the quiz and context games.

use super::{Advance, Progress};
use crate::models::{GameKind, GameStats};
use crate::shuffle::shuffle_in_place;
use rand::Rng;
use std::collections::HashSet;

pub const MAX_DISTRACTORS: usize = 3;

/// One prepared question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceQuestion {
    /// Word this question is about, recorded in history.
    pub word: String,
    /// Text shown to the learner.
    pub prompt: String,
    pub hint: Option<String>,
    pub answer: String,
    pub options: Vec<String>,
}

impl ChoiceQuestion {
    pub fn correct_option(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.answer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The question was already answered; nothing changed.
    AlreadyAnswered,
    /// No option at that index.
    OutOfRange,
    Answered { is_correct: bool },
}

/// Build the option list for one question.
///
/// Distractors are drawn from `pool`, skipping anything whose `fold`ed value
/// equals the answer or an earlier candidate, shuffled, capped at
/// [`MAX_DISTRACTORS`], then shuffled together with the answer. No padding is
/// added when the pool is small.
pub fn build_options<'a, R, I>(
    answer: &str,
    pool: I,
    fold: fn(&str) -> String,
    rng: &mut R,
) -> Vec<String>
where
    R: Rng + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    seen.insert(fold(answer));

    let mut options: Vec<String> = pool
        .into_iter()
        .filter(|candidate| seen.insert(fold(candidate)))
        .map(str::to_string)
        .collect();

    shuffle_in_place(&mut options, rng);
    options.truncate(MAX_DISTRACTORS);
    options.push(answer.to_string());
    shuffle_in_place(&mut options, rng);
    options
}

/// Answer-lock / scoring / history state for a list of questions.
#[derive(Debug)]
pub struct ChoiceRounds {
    questions: Vec<ChoiceQuestion>,
    index: usize,
    selected: Option<usize>,
    stats: GameStats,
    finished: bool,
}

impl ChoiceRounds {
    pub fn new(kind: GameKind, questions: Vec<ChoiceQuestion>) -> Self {
        Self {
            questions,
            index: 0,
            selected: None,
            stats: GameStats::with_history(kind),
            finished: false,
        }
    }

    pub fn current(&self) -> Option<&ChoiceQuestion> {
        if self.finished {
            return None;
        }
        self.questions.get(self.index)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn answer(&mut self, option: usize) -> AnswerOutcome {
        if self.selected.is_some() || self.finished {
            return AnswerOutcome::AlreadyAnswered;
        }
        let Some(question) = self.questions.get(self.index) else {
            return AnswerOutcome::OutOfRange;
        };
        let Some(choice) = question.options.get(option) else {
            return AnswerOutcome::OutOfRange;
        };

        let is_correct = *choice == question.answer;
        let word = question.word.clone();
        self.selected = Some(option);
        self.stats.record(&word, is_correct);
        AnswerOutcome::Answered { is_correct }
    }

    pub fn advance(&mut self) -> Advance {
        if self.finished {
            return Advance::Finished(self.stats.clone());
        }
        if self.selected.is_none() {
            return Advance::Locked;
        }
        if self.index + 1 < self.questions.len() {
            self.index += 1;
            self.selected = None;
            Advance::Next
        } else {
            self.finished = true;
            Advance::Finished(self.stats.clone())
        }
    }

    pub fn progress(&self) -> Progress {
        Progress {
            current: (self.index + 1).min(self.questions.len()),
            total: self.questions.len(),
        }
    }

    pub fn outcome(&self) -> Option<GameStats> {
        self.finished.then(|| self.stats.clone())
    }
}
