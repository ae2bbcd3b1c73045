//! Fill-the-blanks over the original article text.

use super::tokenizer::{tokenize, Token};
use crate::models::ArticleWordRecord;
use crate::shuffle::shuffled;
use crate::{Error, Result};
use rand::Rng;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlankResult {
    Correct {
        token: usize,
        value: String,
    },
    /// Unfilled blanks come back with no guess.
    Incorrect {
        token: usize,
        guess: Option<String>,
        original: String,
    },
}

impl BlankResult {
    pub fn is_correct(&self) -> bool {
        matches!(self, BlankResult::Correct { .. })
    }
}

#[derive(Debug)]
pub struct ClozeView {
    tokens: Vec<Token>,
    blanks: Vec<usize>,
    bank: Vec<String>,
    fills: BTreeMap<usize, String>,
    results: Option<Vec<BlankResult>>,
}

impl ClozeView {
    pub fn new<R: Rng + ?Sized>(article: &str, words: &[ArticleWordRecord], rng: &mut R) -> Self {
        let targets: Vec<String> = words.iter().map(|w| w.key()).collect();
        let tokens = tokenize(article);
        let blanks = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_word && targets.contains(&t.text.to_lowercase()))
            .map(|(i, _)| i)
            .collect();
        let bank_words: Vec<String> = words.iter().map(|w| w.word.clone()).collect();

        Self {
            tokens,
            blanks,
            bank: shuffled(&bank_words, rng),
            fills: BTreeMap::new(),
            results: None,
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Token indices rendered as blanks, in reading order.
    pub fn blanks(&self) -> &[usize] {
        &self.blanks
    }

    pub fn is_blank(&self, token: usize) -> bool {
        self.blanks.binary_search(&token).is_ok()
    }

    /// Word bank, shuffled once when the view was built.
    pub fn bank(&self) -> &[String] {
        &self.bank
    }

    pub fn filled(&self, token: usize) -> Option<&str> {
        self.fills.get(&token).map(String::as_str)
    }

    pub fn is_checked(&self) -> bool {
        self.results.is_some()
    }

    /// Drop `word` on a blank, replacing whatever was there. Returns false
    /// once checked or when `token` is not a blank.
    pub fn fill(&mut self, token: usize, word: &str) -> bool {
        if self.is_checked() || !self.is_blank(token) {
            return false;
        }
        self.fills.insert(token, word.to_string());
        true
    }

    /// Fill the `nth` blank (0-based, reading order) with bank chip `chip`.
    pub fn fill_from_bank(&mut self, nth: usize, chip: usize) -> bool {
        let (Some(&token), Some(word)) = (self.blanks.get(nth), self.bank.get(chip)) else {
            return false;
        };
        let word = word.clone();
        self.fill(token, &word)
    }

    /// Freeze the view and grade every blank.
    pub fn check(&mut self) -> Result<&[BlankResult]> {
        if self.results.is_none() {
            if self.fills.is_empty() {
                return Err(Error::Validation(
                    "Fill at least one blank before checking".to_string(),
                ));
            }
            let results = self
                .blanks
                .iter()
                .map(|&token| self.grade(token))
                .collect();
            self.results = Some(results);
        }
        Ok(self.results.as_deref().unwrap_or_default())
    }

    pub fn results(&self) -> Option<&[BlankResult]> {
        self.results.as_deref()
    }

    fn grade(&self, token: usize) -> BlankResult {
        let original = self.tokens[token].text.clone();
        match self.fills.get(&token) {
            Some(value) if value.to_lowercase() == original.to_lowercase() => BlankResult::Correct {
                token,
                value: value.clone(),
            },
            guess => BlankResult::Incorrect {
                token,
                guess: guess.cloned(),
                original,
            },
        }
    }

    /// The article as written, whatever the blanks hold.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}
