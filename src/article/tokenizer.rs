//! Article tokenization and unknown-word selection.

use crate::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static WORD_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z0-9]+").expect("word pattern is valid"));

/// Articles shorter than this (after trimming) are rejected.
pub const MIN_ARTICLE_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub is_word: bool,
}

/// Split `article` into alternating word and delimiter runs. Concatenating
/// every token's text reproduces the input exactly.
pub fn tokenize(article: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut last = 0;
    for m in WORD_RUN.find_iter(article) {
        if m.start() > last {
            tokens.push(Token {
                text: article[last..m.start()].to_string(),
                is_word: false,
            });
        }
        tokens.push(Token {
            text: m.as_str().to_string(),
            is_word: true,
        });
        last = m.end();
    }
    if last < article.len() {
        tokens.push(Token {
            text: article[last..].to_string(),
            is_word: false,
        });
    }
    tokens
}

pub fn validate_article(article: &str) -> Result<()> {
    if article.trim().chars().count() < MIN_ARTICLE_CHARS {
        return Err(Error::Validation(format!(
            "Article must be at least {} characters long",
            MIN_ARTICLE_CHARS
        )));
    }
    Ok(())
}

/// Unknown words picked out of an article. Every occurrence of a word
/// shares one toggle, keyed by its lowercase form.
#[derive(Debug)]
pub struct WordSelection {
    article: String,
    tokens: Vec<Token>,
    selected: Vec<String>,
}

impl WordSelection {
    pub fn new(article: &str) -> Self {
        Self {
            article: article.to_string(),
            tokens: tokenize(article),
            selected: Vec::new(),
        }
    }

    pub fn article(&self) -> &str {
        &self.article
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn is_selected(&self, word: &str) -> bool {
        let key = word.to_lowercase();
        self.selected.contains(&key)
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    /// Toggle the word at token `index`. Returns the new membership, or
    /// `None` when the token is a delimiter or out of range.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let token = self.tokens.get(index).filter(|t| t.is_word)?;
        let key = token.text.to_lowercase();
        Some(self.toggle_word(&key))
    }

    /// Toggle by word text rather than token position.
    pub fn toggle_word(&mut self, word: &str) -> bool {
        let key = word.to_lowercase();
        if let Some(pos) = self.selected.iter().position(|w| *w == key) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(key);
            true
        }
    }

    /// Index of the first word token equal to `word`, case-insensitively.
    pub fn find(&self, word: &str) -> Option<usize> {
        let key = word.to_lowercase();
        self.tokens
            .iter()
            .position(|t| t.is_word && t.text.to_lowercase() == key)
    }

    pub fn proceed(&self) -> Result<Vec<String>> {
        if self.selected.is_empty() {
            return Err(Error::Validation(
                "Select at least one word to study".to_string(),
            ));
        }
        Ok(self.selected.clone())
    }
}
