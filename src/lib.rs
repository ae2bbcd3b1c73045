//! Vocab Quest - vocabulary practice with AI-enriched word lists
//!
//! Learners type a list of words (or pick them out of an article), get
//! definitions, phonetics and examples from an AI collaborator, then drill
//! them through flashcards and five mini-games. The article path adds an
//! endless matching board and a cloze exercise over the article itself.

pub mod ai;
pub mod app;
pub mod article;
pub mod error;
pub mod games;
pub mod library;
pub mod models;
pub mod prompts;
pub mod result;
pub mod session;
pub mod shuffle;
pub mod speech;
pub mod store;
pub mod story;
pub mod timer;

pub use error::{Error, Result};
