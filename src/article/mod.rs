//! Article study path
//!
//! A pasted article is tokenized so the learner can pick unknown words.
//! After enrichment in context, the picked words are studied through
//! flashcards, an endless matching board and a fill-the-blanks view over
//! the original text.

pub mod board;
pub mod cloze;
pub mod study;
pub mod tokenizer;

pub use board::InfiniteBoard;
pub use cloze::ClozeView;
pub use study::{StudySession, StudyState, StudyView};
pub use tokenizer::{tokenize, validate_article, Token, WordSelection};
