//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use crate::session::Mode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI provider error: {0}")]
    AiProvider(String),

    #[error("{0}")]
    Validation(String),

    #[error("No words loaded for this session")]
    EmptyWordSet,

    #[error("Cannot move from {from:?} to {to:?}")]
    InvalidTransition { from: Mode, to: Mode },

    #[error("A request is already in progress")]
    Busy,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] dotenvy::Error),

    #[error("Invariant violated: {0}")]
    Invariant(String),

    #[error("Generic error: {0}")]
    Generic(String),
}

impl Error {
    /// True for failures caused by the AI collaborator rather than local state.
    pub fn is_enrichment_failure(&self) -> bool {
        matches!(
            self,
            Error::AiProvider(_) | Error::Http(_) | Error::Serialization(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
