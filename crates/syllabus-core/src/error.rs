use thiserror::Error;

use crate::ai::AiError;
use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Content cannot be null or empty")]
    EmptyContent,

    #[error("No suitable extraction strategy found for content ({content_length} chars)")]
    NoSuitableStrategy { content_length: usize },

    #[error("Invalid difficulty level: {0}")]
    InvalidDifficulty(String),

    #[error("Invalid deadline type: {0}")]
    InvalidDeadlineType(String),

    #[error("Invalid material type: {0}")]
    InvalidMaterialType(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("AI service error: {0}")]
    Ai(#[from] AiError),

    #[error("Invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl Error {
    /// True for errors caused by the caller's input rather than the pipeline.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(self, Self::EmptyContent)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
