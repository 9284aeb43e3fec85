//! Boundary to the external text-generation service.
//!
//! The extraction pipeline only relies on [`AiService`]; [`GeminiClient`] is
//! the production implementation and [`MockAiService`] serves canned replies.

mod gemini;
mod mock;
pub mod prompts;

pub use gemini::{parse_generate_response, shorten_content, GeminiClient};
pub use mock::MockAiService;

use thiserror::Error;

/// Body every category call falls back to when there is nothing to return.
pub const EMPTY_ARRAY: &str = "[]";

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI service is not configured")]
    NotConfigured,
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("AI service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),
    #[error("Response blocked: {0}")]
    Blocked(String),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
}

pub type AiResult<T> = Result<T, AiError>;

/// Category calls return a JSON array as text, possibly wrapped in a
/// Markdown code fence. Callers must tolerate any shape.
#[async_trait::async_trait]
pub trait AiService: Send + Sync {
    /// False in demo mode, where no network call is ever made.
    fn is_configured(&self) -> bool;

    async fn extract_topics(&self, content: &str) -> AiResult<String>;

    async fn extract_deadlines(&self, content: &str) -> AiResult<String>;

    async fn extract_materials(&self, content: &str) -> AiResult<String>;

    /// Free-form single-value completion.
    async fn generate_text(&self, prompt: &str) -> AiResult<String>;
}
