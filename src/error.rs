// Error types for the repolens application.
// Handles GitHub API errors, LLM API errors, and general application errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("Invalid repository reference: {0} (expected owner/repo or a GitHub URL)")]
    InvalidRepo(String),

    #[error("Missing LLM API key (set LLM_API_KEY, OPENROUTER_API_KEY, or OPENAI_API_KEY)")]
    MissingLlmKey,

    #[error("LLM API error: {0}")]
    Llm(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
