//! Error types for the helpdesk service.
//!
//! A single error enum covers configuration, I/O, LLM, FAQ corpus, prompt
//! and HTTP server failures.

use thiserror::Error;

/// Unified error type for the helpdesk service.
///
/// Startup and plumbing functions return `Result<T, AppError>`.
/// Nothing on the request path turns one of these into a panic.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// FAQ corpus and matcher errors
    #[error("FAQ error: {0}")]
    Faq(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// HTTP server errors (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
