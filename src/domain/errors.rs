//! Domain errors for the rollout scoring engine.

use thiserror::Error;

/// Errors that can occur during a scoring cycle.
///
/// `InvalidScoreConfiguration` is the one recoverable class: the scoring
/// driver logs it and skips the affected group. Everything else aborts the
/// cycle.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Record store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("No scoring configuration found for service '{0}'")]
    MissingServiceConfig(String),

    #[error("No platform instance configuration found for '{0}'")]
    MissingInstanceConfig(String),

    #[error("Failed to retrieve secret '{name}': {detail}")]
    Credential { name: String, detail: String },

    #[error("Invalid scoring configuration for service '{service}': {detail}")]
    InvalidScoreConfiguration { service: String, detail: String },

    #[error("Scoring failed for service '{service}': {detail}")]
    ScoringFailed { service: String, detail: String },

    #[error("Publication failed: {0}")]
    PublishFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        EngineError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}
