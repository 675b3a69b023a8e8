//! Error types for engine operations.

use database::DatabaseError;
use provider_core::ProviderError;
use thiserror::Error;

/// Errors that can occur during survey engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or missing input reaching the core. Never retried.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    /// The actor does not own the referenced form.
    #[error("access to this form is denied")]
    Forbidden,

    /// Nothing to analyze. Distinct from a provider failure so callers can
    /// show "no data" instead of a retry affordance.
    #[error("no data to analyze")]
    NoData,

    /// Provider failure (timeout, process, network, credentials).
    #[error("AI generation failed: {0}")]
    Provider(#[from] ProviderError),

    /// Model output did not match the expected structure. Reported like a
    /// provider failure to end users, logged distinctly as format drift.
    #[error("failed to parse AI output: {0}")]
    Parse(String),

    /// Underlying storage failure.
    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for EngineError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Database(other),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
