//! Provider error types.

use thiserror::Error;

/// Errors that can occur while generating text with a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The prompt was empty or whitespace-only.
    #[error("prompt must be a non-empty string")]
    EmptyPrompt,

    /// Provider configuration is missing or invalid (e.g. no API key).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Local model process failed to spawn or exited with an error.
    #[error("process error: {0}")]
    Process(String),

    /// Network-level failure reaching a hosted API.
    #[error("network error: {0}")]
    Network(String),

    /// Hosted API returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider responded but produced no usable text.
    #[error("provider returned no content")]
    EmptyResponse,

    /// The call exceeded its timeout budget.
    #[error("generation timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl ProviderError {
    /// Whether this failure is worth retrying (transient infrastructure
    /// issues) as opposed to a caller or configuration mistake.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::Api { status: 500..=599, .. }
        )
    }
}
