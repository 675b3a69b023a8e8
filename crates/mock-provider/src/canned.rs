//! Canned provider - returns a fixed reply for any prompt.

use provider_core::{async_trait, Provider, ProviderError};

/// A provider that always returns the same reply.
///
/// Rejects empty prompts like the real backends so tests exercise the same
/// contract.
pub struct CannedProvider {
    reply: String,
}

impl CannedProvider {
    /// Create a provider that replies with the given text.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl Provider for CannedProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        if prompt.trim().is_empty() {
            return Err(ProviderError::EmptyPrompt);
        }
        Ok(self.reply.clone())
    }

    fn name(&self) -> &str {
        "CannedProvider"
    }
}
