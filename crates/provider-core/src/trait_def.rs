//! The Provider trait definition.

use async_trait::async_trait;

use crate::error::ProviderError;

/// A trait for generating text from a prompt.
///
/// Implementations range from a locally spawned model process to a hosted
/// completion API. This trait is object-safe and can be used with
/// `Box<dyn Provider>` or `Arc<dyn Provider>`.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Generate a reply for the given prompt.
    ///
    /// Implementations must reject empty or whitespace-only prompts with
    /// [`ProviderError::EmptyPrompt`] and return trimmed output.
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Get a human-readable name for this provider implementation.
    fn name(&self) -> &str;
}
