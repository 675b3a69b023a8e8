//! Failing provider - always errors.

use provider_core::{async_trait, Provider, ProviderError};

/// Which failure the provider should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Process-level failure (local backend).
    Process,
    /// Network-level failure (hosted backend).
    Network,
    /// Successful call that yields no content.
    EmptyResponse,
}

/// A provider that always fails, for exercising fallback paths.
pub struct FailingProvider {
    kind: FailureKind,
}

impl FailingProvider {
    /// Create a provider failing with the given kind.
    pub fn new(kind: FailureKind) -> Self {
        Self { kind }
    }

    /// Shorthand for a process failure.
    pub fn process() -> Self {
        Self::new(FailureKind::Process)
    }

    /// Shorthand for a network failure.
    pub fn network() -> Self {
        Self::new(FailureKind::Network)
    }
}

#[async_trait]
impl Provider for FailingProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        if prompt.trim().is_empty() {
            return Err(ProviderError::EmptyPrompt);
        }
        match self.kind {
            FailureKind::Process => Err(ProviderError::Process("simulated failure".to_string())),
            FailureKind::Network => Err(ProviderError::Network("simulated failure".to_string())),
            FailureKind::EmptyResponse => Err(ProviderError::EmptyResponse),
        }
    }

    fn name(&self) -> &str {
        "FailingProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_fails() {
        let provider = FailingProvider::network();
        assert!(matches!(
            provider.generate("prompt").await,
            Err(ProviderError::Network(_))
        ));
    }
}
