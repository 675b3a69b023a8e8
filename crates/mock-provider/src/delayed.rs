//! Delayed provider - wraps another provider with artificial delay.

use std::time::Duration;

use provider_core::{async_trait, Provider, ProviderError};
use tokio::time::sleep;

/// A provider that wraps another provider and adds artificial delay.
///
/// Useful for testing timeout handling and simulating generation latency.
pub struct DelayedProvider<P: Provider> {
    inner: P,
    delay: Duration,
}

impl<P: Provider> DelayedProvider<P> {
    /// Create a new DelayedProvider wrapping the given provider.
    pub fn new(inner: P, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a provider with a delay in milliseconds.
    pub fn with_millis(inner: P, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }

    /// Create a provider with a delay in seconds.
    pub fn with_secs(inner: P, secs: u64) -> Self {
        Self::new(inner, Duration::from_secs(secs))
    }
}

#[async_trait]
impl<P: Provider> Provider for DelayedProvider<P> {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        sleep(self.delay).await;
        self.inner.generate(prompt).await
    }

    fn name(&self) -> &str {
        "DelayedProvider"
    }
}
