//! Bounded provider invocation.
//!
//! Respondent-facing calls must never stall a conversation on a slow or hung
//! backend, so every generation on that path runs under a timeout race. The
//! underlying call is dropped (not forcibly killed) when the budget expires;
//! callers treat the timeout as a generation failure.

use std::time::Duration;

use tokio::time::timeout;
use tracing::warn;

use crate::error::ProviderError;
use crate::trait_def::Provider;

/// Invoke a provider with a timeout budget.
///
/// Returns [`ProviderError::Timeout`] if the provider does not resolve in
/// time. Other provider errors pass through unchanged.
pub async fn generate_with_timeout(
    provider: &dyn Provider,
    prompt: &str,
    budget: Duration,
) -> Result<String, ProviderError> {
    match timeout(budget, provider.generate(prompt)).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                provider = provider.name(),
                budget_ms = budget.as_millis() as u64,
                "provider call timed out"
            );
            Err(ProviderError::Timeout(budget))
        }
    }
}
