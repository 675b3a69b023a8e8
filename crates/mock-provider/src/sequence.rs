//! Sequence provider - scripted replies in order.

use provider_core::{async_trait, Provider, ProviderError};
use tokio::sync::Mutex;

/// A provider that returns a scripted list of replies in order.
///
/// Once the script is exhausted it keeps returning the final reply, so
/// multi-turn tests do not have to count calls exactly.
pub struct SequenceProvider {
    replies: Vec<String>,
    cursor: Mutex<usize>,
}

impl SequenceProvider {
    /// Create a provider from a list of scripted replies.
    ///
    /// The list must be non-empty.
    pub fn new(replies: Vec<String>) -> Self {
        assert!(!replies.is_empty(), "scripted replies must be non-empty");
        Self {
            replies,
            cursor: Mutex::new(0),
        }
    }
}

#[async_trait]
impl Provider for SequenceProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        if prompt.trim().is_empty() {
            return Err(ProviderError::EmptyPrompt);
        }

        let mut cursor = self.cursor.lock().await;
        let index = (*cursor).min(self.replies.len() - 1);
        *cursor += 1;
        Ok(self.replies[index].clone())
    }

    fn name(&self) -> &str {
        "SequenceProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_order_then_repeat() {
        let provider =
            SequenceProvider::new(vec!["primeira".to_string(), "segunda".to_string()]);

        assert_eq!(provider.generate("p").await.unwrap(), "primeira");
        assert_eq!(provider.generate("p").await.unwrap(), "segunda");
        assert_eq!(provider.generate("p").await.unwrap(), "segunda");
    }
}
