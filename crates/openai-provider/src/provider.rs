//! OpenAiProvider implementation over the chat completions API.

use provider_core::{async_trait, ChatMessage, Provider, ProviderError};
use reqwest::Client;
use tracing::{debug, warn};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse};
use crate::config::OpenAiProviderConfig;

/// A provider backed by an OpenAI-compatible chat completions endpoint.
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiProviderConfig,
}

impl OpenAiProvider {
    /// Create a new OpenAiProvider with the given configuration.
    pub fn new(config: OpenAiProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().build().map_err(|e| {
            ProviderError::Configuration(format!("failed to create HTTP client: {}", e))
        })?;

        Ok(Self { client, config })
    }

    /// Create an OpenAiProvider from environment variables.
    ///
    /// See [`OpenAiProviderConfig::from_env`]. A missing API key does not
    /// fail here; it fails the first generation call.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(OpenAiProviderConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiProviderConfig {
        &self.config
    }

    fn require_credentials(&self) -> Result<(), ProviderError> {
        if self.config.api_key.trim().is_empty() {
            return Err(ProviderError::Configuration(
                "API key is not configured".to_string(),
            ));
        }
        if self.config.model.trim().is_empty() {
            return Err(ProviderError::Configuration(
                "AI model is not configured".to_string(),
            ));
        }
        Ok(())
    }

    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatCompletionResponse, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.config.api_url);

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(model = %request.model, "sending chat completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(format!("failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Prefer the structured API error message when present
            let message = match serde_json::from_str::<ApiError>(&error_text) {
                Ok(api_error) => api_error.error.message,
                Err(_) => error_text,
            };

            warn!(status = status.as_u16(), "chat completion request failed");
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::Network(format!("failed to parse response: {}", e)))
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let messages = ChatMessage::from_prompt(prompt);
        if messages.is_empty() {
            return Err(ProviderError::EmptyPrompt);
        }

        self.require_credentials()?;

        let completion = self.chat_completion(messages).await?;

        let text = completion
            .choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or(ProviderError::EmptyResponse)?;

        if let Some(usage) = completion.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "token usage"
            );
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        "OpenAiProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_prompt_rejected_before_credentials() {
        let provider = OpenAiProvider::new(OpenAiProviderConfig::default()).unwrap();
        let result = provider.generate("").await;
        assert!(matches!(result, Err(ProviderError::EmptyPrompt)));
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let provider = OpenAiProvider::new(OpenAiProviderConfig::default()).unwrap();
        let result = provider.generate("olá").await;
        assert!(matches!(result, Err(ProviderError::Configuration(_))));
    }

    #[test]
    fn test_provider_name() {
        let provider = OpenAiProvider::new(OpenAiProviderConfig::default()).unwrap();
        assert_eq!(provider.name(), "OpenAiProvider");
    }
}
