//! Configuration for OpenAiProvider.

use std::env;

/// Default chat completions endpoint.
pub const DEFAULT_API_URL: &str = "https://api.openai.com";

/// Configuration for the hosted provider.
///
/// `api_key` and `model` may be empty here; [`crate::OpenAiProvider`]
/// validates them on each call so a misconfigured deployment fails the AI
/// path without failing startup.
#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    /// API base URL.
    pub api_url: String,

    /// API key for bearer authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,
}

impl Default for OpenAiProviderConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: None,
            temperature: None,
        }
    }
}

impl OpenAiProviderConfig {
    /// Create configuration from environment variables.
    ///
    /// Environment variables:
    /// - `OPENAI_API_KEY` - API key (checked at call time)
    /// - `OPENAI_API_URL` - API base URL (default: https://api.openai.com)
    /// - `AI_MODEL` - Model name (default: gpt-4o-mini)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_url = env::var("OPENAI_API_URL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_url);

        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .map(|v| v.trim().to_string())
            .unwrap_or_default();

        let model = env::var("AI_MODEL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.model);

        Self {
            api_url,
            api_key,
            model,
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OpenAiProviderConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "gpt-4o-mini");
    }

    #[test]
    fn test_builder_setters() {
        let config = OpenAiProviderConfig::default()
            .with_api_key("sk-test")
            .with_model("gpt-4o");
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model, "gpt-4o");
    }
}
