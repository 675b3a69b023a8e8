//! Configuration for LlamaProvider.

use std::env;

/// Configuration for the local model process.
#[derive(Debug, Clone)]
pub struct LlamaProviderConfig {
    /// Binary to invoke (usually `ollama` on PATH).
    pub binary: String,

    /// Model name passed to `ollama run`.
    pub model: String,
}

impl Default for LlamaProviderConfig {
    fn default() -> Self {
        Self {
            binary: "ollama".to_string(),
            model: "llama3".to_string(),
        }
    }
}

impl LlamaProviderConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `OLLAMA_BIN` - Binary to invoke (default: `ollama`)
    /// - `LLAMA_MODEL` - Model name (default: `llama3`)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let binary = env::var("OLLAMA_BIN")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.binary);

        let model = env::var("LLAMA_MODEL")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.model);

        Self { binary, model }
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
        let config = LlamaProviderConfig::default();
        assert_eq!(config.binary, "ollama");
        assert_eq!(config.model, "llama3");
    }

    #[test]
    fn test_with_model() {
        let config = LlamaProviderConfig::default().with_model("llama3.1");
        assert_eq!(config.model, "llama3.1");
    }
}
