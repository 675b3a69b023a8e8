//! LlamaProvider implementation spawning a model process per call.

use provider_core::{async_trait, Provider, ProviderError};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::LlamaProviderConfig;

/// A provider that shells out to a locally installed model runner.
///
/// The prompt is passed as a single argument, so no shell quoting or
/// escaping is involved.
pub struct LlamaProvider {
    config: LlamaProviderConfig,
}

impl LlamaProvider {
    /// Create a new LlamaProvider with the given configuration.
    pub fn new(config: LlamaProviderConfig) -> Self {
        Self { config }
    }

    /// Create a LlamaProvider from environment variables.
    ///
    /// See [`LlamaProviderConfig::from_env`].
    pub fn from_env() -> Self {
        Self::new(LlamaProviderConfig::from_env())
    }

    /// Get the configuration.
    pub fn config(&self) -> &LlamaProviderConfig {
        &self.config
    }
}

#[async_trait]
impl Provider for LlamaProvider {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ProviderError::EmptyPrompt);
        }

        debug!(
            binary = %self.config.binary,
            model = %self.config.model,
            "spawning local model process"
        );

        let output = Command::new(&self.config.binary)
            .arg("run")
            .arg(&self.config.model)
            .arg(prompt)
            .output()
            .await
            .map_err(|e| {
                ProviderError::Process(format!(
                    "failed to spawn {}: {}",
                    self.config.binary, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = ?output.status.code(), "local model process failed");
            return Err(ProviderError::Process(format!(
                "{} exited with {}: {}",
                self.config.binary,
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        "LlamaProvider"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_prompt_rejected() {
        let provider = LlamaProvider::new(LlamaProviderConfig::default());
        let result = provider.generate("   ").await;
        assert!(matches!(result, Err(ProviderError::EmptyPrompt)));
    }

    #[tokio::test]
    async fn test_missing_binary_is_process_error() {
        let config = LlamaProviderConfig {
            binary: "/nonexistent/ollama-bin".to_string(),
            model: "llama3".to_string(),
        };
        let provider = LlamaProvider::new(config);
        let result = provider.generate("olá").await;
        assert!(matches!(result, Err(ProviderError::Process(_))));
    }

    #[test]
    fn test_provider_name() {
        let provider = LlamaProvider::new(LlamaProviderConfig::default());
        assert_eq!(provider.name(), "LlamaProvider");
    }
}
