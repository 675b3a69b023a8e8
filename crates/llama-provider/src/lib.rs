//! Local model provider for the NexForm survey engine.
//!
//! Runs `ollama run <model>` once per generation, passing the prompt on the
//! command line and capturing trimmed standard output. No daemon or
//! per-sender state is kept; each call is an independent process invocation.

mod config;
mod provider;

pub use config::LlamaProviderConfig;
pub use provider::LlamaProvider;

// Re-export core types for convenience
pub use provider_core::{Provider, ProviderError};
