//! Hosted chat-completion provider for the NexForm survey engine.
//!
//! Sends the prompt as a one-element `user` message list to an
//! OpenAI-compatible chat completions endpoint with a bearer credential and
//! extracts the first choice's text content. Missing credentials are a
//! configuration error surfaced at call time, not at startup.

mod api_types;
mod config;
mod provider;

pub use api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, Choice, Usage};
pub use config::OpenAiProviderConfig;
pub use provider::OpenAiProvider;

// Re-export core types for convenience
pub use provider_core::{ChatMessage, Provider, ProviderError};
