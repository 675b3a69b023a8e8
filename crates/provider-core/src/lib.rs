//! Core trait and types for AI text-generation providers.
//!
//! This crate provides the shared interface for all provider implementations
//! in the NexForm survey engine. It defines:
//!
//! - [`Provider`] - The trait that all text-generation backends implement
//! - [`AiMode`] - The supported backend selector (`llama` or `gpt`)
//! - [`ChatMessage`] - Role/content message for chat-style APIs
//! - [`ProviderError`] - Error types for generation failures
//! - [`generate_with_timeout`] - Bounded invocation for latency-sensitive paths
//!
//! # Example
//!
//! ```rust
//! use provider_core::{Provider, ProviderError};
//! use async_trait::async_trait;
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl Provider for MyProvider {
//!     async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
//!         if prompt.trim().is_empty() {
//!             return Err(ProviderError::EmptyPrompt);
//!         }
//!         Ok("Qual é a sua avaliação de 0 a 10?".to_string())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "MyProvider"
//!     }
//! }
//! ```

mod error;
mod message;
mod mode;
mod timeout;
mod trait_def;

pub use error::ProviderError;
pub use message::ChatMessage;
pub use mode::AiMode;
pub use timeout::generate_with_timeout;
pub use trait_def::Provider;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
