//! Mock provider implementations for testing survey AI flows.
//!
//! This crate provides mock implementations of the `Provider` trait:
//! - `CannedProvider` - Always returns a fixed reply
//! - `SequenceProvider` - Returns scripted replies in order
//! - `DelayedProvider` - Wraps another provider with artificial delay
//! - `FailingProvider` - Always fails with a given error kind
//!
//! For production generation use `llama-provider` or `openai-provider`.

mod canned;
mod delayed;
mod failing;
mod sequence;

pub use canned::CannedProvider;
pub use delayed::DelayedProvider;
pub use failing::{FailingProvider, FailureKind};
pub use sequence::SequenceProvider;

// Re-export provider-core types for convenience
pub use provider_core::{async_trait, Provider, ProviderError};
