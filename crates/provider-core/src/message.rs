//! Chat message type shared by chat-style completion APIs.

use serde::{Deserialize, Serialize};

/// A chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role: "system", "user", or "assistant"
    pub role: String,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Map a single prompt to the one-element message list expected by
    /// chat-completion endpoints.
    pub fn from_prompt(prompt: &str) -> Vec<Self> {
        let trimmed = prompt.trim();
        if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![Self::user(trimmed)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_prompt_single_user_message() {
        let messages = ChatMessage::from_prompt("  olá  ");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[0].content, "olá");
    }

    #[test]
    fn test_from_prompt_blank_is_empty() {
        assert!(ChatMessage::from_prompt("   ").is_empty());
    }
}
