//! Backend selection mode.

use serde::{Deserialize, Serialize};

/// Which text-generation backend to use.
///
/// Stored values and API inputs are parsed leniently: anything that is not
/// recognizably `gpt` normalizes to the local-model default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiMode {
    /// Locally invoked model process (default).
    #[default]
    Llama,
    /// Hosted chat-completion API.
    Gpt,
}

impl AiMode {
    /// Parse a stored or user-supplied mode value.
    ///
    /// Unrecognized, empty, or missing values fall back to [`AiMode::Llama`].
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "gpt" => Self::Gpt,
            _ => Self::Llama,
        }
    }

    /// Parse a mode value strictly, returning `None` for anything that is
    /// not exactly a supported mode.
    pub fn parse_strict(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "llama" => Some(Self::Llama),
            "gpt" => Some(Self::Gpt),
            _ => None,
        }
    }

    /// The canonical stored string for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Llama => "llama",
            Self::Gpt => "gpt",
        }
    }
}

impl std::fmt::Display for AiMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenient_parse_defaults_to_llama() {
        assert_eq!(AiMode::parse_lenient("gpt"), AiMode::Gpt);
        assert_eq!(AiMode::parse_lenient(" GPT "), AiMode::Gpt);
        assert_eq!(AiMode::parse_lenient("llama"), AiMode::Llama);
        assert_eq!(AiMode::parse_lenient("claude"), AiMode::Llama);
        assert_eq!(AiMode::parse_lenient(""), AiMode::Llama);
    }

    #[test]
    fn test_strict_parse_rejects_unknown() {
        assert_eq!(AiMode::parse_strict("gpt"), Some(AiMode::Gpt));
        assert_eq!(AiMode::parse_strict("llama"), Some(AiMode::Llama));
        assert_eq!(AiMode::parse_strict("bard"), None);
    }
}
