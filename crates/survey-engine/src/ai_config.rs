//! AI configuration validation and views.
//!
//! One configuration per merchant drives prompt construction. Reads ensure
//! a defaults row lazily; writes are validated field by field before they
//! reach storage.

use provider_core::AiMode;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Accepted interview tones.
pub const TONES: &[&str] = &["simpático", "formal", "técnico", "motivacional"];
/// Accepted question styles.
pub const STYLES: &[&str] = &["curta", "detalhada", "analítica"];
/// Maximum goal length in characters.
pub const MAX_GOAL_CHARS: usize = 500;

/// Default interview tone.
pub const DEFAULT_TONE: &str = database::ai_config::DEFAULT_TONE;
/// Default question style.
pub const DEFAULT_STYLE: &str = database::ai_config::DEFAULT_STYLE;
/// Default interview goal.
pub const DEFAULT_GOAL: &str = database::ai_config::DEFAULT_GOAL;

/// A validated configuration update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfigInput {
    /// Interview tone.
    pub tone: String,
    /// Question style.
    pub style: String,
    /// Free-text interview goal.
    pub goal: String,
    /// Preferred AI mode.
    pub ai_mode: String,
}

impl AiConfigInput {
    /// Validate every field, returning the parsed AI mode.
    pub fn validate(&self) -> Result<AiMode> {
        if !TONES.contains(&self.tone.as_str()) {
            return Err(EngineError::Validation(format!(
                "tone must be one of {:?}",
                TONES
            )));
        }

        if !STYLES.contains(&self.style.as_str()) {
            return Err(EngineError::Validation(format!(
                "style must be one of {:?}",
                STYLES
            )));
        }

        let goal = self.goal.trim();
        if goal.is_empty() {
            return Err(EngineError::Validation("goal must not be empty".to_string()));
        }
        if goal.chars().count() > MAX_GOAL_CHARS {
            return Err(EngineError::Validation(format!(
                "goal must be at most {MAX_GOAL_CHARS} characters"
            )));
        }

        AiMode::parse_strict(&self.ai_mode).ok_or_else(|| {
            EngineError::Validation("ai_mode must be \"llama\" or \"gpt\"".to_string())
        })
    }
}

/// The caller-facing view of a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfigView {
    /// Interview tone.
    pub tone: String,
    /// Question style.
    pub style: String,
    /// Free-text interview goal.
    pub goal: String,
    /// Preferred AI mode.
    pub ai_mode: String,
}

impl From<database::AiConfig> for AiConfigView {
    fn from(config: database::AiConfig) -> Self {
        Self {
            tone: config.tone,
            style: config.style,
            goal: config.goal,
            ai_mode: config.ai_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> AiConfigInput {
        AiConfigInput {
            tone: "formal".to_string(),
            style: "detalhada".to_string(),
            goal: "retenção".to_string(),
            ai_mode: "gpt".to_string(),
        }
    }

    #[test]
    fn test_valid_input() {
        assert_eq!(input().validate().unwrap(), AiMode::Gpt);
    }

    #[test]
    fn test_invalid_tone_rejected() {
        let mut bad = input();
        bad.tone = "agressivo".to_string();
        assert!(matches!(bad.validate(), Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_goal_length_limit() {
        let mut bad = input();
        bad.goal = "x".repeat(MAX_GOAL_CHARS + 1);
        assert!(matches!(bad.validate(), Err(EngineError::Validation(_))));

        let mut ok = input();
        ok.goal = "é".repeat(MAX_GOAL_CHARS);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_strict_mode_parsing() {
        let mut bad = input();
        bad.ai_mode = "claude".to_string();
        assert!(matches!(bad.validate(), Err(EngineError::Validation(_))));
    }
}
