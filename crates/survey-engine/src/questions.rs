//! Merchant question input validation.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Max characters allowed in a question text.
pub const MAX_QUESTION_CHARS: usize = 500;

/// A new merchant question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionInput {
    pub question_text: String,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub is_required: bool,
}

impl QuestionInput {
    /// Validate and normalize, returning the trimmed question text.
    pub fn validate(&self) -> Result<String> {
        let text = self.question_text.trim();
        if text.is_empty() {
            return Err(EngineError::Validation(
                "question_text must not be empty".to_string(),
            ));
        }
        if text.chars().count() > MAX_QUESTION_CHARS {
            return Err(EngineError::Validation(format!(
                "question_text exceeds {MAX_QUESTION_CHARS} characters"
            )));
        }
        if self.sort_order < 0 {
            return Err(EngineError::Validation(
                "sort_order must not be negative".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}

/// A partial update to an existing question. Absent fields keep their
/// stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl QuestionPatch {
    /// Validate the patch, returning the trimmed replacement text if one
    /// was supplied.
    pub fn validate(&self) -> Result<Option<String>> {
        if self.question_text.is_none()
            && self.sort_order.is_none()
            && self.is_required.is_none()
            && self.is_active.is_none()
        {
            return Err(EngineError::Validation(
                "update must change at least one field".to_string(),
            ));
        }

        let text = match &self.question_text {
            Some(raw) => {
                let text = raw.trim();
                if text.is_empty() {
                    return Err(EngineError::Validation(
                        "question_text must not be empty".to_string(),
                    ));
                }
                if text.chars().count() > MAX_QUESTION_CHARS {
                    return Err(EngineError::Validation(format!(
                        "question_text exceeds {MAX_QUESTION_CHARS} characters"
                    )));
                }
                Some(text.to_string())
            }
            None => None,
        };

        if let Some(order) = self.sort_order {
            if order < 0 {
                return Err(EngineError::Validation(
                    "sort_order must not be negative".to_string(),
                ));
            }
        }

        Ok(text)
    }
}
