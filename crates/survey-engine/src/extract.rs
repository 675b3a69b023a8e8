//! Answer payload normalization.
//!
//! Stored response payloads are heterogeneous: raw text, or JSON objects
//! whose text lives under one of several historical key names. Extraction is
//! an ordered chain of strategies tried in sequence; the first one that
//! yields a non-empty trimmed string wins. Extraction never fails —
//! unparseable payloads yield an empty string (strict mode) or a
//! deterministic JSON rendering of the whole payload (lenient mode).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step in the extraction chain.
#[derive(Debug, Clone, Copy)]
enum Strategy {
    /// The payload itself is a string.
    Direct,
    /// A known text-bearing key on an object payload.
    Key(&'static str),
}

impl Strategy {
    fn apply(&self, payload: &Value) -> Option<String> {
        let candidate = match self {
            Self::Direct => payload.as_str(),
            Self::Key(key) => payload.get(key).and_then(Value::as_str),
        }?;

        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Extraction order shared by both modes.
const CHAIN: &[Strategy] = &[
    Strategy::Direct,
    Strategy::Key("answer"),
    Strategy::Key("user_input"),
    Strategy::Key("reply"),
    Strategy::Key("value"),
    Strategy::Key("text"),
    Strategy::Key("response"),
];

fn run_chain(payload: &Value) -> Option<String> {
    CHAIN.iter().find_map(|strategy| strategy.apply(payload))
}

/// Extract a canonical text string from a stored payload.
///
/// Falls back to JSON-serializing the whole payload when no known key
/// yields text (lossy but deterministic). `Null` yields an empty string.
pub fn extract_text(payload: &Value) -> String {
    if payload.is_null() {
        return String::new();
    }

    // A direct string payload is already the answer; an empty one stays
    // empty rather than serializing to `""`.
    if let Some(text) = payload.as_str() {
        return text.trim().to_string();
    }

    if let Some(text) = run_chain(payload) {
        return text;
    }

    // Nothing worth serializing in an empty container.
    if payload.as_object().is_some_and(|m| m.is_empty())
        || payload.as_array().is_some_and(|a| a.is_empty())
    {
        return String::new();
    }

    // Lossy fallback; reporting still needs something to scan.
    serde_json::to_string(payload).unwrap_or_default()
}

/// Extract text strictly: payloads with no recognizable text yield an empty
/// string for the caller to filter out.
pub fn extract_text_strict(payload: &Value) -> String {
    run_chain(payload).unwrap_or_default()
}

/// Parse a stored payload column into a value.
///
/// Payloads written by older clients may be raw text rather than JSON;
/// those become string values rather than parse errors.
pub fn parse_payload(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// One exchange of recent conversation history, oldest-to-newest once
/// assembled by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RecentAnswer {
    /// Manual question ID, when the exchange answered a merchant question.
    pub question_id: Option<i64>,
    /// Exchange type: "manual" or "ai".
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// The question that was asked.
    pub question: Option<String>,
    /// The respondent's answer.
    pub answer: Option<String>,
}

impl RecentAnswer {
    /// Project a stored payload into a history entry.
    ///
    /// Returns `None` when the payload carries neither a question nor an
    /// answer; such rows contribute nothing to prompt history.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let text_at = |key: &str| {
            payload
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let question = text_at("question").or_else(|| text_at("prompt"));
        let answer = text_at("answer")
            .or_else(|| text_at("user_input"))
            .or_else(|| text_at("reply"));

        if question.is_none() && answer.is_none() {
            return None;
        }

        let question_id = payload.get("question_id").and_then(Value::as_i64);
        let kind = text_at("type");

        Some(Self {
            question_id,
            kind,
            question,
            answer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_string_payload() {
        assert_eq!(extract_text(&json!("  nota 9  ")), "nota 9");
    }

    #[test]
    fn test_key_priority_order() {
        let payload = json!({
            "reply": "terceiro",
            "answer": "primeiro",
            "user_input": "segundo"
        });
        assert_eq!(extract_text(&payload), "primeiro");

        let payload = json!({ "reply": "terceiro", "user_input": "segundo" });
        assert_eq!(extract_text(&payload), "segundo");
    }

    #[test]
    fn test_empty_inputs_never_throw() {
        assert_eq!(extract_text(&Value::Null), "");
        assert_eq!(extract_text(&json!("")), "");
        assert_eq!(extract_text(&json!({})), "");
        assert_eq!(extract_text_strict(&Value::Null), "");
        assert_eq!(extract_text_strict(&json!({})), "");
        assert_eq!(extract_text_strict(&json!("")), "");
    }

    #[test]
    fn test_lenient_falls_back_to_serialization() {
        let payload = json!({ "rating": 7 });
        assert_eq!(extract_text(&payload), r#"{"rating":7}"#);
        assert_eq!(extract_text_strict(&payload), "");
    }

    #[test]
    fn test_whitespace_only_values_are_skipped() {
        let payload = json!({ "answer": "   ", "reply": "útil" });
        assert_eq!(extract_text(&payload), "útil");
    }

    #[test]
    fn test_parse_payload_tolerates_raw_text() {
        assert_eq!(parse_payload(r#"{"answer":"sim"}"#), json!({"answer": "sim"}));
        assert_eq!(parse_payload("texto solto"), json!("texto solto"));
    }

    #[test]
    fn test_recent_answer_projection() {
        let payload = json!({
            "type": "manual",
            "question_id": 3,
            "question": "Gostou?",
            "answer": "Sim"
        });
        let entry = RecentAnswer::from_payload(&payload).unwrap();
        assert_eq!(entry.question_id, Some(3));
        assert_eq!(entry.kind.as_deref(), Some("manual"));
        assert_eq!(entry.answer.as_deref(), Some("Sim"));

        // prompt and user_input are accepted aliases
        let payload = json!({ "prompt": "Como foi?", "user_input": "Bom" });
        let entry = RecentAnswer::from_payload(&payload).unwrap();
        assert_eq!(entry.question.as_deref(), Some("Como foi?"));
        assert_eq!(entry.answer.as_deref(), Some("Bom"));

        assert!(RecentAnswer::from_payload(&json!({ "ai_mode": "gpt" })).is_none());
    }
}
