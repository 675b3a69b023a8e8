//! Batch sentiment classification.
//!
//! All of a form's answers go into one prompt; the model must answer with a
//! JSON array positionally aligned to the input order. That positional
//! contract is load-bearing: element *i* of the reply scores entry *i*, with
//! no reordering, and a short array simply scores the tail as missing.
//! Non-array output is a hard failure with no partial recovery.

use provider_core::Provider;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{EngineError, Result};

/// A sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positivo,
    #[default]
    Neutro,
    Negativo,
}

impl Sentiment {
    /// The stored label string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positivo => "positivo",
            Self::Neutro => "neutro",
            Self::Negativo => "negativo",
        }
    }

    /// Normalize a model-produced label.
    ///
    /// Exact matches win; otherwise "pos"/"neg" substrings catch partial or
    /// garbled labels; everything else defaults to neutral.
    pub fn normalize(value: Option<&str>) -> Self {
        let Some(value) = value else {
            return Self::Neutro;
        };

        let lowered = value.trim().to_lowercase();
        match lowered.as_str() {
            "positivo" => Self::Positivo,
            "neutro" => Self::Neutro,
            "negativo" => Self::Negativo,
            _ if lowered.contains("pos") => Self::Positivo,
            _ if lowered.contains("neg") => Self::Negativo,
            _ => Self::Neutro,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One answer queued for classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentEntry {
    /// The response this text came from.
    pub id: i64,
    /// Normalized answer text.
    pub text: String,
}

/// One classification result, aligned to its input entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// The classified response.
    pub response_id: i64,
    /// Normalized label.
    pub sentiment: Sentiment,
    /// Confidence, coerced to a finite number (0 on garbage).
    pub confidence: f64,
}

/// Build the batch classification prompt.
pub fn build_sentiment_prompt(entries: &[SentimentEntry]) -> String {
    let listing: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| format!("{}. {}", index + 1, entry.text))
        .collect();

    format!(
        "Classifica o sentimento de cada resposta (positivo, neutro ou negativo).\n\
         Retorna JSON no formato:\n\
         [{{\"sentiment\":\"positivo\",\"confidence\":0.9}}, ...]\n\
         A posição de cada elemento deve corresponder à posição da resposta.\n\
         Respostas:\n{}",
        listing.join("\n")
    )
}

fn coerce_confidence(element: &Value) -> f64 {
    element
        .get("confidence")
        .or_else(|| element.get("score"))
        .and_then(|v| {
            v.as_f64()
                .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        })
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Parse a raw model reply against the input entries.
///
/// The reply must be a JSON array; element `i` scores entry `i`. A shorter
/// array scores the remaining entries as `{}` (neutral, confidence 0).
pub fn parse_sentiment_response(raw: &str, entries: &[SentimentEntry]) -> Result<Vec<SentimentScore>> {
    let parsed: Value = serde_json::from_str(raw.trim())
        .map_err(|e| EngineError::Parse(format!("sentiment response is not valid JSON: {e}")))?;

    let elements = parsed
        .as_array()
        .ok_or_else(|| EngineError::Parse("sentiment response must be a JSON array".to_string()))?;

    let empty = Value::Object(Default::default());
    let scores = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let element = elements.get(index).unwrap_or(&empty);
            SentimentScore {
                response_id: entry.id,
                sentiment: Sentiment::normalize(
                    element.get("sentiment").and_then(Value::as_str),
                ),
                confidence: coerce_confidence(element),
            }
        })
        .collect();

    Ok(scores)
}

/// Classify a batch of entries with one provider call.
///
/// Callers handle the empty-input case (it is a valid "nothing to analyze"
/// path, not an error) and persistence of the result set.
pub async fn classify_entries(
    provider: &dyn Provider,
    entries: &[SentimentEntry],
) -> Result<Vec<SentimentScore>> {
    let prompt = build_sentiment_prompt(entries);
    let raw = provider.generate(&prompt).await?;

    parse_sentiment_response(&raw, entries).inspect_err(|_| {
        warn!(
            provider = provider.name(),
            head = raw.chars().take(120).collect::<String>().as_str(),
            "sentiment response did not parse"
        );
    })
}

/// Resolve which label string to persist for a score.
pub fn persistable(scores: &[SentimentScore]) -> Vec<(i64, String, f64)> {
    scores
        .iter()
        .map(|s| (s.response_id, s.sentiment.as_str().to_string(), s.confidence))
        .collect()
}
