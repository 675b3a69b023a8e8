//! Insight generation over a batch of answers.
//!
//! One prompt frames the model as a satisfaction analyst and demands a
//! strict four-key JSON object. Models routinely wrap the object in
//! markdown fences or add commentary anyway, so parsing strips fences,
//! slices the outermost braces, and coerces each field defensively. A
//! provider failure and an unparseable reply are distinct errors: the first
//! is infrastructure, the second is prompt/format drift.

use provider_core::{AiMode, Provider};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{EngineError, Result};

/// A structured insight report over a form's answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightReport {
    /// Short narrative summary.
    pub summary: String,
    /// Top positive themes.
    pub top_positives: Vec<String>,
    /// Top negative themes.
    pub top_negatives: Vec<String>,
    /// Suggested follow-up actions.
    pub suggested_actions: Vec<String>,
    /// The mode that produced this report.
    pub ai_mode: AiMode,
}

/// Build the analyst prompt over the given answers (most recent first).
pub fn build_insight_prompt(answers: &[String]) -> String {
    let header = "És um analista de satisfação do cliente.";

    let entries: Vec<String> = answers
        .iter()
        .map(|text| text.trim())
        .filter(|text| !text.is_empty())
        .enumerate()
        .map(|(index, text)| format!("Resposta {}: {}", index + 1, text))
        .collect();

    let responses_section = if entries.is_empty() {
        "Sem respostas disponíveis.".to_string()
    } else {
        format!(
            "Respostas recentes (mais recentes primeiro):\n{}",
            entries.join("\n")
        )
    };

    let instruction = "Produz um objeto JSON com as chaves summary, top_positives, \
                       top_negatives e suggested_actions. Escreve em PT-PT, de forma \
                       direta e sem rodeios.";

    let format = "O JSON deve seguir o formato: {\"summary\": string, \
                  \"top_positives\": string[], \"top_negatives\": string[], \
                  \"suggested_actions\": string[]}. Sem texto adicional.";

    [header, &responses_section, instruction, format].join("\n\n")
}

/// Strip markdown fences and slice the outermost JSON object from a raw
/// model reply. Tolerates leading/trailing commentary.
pub fn clean_json_block(raw: &str) -> String {
    let mut output = raw.trim();

    for prefix in ["```json", "```JSON", "```"] {
        if let Some(rest) = output.strip_prefix(prefix) {
            output = rest.trim_start();
            break;
        }
    }
    if let Some(rest) = output.strip_suffix("```") {
        output = rest.trim_end();
    }

    if let (Some(first), Some(last)) = (output.find('{'), output.rfind('}')) {
        if last > first {
            output = &output[first..=last];
        }
    }

    output.trim().to_string()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Parse a raw model reply into report fields.
///
/// Missing or mistyped fields coerce to empty values; a reply that does not
/// contain a JSON object at all is a parse failure.
pub fn parse_insight_response(raw: &str, ai_mode: AiMode) -> Result<InsightReport> {
    let cleaned = clean_json_block(raw);
    if cleaned.is_empty() {
        return Err(EngineError::Parse("empty insight response".to_string()));
    }

    let parsed: Value = serde_json::from_str(&cleaned)
        .map_err(|e| EngineError::Parse(format!("invalid insight JSON: {e}")))?;

    if !parsed.is_object() {
        return Err(EngineError::Parse(
            "insight response is not a JSON object".to_string(),
        ));
    }

    let summary = parsed
        .get("summary")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string();

    Ok(InsightReport {
        summary,
        top_positives: string_list(parsed.get("top_positives")),
        top_negatives: string_list(parsed.get("top_negatives")),
        suggested_actions: string_list(parsed.get("suggested_actions")),
        ai_mode,
    })
}

/// Generate an insight report from a batch of answer texts.
///
/// `answers` must be non-empty and ordered most recent first.
pub async fn generate_insight(
    provider: &dyn Provider,
    ai_mode: AiMode,
    answers: &[String],
) -> Result<InsightReport> {
    let texts: Vec<String> = answers
        .iter()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .collect();

    if texts.is_empty() {
        return Err(EngineError::NoData);
    }

    let prompt = build_insight_prompt(&texts);
    let raw = provider.generate(&prompt).await?;

    parse_insight_response(&raw, ai_mode).inspect_err(|_| {
        // Format drift, not infrastructure: log the head of the reply
        warn!(
            provider = provider.name(),
            head = raw.chars().take(120).collect::<String>().as_str(),
            "insight response did not parse"
        );
    })
}
