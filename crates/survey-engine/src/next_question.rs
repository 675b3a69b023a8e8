//! Next-question decision logic.
//!
//! The decision is a pure function of the form, the owner's AI
//! configuration, the pending manual-question list, and the recent
//! conversation history. Manual questions are exhausted in non-decreasing
//! sort order before any AI question is offered; only when none remain does
//! the decision carry a generation prompt for the caller to execute.

use database::models::{AiConfig, Form, MerchantQuestion};
use provider_core::AiMode;
use serde::Serialize;

use crate::ai_config;
use crate::extract::RecentAnswer;

/// How many history turns feed prompt construction and the session-scoped
/// manual-question exclusion.
pub const HISTORY_WINDOW: usize = 5;

/// The next step for a survey conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NextQuestion {
    /// Serve a merchant-authored question verbatim. No AI call needed.
    Manual {
        question: String,
        ai_mode: AiMode,
        question_id: i64,
        is_required: bool,
    },
    /// Generate the next question: the caller invokes the resolved provider
    /// with `prompt` and handles failure itself.
    Ai {
        prompt: String,
        ai_mode: AiMode,
        tone: String,
        style: String,
        goal: String,
    },
}

impl NextQuestion {
    /// The resolved AI mode attached to this decision.
    pub fn ai_mode(&self) -> AiMode {
        match self {
            Self::Manual { ai_mode, .. } | Self::Ai { ai_mode, .. } => *ai_mode,
        }
    }
}

/// Resolve the effective AI mode: form-level override, else the owner's
/// configuration, else the process-wide default. Unrecognized values
/// normalize to the local-model default.
pub fn resolve_mode(form: &Form, config: Option<&AiConfig>, default_mode: AiMode) -> AiMode {
    let raw = if !form.ai_mode.trim().is_empty() {
        form.ai_mode.as_str()
    } else if let Some(config) = config {
        config.ai_mode.as_str()
    } else {
        return default_mode;
    };

    AiMode::parse_lenient(raw)
}

/// Manual-question IDs already answered within the recency window.
///
/// This is a soft, session-scoped exclusion over the last
/// [`HISTORY_WINDOW`] exchanges; the durable asked ledger is consulted
/// separately when the pending list is built.
pub fn answered_manual_ids(recent: &[RecentAnswer]) -> Vec<i64> {
    recent
        .iter()
        .rev()
        .take(HISTORY_WINDOW)
        .filter(|entry| entry.kind.as_deref() == Some("manual"))
        .filter_map(|entry| entry.question_id)
        .collect()
}

/// Decide the next question for a conversation.
///
/// `pending` must already reflect the durable asked ledger (active
/// questions with no ledger row, ordered by sort_order then id); the
/// session-scoped exclusion from `recent` is applied on top here.
pub fn decide_next(
    form: &Form,
    config: Option<&AiConfig>,
    pending: &[MerchantQuestion],
    recent: &[RecentAnswer],
    default_mode: AiMode,
) -> NextQuestion {
    let ai_mode = resolve_mode(form, config, default_mode);
    let excluded = answered_manual_ids(recent);

    if let Some(manual) = pending.iter().find(|q| !excluded.contains(&q.id)) {
        return NextQuestion::Manual {
            question: manual.question.clone(),
            ai_mode,
            question_id: manual.id,
            is_required: manual.is_required,
        };
    }

    let tone = config
        .map(|c| c.tone.clone())
        .unwrap_or_else(|| ai_config::DEFAULT_TONE.to_string());
    let style = config
        .map(|c| c.style.clone())
        .unwrap_or_else(|| ai_config::DEFAULT_STYLE.to_string());
    let goal = config
        .map(|c| c.goal.clone())
        .unwrap_or_else(|| ai_config::DEFAULT_GOAL.to_string());

    let prompt = build_prompt(&tone, &style, &goal, recent);

    NextQuestion::Ai {
        prompt,
        ai_mode,
        tone,
        style,
        goal,
    }
}

/// Build the generation prompt from the configured tone, style, goal, and
/// the last up-to-five history turns.
pub fn build_prompt(tone: &str, style: &str, goal: &str, recent: &[RecentAnswer]) -> String {
    let intro = format!(
        "Você é uma IA que conduz um inquérito de satisfação com tom {tone}, \
         estilo {style} e objetivo focado em {goal}."
    );

    let window_start = recent.len().saturating_sub(HISTORY_WINDOW);
    let lines: Vec<String> = recent[window_start..]
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let question = entry
                .question
                .as_deref()
                .map(|q| format!("Pergunta {}: {}", index + 1, q));
            let answer = entry.answer.as_deref().map(|a| format!("Resposta: {}", a));

            let parts: Vec<String> = [question, answer].into_iter().flatten().collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(" "))
            }
        })
        .collect();

    let instruction = "Gere APENAS a próxima pergunta objetiva para continuar um \
                       inquérito de satisfação. Sem explicações.";

    let mut sections = vec![intro];
    if !lines.is_empty() {
        sections.push(format!("Histórico recente:\n{}", lines.join("\n")));
    }
    sections.push(instruction.to_string());

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(ai_mode: &str) -> Form {
        Form {
            id: 1,
            user_id: 7,
            title: "Loja".to_string(),
            description: String::new(),
            ai_mode: ai_mode.to_string(),
            created_at: "2026-08-01 10:00:00".to_string(),
        }
    }

    fn config(ai_mode: &str) -> AiConfig {
        AiConfig {
            id: 1,
            user_id: 7,
            tone: "formal".to_string(),
            style: "detalhada".to_string(),
            goal: "retenção".to_string(),
            ai_mode: ai_mode.to_string(),
            created_at: "2026-08-01 10:00:00".to_string(),
        }
    }

    fn question(id: i64, sort_order: i64) -> MerchantQuestion {
        MerchantQuestion {
            id,
            form_id: 1,
            user_id: 7,
            question: format!("Pergunta {id}?"),
            sort_order,
            is_required: false,
            is_active: true,
            created_at: "2026-08-01 10:00:00".to_string(),
        }
    }

    fn manual_answer(question_id: i64) -> RecentAnswer {
        RecentAnswer {
            question_id: Some(question_id),
            kind: Some("manual".to_string()),
            question: Some("Pergunta?".to_string()),
            answer: Some("Resposta".to_string()),
        }
    }

    #[test]
    fn test_mode_resolution_chain() {
        assert_eq!(
            resolve_mode(&form("gpt"), Some(&config("llama")), AiMode::Llama),
            AiMode::Gpt
        );
        assert_eq!(
            resolve_mode(&form(""), Some(&config("gpt")), AiMode::Llama),
            AiMode::Gpt
        );
        assert_eq!(resolve_mode(&form(""), None, AiMode::Gpt), AiMode::Gpt);
        // Unrecognized values normalize to the local default
        assert_eq!(
            resolve_mode(&form("banana"), Some(&config("gpt")), AiMode::Llama),
            AiMode::Llama
        );
    }

    #[test]
    fn test_manual_served_before_ai() {
        let pending = vec![question(10, 1), question(11, 2)];
        let decision = decide_next(&form("llama"), None, &pending, &[], AiMode::Llama);

        match decision {
            NextQuestion::Manual { question_id, .. } => assert_eq!(question_id, 10),
            other => panic!("expected manual question, got {other:?}"),
        }
    }

    #[test]
    fn test_recency_exclusion_skips_answered_manual() {
        let pending = vec![question(10, 1), question(11, 2)];
        let recent = vec![manual_answer(10)];
        let decision = decide_next(&form("llama"), None, &pending, &recent, AiMode::Llama);

        match decision {
            NextQuestion::Manual { question_id, .. } => assert_eq!(question_id, 11),
            other => panic!("expected manual question, got {other:?}"),
        }
    }

    #[test]
    fn test_ai_decision_when_exhausted() {
        let recent = vec![manual_answer(10)];
        let decision = decide_next(
            &form("gpt"),
            Some(&config("llama")),
            &[],
            &recent,
            AiMode::Llama,
        );

        match decision {
            NextQuestion::Ai {
                prompt,
                ai_mode,
                tone,
                ..
            } => {
                assert_eq!(ai_mode, AiMode::Gpt);
                assert_eq!(tone, "formal");
                assert!(prompt.contains("tom formal"));
                assert!(prompt.contains("Histórico recente:"));
                assert!(prompt.contains("Pergunta 1: Pergunta?"));
                assert!(prompt.contains("Gere APENAS a próxima pergunta"));
            }
            other => panic!("expected ai decision, got {other:?}"),
        }
    }

    #[test]
    fn test_prompt_windows_history_to_five_turns() {
        let recent: Vec<RecentAnswer> = (1..=8).map(manual_answer).collect();
        let prompt = build_prompt("simpático", "curta", "satisfação geral", &recent);

        assert_eq!(prompt.matches("Resposta:").count(), HISTORY_WINDOW);
    }

    #[test]
    fn test_prompt_without_history_omits_section() {
        let prompt = build_prompt("simpático", "curta", "satisfação geral", &[]);
        assert!(!prompt.contains("Histórico recente"));
    }
}
