//! The survey engine: orchestration, persistence, and provider wiring.
//!
//! [`SurveyEngine`] owns the database handle and one provider per AI mode.
//! Respondent-path methods never surface provider failures: a failed or
//! slow generation becomes the canned fallback question. Merchant-path
//! methods (insight, sentiment, reports) surface them, so callers can tell
//! "no data" apart from "AI unavailable".

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use database::{ai_config as stored_config, asked, form, question, response, sentiment as stored_sentiment, user};
use database::models::{Form, MerchantQuestion, SentimentRow, StoredResponse};
use database::Database;
use llama_provider::LlamaProvider;
use openai_provider::OpenAiProvider;
use provider_core::{async_trait, generate_with_timeout, AiMode, Provider, ProviderError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::ai_config::{AiConfigInput, AiConfigView};
use crate::error::{EngineError, Result};
use crate::extract::{extract_text, extract_text_strict, parse_payload, RecentAnswer};
use crate::insight::{self, InsightReport};
use crate::next_question::{decide_next, resolve_mode, NextQuestion, HISTORY_WINDOW};
use crate::questions::{QuestionInput, QuestionPatch};
use crate::reports::{
    compute_nps, fold_totals, fold_trend, preview_text, NpsSummary, Overview, ResponsePreview,
    SentimentTotals, TrendPoint,
};
use crate::sentiment::{self, SentimentEntry, SentimentScore};

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Mode used when neither the form nor the owner config names one.
    pub default_mode: AiMode,
    /// Budget for respondent-facing question generation.
    pub question_timeout: Duration,
    /// Budget for merchant-triggered batch calls (insight, sentiment).
    pub batch_timeout: Duration,
    /// Question served when generation fails on the respondent path.
    pub fallback_question: String,
    /// Default number of answers fed to insight generation.
    pub insight_limit: i64,
    /// Hard cap on the insight answer window.
    pub insight_limit_max: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_mode: AiMode::Llama,
            question_timeout: Duration::from_secs(5),
            batch_timeout: Duration::from_secs(60),
            fallback_question: "Numa escala de 0 a 10, como avalia a sua experiência?".to_string(),
            insight_limit: 200,
            insight_limit_max: 500,
        }
    }
}

impl EngineConfig {
    /// Load tuning overrides from the environment:
    /// `AI_MODE`, `AI_QUESTION_TIMEOUT_SECS`, `AI_BATCH_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(mode) = std::env::var("AI_MODE") {
            config.default_mode = AiMode::parse_lenient(&mode);
        }
        if let Some(secs) = env_secs("AI_QUESTION_TIMEOUT_SECS") {
            config.question_timeout = secs;
        }
        if let Some(secs) = env_secs("AI_BATCH_TIMEOUT_SECS") {
            config.batch_timeout = secs;
        }

        config
    }

    /// Override the default AI mode.
    pub fn with_default_mode(mut self, mode: AiMode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Override the respondent-path generation budget.
    pub fn with_question_timeout(mut self, budget: Duration) -> Self {
        self.question_timeout = budget;
        self
    }
}

fn env_secs(key: &str) -> Option<Duration> {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .map(Duration::from_secs)
}

/// A served survey turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextTurn {
    /// "manual" or "ai". Stays "ai" even when the fallback question is
    /// served in place of a failed generation.
    #[serde(rename = "type")]
    pub kind: String,
    /// The question text to show the respondent.
    pub question: String,
    /// Resolved AI mode for this conversation.
    pub ai_mode: AiMode,
    /// Manual question ID, when `kind` is "manual".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_id: Option<i64>,
    /// Whether the respondent must answer (manual questions only).
    pub is_required: bool,
    /// True when generation failed and the canned question was substituted.
    pub fallback: bool,
}

/// A respondent answer being submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSubmission {
    /// "manual" or "ai".
    #[serde(rename = "type")]
    pub kind: String,
    /// The question that was asked.
    pub question: String,
    /// Manual question ID, when answering a merchant question.
    #[serde(default)]
    pub question_id: Option<i64>,
    /// The respondent's answer text.
    pub answer: String,
    /// The mode that produced the question, when known.
    #[serde(default)]
    pub ai_mode: Option<String>,
    /// Raw AI exchange transcript, stored verbatim for audit.
    #[serde(default)]
    pub ai_context: Option<String>,
}

/// Canonical scan text for NPS: the payload re-serialized in submission
/// field order, so the last rating token comes from the answer, or from the
/// question text when the answer carries no number. Legacy non-submission
/// payloads are scanned as stored.
fn nps_scan_text(raw: &str) -> String {
    match serde_json::from_str::<AnswerSubmission>(raw) {
        Ok(submission) => serde_json::to_string(&submission).unwrap_or_else(|_| raw.to_string()),
        Err(_) => raw.to_string(),
    }
}

/// Delegates to an inner provider under a fixed budget. Used for the
/// merchant-triggered batch calls, which run longer than respondent turns.
struct BoundedProvider {
    inner: Arc<dyn Provider>,
    budget: Duration,
}

#[async_trait]
impl Provider for BoundedProvider {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, ProviderError> {
        generate_with_timeout(self.inner.as_ref(), prompt, self.budget).await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// The orchestration core.
pub struct SurveyEngine {
    db: Database,
    llama: Arc<dyn Provider>,
    gpt: Arc<dyn Provider>,
    config: EngineConfig,
    // One lock per form so concurrent sentiment runs serialize instead of
    // interleaving their delete+insert cycles.
    sentiment_locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl SurveyEngine {
    /// Build an engine with explicit providers.
    pub fn new(
        db: Database,
        llama: Arc<dyn Provider>,
        gpt: Arc<dyn Provider>,
        config: EngineConfig,
    ) -> Self {
        Self {
            db,
            llama,
            gpt,
            config,
            sentiment_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Build an engine with both real providers configured from the
    /// environment.
    pub fn from_env(db: Database) -> Result<Self> {
        let llama = Arc::new(LlamaProvider::from_env());
        let gpt = Arc::new(OpenAiProvider::from_env()?);
        Ok(Self::new(db, llama, gpt, EngineConfig::from_env()))
    }

    /// The underlying database handle.
    pub fn db(&self) -> &Database {
        &self.db
    }

    fn provider_for(&self, mode: AiMode) -> Arc<dyn Provider> {
        match mode {
            AiMode::Llama => Arc::clone(&self.llama),
            AiMode::Gpt => Arc::clone(&self.gpt),
        }
    }

    fn bounded(&self, mode: AiMode) -> BoundedProvider {
        BoundedProvider {
            inner: self.provider_for(mode),
            budget: self.config.batch_timeout,
        }
    }

    /// Fetch a form and verify the actor owns it.
    async fn owned_form(&self, user_id: i64, form_id: i64) -> Result<Form> {
        let form = form::get_form(self.db.pool(), form_id).await?;
        if form.user_id != user_id {
            return Err(EngineError::Forbidden);
        }
        Ok(form)
    }

    /// Last [`HISTORY_WINDOW`] exchanges, oldest first.
    async fn recent_history(&self, form_id: i64) -> Result<Vec<RecentAnswer>> {
        let rows = response::list_recent(self.db.pool(), form_id, HISTORY_WINDOW as i64).await?;

        let mut history: Vec<RecentAnswer> = rows
            .iter()
            .filter_map(|row| RecentAnswer::from_payload(&parse_payload(&row.payload)))
            .collect();
        history.reverse();

        Ok(history)
    }

    // ----- respondent path -----

    /// Decide the next question without serving it. No ledger write.
    pub async fn decide_next_question(&self, form_id: i64) -> Result<NextQuestion> {
        let form = form::get_form(self.db.pool(), form_id).await?;
        let config = stored_config::get_config(self.db.pool(), form.user_id).await?;
        let pending = question::list_pending(self.db.pool(), form_id).await?;
        let recent = self.recent_history(form_id).await?;

        Ok(decide_next(
            &form,
            config.as_ref(),
            &pending,
            &recent,
            self.config.default_mode,
        ))
    }

    /// Serve the next question.
    ///
    /// A served manual question is recorded in the asked ledger so it never
    /// comes back. A failed or slow AI generation yields the configured
    /// fallback question with `type` still "ai".
    pub async fn next_question(&self, form_id: i64) -> Result<NextTurn> {
        match self.decide_next_question(form_id).await? {
            NextQuestion::Manual {
                question,
                ai_mode,
                question_id,
                is_required,
            } => {
                asked::mark_asked(self.db.pool(), form_id, question_id, None).await?;
                debug!(form_id, question_id, "serving manual question");

                Ok(NextTurn {
                    kind: "manual".to_string(),
                    question,
                    ai_mode,
                    question_id: Some(question_id),
                    is_required,
                    fallback: false,
                })
            }
            NextQuestion::Ai { prompt, ai_mode, .. } => {
                let provider = self.provider_for(ai_mode);
                let generated = generate_with_timeout(
                    provider.as_ref(),
                    &prompt,
                    self.config.question_timeout,
                )
                .await;

                let (question, fallback) = match generated {
                    Ok(text) if !text.trim().is_empty() => (text.trim().to_string(), false),
                    Ok(_) => (self.config.fallback_question.clone(), true),
                    Err(err) => {
                        warn!(form_id, error = %err, "question generation failed, serving fallback");
                        (self.config.fallback_question.clone(), true)
                    }
                };

                Ok(NextTurn {
                    kind: "ai".to_string(),
                    question,
                    ai_mode,
                    question_id: None,
                    is_required: false,
                    fallback,
                })
            }
        }
    }

    /// Store a respondent answer.
    pub async fn submit_answer(
        &self,
        form_id: i64,
        submission: AnswerSubmission,
    ) -> Result<StoredResponse> {
        form::get_form(self.db.pool(), form_id).await?;

        if submission.answer.trim().is_empty() {
            return Err(EngineError::Validation("answer must not be empty".to_string()));
        }

        if let Some(question_id) = submission.question_id {
            let asked = question::get_question(self.db.pool(), question_id).await?;
            if asked.form_id != form_id {
                return Err(EngineError::Validation(
                    "question does not belong to this form".to_string(),
                ));
            }
        }

        let payload = json!({
            "type": submission.kind,
            "question": submission.question.trim(),
            "question_id": submission.question_id,
            "answer": submission.answer.trim(),
            "ai_mode": submission.ai_mode,
        })
        .to_string();

        let stored = response::save_response(
            self.db.pool(),
            form_id,
            &payload,
            submission.ai_context.as_deref(),
        )
        .await?;

        debug!(form_id, response_id = stored.id, "stored answer");
        Ok(stored)
    }

    // ----- merchant path: analysis -----

    /// Generate an insight report over a form's answers.
    ///
    /// `limit` caps how many of the most recent answers feed the prompt;
    /// absent it defaults to the configured window.
    pub async fn generate_insight(
        &self,
        user_id: i64,
        form_id: i64,
        limit: Option<i64>,
    ) -> Result<InsightReport> {
        let form = self.owned_form(user_id, form_id).await?;
        let config = stored_config::get_config(self.db.pool(), user_id).await?;
        let mode = resolve_mode(&form, config.as_ref(), self.config.default_mode);

        let limit = limit
            .unwrap_or(self.config.insight_limit)
            .clamp(1, self.config.insight_limit_max);
        let rows = response::list_recent(self.db.pool(), form_id, limit).await?;
        let answers: Vec<String> = rows
            .iter()
            .map(|row| extract_text_strict(&parse_payload(&row.payload)))
            .filter(|text| !text.is_empty())
            .collect();

        let report = insight::generate_insight(&self.bounded(mode), mode, &answers).await?;
        info!(form_id, mode = mode.as_str(), "insight generated");
        Ok(report)
    }

    /// Classify every answer of a form and atomically replace the stored
    /// result set.
    ///
    /// Runs under a per-form lock; a concurrent second run waits and then
    /// fully supersedes the first. An empty form clears the stored set and
    /// returns no scores.
    pub async fn analyze_sentiment(
        &self,
        user_id: i64,
        form_id: i64,
    ) -> Result<Vec<SentimentScore>> {
        let form = self.owned_form(user_id, form_id).await?;
        let config = stored_config::get_config(self.db.pool(), user_id).await?;
        let mode = resolve_mode(&form, config.as_ref(), self.config.default_mode);

        let lock = self.form_lock(form_id).await;
        let _guard = lock.lock().await;

        let rows = response::list_by_form(self.db.pool(), form_id).await?;
        let entries: Vec<SentimentEntry> = rows
            .iter()
            .filter_map(|row| {
                // Strict extraction: payloads with no text-bearing key carry
                // nothing worth classifying.
                let text = extract_text_strict(&parse_payload(&row.payload));
                (!text.is_empty()).then(|| SentimentEntry { id: row.id, text })
            })
            .collect();

        if entries.is_empty() {
            stored_sentiment::replace_form_sentiments(self.db.pool(), form_id, &[]).await?;
            info!(form_id, "no answers to classify, cleared stored sentiments");
            return Ok(Vec::new());
        }

        let scores = sentiment::classify_entries(&self.bounded(mode), &entries).await?;
        stored_sentiment::replace_form_sentiments(
            self.db.pool(),
            form_id,
            &sentiment::persistable(&scores),
        )
        .await?;

        info!(form_id, count = scores.len(), "sentiment analysis stored");
        Ok(scores)
    }

    async fn form_lock(&self, form_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.sentiment_locks.lock().await;
        Arc::clone(locks.entry(form_id).or_default())
    }

    #[cfg(test)]
    async fn form_lock_count(&self) -> usize {
        self.sentiment_locks.lock().await.len()
    }

    /// Stored per-response sentiment rows for a form.
    pub async fn list_sentiments(&self, user_id: i64, form_id: i64) -> Result<Vec<SentimentRow>> {
        self.owned_form(user_id, form_id).await?;
        Ok(stored_sentiment::list_by_form(self.db.pool(), form_id).await?)
    }

    // ----- merchant path: reports -----

    /// Daily sentiment counts, date-ordered.
    pub async fn sentiment_trend(&self, user_id: i64, form_id: i64) -> Result<Vec<TrendPoint>> {
        self.owned_form(user_id, form_id).await?;
        let rows = stored_sentiment::trend_rows(self.db.pool(), form_id).await?;
        Ok(fold_trend(&rows))
    }

    /// Overall per-label sentiment counts.
    pub async fn sentiment_totals(&self, user_id: i64, form_id: i64) -> Result<SentimentTotals> {
        self.owned_form(user_id, form_id).await?;
        let rows = stored_sentiment::total_rows(self.db.pool(), form_id).await?;
        Ok(fold_totals(&rows))
    }

    /// NPS over every response of a form, scanning question and answer text
    /// alike. `None` until any response carries a rating.
    pub async fn nps(&self, user_id: i64, form_id: i64) -> Result<Option<NpsSummary>> {
        self.owned_form(user_id, form_id).await?;
        let rows = response::list_by_form(self.db.pool(), form_id).await?;
        let texts: Vec<String> = rows.iter().map(|row| nps_scan_text(&row.payload)).collect();

        Ok(compute_nps(texts.iter().map(String::as_str)))
    }

    /// The dashboard snapshot: response counts, NPS, sentiment totals, and
    /// the five most recent answer previews.
    pub async fn overview(&self, user_id: i64, form_id: i64) -> Result<Overview> {
        self.owned_form(user_id, form_id).await?;
        let pool = self.db.pool();

        let total_responses = response::count_by_form(pool, form_id).await?;
        let last_7_days = response::count_since_days(pool, form_id, 7).await?;
        let last_30_days = response::count_since_days(pool, form_id, 30).await?;
        let sentiment = fold_totals(&stored_sentiment::total_rows(pool, form_id).await?);

        let all = response::list_by_form(pool, form_id).await?;
        let texts: Vec<String> = all.iter().map(|row| nps_scan_text(&row.payload)).collect();
        let nps = compute_nps(texts.iter().map(String::as_str));

        let recent = response::list_recent(pool, form_id, 5)
            .await?
            .iter()
            .map(|row| {
                let payload = parse_payload(&row.payload);
                let entry = RecentAnswer::from_payload(&payload).unwrap_or_default();
                ResponsePreview {
                    response_id: row.id,
                    question: preview_text(entry.question.as_deref().unwrap_or("")),
                    answer: preview_text(&extract_text(&payload)),
                    created_at: row.created_at.clone(),
                }
            })
            .collect();

        Ok(Overview {
            total_responses,
            last_7_days,
            last_30_days,
            nps,
            sentiment,
            recent,
        })
    }

    // ----- merchant path: configuration -----

    /// The owner's AI configuration, created with defaults on first read.
    pub async fn get_ai_config(&self, user_id: i64) -> Result<AiConfigView> {
        user::get_user(self.db.pool(), user_id).await?;
        let config = stored_config::ensure_config(self.db.pool(), user_id).await?;
        Ok(config.into())
    }

    /// Validate and persist an AI configuration update.
    pub async fn update_ai_config(
        &self,
        user_id: i64,
        input: AiConfigInput,
    ) -> Result<AiConfigView> {
        user::get_user(self.db.pool(), user_id).await?;
        let mode = input.validate()?;

        let stored = stored_config::upsert_config(
            self.db.pool(),
            user_id,
            &input.tone,
            &input.style,
            input.goal.trim(),
            mode.as_str(),
        )
        .await?;

        info!(user_id, mode = mode.as_str(), "AI configuration updated");
        Ok(stored.into())
    }

    // ----- merchant path: forms and questions -----

    /// Create a form. `ai_mode` of `None` inherits the owner configuration.
    pub async fn create_form(
        &self,
        user_id: i64,
        title: &str,
        description: &str,
        ai_mode: Option<&str>,
    ) -> Result<Form> {
        user::get_user(self.db.pool(), user_id).await?;

        let title = title.trim();
        if title.is_empty() {
            return Err(EngineError::Validation("title must not be empty".to_string()));
        }

        let mode = match ai_mode.map(str::trim).filter(|m| !m.is_empty()) {
            Some(raw) => AiMode::parse_strict(raw)
                .ok_or_else(|| {
                    EngineError::Validation("ai_mode must be \"llama\" or \"gpt\"".to_string())
                })?
                .as_str(),
            None => "",
        };

        let created = form::create_form(self.db.pool(), user_id, title, description, mode).await?;
        info!(form_id = created.id, user_id, "form created");
        Ok(created)
    }

    /// All forms owned by a user, newest first.
    pub async fn list_forms(&self, user_id: i64) -> Result<Vec<Form>> {
        Ok(form::list_forms_by_user(self.db.pool(), user_id).await?)
    }

    /// Change or clear a form's AI mode override. Empty input clears it.
    pub async fn update_form_mode(
        &self,
        user_id: i64,
        form_id: i64,
        ai_mode: &str,
    ) -> Result<()> {
        self.owned_form(user_id, form_id).await?;

        let mode = ai_mode.trim();
        if !mode.is_empty() && AiMode::parse_strict(mode).is_none() {
            return Err(EngineError::Validation(
                "ai_mode must be \"llama\" or \"gpt\"".to_string(),
            ));
        }

        Ok(form::update_ai_mode(self.db.pool(), form_id, mode).await?)
    }

    /// Delete a form and everything attached to it.
    pub async fn delete_form(&self, user_id: i64, form_id: i64) -> Result<()> {
        self.owned_form(user_id, form_id).await?;
        form::delete_form(self.db.pool(), form_id).await?;
        self.sentiment_locks.lock().await.remove(&form_id);
        info!(form_id, "form deleted");
        Ok(())
    }

    /// Add a merchant question to a form.
    pub async fn add_question(
        &self,
        user_id: i64,
        form_id: i64,
        input: &QuestionInput,
    ) -> Result<MerchantQuestion> {
        self.owned_form(user_id, form_id).await?;
        let text = input.validate()?;

        Ok(question::create_question(
            self.db.pool(),
            form_id,
            user_id,
            &text,
            input.sort_order,
            input.is_required,
            true,
        )
        .await?)
    }

    /// A form's merchant questions, ordered for presentation.
    pub async fn list_questions(
        &self,
        user_id: i64,
        form_id: i64,
        only_active: bool,
    ) -> Result<Vec<MerchantQuestion>> {
        self.owned_form(user_id, form_id).await?;
        Ok(question::list_by_form(self.db.pool(), form_id, only_active).await?)
    }

    /// Apply a partial update to a merchant question.
    pub async fn update_question(
        &self,
        user_id: i64,
        question_id: i64,
        patch: &QuestionPatch,
    ) -> Result<MerchantQuestion> {
        let existing = question::get_question(self.db.pool(), question_id).await?;
        if existing.user_id != user_id {
            return Err(EngineError::Forbidden);
        }

        let text = patch.validate()?;

        Ok(question::update_question(
            self.db.pool(),
            question_id,
            text.as_deref().unwrap_or(&existing.question),
            patch.sort_order.unwrap_or(existing.sort_order),
            patch.is_required.unwrap_or(existing.is_required),
            patch.is_active.unwrap_or(existing.is_active),
        )
        .await?)
    }

    /// Soft-delete a merchant question. Already-stored answers keep
    /// referencing it.
    pub async fn remove_question(&self, user_id: i64, question_id: i64) -> Result<()> {
        let existing = question::get_question(self.db.pool(), question_id).await?;
        if existing.user_id != user_id {
            return Err(EngineError::Forbidden);
        }

        Ok(question::deactivate_question(self.db.pool(), question_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mock_provider::{CannedProvider, DelayedProvider, FailingProvider};

    async fn engine_with(llama: Arc<dyn Provider>) -> (SurveyEngine, i64, i64) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();

        let owner = user::create_user(db.pool(), "Maria", "maria@example.com")
            .await
            .unwrap();
        let survey = form::create_form(db.pool(), owner.id, "Loja", "", "llama")
            .await
            .unwrap();

        let config = EngineConfig::default().with_question_timeout(Duration::from_millis(200));
        let gpt: Arc<dyn Provider> = Arc::new(CannedProvider::new("pergunta gpt"));
        let engine = SurveyEngine::new(db, llama, gpt, config);

        (engine, owner.id, survey.id)
    }

    #[tokio::test]
    async fn test_manual_questions_come_before_ai() {
        let llama: Arc<dyn Provider> = Arc::new(CannedProvider::new("Pergunta gerada?"));
        let (engine, user_id, form_id) = engine_with(llama).await;

        engine
            .add_question(
                user_id,
                form_id,
                &QuestionInput {
                    question_text: "Como foi o atendimento?".to_string(),
                    sort_order: 0,
                    is_required: true,
                },
            )
            .await
            .unwrap();

        let first = engine.next_question(form_id).await.unwrap();
        assert_eq!(first.kind, "manual");
        assert_eq!(first.question, "Como foi o atendimento?");
        assert!(first.is_required);

        // Ledger-recorded at serve time, so the second turn goes to the AI
        let second = engine.next_question(form_id).await.unwrap();
        assert_eq!(second.kind, "ai");
        assert_eq!(second.question, "Pergunta gerada?");
        assert!(!second.fallback);
    }

    #[tokio::test]
    async fn test_hung_provider_serves_fallback_as_ai() {
        let slow = DelayedProvider::with_secs(CannedProvider::new("tarde demais"), 30);
        let (engine, _, form_id) = engine_with(Arc::new(slow)).await;

        let turn = engine.next_question(form_id).await.unwrap();
        assert_eq!(turn.kind, "ai");
        assert!(turn.fallback);
        assert_eq!(
            turn.question,
            "Numa escala de 0 a 10, como avalia a sua experiência?"
        );
    }

    #[tokio::test]
    async fn test_failing_provider_serves_fallback() {
        let (engine, _, form_id) = engine_with(Arc::new(FailingProvider::process())).await;

        let turn = engine.next_question(form_id).await.unwrap();
        assert_eq!(turn.kind, "ai");
        assert!(turn.fallback);
    }

    #[tokio::test]
    async fn test_submit_answer_validates() {
        let llama: Arc<dyn Provider> = Arc::new(CannedProvider::new("q"));
        let (engine, _, form_id) = engine_with(llama).await;

        let blank = AnswerSubmission {
            kind: "ai".to_string(),
            question: "Como foi?".to_string(),
            question_id: None,
            answer: "   ".to_string(),
            ai_mode: None,
            ai_context: None,
        };
        assert!(matches!(
            engine.submit_answer(form_id, blank).await,
            Err(EngineError::Validation(_))
        ));

        let ok = AnswerSubmission {
            kind: "ai".to_string(),
            question: "Como foi?".to_string(),
            question_id: None,
            answer: "Muito bom, nota 9".to_string(),
            ai_mode: None,
            ai_context: None,
        };
        let stored = engine.submit_answer(form_id, ok).await.unwrap();
        assert_eq!(stored.form_id, form_id);
    }

    #[tokio::test]
    async fn test_submit_answer_rejects_foreign_question() {
        let llama: Arc<dyn Provider> = Arc::new(CannedProvider::new("q"));
        let (engine, user_id, form_id) = engine_with(llama).await;

        let other = form::create_form(engine.db().pool(), user_id, "Outro", "", "")
            .await
            .unwrap();
        let foreign = question::create_question(
            engine.db().pool(),
            other.id,
            user_id,
            "De outro form?",
            0,
            false,
            true,
        )
        .await
        .unwrap();

        let submission = AnswerSubmission {
            kind: "manual".to_string(),
            question: "De outro form?".to_string(),
            question_id: Some(foreign.id),
            answer: "sim".to_string(),
            ai_mode: None,
            ai_context: None,
        };
        assert!(matches!(
            engine.submit_answer(form_id, submission).await,
            Err(EngineError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_ownership_checks() {
        let llama: Arc<dyn Provider> = Arc::new(CannedProvider::new("q"));
        let (engine, _, form_id) = engine_with(llama).await;

        let intruder = user::create_user(engine.db().pool(), "Rui", "rui@example.com")
            .await
            .unwrap();

        assert!(matches!(
            engine.overview(intruder.id, form_id).await,
            Err(EngineError::Forbidden)
        ));
        // A missing form reports not-found before any ownership verdict
        assert!(matches!(
            engine.overview(intruder.id, 9999).await,
            Err(EngineError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_sentiment_analysis_replaces_previous_run() {
        let llama: Arc<dyn Provider> = Arc::new(CannedProvider::new(
            r#"[{"sentiment":"positivo","confidence":0.9}]"#,
        ));
        let (engine, user_id, form_id) = engine_with(llama).await;

        let submission = AnswerSubmission {
            kind: "ai".to_string(),
            question: "Como foi?".to_string(),
            question_id: None,
            answer: "adorei".to_string(),
            ai_mode: None,
            ai_context: None,
        };
        engine.submit_answer(form_id, submission).await.unwrap();

        let first = engine.analyze_sentiment(user_id, form_id).await.unwrap();
        assert_eq!(first.len(), 1);
        let second = engine.analyze_sentiment(user_id, form_id).await.unwrap();
        assert_eq!(second.len(), 1);

        // One stored row per response, not one per run
        let stored = engine.list_sentiments(user_id, form_id).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].sentiment, "positivo");
    }

    #[tokio::test]
    async fn test_sentiment_on_empty_form_clears_and_returns_nothing() {
        let llama: Arc<dyn Provider> = Arc::new(FailingProvider::process());
        let (engine, user_id, form_id) = engine_with(llama).await;

        // Provider would fail, but the empty form never reaches it
        let scores = engine.analyze_sentiment(user_id, form_id).await.unwrap();
        assert!(scores.is_empty());
        assert!(engine
            .list_sentiments(user_id, form_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_sentiment_skips_payloads_without_answer_text() {
        let llama: Arc<dyn Provider> = Arc::new(FailingProvider::process());
        let (engine, user_id, form_id) = engine_with(llama).await;

        // A rating-only payload carries no classifiable text; the failing
        // provider proves the classifier is never reached.
        response::save_response(engine.db().pool(), form_id, r#"{"rating":7}"#, None)
            .await
            .unwrap();

        let scores = engine.analyze_sentiment(user_id, form_id).await.unwrap();
        assert!(scores.is_empty());
        assert!(engine
            .list_sentiments(user_id, form_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_nps_scans_question_text_when_answer_has_no_number() {
        let llama: Arc<dyn Provider> = Arc::new(CannedProvider::new("q"));
        let (engine, user_id, form_id) = engine_with(llama).await;

        assert!(engine.nps(user_id, form_id).await.unwrap().is_none());

        let submission = AnswerSubmission {
            kind: "ai".to_string(),
            question: "Numa escala de 0 a 10, como avalia a sua experiência?".to_string(),
            question_id: None,
            answer: "muito boa".to_string(),
            ai_mode: None,
            ai_context: None,
        };
        engine.submit_answer(form_id, submission).await.unwrap();

        let nps = engine.nps(user_id, form_id).await.unwrap().unwrap();
        assert_eq!(nps.buckets.promoters, 1);
        assert_eq!(nps.scored, 1);
        assert_eq!(nps.score, 100.0);
    }

    #[tokio::test]
    async fn test_form_lock_evicted_on_delete() {
        let llama: Arc<dyn Provider> = Arc::new(CannedProvider::new("q"));
        let (engine, user_id, form_id) = engine_with(llama).await;

        engine.analyze_sentiment(user_id, form_id).await.unwrap();
        assert_eq!(engine.form_lock_count().await, 1);

        engine.delete_form(user_id, form_id).await.unwrap();
        assert_eq!(engine.form_lock_count().await, 0);
    }

    #[tokio::test]
    async fn test_config_round_trip() {
        let llama: Arc<dyn Provider> = Arc::new(CannedProvider::new("q"));
        let (engine, user_id, _) = engine_with(llama).await;

        let defaults = engine.get_ai_config(user_id).await.unwrap();
        assert_eq!(defaults.tone, "simpático");

        let updated = engine
            .update_ai_config(
                user_id,
                AiConfigInput {
                    tone: "formal".to_string(),
                    style: "detalhada".to_string(),
                    goal: "retenção de clientes".to_string(),
                    ai_mode: "gpt".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.ai_mode, "gpt");

        let read_back = engine.get_ai_config(user_id).await.unwrap();
        assert_eq!(read_back.tone, "formal");
        assert_eq!(read_back.goal, "retenção de clientes");
    }
}
