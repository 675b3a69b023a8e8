//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A merchant account that owns forms and an AI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// A survey form owned by a merchant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Form {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning user ID.
    pub user_id: i64,
    /// Form title.
    pub title: String,
    /// Optional description shown to respondents.
    pub description: String,
    /// Form-level AI mode override ("llama" or "gpt").
    pub ai_mode: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// A merchant-authored fixed-text question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MerchantQuestion {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Parent form ID.
    pub form_id: i64,
    /// Owning user ID.
    pub user_id: i64,
    /// Question text.
    pub question: String,
    /// Presentation priority, lower first.
    pub sort_order: i64,
    /// Whether the respondent must answer.
    pub is_required: bool,
    /// Soft-delete flag; inactive questions are never selected.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: String,
}

/// A stored respondent answer.
///
/// `payload` holds either raw text or a JSON document with the shape
/// `{type, question, question_id, answer, ai_mode}`. It is parsed lazily by
/// the engine; nothing in this layer interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StoredResponse {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Parent form ID.
    pub form_id: i64,
    /// Opaque answer payload.
    pub payload: String,
    /// Raw AI exchange transcript, if any.
    pub ai_context: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// One-per-user AI prompt configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AiConfig {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owning user ID (unique).
    pub user_id: i64,
    /// Interview tone.
    pub tone: String,
    /// Question style.
    pub style: String,
    /// Free-text interview goal.
    pub goal: String,
    /// Preferred AI mode.
    pub ai_mode: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// A persisted sentiment classification for one response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SentimentRow {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Parent form ID.
    pub form_id: i64,
    /// Classified response ID.
    pub response_id: i64,
    /// Sentiment label: "positivo", "neutro", or "negativo".
    pub sentiment: String,
    /// Confidence score.
    pub confidence: f64,
    /// Creation timestamp.
    pub created_at: String,
}

/// A (date, sentiment, count) aggregation row for trend building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SentimentBucketRow {
    /// UTC calendar date (YYYY-MM-DD).
    pub bucket: String,
    /// Sentiment label.
    pub sentiment: String,
    /// Row count for this date and label.
    pub total: i64,
}

/// A (sentiment, count) aggregation row for form totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SentimentTotalRow {
    /// Sentiment label.
    pub sentiment: String,
    /// Row count for this label.
    pub total: i64,
}
