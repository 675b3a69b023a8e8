//! Question orchestration and response-analytics core for NexForm.
//!
//! This crate decides, turn by turn, whether a survey conversation gets a
//! merchant-authored question or a freshly generated AI question, and turns
//! stored free-text answers into structured metrics (NPS buckets, insight
//! reports, sentiment trends).
//!
//! # Architecture
//!
//! ```text
//! Respondent answer
//!        ↓
//! ┌──────────────────────────────────────────────────────────┐
//! │                      SURVEY ENGINE                       │
//! │                                                          │
//! │  1. Normalize answer payload (extract)                   │
//! │  2. Store response, then select next question:           │
//! │     • pending manual question → serve + ledger-record    │
//! │     • none left → build prompt, call provider with a     │
//! │       timeout, fall back to the canned question on any   │
//! │       failure                                            │
//! │                                                          │
//! │  Merchant-triggered, off the live path:                  │
//! │     • insight generation over the response set           │
//! │     • batch sentiment classification (atomic replace)    │
//! │     • NPS / trend / recency aggregation                  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Providers are interchangeable text-generation backends behind the
//! [`provider_core::Provider`] trait; the engine never branches on which
//! backend it is talking to.

pub mod ai_config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod insight;
pub mod next_question;
pub mod questions;
pub mod reports;
pub mod sentiment;

pub use ai_config::{AiConfigInput, AiConfigView};
pub use engine::{AnswerSubmission, EngineConfig, NextTurn, SurveyEngine};
pub use error::{EngineError, Result};
pub use extract::{extract_text, extract_text_strict, parse_payload, RecentAnswer};
pub use insight::InsightReport;
pub use next_question::NextQuestion;
pub use questions::{QuestionInput, QuestionPatch};
pub use reports::{NpsBuckets, NpsSummary, Overview, SentimentTotals, TrendPoint};
pub use sentiment::{Sentiment, SentimentEntry, SentimentScore};

// Re-export the provider seam for callers wiring their own backends
pub use provider_core::{AiMode, Provider, ProviderError};
