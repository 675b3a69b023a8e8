//! Merchant-facing aggregations: NPS scoring, sentiment trends, and the
//! response overview.

use std::sync::OnceLock;

use database::models::{SentimentBucketRow, SentimentTotalRow};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Max characters kept in overview previews.
const PREVIEW_CHARS: usize = 120;

fn nps_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(?:10|[0-9])\b").expect("static pattern"))
}

/// Extract the NPS rating from free text.
///
/// The *last* standalone token in 0..=10 wins, so "de 0 a 10 dou um 9"
/// scores 9 rather than 0. Text with no standalone number scores nothing.
pub fn nps_token(text: &str) -> Option<u8> {
    nps_token_re()
        .find_iter(text)
        .last()
        .and_then(|m| m.as_str().parse().ok())
}

/// NPS respondent buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NpsBuckets {
    /// Ratings 9..=10.
    pub promoters: i64,
    /// Ratings 7..=8.
    pub passives: i64,
    /// Ratings 0..=6.
    pub detractors: i64,
}

impl NpsBuckets {
    fn record(&mut self, rating: u8) {
        match rating {
            9..=10 => self.promoters += 1,
            7..=8 => self.passives += 1,
            _ => self.detractors += 1,
        }
    }
}

/// Computed NPS over a form's answers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NpsSummary {
    pub buckets: NpsBuckets,
    /// Answers that carried a rating.
    pub scored: i64,
    /// Answers with no standalone 0..=10 token.
    pub unscored: i64,
    /// `(promoters - detractors) / scored * 100`, rounded to two decimals.
    pub score: f64,
}

/// Score a set of answer texts.
///
/// `None` when no text carried a rating, so callers can tell "no data yet"
/// apart from a survey that genuinely scores zero.
pub fn compute_nps<'a, I>(texts: I) -> Option<NpsSummary>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut summary = NpsSummary::default();

    for text in texts {
        match nps_token(text) {
            Some(rating) => {
                summary.buckets.record(rating);
                summary.scored += 1;
            }
            None => summary.unscored += 1,
        }
    }

    if summary.scored == 0 {
        return None;
    }

    let raw = (summary.buckets.promoters - summary.buckets.detractors) as f64
        / summary.scored as f64
        * 100.0;
    summary.score = (raw * 100.0).round() / 100.0;

    Some(summary)
}

/// Per-label counts for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrendPoint {
    /// UTC calendar date (YYYY-MM-DD).
    pub date: String,
    pub positivo: i64,
    pub neutro: i64,
    pub negativo: i64,
}

/// Fold date-bucketed rows into one point per date.
///
/// Rows arrive date-ordered from the store; the fold preserves that order
/// and fills absent labels with zero.
pub fn fold_trend(rows: &[SentimentBucketRow]) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = Vec::new();

    for row in rows {
        if points.last().map(|p| p.date.as_str()) != Some(row.bucket.as_str()) {
            points.push(TrendPoint {
                date: row.bucket.clone(),
                ..Default::default()
            });
        }
        if let Some(point) = points.last_mut() {
            match row.sentiment.as_str() {
                "positivo" => point.positivo += row.total,
                "negativo" => point.negativo += row.total,
                _ => point.neutro += row.total,
            }
        }
    }

    points
}

/// Overall per-label counts for a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SentimentTotals {
    pub positivo: i64,
    pub neutro: i64,
    pub negativo: i64,
}

/// Fold label-count rows into totals, filling absent labels with zero.
pub fn fold_totals(rows: &[SentimentTotalRow]) -> SentimentTotals {
    let mut totals = SentimentTotals::default();

    for row in rows {
        match row.sentiment.as_str() {
            "positivo" => totals.positivo += row.total,
            "negativo" => totals.negativo += row.total,
            _ => totals.neutro += row.total,
        }
    }

    totals
}

/// A truncated response excerpt for the overview feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponsePreview {
    pub response_id: i64,
    pub question: String,
    pub answer: String,
    pub created_at: String,
}

/// Truncate preview text to [`PREVIEW_CHARS`] characters.
pub fn preview_text(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    text.chars().take(PREVIEW_CHARS).collect()
}

/// The merchant dashboard snapshot for one form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total_responses: i64,
    pub last_7_days: i64,
    pub last_30_days: i64,
    /// `None` until at least one answer carries a rating.
    pub nps: Option<NpsSummary>,
    pub sentiment: SentimentTotals,
    /// Up to five most recent answers, newest first.
    pub recent: Vec<ResponsePreview>,
}
