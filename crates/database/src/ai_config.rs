//! Per-user AI configuration storage.
//!
//! At most one row exists per user. First access creates the row with
//! defaults; the `ON CONFLICT` clauses keep both ensure and upsert
//! idempotent under concurrent calls.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::AiConfig;

/// Default interview tone.
pub const DEFAULT_TONE: &str = "simpático";
/// Default question style.
pub const DEFAULT_STYLE: &str = "curta";
/// Default interview goal.
pub const DEFAULT_GOAL: &str = "satisfação geral";
/// Default AI mode.
pub const DEFAULT_AI_MODE: &str = "llama";

const COLUMNS: &str = "id, user_id, tone, style, goal, ai_mode, created_at";

/// Get a user's AI configuration, if one exists.
pub async fn get_config(pool: &SqlitePool, user_id: i64) -> Result<Option<AiConfig>> {
    let config = sqlx::query_as::<_, AiConfig>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM ai_config
        WHERE user_id = ?
        "#
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(config)
}

/// Get a user's AI configuration, creating it with defaults on first access.
pub async fn ensure_config(pool: &SqlitePool, user_id: i64) -> Result<AiConfig> {
    sqlx::query(
        r#"
        INSERT INTO ai_config (user_id, tone, style, goal, ai_mode)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(DEFAULT_TONE)
    .bind(DEFAULT_STYLE)
    .bind(DEFAULT_GOAL)
    .bind(DEFAULT_AI_MODE)
    .execute(pool)
    .await?;

    let config = get_config(pool, user_id).await?;
    // The row exists after the insert above; a concurrent ensure only makes
    // the conflict branch fire.
    Ok(config.unwrap_or(AiConfig {
        id: 0,
        user_id,
        tone: DEFAULT_TONE.to_string(),
        style: DEFAULT_STYLE.to_string(),
        goal: DEFAULT_GOAL.to_string(),
        ai_mode: DEFAULT_AI_MODE.to_string(),
        created_at: String::new(),
    }))
}

/// Create or update a user's AI configuration.
pub async fn upsert_config(
    pool: &SqlitePool,
    user_id: i64,
    tone: &str,
    style: &str,
    goal: &str,
    ai_mode: &str,
) -> Result<AiConfig> {
    sqlx::query(
        r#"
        INSERT INTO ai_config (user_id, tone, style, goal, ai_mode)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            tone = excluded.tone,
            style = excluded.style,
            goal = excluded.goal,
            ai_mode = excluded.ai_mode
        "#,
    )
    .bind(user_id)
    .bind(tone)
    .bind(style)
    .bind(goal)
    .bind(ai_mode)
    .execute(pool)
    .await?;

    ensure_config(pool, user_id).await
}
