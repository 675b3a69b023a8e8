//! Asked-question ledger.
//!
//! Write-once rows recording that a merchant question was presented within
//! a form's conversation. Used purely as an exclusion set for future
//! selection; rows are never updated or individually deleted.

use sqlx::SqlitePool;

use crate::error::Result;

/// Record that a question was presented, optionally linked to the response
/// that answered it.
pub async fn mark_asked(
    pool: &SqlitePool,
    form_id: i64,
    question_id: i64,
    response_id: Option<i64>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO asked_questions (form_id, question_id, response_id)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(form_id)
    .bind(question_id)
    .bind(response_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Count ledger entries for a form.
pub async fn count_for_form(pool: &SqlitePool, form_id: i64) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM asked_questions
        WHERE form_id = ?
        "#,
    )
    .bind(form_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
