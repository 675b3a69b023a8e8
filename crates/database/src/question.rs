//! Merchant question operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::MerchantQuestion;

const COLUMNS: &str = "id, form_id, user_id, question, sort_order, is_required, is_active, created_at";

/// Create a new merchant question.
pub async fn create_question(
    pool: &SqlitePool,
    form_id: i64,
    user_id: i64,
    question: &str,
    sort_order: i64,
    is_required: bool,
    is_active: bool,
) -> Result<MerchantQuestion> {
    let id = sqlx::query(
        r#"
        INSERT INTO merchant_questions (form_id, user_id, question, sort_order, is_required, is_active)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(form_id)
    .bind(user_id)
    .bind(question)
    .bind(sort_order)
    .bind(is_required)
    .bind(is_active)
    .execute(pool)
    .await?
    .last_insert_rowid();

    get_question(pool, id).await
}

/// Get a question by ID.
pub async fn get_question(pool: &SqlitePool, id: i64) -> Result<MerchantQuestion> {
    sqlx::query_as::<_, MerchantQuestion>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM merchant_questions
        WHERE id = ?
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DatabaseError::NotFound {
        entity: "MerchantQuestion",
        id,
    })
}

/// List questions for a form ordered by sort_order then id.
pub async fn list_by_form(
    pool: &SqlitePool,
    form_id: i64,
    only_active: bool,
) -> Result<Vec<MerchantQuestion>> {
    let active_clause = if only_active { "AND is_active = 1" } else { "" };

    let questions = sqlx::query_as::<_, MerchantQuestion>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM merchant_questions
        WHERE form_id = ? {active_clause}
        ORDER BY sort_order ASC, id ASC
        "#
    ))
    .bind(form_id)
    .fetch_all(pool)
    .await?;

    Ok(questions)
}

/// Update a question's text, ordering, and flags.
pub async fn update_question(
    pool: &SqlitePool,
    id: i64,
    question: &str,
    sort_order: i64,
    is_required: bool,
    is_active: bool,
) -> Result<MerchantQuestion> {
    let result = sqlx::query(
        r#"
        UPDATE merchant_questions
        SET question = ?, sort_order = ?, is_required = ?, is_active = ?
        WHERE id = ?
        "#,
    )
    .bind(question)
    .bind(sort_order)
    .bind(is_required)
    .bind(is_active)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "MerchantQuestion",
            id,
        });
    }

    get_question(pool, id).await
}

/// Soft-delete a question by clearing its active flag.
pub async fn deactivate_question(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE merchant_questions
        SET is_active = 0
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "MerchantQuestion",
            id,
        });
    }

    Ok(())
}

/// List pending questions for a form: active questions that have never been
/// recorded in the asked-question ledger, ordered by sort_order then id.
///
/// Session-scoped exclusions are applied by the caller on top of this.
pub async fn list_pending(pool: &SqlitePool, form_id: i64) -> Result<Vec<MerchantQuestion>> {
    let questions = sqlx::query_as::<_, MerchantQuestion>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM merchant_questions mq
        WHERE mq.form_id = ?
          AND mq.is_active = 1
          AND NOT EXISTS (
              SELECT 1 FROM asked_questions aq
              WHERE aq.form_id = mq.form_id AND aq.question_id = mq.id
          )
        ORDER BY mq.sort_order ASC, mq.id ASC
        "#
    ))
    .bind(form_id)
    .fetch_all(pool)
    .await?;

    Ok(questions)
}
