//! Response storage. Append-only; responses are never mutated or
//! individually deleted (forms cascade-delete their responses).

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::StoredResponse;

const COLUMNS: &str = "id, form_id, payload, ai_context, created_at";

/// Store a respondent answer payload.
pub async fn save_response(
    pool: &SqlitePool,
    form_id: i64,
    payload: &str,
    ai_context: Option<&str>,
) -> Result<StoredResponse> {
    let id = sqlx::query(
        r#"
        INSERT INTO responses (form_id, payload, ai_context)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(form_id)
    .bind(payload)
    .bind(ai_context)
    .execute(pool)
    .await?
    .last_insert_rowid();

    get_response(pool, id).await
}

/// Get a response by ID.
pub async fn get_response(pool: &SqlitePool, id: i64) -> Result<StoredResponse> {
    sqlx::query_as::<_, StoredResponse>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM responses
        WHERE id = ?
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DatabaseError::NotFound {
        entity: "Response",
        id,
    })
}

/// List all responses for a form, oldest first.
pub async fn list_by_form(pool: &SqlitePool, form_id: i64) -> Result<Vec<StoredResponse>> {
    let responses = sqlx::query_as::<_, StoredResponse>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM responses
        WHERE form_id = ?
        ORDER BY created_at ASC, id ASC
        "#
    ))
    .bind(form_id)
    .fetch_all(pool)
    .await?;

    Ok(responses)
}

/// List the most recent responses for a form, newest first.
pub async fn list_recent(
    pool: &SqlitePool,
    form_id: i64,
    limit: i64,
) -> Result<Vec<StoredResponse>> {
    let responses = sqlx::query_as::<_, StoredResponse>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM responses
        WHERE form_id = ?
        ORDER BY created_at DESC, id DESC
        LIMIT ?
        "#
    ))
    .bind(form_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(responses)
}

/// Count all responses for a form.
pub async fn count_by_form(pool: &SqlitePool, form_id: i64) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM responses
        WHERE form_id = ?
        "#,
    )
    .bind(form_id)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Count responses for a form created within the last `days` days.
///
/// A window of zero (or less) counts everything.
pub async fn count_since_days(pool: &SqlitePool, form_id: i64, days: i64) -> Result<i64> {
    if days <= 0 {
        return count_by_form(pool, form_id).await;
    }

    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*)
        FROM responses
        WHERE form_id = ?
          AND datetime(created_at) >= datetime('now', ?)
        "#,
    )
    .bind(form_id)
    .bind(format!("-{} days", days))
    .fetch_one(pool)
    .await?;

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{form, user, Database};

    async fn seed() -> (Database, i64) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        let owner = user::create_user(db.pool(), "Maria", "maria@example.com")
            .await
            .unwrap();
        let survey = form::create_form(db.pool(), owner.id, "Loja", "", "llama")
            .await
            .unwrap();
        (db, survey.id)
    }

    #[tokio::test]
    async fn test_save_and_list_ordering() {
        let (db, form_id) = seed().await;

        save_response(db.pool(), form_id, "primeiro", None)
            .await
            .unwrap();
        save_response(db.pool(), form_id, "segundo", Some("User: a\nAI: b"))
            .await
            .unwrap();

        let all = list_by_form(db.pool(), form_id).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].payload, "primeiro");

        let recent = list_recent(db.pool(), form_id, 1).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].payload, "segundo");
        assert_eq!(recent[0].ai_context.as_deref(), Some("User: a\nAI: b"));
    }

    #[tokio::test]
    async fn test_window_counts() {
        let (db, form_id) = seed().await;

        save_response(db.pool(), form_id, "hoje", None).await.unwrap();

        assert_eq!(count_by_form(db.pool(), form_id).await.unwrap(), 1);
        assert_eq!(count_since_days(db.pool(), form_id, 7).await.unwrap(), 1);
        assert_eq!(count_since_days(db.pool(), form_id, 30).await.unwrap(), 1);
        // Zero window means no filter
        assert_eq!(count_since_days(db.pool(), form_id, 0).await.unwrap(), 1);
    }
}
