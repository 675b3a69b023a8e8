//! Form CRUD operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Form;

/// Create a new form.
pub async fn create_form(
    pool: &SqlitePool,
    user_id: i64,
    title: &str,
    description: &str,
    ai_mode: &str,
) -> Result<Form> {
    let id = sqlx::query(
        r#"
        INSERT INTO forms (user_id, title, description, ai_mode)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(title)
    .bind(description)
    .bind(ai_mode)
    .execute(pool)
    .await?
    .last_insert_rowid();

    get_form(pool, id).await
}

/// Get a form by ID.
pub async fn get_form(pool: &SqlitePool, id: i64) -> Result<Form> {
    sqlx::query_as::<_, Form>(
        r#"
        SELECT id, user_id, title, description, ai_mode, created_at
        FROM forms
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DatabaseError::NotFound { entity: "Form", id })
}

/// List forms owned by a user, newest first.
pub async fn list_forms_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Form>> {
    let forms = sqlx::query_as::<_, Form>(
        r#"
        SELECT id, user_id, title, description, ai_mode, created_at
        FROM forms
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(forms)
}

/// Update a form's AI mode.
pub async fn update_ai_mode(pool: &SqlitePool, id: i64, ai_mode: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE forms
        SET ai_mode = ?
        WHERE id = ?
        "#,
    )
    .bind(ai_mode)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound { entity: "Form", id });
    }

    Ok(())
}

/// Delete a form. Questions, responses, asked-question rows, and sentiment
/// rows cascade.
pub async fn delete_form(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM forms
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound { entity: "Form", id });
    }

    Ok(())
}
