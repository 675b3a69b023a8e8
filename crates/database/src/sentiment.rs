//! Sentiment analysis row storage.
//!
//! A form's sentiment set is fully replaced on each analysis run: the
//! delete and the bulk insert share one transaction so readers never see a
//! partially replaced set and no stale rows survive a re-analysis.

use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::{SentimentBucketRow, SentimentRow, SentimentTotalRow};

/// Replace all sentiment rows for a form with the given
/// `(response_id, sentiment, confidence)` entries atomically.
pub async fn replace_form_sentiments(
    pool: &SqlitePool,
    form_id: i64,
    entries: &[(i64, String, f64)],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM sentiment_analysis
        WHERE form_id = ?
        "#,
    )
    .bind(form_id)
    .execute(&mut *tx)
    .await?;

    for (response_id, sentiment, confidence) in entries {
        sqlx::query(
            r#"
            INSERT INTO sentiment_analysis (form_id, response_id, sentiment, confidence)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(form_id)
        .bind(response_id)
        .bind(sentiment)
        .bind(confidence)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    tracing::debug!(form_id, rows = entries.len(), "replaced form sentiments");
    Ok(())
}

/// List sentiment rows for a form.
pub async fn list_by_form(pool: &SqlitePool, form_id: i64) -> Result<Vec<SentimentRow>> {
    let rows = sqlx::query_as::<_, SentimentRow>(
        r#"
        SELECT id, form_id, response_id, sentiment, confidence, created_at
        FROM sentiment_analysis
        WHERE form_id = ?
        ORDER BY id ASC
        "#,
    )
    .bind(form_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Group sentiment rows by UTC calendar date and label, ascending by date.
pub async fn trend_rows(pool: &SqlitePool, form_id: i64) -> Result<Vec<SentimentBucketRow>> {
    let rows = sqlx::query_as::<_, SentimentBucketRow>(
        r#"
        SELECT DATE(created_at) AS bucket, sentiment, COUNT(*) AS total
        FROM sentiment_analysis
        WHERE form_id = ?
        GROUP BY DATE(created_at), sentiment
        ORDER BY DATE(created_at) ASC
        "#,
    )
    .bind(form_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count sentiment rows per label for a form.
pub async fn total_rows(pool: &SqlitePool, form_id: i64) -> Result<Vec<SentimentTotalRow>> {
    let rows = sqlx::query_as::<_, SentimentTotalRow>(
        r#"
        SELECT sentiment, COUNT(*) AS total
        FROM sentiment_analysis
        WHERE form_id = ?
        GROUP BY sentiment
        "#,
    )
    .bind(form_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{form, response, user, Database};

    async fn seed() -> (Database, i64, Vec<i64>) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        let owner = user::create_user(db.pool(), "Maria", "maria@example.com")
            .await
            .unwrap();
        let survey = form::create_form(db.pool(), owner.id, "Loja", "", "llama")
            .await
            .unwrap();

        let mut response_ids = Vec::new();
        for payload in ["ótimo", "ok", "péssimo"] {
            let stored = response::save_response(db.pool(), survey.id, payload, None)
                .await
                .unwrap();
            response_ids.push(stored.id);
        }
        (db, survey.id, response_ids)
    }

    #[tokio::test]
    async fn test_replace_supersedes_previous_run() {
        let (db, form_id, ids) = seed().await;

        replace_form_sentiments(
            db.pool(),
            form_id,
            &[
                (ids[0], "positivo".to_string(), 0.9),
                (ids[1], "neutro".to_string(), 0.5),
                (ids[2], "negativo".to_string(), 0.8),
            ],
        )
        .await
        .unwrap();
        assert_eq!(list_by_form(db.pool(), form_id).await.unwrap().len(), 3);

        // Second run fully replaces the first
        replace_form_sentiments(db.pool(), form_id, &[(ids[0], "neutro".to_string(), 0.4)])
            .await
            .unwrap();

        let rows = list_by_form(db.pool(), form_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sentiment, "neutro");

        let totals = total_rows(db.pool(), form_id).await.unwrap();
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total, 1);
    }

    #[tokio::test]
    async fn test_replace_with_empty_clears() {
        let (db, form_id, ids) = seed().await;

        replace_form_sentiments(db.pool(), form_id, &[(ids[0], "positivo".to_string(), 1.0)])
            .await
            .unwrap();
        replace_form_sentiments(db.pool(), form_id, &[]).await.unwrap();

        assert!(list_by_form(db.pool(), form_id).await.unwrap().is_empty());
        assert!(trend_rows(db.pool(), form_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_trend_groups_by_date() {
        let (db, form_id, ids) = seed().await;

        replace_form_sentiments(
            db.pool(),
            form_id,
            &[
                (ids[0], "positivo".to_string(), 0.9),
                (ids[1], "positivo".to_string(), 0.7),
                (ids[2], "negativo".to_string(), 0.6),
            ],
        )
        .await
        .unwrap();

        let rows = trend_rows(db.pool(), form_id).await.unwrap();
        // All inserted now, so one date bucket per label
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().any(|r| r.sentiment == "positivo" && r.total == 2));
        assert!(rows.iter().any(|r| r.sentiment == "negativo" && r.total == 1));
    }
}
