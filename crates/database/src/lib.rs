//! SQLite persistence layer for NexForm.
//!
//! This crate provides async database operations for forms, merchant
//! questions, responses, the asked-question ledger, AI configuration, and
//! sentiment analysis rows using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{form, user, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:nexform.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let owner = user::create_user(db.pool(), "Maria", "maria@example.com").await?;
//!     let form = form::create_form(
//!         db.pool(),
//!         owner.id,
//!         "Satisfação da loja",
//!         "",
//!         "llama",
//!     )
//!     .await?;
//!     println!("Created form {}", form.id);
//!
//!     Ok(())
//! }
//! ```

pub mod ai_config;
pub mod asked;
pub mod error;
pub mod form;
pub mod models;
pub mod question;
pub mod response;
pub mod sentiment;
pub mod user;

pub use error::{DatabaseError, Result};
pub use models::{
    AiConfig, Form, MerchantQuestion, SentimentBucketRow, SentimentRow, SentimentTotalRow,
    StoredResponse, User,
};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 10;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `sqlite::memory:` for an in-memory database in tests.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to database: {} (pool size: {})", url, pool_size);

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is
    /// up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_form_lifecycle() {
        let db = test_db().await;

        let owner = user::create_user(db.pool(), "Maria", "maria@example.com")
            .await
            .unwrap();

        let created = form::create_form(db.pool(), owner.id, "Loja", "descrição", "gpt")
            .await
            .unwrap();
        assert_eq!(created.ai_mode, "gpt");

        let fetched = form::get_form(db.pool(), created.id).await.unwrap();
        assert_eq!(fetched.title, "Loja");

        let listed = form::list_forms_by_user(db.pool(), owner.id).await.unwrap();
        assert_eq!(listed.len(), 1);

        form::delete_form(db.pool(), created.id).await.unwrap();
        let missing = form::get_form(db.pool(), created.id).await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_form_delete_cascades() {
        let db = test_db().await;

        let owner = user::create_user(db.pool(), "Maria", "m@example.com")
            .await
            .unwrap();
        let survey = form::create_form(db.pool(), owner.id, "Loja", "", "llama")
            .await
            .unwrap();
        let stored = response::save_response(db.pool(), survey.id, "\"nota 9\"", None)
            .await
            .unwrap();
        sentiment::replace_form_sentiments(
            db.pool(),
            survey.id,
            &[(stored.id, "positivo".to_string(), 0.9)],
        )
        .await
        .unwrap();

        form::delete_form(db.pool(), survey.id).await.unwrap();

        assert_eq!(
            response::count_by_form(db.pool(), survey.id).await.unwrap(),
            0
        );
        assert!(sentiment::list_by_form(db.pool(), survey.id)
            .await
            .unwrap()
            .is_empty());
    }
}
