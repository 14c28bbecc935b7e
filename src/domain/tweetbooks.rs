//! Tweetbook queries

use chrono::Utc;
use sqlx::{Executor, Sqlite};

use crate::error::ApiError;
use crate::models::Tweetbook;

/// List all tweetbooks in storage order.
pub async fn list<'e, E>(executor: E) -> Result<Vec<Tweetbook>, ApiError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let books = sqlx::query_as(
        r#"
        SELECT id, name, description, created_at
        FROM tweetbooks
        "#,
    )
    .fetch_all(executor)
    .await?;

    Ok(books)
}

/// Create a tweetbook. A missing description is stored as an empty string.
pub async fn create<'e, E>(
    executor: E,
    name: &str,
    description: Option<&str>,
) -> Result<Tweetbook, ApiError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        r#"
        INSERT INTO tweetbooks (name, description, created_at)
        VALUES (?, ?, ?)
        RETURNING id, name, description, created_at
        "#,
    )
    .bind(name)
    .bind(description.unwrap_or_default())
    .bind(Utc::now())
    .fetch_one(executor)
    .await
    .map_err(|e| ApiError::duplicate_or_db(e, "A tweetbook with this name already exists"))
}
