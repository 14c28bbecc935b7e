//! Tweet queries
//!
//! `random` is the only multi-statement operation in the system: the pick
//! and the `last_shown` stamp commit together or not at all.

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};

use crate::error::ApiError;
use crate::models::Tweet;

/// Save a tweet. The default tweetbook (id 1) owns it when no tweetbook is
/// given.
pub async fn save<'e, E>(
    executor: E,
    tweet_id: &str,
    content: &str,
    author: &str,
    tweetbook_id: Option<i64>,
) -> Result<Tweet, ApiError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        r#"
        INSERT INTO tweets (tweet_id, content, author, tweetbook_id, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, tweet_id, content, author, tweetbook_id, created_at, last_shown
        "#,
    )
    .bind(tweet_id)
    .bind(content)
    .bind(author)
    .bind(tweetbook_id.unwrap_or(1))
    .bind(Utc::now())
    .fetch_one(executor)
    .await
    .map_err(|e| ApiError::duplicate_or_db(e, "This tweet has already been saved"))
}

/// List a tweetbook's tweets, newest first.
pub async fn list_by_tweetbook<'e, E>(
    executor: E,
    tweetbook_id: i64,
) -> Result<Vec<Tweet>, ApiError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let tweets = sqlx::query_as(
        r#"
        SELECT id, tweet_id, content, author, tweetbook_id, created_at, last_shown
        FROM tweets
        WHERE tweetbook_id = ?
        ORDER BY created_at DESC
        "#,
    )
    .bind(tweetbook_id)
    .fetch_all(executor)
    .await?;

    Ok(tweets)
}

/// Pick one tweet uniformly at random, filtered to a tweetbook when given,
/// and stamp its `last_shown` in the same transaction. Returns `None`
/// without writing anything when the candidate set is empty.
pub async fn random(pool: &SqlitePool, tweetbook_id: Option<i64>) -> Result<Option<Tweet>, ApiError> {
    let mut tx = pool.begin().await?;

    let picked: Option<Tweet> = match tweetbook_id {
        Some(id) => {
            sqlx::query_as(
                r#"
                SELECT id, tweet_id, content, author, tweetbook_id, created_at, last_shown
                FROM tweets
                WHERE tweetbook_id = ?
                ORDER BY RANDOM()
                LIMIT 1
                "#,
            )
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
        }
        None => {
            sqlx::query_as(
                r#"
                SELECT id, tweet_id, content, author, tweetbook_id, created_at, last_shown
                FROM tweets
                ORDER BY RANDOM()
                LIMIT 1
                "#,
            )
            .fetch_optional(&mut *tx)
            .await?
        }
    };

    let Some(mut tweet) = picked else {
        // Dropping the transaction rolls it back; nothing was written.
        return Ok(None);
    };

    let now = Utc::now();
    sqlx::query("UPDATE tweets SET last_shown = ? WHERE id = ?")
        .bind(now)
        .bind(tweet.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tweet.last_shown = Some(now);
    Ok(Some(tweet))
}

/// Hard-delete a tweet by id. Returns whether a row was actually removed.
pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, ApiError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM tweets WHERE id = ?")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
