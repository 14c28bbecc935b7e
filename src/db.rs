//! SQLite pool setup and idempotent schema initialization
//!
//! The store is a single database file. Initialization is safe to repeat:
//! tables are created if absent and the default tweetbook / settings rows
//! are inserted only when rows with those fixed ids do not already exist.

use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;

/// Open (creating if necessary) the database file at `path`.
/// Foreign keys are opt-in on SQLite, so they are enabled per connection.
pub async fn connect(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

/// Create tables and seed the default tweetbook (id 1) and the singleton
/// settings row (id 1). Idempotent.
pub async fn init_db(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tweetbooks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tweets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            tweet_id TEXT UNIQUE NOT NULL,
            content TEXT NOT NULL,
            author TEXT NOT NULL,
            tweetbook_id INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            last_shown TEXT,
            FOREIGN KEY (tweetbook_id) REFERENCES tweetbooks(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            id INTEGER PRIMARY KEY,
            notification_frequency TEXT NOT NULL DEFAULT 'hourly',
            active_tweetbook_id INTEGER NOT NULL DEFAULT 1,
            start_time TEXT NOT NULL DEFAULT '09:00',
            end_time TEXT NOT NULL DEFAULT '17:00',
            random_mode BOOLEAN NOT NULL DEFAULT 1,
            FOREIGN KEY (active_tweetbook_id) REFERENCES tweetbooks(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "INSERT OR IGNORE INTO tweetbooks (id, name, description, created_at) VALUES (1, 'Default', 'Your default collection of tweets', ?)",
    )
    .bind(Utc::now())
    .execute(pool)
    .await?;

    sqlx::query("INSERT OR IGNORE INTO settings (id, active_tweetbook_id) VALUES (1, 1)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    // A shared in-memory database lives only as long as its connection, so
    // the pool is pinned to a single connection that is never reclaimed.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");
    init_db(&pool).await.expect("schema init");
    pool
}
