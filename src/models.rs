//! Shared data models used across modules

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A named collection of saved tweets
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Tweetbook {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A saved external post. `tweet_id` is the source-platform identifier and
/// is unique across the whole store; `id` is ours.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Tweet {
    pub id: i64,
    pub tweet_id: String,
    pub content: String,
    pub author: String,
    pub tweetbook_id: i64,
    pub created_at: DateTime<Utc>,
    pub last_shown: Option<DateTime<Utc>>,
}

/// The singleton settings row (id fixed at 1)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Settings {
    pub notification_frequency: String,
    pub active_tweetbook_id: i64,
    pub start_time: String,
    pub end_time: String,
    pub random_mode: bool,
}

/// Settings joined with the active tweetbook's name, as served by the API
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SettingsView {
    pub notification_frequency: String,
    pub active_tweetbook_id: i64,
    pub start_time: String,
    pub end_time: String,
    pub random_mode: bool,
    pub active_tweetbook_name: String,
}
