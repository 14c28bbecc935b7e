//! Notification producer and sink
//!
//! The sink is a seam for a real push transport; the shipped implementation
//! just logs, matching the reference behavior.

use sqlx::SqlitePool;

use crate::domain::{settings, tweets};
use crate::error::ApiError;
use crate::models::Tweet;

/// Delivery target for surfaced tweets. No delivery guarantees.
pub trait NotificationSink: Send + Sync {
    fn emit(&self, tweet: &Tweet);
}

/// Console stand-in for real push delivery.
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn emit(&self, tweet: &Tweet) {
        tracing::info!("NOTIFICATION: Tweet by {}: {}", tweet.author, tweet.content);
    }
}

/// Scheduler entry point: pick a random tweet from the active tweetbook,
/// stamp it shown, and emit it. A missing settings row or an empty
/// tweetbook is a silent no-op.
pub async fn show_tweet(
    db: &SqlitePool,
    sink: &dyn NotificationSink,
) -> Result<Option<Tweet>, ApiError> {
    let Some(settings) = settings::get_row(db).await? else {
        return Ok(None);
    };

    let Some(tweet) = tweets::random(db, Some(settings.active_tweetbook_id)).await? else {
        return Ok(None);
    };

    sink.emit(&tweet);
    Ok(Some(tweet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::domain::tweets;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        emitted: Mutex<Vec<String>>,
    }

    impl NotificationSink for RecordingSink {
        fn emit(&self, tweet: &Tweet) {
            self.emitted.lock().unwrap().push(tweet.tweet_id.clone());
        }
    }

    #[tokio::test]
    async fn test_emits_from_active_tweetbook() {
        let pool = test_pool().await;
        tweets::save(&pool, "T1", "hi", "a", None).await.unwrap();

        let sink = RecordingSink::default();
        let shown = show_tweet(&pool, &sink).await.unwrap().unwrap();
        assert_eq!(shown.tweet_id, "T1");
        assert!(shown.last_shown.is_some());
        assert_eq!(*sink.emitted.lock().unwrap(), vec!["T1".to_string()]);
    }

    #[tokio::test]
    async fn test_empty_tweetbook_is_silent() {
        let pool = test_pool().await;
        let sink = RecordingSink::default();

        assert!(show_tweet(&pool, &sink).await.unwrap().is_none());
        assert!(sink.emitted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_settings_row_is_silent() {
        let pool = test_pool().await;
        tweets::save(&pool, "T1", "hi", "a", None).await.unwrap();
        sqlx::query("DELETE FROM settings").execute(&pool).await.unwrap();

        let sink = RecordingSink::default();
        assert!(show_tweet(&pool, &sink).await.unwrap().is_none());
        assert!(sink.emitted.lock().unwrap().is_empty());
    }
}
