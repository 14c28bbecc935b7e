//! Settings queries
//!
//! The settings row is a singleton (id fixed at 1). Partial updates go
//! through `SettingsPatch`: each field is independently present or absent,
//! and the patch binds into one fixed UPDATE statement - column names are
//! never assembled from caller input.

use serde::Deserialize;
use sqlx::{Executor, Sqlite};

use crate::error::ApiError;
use crate::models::{Settings, SettingsView};

/// Partial settings update. A field is applied only when explicitly
/// supplied, so `random_mode: Some(false)` is a real write while a missing
/// field leaves the stored value alone.
#[derive(Debug, Default, Deserialize)]
pub struct SettingsPatch {
    pub notification_frequency: Option<String>,
    pub active_tweetbook_id: Option<i64>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub random_mode: Option<bool>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        self.notification_frequency.is_none()
            && self.active_tweetbook_id.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.random_mode.is_none()
    }
}

/// Settings joined with the active tweetbook's name.
pub async fn get<'e, E>(executor: E) -> Result<SettingsView, ApiError>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        r#"
        SELECT s.notification_frequency, s.active_tweetbook_id, s.start_time,
               s.end_time, s.random_mode, t.name AS active_tweetbook_name
        FROM settings s
        JOIN tweetbooks t ON s.active_tweetbook_id = t.id
        WHERE s.id = 1
        "#,
    )
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| ApiError::NotFound("Settings not found".to_string()))
}

/// The raw singleton row, for the scheduler and the notification producer.
pub async fn get_row<'e, E>(executor: E) -> Result<Option<Settings>, ApiError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as(
        r#"
        SELECT notification_frequency, active_tweetbook_id, start_time,
               end_time, random_mode
        FROM settings
        WHERE id = 1
        "#,
    )
    .fetch_optional(executor)
    .await?;

    Ok(row)
}

/// Apply a partial update. Returns whether any field was present (and the
/// row therefore touched); an all-absent patch executes nothing.
pub async fn update<'e, E>(executor: E, patch: &SettingsPatch) -> Result<bool, ApiError>
where
    E: Executor<'e, Database = Sqlite>,
{
    if patch.is_empty() {
        return Ok(false);
    }

    sqlx::query(
        r#"
        UPDATE settings SET
            notification_frequency = COALESCE(?, notification_frequency),
            active_tweetbook_id = COALESCE(?, active_tweetbook_id),
            start_time = COALESCE(?, start_time),
            end_time = COALESCE(?, end_time),
            random_mode = COALESCE(?, random_mode)
        WHERE id = 1
        "#,
    )
    .bind(patch.notification_frequency.as_deref())
    .bind(patch.active_tweetbook_id)
    .bind(patch.start_time.as_deref())
    .bind(patch.end_time.as_deref())
    .bind(patch.random_mode)
    .execute(executor)
    .await?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use crate::domain::tweetbooks;

    #[tokio::test]
    async fn test_defaults_joined_with_active_tweetbook() {
        let pool = test_pool().await;
        let view = get(&pool).await.unwrap();

        assert_eq!(view.notification_frequency, "hourly");
        assert_eq!(view.active_tweetbook_id, 1);
        assert_eq!(view.start_time, "09:00");
        assert_eq!(view.end_time, "17:00");
        assert!(view.random_mode);
        assert_eq!(view.active_tweetbook_name, "Default");
    }

    #[tokio::test]
    async fn test_partial_update_leaves_other_fields_alone() {
        let pool = test_pool().await;

        let patch = SettingsPatch {
            random_mode: Some(false),
            ..Default::default()
        };
        assert!(update(&pool, &patch).await.unwrap());

        let view = get(&pool).await.unwrap();
        assert!(!view.random_mode);
        assert_eq!(view.notification_frequency, "hourly");
        assert_eq!(view.start_time, "09:00");
        assert_eq!(view.end_time, "17:00");
        assert_eq!(view.active_tweetbook_id, 1);
    }

    #[tokio::test]
    async fn test_empty_patch_is_a_noop() {
        let pool = test_pool().await;
        assert!(!update(&pool, &SettingsPatch::default()).await.unwrap());

        let view = get(&pool).await.unwrap();
        assert!(view.random_mode);
    }

    #[tokio::test]
    async fn test_switching_active_tweetbook() {
        let pool = test_pool().await;
        let book = tweetbooks::create(&pool, "Jokes", None).await.unwrap();

        let patch = SettingsPatch {
            notification_frequency: Some("daily".to_string()),
            active_tweetbook_id: Some(book.id),
            start_time: Some("08:15".to_string()),
            ..Default::default()
        };
        assert!(update(&pool, &patch).await.unwrap());

        let view = get(&pool).await.unwrap();
        assert_eq!(view.notification_frequency, "daily");
        assert_eq!(view.active_tweetbook_id, book.id);
        assert_eq!(view.start_time, "08:15");
        assert_eq!(view.active_tweetbook_name, "Jokes");
    }
}
