//! Settings endpoints
//!
//! A successful partial update that touched at least one field triggers a
//! scheduler recompute; an empty patch succeeds without one.

use axum::{Json, Router, extract::State, routing::get};
use serde_json::json;
use std::sync::Arc;

use crate::AppState;
use crate::domain::settings::{self, SettingsPatch};
use crate::error::ApiError;
use crate::models::SettingsView;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/settings", get(get_settings).put(update_settings))
}

/// GET /api/settings - settings plus the active tweetbook's name
async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SettingsView>, ApiError> {
    Ok(Json(settings::get(&state.db).await?))
}

/// PUT /api/settings - partial update; only supplied fields change
async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let changed = settings::update(&state.db, &patch).await?;
    if changed {
        state.scheduler.recompute().await?;
    }

    Ok(Json(json!({ "message": "Settings updated successfully" })))
}
