//! Tweetbook endpoints

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::AppState;
use crate::domain::tweetbooks;
use crate::error::ApiError;
use crate::models::Tweetbook;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/tweetbooks", get(list_tweetbooks).post(create_tweetbook))
}

#[derive(Debug, Deserialize)]
struct CreateTweetbookRequest {
    name: Option<String>,
    description: Option<String>,
}

/// GET /api/tweetbooks - list all tweetbooks
async fn list_tweetbooks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Tweetbook>>, ApiError> {
    Ok(Json(tweetbooks::list(&state.db).await?))
}

/// POST /api/tweetbooks - create a named collection
async fn create_tweetbook(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTweetbookRequest>,
) -> Result<(StatusCode, Json<Tweetbook>), ApiError> {
    let name = req
        .name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ApiError::Validation("Tweetbook name is required".to_string()))?;

    let book = tweetbooks::create(&state.db, &name, req.description.as_deref()).await?;
    Ok((StatusCode::CREATED, Json(book)))
}
