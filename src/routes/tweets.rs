//! Tweet endpoints

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::AppState;
use crate::domain::tweets;
use crate::error::ApiError;
use crate::models::Tweet;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/tweets", post(save_tweet))
        .route("/api/tweets/random", get(random_tweet))
        .route("/api/tweets/tweetbook/{tweetbook_id}", get(list_by_tweetbook))
        .route("/api/tweets/{id}", delete(delete_tweet))
}

#[derive(Debug, Deserialize)]
struct SaveTweetRequest {
    tweet_id: Option<String>,
    content: Option<String>,
    author: Option<String>,
    tweetbook_id: Option<i64>,
}

/// POST /api/tweets - save a post into a tweetbook
async fn save_tweet(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveTweetRequest>,
) -> Result<(StatusCode, Json<Tweet>), ApiError> {
    let (Some(tweet_id), Some(content), Some(author)) = (
        req.tweet_id.filter(|v| !v.is_empty()),
        req.content.filter(|v| !v.is_empty()),
        req.author.filter(|v| !v.is_empty()),
    ) else {
        return Err(ApiError::Validation(
            "Tweet ID, content, and author are required".to_string(),
        ));
    };

    let tweet = tweets::save(&state.db, &tweet_id, &content, &author, req.tweetbook_id).await?;
    Ok((StatusCode::CREATED, Json(tweet)))
}

/// GET /api/tweets/tweetbook/{id} - list a tweetbook's tweets, newest first
async fn list_by_tweetbook(
    State(state): State<Arc<AppState>>,
    Path(tweetbook_id): Path<i64>,
) -> Result<Json<Vec<Tweet>>, ApiError> {
    Ok(Json(tweets::list_by_tweetbook(&state.db, tweetbook_id).await?))
}

#[derive(Debug, Deserialize)]
struct RandomTweetQuery {
    // Taken as a raw string so a non-integer value maps to the 400 message
    // body instead of a framework rejection.
    tweetbook_id: Option<String>,
}

/// GET /api/tweets/random - pick a random tweet and mark it shown
async fn random_tweet(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RandomTweetQuery>,
) -> Result<Json<Tweet>, ApiError> {
    let tweetbook_id = match query.tweetbook_id.as_deref() {
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| ApiError::Validation("Invalid tweetbook ID".to_string()))?,
        ),
        None => None,
    };

    let tweet = tweets::random(&state.db, tweetbook_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No tweets found".to_string()))?;

    Ok(Json(tweet))
}

/// DELETE /api/tweets/{id} - hard-delete a saved tweet
async fn delete_tweet(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if tweets::delete(&state.db, id).await? {
        Ok(Json(json!({ "message": "Tweet deleted successfully" })))
    } else {
        Err(ApiError::NotFound("Tweet not found".to_string()))
    }
}
