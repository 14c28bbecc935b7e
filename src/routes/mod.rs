pub mod settings;
pub mod tweetbooks;
pub mod tweets;

use axum::Router;
use std::sync::Arc;

use crate::AppState;

/// Build all routes for the API
pub fn build_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(settings::routes())
        .merge(tweetbooks::routes())
        .merge(tweets::routes())
}
