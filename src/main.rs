mod db;
mod domain;
mod error;
mod models;
mod notify;
mod routes;
mod scheduler;

use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use notify::ConsoleSink;
use scheduler::Scheduler;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub scheduler: Arc<Scheduler>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_path = std::env::var("TWEETUP_DB").unwrap_or_else(|_| "tweetup.db".to_string());
    let pool = db::connect(Path::new(&db_path))
        .await
        .expect("Failed to open database");
    db::init_db(&pool).await.expect("Failed to initialize database");

    let scheduler = Arc::new(Scheduler::new(pool.clone(), Arc::new(ConsoleSink)));
    // Derive the notification job from whatever settings are on disk.
    if let Err(e) = scheduler.recompute().await {
        tracing::error!("initial scheduler setup failed: {}", e);
    }

    let state = Arc::new(AppState {
        db: pool,
        scheduler,
    });
    let app = routes::build_routes().with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {}: {}", addr, e));

    tracing::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await.expect("Server failed");
}
