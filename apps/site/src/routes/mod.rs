pub mod health;
pub mod proxy;

use axum::{
    routing::{any, get},
    Json, Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::models::timeline::TimelineEntry;
use crate::state::AppState;
use crate::timeline::timeline_entries;

/// GET /data/timeline.json
async fn timeline_handler() -> Json<Vec<TimelineEntry>> {
    Json(timeline_entries())
}

/// `/api` goes to the backend; everything else is the static bundle, with
/// `index.html` answering any path that is not a file (client-side routing).
pub fn build_router(state: AppState) -> Router {
    let index = state.static_dir.join("index.html");
    let bundle = ServeDir::new(&state.static_dir).fallback(ServeFile::new(index));

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/data/timeline.json", get(timeline_handler))
        .route("/api", any(proxy::proxy_handler))
        .route("/api/", any(proxy::proxy_handler))
        .route("/api/*rest", any(proxy::proxy_handler))
        .fallback_service(bundle)
        .with_state(state)
}
