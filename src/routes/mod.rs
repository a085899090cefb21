pub mod auth;
pub mod catalog;
pub mod health;
pub mod progress;
pub mod study;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use crate::middleware::request_id;
use crate::state::AppState;

/// Request bodies are small JSON commands.
const MAX_BODY_SIZE: usize = 64 * 1024;

const STATIC_DIR: &str = "static";

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .nest("/auth", auth::router())
        .nest("/textbooks", catalog::router())
        .nest("/progress", progress::router())
        .nest("/study", study::router())
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE));

    // Client bundle, with SPA fallback to index.html.
    let spa = ServeDir::new(STATIC_DIR)
        .not_found_service(ServeFile::new(format!("{STATIC_DIR}/index.html")));

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health::router())
        .fallback_service(spa)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .with_state(state)
}
