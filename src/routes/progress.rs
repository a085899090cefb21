use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::auth::AuthUser;
use crate::response::ok;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_progress))
        .route("/summary", get(get_summary))
}

/// Raw stage flags and repetition counters, keyed by unit id.
async fn get_progress(_user: AuthUser, State(state): State<AppState>) -> impl IntoResponse {
    let desk = state.desk().await;
    ok(serde_json::json!({
        "progress": desk.progress().progress(),
        "stats": desk.progress().stats(),
    }))
}

async fn get_summary(user: AuthUser, State(state): State<AppState>) -> impl IntoResponse {
    let desk = state.desk().await;
    let summary = desk.progress().summary(desk.catalog());
    ok(serde_json::json!({
        "name": user.name,
        "summary": summary,
    }))
}
