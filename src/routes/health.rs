use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;
use crate::store::keys;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness))
}

/// Reports uptime, catalog size and whether the store answers a read.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let store_healthy = state.store().get_raw(keys::HEALTH_PROBE_KEY).is_ok();
    let latency_us = start.elapsed().as_micros() as u64;
    let units = state.desk().await.catalog().total_units();

    let status = if store_healthy {
        StatusCode::OK
    } else {
        tracing::error!("Health probe failed to read the store");
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(serde_json::json!({
            "status": if store_healthy { "ok" } else { "degraded" },
            "uptimeSecs": state.uptime_secs(),
            "store": {
                "healthy": store_healthy,
                "latencyUs": latency_us,
            },
            "catalog": { "units": units },
        })),
    )
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}
