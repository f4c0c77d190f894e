use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::AppState;

/// GET /health — liveness probe, returns server metadata.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    let database = match state.store.ping() {
        Ok(()) => "ok",
        Err(e) => {
            tracing::error!("health check database ping failed: {e}");
            "error"
        }
    };
    Json(json!({
        "status": if database == "ok" { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "git_sha": env!("LIGA_GIT_SHA"),
        "database": database,
        "clients_connected": state.registry.count(),
    }))
}
