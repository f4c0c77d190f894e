//! Live update endpoints.
//!
//! `GET /api/live` holds a server-sent events stream open. The registry
//! writes the frames; this module only moves them from the client's queue
//! into the response body. Dropping the body (client gone) drops the
//! [`liga_live::Subscription`], which unsubscribes.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};

const DEFAULT_REFRESH_MESSAGE: &str = "data refreshed";

/// GET /api/live — subscribe to change notifications (text/event-stream).
pub async fn subscribe(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let (subscription, mut frames) = state.registry.open_channel()?;

    let body = async_stream::stream! {
        let _subscription = subscription;
        while let Some(frame) = frames.recv().await {
            yield Ok::<_, Infallible>(frame.encode());
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::HeaderName::from_static("x-accel-buffering"), "no"),
        ],
        Body::from_stream(body),
    )
        .into_response())
}

/// GET /api/live/status — number of open streams.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "active": true,
        "clients_connected": state.registry.count(),
        "max_clients": state.registry.max_clients(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub message: Option<String>,
}

/// POST /api/live/refresh — broadcast a `general-update` to every client.
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<Value>> {
    // The body is optional; an empty POST uses the default message.
    let request: RefreshRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RefreshRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };
    let message = request
        .message
        .map(|m| liga_core::validate::clean_text(&m))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_REFRESH_MESSAGE.to_string());

    let delivered = state.notifier.notify_general_update(&message);
    Ok(Json(json!({ "message": message, "delivered": delivered })))
}
