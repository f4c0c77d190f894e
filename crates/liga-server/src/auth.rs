//! Admin token check for mutating requests.
//!
//! When `server.admin_token` is set, every POST/PUT/DELETE must carry
//! `Authorization: Bearer <token>`. Reads and the live stream stay open.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::app::AppState;
use crate::error::ApiError;

pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if is_mutation(req.method()) && !check_auth(&state, req.headers()) {
        warn!(method = %req.method(), path = %req.uri().path(), "rejected unauthenticated write");
        return Err(ApiError::Unauthorized);
    }
    Ok(next.run(req).await)
}

fn is_mutation(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
}

pub(crate) fn check_auth(state: &AppState, headers: &HeaderMap) -> bool {
    match state.config.server.admin_token.as_deref() {
        None => true,
        Some(expected) => extract_bearer(headers).is_some_and(|t| t == expected),
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}
