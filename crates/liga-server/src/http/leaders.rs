use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use liga_store::{leaders, leaders::LeaderCategory, tournaments};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LeadersQuery {
    pub torneo_id: Option<String>,
    pub limit: Option<usize>,
}

/// GET /api/leaders/{category}?torneo_id=&limit=
pub async fn leaders(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
    Query(query): Query<LeadersQuery>,
) -> ApiResult<Json<Value>> {
    let category: LeaderCategory = category.parse().map_err(ApiError::BadRequest)?;
    let cfg = &state.config.leaders;
    let limit = query
        .limit
        .unwrap_or(cfg.default_limit)
        .clamp(1, cfg.max_limit.max(1));

    let (tournament, rows) = state.store.with_conn(|conn| {
        match tournaments::resolve(conn, query.torneo_id.as_deref())? {
            Some(t) => Ok((Some(t), leaders::compute(conn, category, t, limit, cfg)?)),
            None => Ok((None, Vec::new())),
        }
    })?;
    Ok(Json(json!({
        "category": category,
        "torneo_id": tournament,
        "limit": limit,
        "leaders": rows,
    })))
}
