use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use liga_store::{standings, tournaments};
use serde_json::{json, Value};

use super::ScopeQuery;
use crate::app::AppState;
use crate::error::ApiResult;

/// GET /api/standings?torneo_id= — table for the resolved tournament.
pub async fn standings(
    State(state): State<Arc<AppState>>,
    Query(scope): Query<ScopeQuery>,
) -> ApiResult<Json<Value>> {
    let (tournament, rows) = state.store.with_conn(|conn| {
        match tournaments::resolve(conn, scope.torneo_id.as_deref())? {
            Some(t) => Ok((Some(t), standings::compute(conn, t)?)),
            None => Ok((None, Vec::new())),
        }
    })?;
    Ok(Json(json!({ "torneo_id": tournament, "standings": rows })))
}
