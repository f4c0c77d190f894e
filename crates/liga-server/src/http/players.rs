use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use liga_core::{types::PlayerInput, Validate};
use liga_store::{players, stats, tournaments, types::PlayerStats, Player};
use serde::Deserialize;

use super::ScopeQuery;
use crate::app::AppState;
use crate::error::ApiResult;

#[derive(Debug, Deserialize)]
pub struct PlayerFilter {
    pub equipo_id: Option<i64>,
}

/// GET /api/players?equipo_id=
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<PlayerFilter>,
) -> ApiResult<Json<Vec<Player>>> {
    let all = state
        .store
        .with_conn(|conn| players::list(conn, filter.equipo_id))?;
    Ok(Json(all))
}

/// POST /api/players
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PlayerInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Player>)> {
    let Json(input) = payload?;
    let input = input.validate()?;
    let player = state.store.with_conn(|conn| players::create(conn, &input))?;
    state.notifier.notify_general_update("players updated");
    Ok((StatusCode::CREATED, Json(player)))
}

/// GET /api/players/{id}
pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Player>> {
    Ok(Json(state.store.with_conn(|conn| players::get(conn, id))?))
}

/// PUT /api/players/{id} — also used for transfers between teams.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    payload: Result<Json<PlayerInput>, JsonRejection>,
) -> ApiResult<Json<Player>> {
    let Json(input) = payload?;
    let input = input.validate()?;
    let player = state
        .store
        .with_conn(|conn| players::update(conn, id, &input))?;
    state.notifier.notify_general_update("players updated");
    Ok(Json(player))
}

/// DELETE /api/players/{id} — removes the player's stat lines as well.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.store.with_conn(|conn| players::delete(conn, id))?;
    state.notifier.notify_general_update("players updated");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/players/{id}/stats?torneo_id= — all three lines for one tournament.
pub async fn stats(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Query(scope): Query<ScopeQuery>,
) -> ApiResult<Json<PlayerStats>> {
    let summary = state.store.with_conn(|conn| {
        let tournament = tournaments::resolve(conn, scope.torneo_id.as_deref())?;
        stats::player_summary(conn, id, tournament)
    })?;
    Ok(Json(summary))
}
