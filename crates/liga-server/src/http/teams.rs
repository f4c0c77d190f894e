use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use liga_core::{types::TeamInput, Validate};
use liga_store::{players, teams, Player, Team};

use crate::app::AppState;
use crate::error::ApiResult;

/// GET /api/teams — alphabetical.
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Team>>> {
    Ok(Json(state.store.with_conn(|conn| teams::list(conn))?))
}

/// POST /api/teams
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TeamInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    let Json(input) = payload?;
    let input = input.validate()?;
    let team = state.store.with_conn(|conn| teams::create(conn, &input))?;
    state.notifier.notify_general_update("teams updated");
    Ok((StatusCode::CREATED, Json(team)))
}

/// GET /api/teams/{id}
pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Team>> {
    Ok(Json(state.store.with_conn(|conn| teams::get(conn, id))?))
}

/// PUT /api/teams/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    payload: Result<Json<TeamInput>, JsonRejection>,
) -> ApiResult<Json<Team>> {
    let Json(input) = payload?;
    let input = input.validate()?;
    let team = state.store.with_conn(|conn| teams::update(conn, id, &input))?;
    state.notifier.notify_general_update("teams updated");
    Ok(Json(team))
}

/// DELETE /api/teams/{id} — refused with 409 while the team has players.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.store.with_conn(|conn| teams::delete(conn, id))?;
    state.notifier.notify_general_update("teams updated");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/teams/{id}/players
pub async fn roster(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<Player>>> {
    let roster = state.store.with_conn(|conn| {
        teams::get(conn, id)?;
        players::list(conn, Some(id))
    })?;
    Ok(Json(roster))
}
