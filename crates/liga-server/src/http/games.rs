//! Game schedule and results. Every change emits a `general-update`, since
//! a result moves standings for two teams at once.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use liga_core::{types::GameInput, Validate};
use liga_store::{games, tournaments, Game};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiResult;

#[derive(Debug, Deserialize)]
pub struct GameFilter {
    pub torneo_id: Option<i64>,
    pub equipo_id: Option<i64>,
}

/// GET /api/games?torneo_id=&equipo_id= — date order; no filter lists every game.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<GameFilter>,
) -> ApiResult<Json<Vec<Game>>> {
    let all = state
        .store
        .with_conn(|conn| games::list(conn, filter.torneo_id, filter.equipo_id))?;
    Ok(Json(all))
}

/// POST /api/games — `torneo_id` defaults to the current tournament.
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GameInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Game>)> {
    let Json(input) = payload?;
    let input = input.validate()?;
    let game = state.store.with_conn(|conn| {
        let tournament = tournaments::require(conn, input.tournament_id)?;
        games::create(conn, tournament, &input)
    })?;
    state.notifier.notify_general_update("games updated");
    Ok((StatusCode::CREATED, Json(game)))
}

/// GET /api/games/{id}
pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Game>> {
    Ok(Json(state.store.with_conn(|conn| games::get(conn, id))?))
}

/// PUT /api/games/{id} — reschedule or record the final score.
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    payload: Result<Json<GameInput>, JsonRejection>,
) -> ApiResult<Json<Game>> {
    let Json(input) = payload?;
    let input = input.validate()?;
    let game = state.store.with_conn(|conn| {
        // A body without torneo_id keeps the game where it is.
        let tournament = match input.tournament_id {
            Some(t) => t,
            None => games::get(conn, id)?.tournament_id,
        };
        games::update(conn, id, tournament, &input)
    })?;
    state.notifier.notify_general_update("games updated");
    Ok(Json(game))
}

/// DELETE /api/games/{id}
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.store.with_conn(|conn| games::delete(conn, id))?;
    state.notifier.notify_general_update("games updated");
    Ok(StatusCode::NO_CONTENT)
}
