//! Tournament CRUD, activation and the "current tournament" lookup.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use liga_core::{types::TournamentInput, Validate};
use liga_store::{tournaments, Tournament};
use serde_json::{json, Value};

use super::ScopeQuery;
use crate::app::AppState;
use crate::error::ApiResult;

/// GET /api/tournaments — newest first.
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Tournament>>> {
    let all = state.store.with_conn(|conn| tournaments::list(conn))?;
    Ok(Json(all))
}

/// POST /api/tournaments
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TournamentInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Tournament>)> {
    let Json(input) = payload?;
    let input = input.validate()?;
    let created = state.store.with_conn(|conn| tournaments::create(conn, &input))?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/tournaments/{id}
pub async fn get_one(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Tournament>> {
    Ok(Json(state.store.with_conn(|conn| tournaments::get(conn, id))?))
}

/// PUT /api/tournaments/{id}
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    payload: Result<Json<TournamentInput>, JsonRejection>,
) -> ApiResult<Json<Tournament>> {
    let Json(input) = payload?;
    let input = input.validate()?;
    let updated = state
        .store
        .with_conn(|conn| tournaments::update(conn, id, &input))?;
    Ok(Json(updated))
}

/// DELETE /api/tournaments/{id} — also removes its games and stat lines.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.store.with_conn(|conn| tournaments::delete(conn, id))?;
    state.notifier.notify_general_update("tournament deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/tournaments/{id}/activate — make it the only active tournament
/// and tell live clients.
pub async fn activate(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Tournament>> {
    let activated = state.store.with_conn(|conn| tournaments::activate(conn, id))?;
    state
        .notifier
        .notify_tournament_change(activated.id, &activated.name);
    Ok(Json(activated))
}

/// GET /api/tournaments/current?torneo_id= — what unscoped requests resolve to.
///
/// `torneo_id` is `null` when the league has no tournaments yet.
pub async fn current(
    State(state): State<Arc<AppState>>,
    Query(scope): Query<ScopeQuery>,
) -> ApiResult<Json<Value>> {
    let (id, tournament) = state.store.with_conn(|conn| {
        let id = tournaments::resolve(conn, scope.torneo_id.as_deref())?;
        let tournament = match id {
            Some(id) => tournaments::find(conn, id)?,
            None => None,
        };
        Ok((id, tournament))
    })?;
    Ok(Json(json!({ "torneo_id": id, "tournament": tournament })))
}
