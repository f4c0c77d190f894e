//! Per-player stat lines: `ofensivas`, `pitcheo`, `defensivas`.
//!
//! The path names the kind; each kind has its own counters, so bodies are
//! decoded once the kind is known.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use liga_core::types::{DefensiveLine, OffensiveLine, PitchingLine, StatUpsert};
use liga_core::{StatKind, Validate};
use liga_store::{stats, stats::StatLine, tournaments, StoreError};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use super::ScopeQuery;
use crate::app::AppState;
use crate::error::{ApiError, ApiResult};

fn parse_kind(raw: &str) -> ApiResult<StatKind> {
    raw.parse::<StatKind>().map_err(ApiError::BadRequest)
}

#[derive(Debug, Deserialize)]
pub struct StatFilter {
    pub torneo_id: Option<String>,
    pub jugador_id: Option<i64>,
}

/// GET /api/stats/{kind}?torneo_id=&jugador_id= — lines in the resolved
/// tournament, empty when the league has none yet.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    Query(filter): Query<StatFilter>,
) -> ApiResult<Response> {
    match parse_kind(&kind)? {
        StatKind::Offensive => list_lines::<OffensiveLine>(&state, &filter),
        StatKind::Pitching => list_lines::<PitchingLine>(&state, &filter),
        StatKind::Defensive => list_lines::<DefensiveLine>(&state, &filter),
    }
}

fn list_lines<L: StatLine>(state: &AppState, filter: &StatFilter) -> ApiResult<Response> {
    let lines = state.store.with_conn(|conn| {
        match tournaments::resolve(conn, filter.torneo_id.as_deref())? {
            Some(t) => stats::list::<L>(conn, t, filter.jugador_id),
            None => Ok(Vec::new()),
        }
    })?;
    Ok(Json(lines).into_response())
}

/// PUT /api/stats/{kind} — insert or replace a player's totals, then emit
/// `stats-update`.
pub async fn upsert(
    State(state): State<Arc<AppState>>,
    Path(kind): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Response> {
    let kind = parse_kind(&kind)?;
    let Json(body) = payload?;
    match kind {
        StatKind::Offensive => upsert_line::<OffensiveLine>(&state, body),
        StatKind::Pitching => upsert_line::<PitchingLine>(&state, body),
        StatKind::Defensive => upsert_line::<DefensiveLine>(&state, body),
    }
}

fn upsert_line<L>(state: &AppState, body: Value) -> ApiResult<Response>
where
    L: StatLine + DeserializeOwned + Validate,
{
    let request: StatUpsert<L> =
        serde_json::from_value(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let request = request.validate()?;

    let record = state.store.with_conn(|conn| {
        let tournament = tournaments::require(conn, request.tournament_id)?;
        stats::upsert(conn, request.player_id, tournament, &request.line)
    })?;

    state
        .notifier
        .notify_stats_update(L::KIND, record.player_id, record.tournament_id);
    Ok(Json(record).into_response())
}

/// DELETE /api/stats/{kind}/{jugador_id}?torneo_id=
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path((kind, player_id)): Path<(String, i64)>,
    Query(scope): Query<ScopeQuery>,
) -> ApiResult<StatusCode> {
    let kind = parse_kind(&kind)?;
    let tournament = state.store.with_conn(|conn| {
        let tournament = tournaments::resolve(conn, scope.torneo_id.as_deref())?
            .ok_or(StoreError::NoTournament)?;
        stats::delete(conn, kind, player_id, tournament)?;
        Ok(tournament)
    })?;
    state.notifier.notify_stats_update(kind, player_id, tournament);
    Ok(StatusCode::NO_CONTENT)
}
