use std::collections::BTreeMap;

use liga_core::types::GameStatus;
use serde::{Deserialize, Serialize};

/// A season. At most one is `active` at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: i64,
    pub name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub active: bool,
    /// RFC3339 creation timestamp.
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub manager: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    #[serde(rename = "equipo_id")]
    pub team_id: i64,
    #[serde(rename = "equipo_nombre")]
    pub team_name: String,
    pub name: String,
    pub number: Option<i64>,
    pub position: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    #[serde(rename = "torneo_id")]
    pub tournament_id: i64,
    #[serde(rename = "equipo_local_id")]
    pub home_team_id: i64,
    #[serde(rename = "equipo_local")]
    pub home_team_name: String,
    #[serde(rename = "equipo_visitante_id")]
    pub away_team_id: i64,
    #[serde(rename = "equipo_visitante")]
    pub away_team_name: String,
    pub date: String,
    #[serde(rename = "carreras_local")]
    pub home_runs: Option<i64>,
    #[serde(rename = "carreras_visitante")]
    pub away_runs: Option<i64>,
    pub status: GameStatus,
}

/// One player's stat line for one tournament, with derived rates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatRecord<L> {
    #[serde(rename = "jugador_id")]
    pub player_id: i64,
    #[serde(rename = "jugador_nombre")]
    pub player_name: String,
    #[serde(rename = "equipo_id")]
    pub team_id: i64,
    #[serde(rename = "torneo_id")]
    pub tournament_id: i64,
    #[serde(flatten)]
    pub line: L,
    pub rates: BTreeMap<&'static str, f64>,
    pub updated_at: String,
}

/// Everything recorded for one player in one tournament.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerStats {
    pub player: Player,
    #[serde(rename = "torneo_id")]
    pub tournament_id: Option<i64>,
    pub ofensivas: Option<StatRecord<liga_core::types::OffensiveLine>>,
    pub pitcheo: Option<StatRecord<liga_core::types::PitchingLine>>,
    pub defensivas: Option<StatRecord<liga_core::types::DefensiveLine>>,
}

/// One row of the standings table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingRow {
    #[serde(rename = "equipo_id")]
    pub team_id: i64,
    #[serde(rename = "equipo")]
    pub team_name: String,
    pub played: i64,
    pub wins: i64,
    pub losses: i64,
    pub ties: i64,
    pub runs_for: i64,
    pub runs_against: i64,
    pub run_diff: i64,
    pub win_pct: f64,
    pub games_behind: f64,
}

/// One row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderRow {
    pub rank: usize,
    #[serde(rename = "jugador_id")]
    pub player_id: i64,
    #[serde(rename = "jugador")]
    pub player_name: String,
    #[serde(rename = "equipo_id")]
    pub team_id: i64,
    #[serde(rename = "equipo")]
    pub team_name: String,
    pub value: f64,
}
