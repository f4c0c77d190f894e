use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three per-player stat lines a scorekeeper can upsert.
///
/// The wire names are the ones clients already subscribe to in
/// `stats-update` events, so they are kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    #[serde(rename = "ofensivas")]
    Offensive,
    #[serde(rename = "pitcheo")]
    Pitching,
    #[serde(rename = "defensivas")]
    Defensive,
}

impl StatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatKind::Offensive => "ofensivas",
            StatKind::Pitching => "pitcheo",
            StatKind::Defensive => "defensivas",
        }
    }

    /// Backing table for this stat line.
    pub fn table(&self) -> &'static str {
        match self {
            StatKind::Offensive => "estadisticas_ofensivas",
            StatKind::Pitching => "estadisticas_pitcheo",
            StatKind::Defensive => "estadisticas_defensivas",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ofensivas" => Ok(StatKind::Offensive),
            "pitcheo" => Ok(StatKind::Pitching),
            "defensivas" => Ok(StatKind::Defensive),
            other => Err(format!(
                "unknown stat kind '{other}' (expected ofensivas, pitcheo or defensivas)"
            )),
        }
    }
}

/// Game lifecycle. Only finished games count towards standings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    #[serde(rename = "programado")]
    Scheduled,
    #[serde(rename = "finalizado")]
    Final,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "programado",
            GameStatus::Final => "finalizado",
        }
    }
}

impl FromStr for GameStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "programado" => Ok(GameStatus::Scheduled),
            "finalizado" => Ok(GameStatus::Final),
            other => Err(format!("unknown game status '{other}'")),
        }
    }
}

// ── Mutation payloads ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentInput {
    pub name: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamInput {
    pub name: String,
    #[serde(default)]
    pub manager: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInput {
    #[serde(rename = "equipo_id")]
    pub team_id: i64,
    pub name: String,
    #[serde(default)]
    pub number: Option<i64>,
    #[serde(default)]
    pub position: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameInput {
    /// Omitted means "current tournament".
    #[serde(rename = "torneo_id", default)]
    pub tournament_id: Option<i64>,
    #[serde(rename = "equipo_local_id")]
    pub home_team_id: i64,
    #[serde(rename = "equipo_visitante_id")]
    pub away_team_id: i64,
    pub date: String,
    #[serde(rename = "carreras_local", default)]
    pub home_runs: Option<i64>,
    #[serde(rename = "carreras_visitante", default)]
    pub away_runs: Option<i64>,
    #[serde(default)]
    pub status: GameStatus,
}

/// Season batting totals for one player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffensiveLine {
    pub plate_appearances: i64,
    pub at_bats: i64,
    pub hits: i64,
    pub doubles: i64,
    pub triples: i64,
    pub home_runs: i64,
    pub rbi: i64,
    pub runs: i64,
    pub walks: i64,
    pub strikeouts: i64,
    pub stolen_bases: i64,
    pub hit_by_pitch: i64,
    pub sacrifice_flies: i64,
}

impl OffensiveLine {
    /// Singles count once, so each extra-base hit adds its extra bases to `hits`.
    /// Saturates instead of overflowing on rows that never went through validation.
    pub fn total_bases(&self) -> i64 {
        self.hits
            .saturating_add(self.doubles)
            .saturating_add(self.triples.saturating_mul(2))
            .saturating_add(self.home_runs.saturating_mul(3))
    }

    pub fn avg(&self) -> f64 {
        round3(ratio(self.hits as f64, self.at_bats as f64))
    }

    pub fn obp(&self) -> f64 {
        let on_base = self.hits as f64 + self.walks as f64 + self.hit_by_pitch as f64;
        let chances = self.at_bats as f64
            + self.walks as f64
            + self.hit_by_pitch as f64
            + self.sacrifice_flies as f64;
        round3(ratio(on_base, chances))
    }

    pub fn slg(&self) -> f64 {
        round3(ratio(self.total_bases() as f64, self.at_bats as f64))
    }

    pub fn ops(&self) -> f64 {
        round3(self.obp() + self.slg())
    }
}

/// Season pitching totals. `innings_pitched` is in real innings (6⅔ = 6.667).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitchingLine {
    pub innings_pitched: f64,
    pub hits_allowed: i64,
    pub runs_allowed: i64,
    pub earned_runs: i64,
    pub walks_allowed: i64,
    pub strikeouts: i64,
    pub wins: i64,
    pub losses: i64,
    pub saves: i64,
}

impl PitchingLine {
    pub fn era(&self) -> f64 {
        round2(ratio(9.0 * self.earned_runs as f64, self.innings_pitched))
    }

    pub fn whip(&self) -> f64 {
        let baserunners = self.walks_allowed as f64 + self.hits_allowed as f64;
        round2(ratio(baserunners, self.innings_pitched))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefensiveLine {
    pub putouts: i64,
    pub assists: i64,
    pub errors: i64,
    pub double_plays: i64,
}

impl DefensiveLine {
    pub fn chances(&self) -> i64 {
        self.putouts
            .saturating_add(self.assists)
            .saturating_add(self.errors)
    }

    pub fn fielding_pct(&self) -> f64 {
        let clean = self.putouts as f64 + self.assists as f64;
        round3(ratio(clean, clean + self.errors as f64))
    }
}

/// Body of `PUT /api/stats/{kind}`: the counters plus who and when.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatUpsert<L> {
    #[serde(rename = "jugador_id")]
    pub player_id: i64,
    /// Omitted means "current tournament".
    #[serde(rename = "torneo_id", default)]
    pub tournament_id: Option<i64>,
    #[serde(flatten)]
    pub line: L,
}

/// Division that treats an empty denominator as zero.
pub fn ratio(num: f64, den: f64) -> f64 {
    if den <= 0.0 {
        0.0
    } else {
        num / den
    }
}

pub fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
