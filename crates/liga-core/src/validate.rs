//! Payload validation and sanitizing.
//!
//! Every mutation body passes through [`Validate::validate`] before it
//! reaches storage. The result is either the sanitized payload or the full
//! list of problems found, so a client can fix a form in one round trip.

use serde::Serialize;

use crate::types::{
    DefensiveLine, GameInput, GameStatus, OffensiveLine, PitchingLine, PlayerInput, StatUpsert,
    TeamInput, TournamentInput,
};

pub const MAX_NAME_LEN: usize = 100;

/// Every problem found in one payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<String>,
}

impl ValidationErrors {
    fn push(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.errors.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub trait Validate: Sized {
    /// Check the payload and return it with strings normalized.
    fn validate(self) -> Result<Self, ValidationErrors>;
}

/// Trim and collapse inner whitespace runs to a single space.
pub fn clean_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn required_name(field: &str, raw: &str, errs: &mut ValidationErrors) -> String {
    let name = clean_text(raw);
    if name.is_empty() {
        errs.push(format!("{field} is required"));
    } else if name.chars().count() > MAX_NAME_LEN {
        errs.push(format!("{field} must be at most {MAX_NAME_LEN} characters"));
    }
    name
}

fn optional_text(raw: Option<String>) -> Option<String> {
    raw.map(|s| clean_text(&s)).filter(|s| !s.is_empty())
}

fn check_date(field: &str, value: &str, errs: &mut ValidationErrors) {
    if chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        errs.push(format!("{field} must be a YYYY-MM-DD date"));
    }
}

fn non_negative(pairs: &[(&str, i64)], errs: &mut ValidationErrors) {
    for (field, value) in pairs {
        if *value < 0 {
            errs.push(format!("{field} must not be negative"));
        }
    }
}

impl Validate for TournamentInput {
    fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errs = ValidationErrors::default();
        let name = required_name("name", &self.name, &mut errs);
        let start_date = optional_text(self.start_date);
        let end_date = optional_text(self.end_date);
        if let Some(ref d) = start_date {
            check_date("start_date", d, &mut errs);
        }
        if let Some(ref d) = end_date {
            check_date("end_date", d, &mut errs);
        }
        // ISO dates compare correctly as strings.
        if let (Some(s), Some(e)) = (&start_date, &end_date) {
            if errs.errors.is_empty() && e < s {
                errs.push("end_date must not be before start_date");
            }
        }
        errs.into_result(Self {
            name,
            start_date,
            end_date,
        })
    }
}

impl Validate for TeamInput {
    fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errs = ValidationErrors::default();
        let name = required_name("name", &self.name, &mut errs);
        let manager = optional_text(self.manager);
        errs.into_result(Self { name, manager })
    }
}

impl Validate for PlayerInput {
    fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errs = ValidationErrors::default();
        let name = required_name("name", &self.name, &mut errs);
        if self.team_id <= 0 {
            errs.push("equipo_id must be a positive id");
        }
        if let Some(n) = self.number {
            if !(0..=99).contains(&n) {
                errs.push("number must be between 0 and 99");
            }
        }
        let position = optional_text(self.position).map(|p| p.to_uppercase());
        errs.into_result(Self {
            team_id: self.team_id,
            name,
            number: self.number,
            position,
        })
    }
}

impl Validate for GameInput {
    fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errs = ValidationErrors::default();
        if self.home_team_id <= 0 || self.away_team_id <= 0 {
            errs.push("team ids must be positive");
        } else if self.home_team_id == self.away_team_id {
            errs.push("a team cannot play itself");
        }
        let date = self.date.trim().to_string();
        check_date("date", &date, &mut errs);
        non_negative(
            &[
                ("carreras_local", self.home_runs.unwrap_or(0)),
                ("carreras_visitante", self.away_runs.unwrap_or(0)),
            ],
            &mut errs,
        );
        if self.status == GameStatus::Final
            && (self.home_runs.is_none() || self.away_runs.is_none())
        {
            errs.push("a finished game needs both scores");
        }
        errs.into_result(Self { date, ..self })
    }
}

impl Validate for OffensiveLine {
    fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errs = ValidationErrors::default();
        non_negative(
            &[
                ("plate_appearances", self.plate_appearances),
                ("at_bats", self.at_bats),
                ("hits", self.hits),
                ("doubles", self.doubles),
                ("triples", self.triples),
                ("home_runs", self.home_runs),
                ("rbi", self.rbi),
                ("runs", self.runs),
                ("walks", self.walks),
                ("strikeouts", self.strikeouts),
                ("stolen_bases", self.stolen_bases),
                ("hit_by_pitch", self.hit_by_pitch),
                ("sacrifice_flies", self.sacrifice_flies),
            ],
            &mut errs,
        );
        if self.hits > self.at_bats {
            errs.push("hits cannot exceed at_bats");
        }
        let extra_base = self
            .doubles
            .checked_add(self.triples)
            .and_then(|n| n.checked_add(self.home_runs));
        match extra_base {
            Some(n) if n <= self.hits => {}
            Some(_) => errs.push("extra-base hits cannot exceed hits"),
            None => errs.push("extra-base hit counts are out of range"),
        }
        if self.strikeouts > self.at_bats {
            errs.push("strikeouts cannot exceed at_bats");
        }
        errs.into_result(self)
    }
}

impl Validate for PitchingLine {
    fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errs = ValidationErrors::default();
        if !self.innings_pitched.is_finite() || self.innings_pitched < 0.0 {
            errs.push("innings_pitched must be a non-negative number");
        }
        non_negative(
            &[
                ("hits_allowed", self.hits_allowed),
                ("runs_allowed", self.runs_allowed),
                ("earned_runs", self.earned_runs),
                ("walks_allowed", self.walks_allowed),
                ("strikeouts", self.strikeouts),
                ("wins", self.wins),
                ("losses", self.losses),
                ("saves", self.saves),
            ],
            &mut errs,
        );
        if self.earned_runs > self.runs_allowed {
            errs.push("earned_runs cannot exceed runs_allowed");
        }
        errs.into_result(self)
    }
}

impl Validate for DefensiveLine {
    fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errs = ValidationErrors::default();
        non_negative(
            &[
                ("putouts", self.putouts),
                ("assists", self.assists),
                ("errors", self.errors),
                ("double_plays", self.double_plays),
            ],
            &mut errs,
        );
        errs.into_result(self)
    }
}

impl<L: Validate> Validate for StatUpsert<L> {
    fn validate(self) -> Result<Self, ValidationErrors> {
        let mut errs = ValidationErrors::default();
        if self.player_id <= 0 {
            errs.push("jugador_id must be a positive id");
        }
        if matches!(self.tournament_id, Some(id) if id <= 0) {
            errs.push("torneo_id must be a positive id");
        }
        let line = match self.line.validate() {
            Ok(line) => Some(line),
            Err(inner) => {
                errs.errors.extend(inner.errors);
                None
            }
        };
        match line {
            Some(line) if errs.errors.is_empty() => Ok(Self { line, ..self }),
            _ => Err(errs),
        }
    }
}
