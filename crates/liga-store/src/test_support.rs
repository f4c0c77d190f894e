//! Fixtures shared by the query tests.

use liga_core::types::{GameInput, GameStatus, PlayerInput, TeamInput, TournamentInput};
use rusqlite::Connection;

use crate::db::{configure, init_db};

pub fn league() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    configure(&conn).unwrap();
    init_db(&conn).unwrap();
    conn
}

pub fn tournament(conn: &Connection, name: &str) -> i64 {
    crate::tournaments::create(
        conn,
        &TournamentInput {
            name: name.into(),
            start_date: None,
            end_date: None,
        },
    )
    .unwrap()
    .id
}

pub fn team(conn: &Connection, name: &str) -> i64 {
    crate::teams::create(
        conn,
        &TeamInput {
            name: name.into(),
            manager: None,
        },
    )
    .unwrap()
    .id
}

pub fn player(conn: &Connection, team_id: i64, name: &str) -> i64 {
    crate::players::create(
        conn,
        &PlayerInput {
            team_id,
            name: name.into(),
            number: None,
            position: None,
        },
    )
    .unwrap()
    .id
}

pub fn final_game(home: i64, away: i64, home_runs: i64, away_runs: i64) -> GameInput {
    GameInput {
        tournament_id: None,
        home_team_id: home,
        away_team_id: away,
        date: "2026-05-01".into(),
        home_runs: Some(home_runs),
        away_runs: Some(away_runs),
        status: GameStatus::Final,
    }
}
