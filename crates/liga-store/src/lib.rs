//! `liga-store`: SQLite persistence for teams, players,
//! tournaments, games and per-player stat lines, plus the aggregation
//! queries behind standings and leaderboards.
//!
//! Every query function takes a plain `&Connection` so it can run inside a
//! transaction or against an in-memory database in tests. [`LeagueStore`]
//! owns the process-wide connection and hands it out under a mutex.

pub mod db;
pub mod error;
pub mod games;
pub mod leaders;
pub mod players;
pub mod standings;
pub mod stats;
pub mod store;
pub mod teams;
pub mod tournaments;
pub mod types;

pub use error::{Result, StoreError};
pub use store::LeagueStore;
pub use types::{Game, Player, Team, Tournament};

#[cfg(test)]
mod test_support;
