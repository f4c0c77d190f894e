//! `liga-server`: HTTP API for the league statistics service.
//!
//! REST endpoints over teams, players, tournaments, games and stat lines,
//! derived standings and leaderboards, and a server-sent events stream that
//! pushes change notifications to connected clients.

pub mod app;
pub mod auth;
pub mod error;
pub mod http;

pub use app::{build_router, AppState};
pub use error::{ApiError, ApiResult};
