pub mod games;
pub mod health;
pub mod leaders;
pub mod live;
pub mod players;
pub mod standings;
pub mod stats;
pub mod teams;
pub mod tournaments;

use serde::Deserialize;

/// `?torneo_id=` as sent by the client. Kept as text so the tournament
/// resolver decides what an unparsable value means.
#[derive(Debug, Default, Deserialize)]
pub struct ScopeQuery {
    pub torneo_id: Option<String>,
}
