//! Event payloads pushed to live clients after successful writes.
//!
//! Events are refetch hints, not a source of truth: nothing is persisted or
//! replayed to late subscribers.

use std::sync::Arc;

use chrono::Utc;
use liga_core::StatKind;
use serde::Serialize;

use crate::registry::Registry;

pub const STATS_UPDATE: &str = "stats-update";
pub const TOURNAMENT_CHANGE: &str = "tournament-change";
pub const GENERAL_UPDATE: &str = "general-update";

#[derive(Debug, Clone, Serialize)]
pub struct StatsUpdate {
    pub tipo: StatKind,
    pub jugador_id: i64,
    pub torneo_id: i64,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TournamentChange {
    pub torneo_id: i64,
    pub torneo_nombre: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneralUpdate {
    pub message: String,
    pub timestamp: String,
}

/// Shapes events and hands them to the registry. Cheap to clone.
#[derive(Clone)]
pub struct Notifier {
    registry: Arc<Registry>,
}

impl Notifier {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// After a stat line for a player was written.
    pub fn notify_stats_update(&self, kind: StatKind, jugador_id: i64, torneo_id: i64) -> usize {
        let payload = StatsUpdate {
            tipo: kind,
            jugador_id,
            torneo_id,
            timestamp: now(),
        };
        self.registry.publish(STATS_UPDATE, &payload)
    }

    /// After a tournament became the active one.
    pub fn notify_tournament_change(&self, torneo_id: i64, torneo_nombre: &str) -> usize {
        let payload = TournamentChange {
            torneo_id,
            torneo_nombre: torneo_nombre.to_string(),
            timestamp: now(),
        };
        self.registry.publish(TOURNAMENT_CHANGE, &payload)
    }

    /// Coarse "refetch everything" hint.
    pub fn notify_general_update(&self, message: &str) -> usize {
        let payload = GeneralUpdate {
            message: message.to_string(),
            timestamp: now(),
        };
        self.registry.publish(GENERAL_UPDATE, &payload)
    }
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::testing::Recorder;
    use serde_json::Value;

    fn data_of(frame: &str) -> Value {
        let data = frame
            .lines()
            .find_map(|l| l.strip_prefix("data: "))
            .expect("frame has a data line");
        serde_json::from_str(data).unwrap()
    }

    #[test]
    fn stats_update_reaches_every_subscriber() {
        let reg = Arc::new(Registry::new(100, 8));
        let clients: Vec<Recorder> = (0..3).map(|_| Recorder::default()).collect();
        for c in &clients {
            reg.subscribe(c.boxed()).unwrap();
        }
        let notifier = Notifier::new(Arc::clone(&reg));

        assert_eq!(notifier.notify_stats_update(StatKind::Offensive, 10, 2), 3);

        for c in &clients {
            let frame = c.last().unwrap();
            assert!(frame.starts_with("event: stats-update\n"));
            assert!(frame.contains(r#""tipo":"ofensivas""#));
            assert!(frame.contains(r#""jugador_id":10"#));
            assert!(frame.contains(r#""torneo_id":2"#));
            let data = data_of(&frame);
            assert!(data["timestamp"].as_str().is_some());
        }
    }

    #[test]
    fn tournament_change_payload() {
        let reg = Arc::new(Registry::new(100, 8));
        let rec = Recorder::default();
        reg.subscribe(rec.boxed()).unwrap();
        Notifier::new(reg).notify_tournament_change(7, "Apertura 2026");

        let frame = rec.last().unwrap();
        assert!(frame.starts_with("event: tournament-change\n"));
        let data = data_of(&frame);
        assert_eq!(data["torneo_id"], 7);
        assert_eq!(data["torneo_nombre"], "Apertura 2026");
        assert!(chrono::DateTime::parse_from_rfc3339(data["timestamp"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn general_update_with_no_subscribers() {
        let reg = Arc::new(Registry::new(100, 8));
        assert_eq!(Notifier::new(reg).notify_general_update("recalculado"), 0);
    }
}
