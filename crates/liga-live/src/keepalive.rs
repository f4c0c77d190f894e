use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::registry::Registry;

/// Background sweep that pings every open stream on a fixed period.
///
/// Half-open connections are only noticed on the next write, so the ping is
/// what eventually prunes clients that vanished without closing.
pub struct KeepaliveTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl KeepaliveTask {
    /// Spawn the sweep on the current runtime. The first ping goes out one
    /// full `period` after spawning.
    pub fn spawn(registry: Arc<Registry>, period: Duration) -> Self {
        let (shutdown, rx) = watch::channel(false);
        let handle = tokio::spawn(run(registry, period, rx));
        Self { shutdown, handle }
    }

    /// Signal the sweep to stop and wait for it to exit.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}

async fn run(registry: Arc<Registry>, period: Duration, mut shutdown: watch::Receiver<bool>) {
    info!(period_secs = period.as_secs(), "live keepalive started");
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let alive = registry.sweep();
                debug!(clients = alive, "live keepalive sweep");
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("live keepalive shutting down");
                    break;
                }
            }
        }
    }
}
