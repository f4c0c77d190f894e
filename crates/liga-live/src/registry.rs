use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::SubscribeError;
use crate::frame::{Frame, PING, PREAMBLE};
use crate::sink::ClientSink;

pub type ClientId = u64;

/// The set of open subscriber streams, bounded by `max_clients`.
///
/// Every read-modify-write of the set happens under one lock, so the capacity
/// check and the insert in [`Registry::subscribe`] cannot interleave with a
/// concurrent subscribe, publish or sweep.
pub struct Registry {
    max_clients: usize,
    client_buffer: usize,
    next_id: AtomicU64,
    closed: AtomicBool,
    clients: Mutex<HashMap<ClientId, Box<dyn ClientSink>>>,
}

impl Registry {
    pub fn new(max_clients: usize, client_buffer: usize) -> Self {
        Self {
            max_clients,
            client_buffer: client_buffer.max(1),
            next_id: AtomicU64::new(1),
            closed: AtomicBool::new(false),
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(cfg: &liga_core::config::LiveConfig) -> Self {
        Self::new(cfg.max_clients, cfg.client_buffer)
    }

    pub fn max_clients(&self) -> usize {
        self.max_clients
    }

    /// Number of currently open streams.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Admit a subscriber. The preamble is written before the sink joins the
    /// set, so it always precedes any event or ping. Refused once
    /// [`Registry::close_all`] has run.
    pub fn subscribe(&self, mut sink: Box<dyn ClientSink>) -> Result<ClientId, SubscribeError> {
        let mut clients = self.lock();
        if self.closed.load(Ordering::Acquire) {
            debug!("live subscribe rejected: registry closed");
            return Err(SubscribeError::Closed);
        }
        if clients.len() >= self.max_clients {
            warn!(limit = self.max_clients, "live subscribe rejected: at capacity");
            return Err(SubscribeError::AtCapacity {
                limit: self.max_clients,
            });
        }
        if sink.send(PREAMBLE).is_err() {
            return Err(SubscribeError::Closed);
        }
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        clients.insert(id, sink);
        info!(client_id = id, clients = clients.len(), "live client connected");
        Ok(id)
    }

    /// Remove a stream. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: ClientId) -> bool {
        let mut clients = self.lock();
        let removed = clients.remove(&id).is_some();
        if removed {
            info!(client_id = id, clients = clients.len(), "live client disconnected");
        }
        removed
    }

    /// Subscribe through a bounded channel and get back a guard that
    /// unsubscribes when dropped, plus the receiving half to stream from.
    pub fn open_channel(
        self: &Arc<Self>,
    ) -> Result<(Subscription, mpsc::Receiver<Frame>), SubscribeError> {
        let (tx, rx) = mpsc::channel(self.client_buffer);
        let id = self.subscribe(Box::new(tx))?;
        let guard = Subscription {
            id,
            registry: Arc::clone(self),
        };
        Ok((guard, rx))
    }

    /// Send `event` with a JSON payload to every open stream.
    ///
    /// Returns how many streams accepted the frame. Streams that fail the
    /// write are dropped from the set.
    pub fn publish<T: Serialize + ?Sized>(&self, event: &str, payload: &T) -> usize {
        let data = match serde_json::to_string(payload) {
            Ok(data) => data,
            Err(e) => {
                error!(event, "live payload serialization failed: {e}");
                return 0;
            }
        };
        let delivered = self.deliver(&Frame::event(event, &data));
        debug!(event, delivered, "live event published");
        delivered
    }

    /// Ping every open stream, pruning the ones that fail.
    pub fn sweep(&self) -> usize {
        self.deliver(&PING)
    }

    /// Drop every stream and stop admitting new ones. Their receivers see
    /// end-of-stream.
    pub fn close_all(&self) -> usize {
        let mut clients = self.lock();
        self.closed.store(true, Ordering::Release);
        let n = clients.len();
        clients.clear();
        if n > 0 {
            info!(clients = n, "live streams closed");
        }
        n
    }

    fn deliver(&self, frame: &Frame) -> usize {
        let mut clients = self.lock();
        let before = clients.len();
        clients.retain(|id, sink| match sink.send(frame.clone()) {
            Ok(()) => true,
            Err(e) => {
                debug!(client_id = *id, "dropping live client: {e}");
                false
            }
        });
        let after = clients.len();
        if after < before {
            info!(pruned = before - after, clients = after, "pruned dead live clients");
        }
        after
    }

    // A panic inside a sink leaves the map itself consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<ClientId, Box<dyn ClientSink>>> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Keeps one stream registered; unsubscribes on drop.
pub struct Subscription {
    id: ClientId,
    registry: Arc<Registry>,
}

impl Subscription {
    pub fn id(&self) -> ClientId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.unsubscribe(self.id);
    }
}
