use thiserror::Error;

/// Why a subscriber was not admitted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubscribeError {
    #[error("live update capacity reached ({limit} clients)")]
    AtCapacity { limit: usize },

    #[error("live stream closed")]
    Closed,
}

impl SubscribeError {
    /// Short error code string sent to clients in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            SubscribeError::AtCapacity { .. } => "CAPACITY",
            SubscribeError::Closed => "STREAM_CLOSED",
        }
    }
}

/// A failed write to one subscriber. Never surfaced past the registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("client is not keeping up")]
    Full,

    #[error("client disconnected")]
    Closed,
}
