//! `liga-live`: live update fan-out for the league statistics service.
//!
//! A [`Registry`] owns every open subscriber stream. Mutation handlers call the
//! [`Notifier`], which shapes the event payload and publishes it to all of them.
//! A [`KeepaliveTask`] pings the registry on a fixed interval so dead streams are
//! pruned even when no events flow.

pub mod error;
pub mod frame;
pub mod keepalive;
pub mod notifier;
pub mod registry;
pub mod sink;

pub use error::{SinkError, SubscribeError};
pub use frame::Frame;
pub use keepalive::KeepaliveTask;
pub use notifier::Notifier;
pub use registry::{ClientId, Registry, Subscription};
pub use sink::ClientSink;
