//! Consumer seam: how discovery outcomes reach interested callers.

use std::sync::Arc;

use crate::session::Collection;
use crate::types::{ConnectionId, TransportError};

/// Final result of discovering one registered collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryOutcome {
	/// The collection was found and its items and sub-items resolved.
	Complete(Collection),
	/// The peer does not expose the registered collection.
	NotFound,
	/// Discovery aborted on a transport failure while this collection was
	/// being resolved.
	Failed(TransportError),
}

/// Receives the discovery outcome for one registered collection id.
///
/// Outcomes are delivered from the transport's event-delivery context, after
/// every registration has resolved (or immediately on a transport failure).
pub trait DiscoveryConsumer: Send + Sync {
	/// Deliver the outcome for this consumer's collection on `conn`.
	fn on_outcome(&self, conn: ConnectionId, outcome: DiscoveryOutcome);
}

/// Shared, dynamically dispatched consumer.
pub type SharedConsumer = Arc<dyn DiscoveryConsumer>;

/// Consumer that discards all outcomes.
#[derive(Debug, Default)]
pub struct NoOpConsumer;

impl DiscoveryConsumer for NoOpConsumer {
	fn on_outcome(&self, _conn: ConnectionId, _outcome: DiscoveryOutcome) {}
}
