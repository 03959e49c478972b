//! Per-connection discovery session state.

use crate::consumer::DiscoveryOutcome;
use crate::types::{CollectionId, ConnectionId, Handle, HandleRange};

/// Discovery phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
	/// No discovery running.
	#[default]
	Idle,
	/// Waiting for a collection response for the current registration.
	DiscoveringCollection,
	/// Waiting for an item batch inside the current collection.
	DiscoveringItems,
	/// Waiting for the sub-items of the current item.
	DiscoveringSubitems,
}

/// An item inside a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
	/// Declaration handle.
	pub decl: Handle,
	/// Value handle.
	pub value: Handle,
	/// Handle of the notable sub-item, once one was discovered.
	pub subitem: Option<Handle>,
}

/// A discovered collection and its resolved items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
	/// Id the peer reported for the collection.
	pub id: CollectionId,
	/// Handle range owned by the collection.
	pub range: HandleRange,
	/// Items resolved so far, bounded by the configured per-collection cap.
	pub items: Vec<Item>,
}

/// An outcome waiting for the batch flush.
#[derive(Debug)]
pub(crate) struct PendingOutcome {
	/// Index into the registration table.
	pub(crate) registration: usize,
	pub(crate) outcome: DiscoveryOutcome,
}

/// Per-connection discovery context.
///
/// One session per connection, driven exclusively from that connection's
/// event-delivery context. The engine mutates the session through
/// [`Engine::start`](crate::Engine::start) and
/// [`Engine::on_transport_event`](crate::Engine::on_transport_event); the
/// caller only observes it.
#[derive(Debug, Default)]
pub struct Session {
	pub(crate) conn: Option<ConnectionId>,
	pub(crate) phase: Phase,
	/// Which registration is currently being resolved.
	pub(crate) collection_index: usize,
	/// Which item within the current collection is being processed.
	pub(crate) item_index: usize,
	pub(crate) in_progress: bool,
	pub(crate) collections: Vec<Collection>,
	pub(crate) pending: Vec<PendingOutcome>,
}

impl Session {
	/// Create an idle, unbound session.
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether a discovery run is active on this session.
	pub fn is_in_progress(&self) -> bool {
		self.in_progress
	}

	/// Current discovery phase.
	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// Connection this session is bound to, if any.
	pub fn connection(&self) -> Option<ConnectionId> {
		self.conn
	}

	/// Drop all discovery state and return to idle, unbinding the connection.
	pub(crate) fn reset(&mut self) {
		self.conn = None;
		self.phase = Phase::Idle;
		self.collection_index = 0;
		self.item_index = 0;
		self.in_progress = false;
		self.collections.clear();
		self.pending.clear();
	}

	/// The collection currently being resolved, if any was found.
	pub(crate) fn current_collection(&self) -> Option<&Collection> {
		self.collections.last()
	}

	pub(crate) fn current_collection_mut(&mut self) -> Option<&mut Collection> {
		self.collections.last_mut()
	}
}

/// Search range for the sub-items of `items[index]` in a collection ending at
/// `end`.
///
/// Sub-items live strictly between their item's value handle and the next
/// item's declaration handle, or the collection end for the last item.
/// Returns `None` when that gap is empty: the item cannot have sub-items and
/// no request round trip is needed.
pub fn subitem_search_range(items: &[Item], index: usize, end: Handle) -> Option<HandleRange> {
	let item = items.get(index)?;
	let range = HandleRange::new(
		item.value.next(),
		match items.get(index + 1) {
			Some(next) => next.decl.prev(),
			None => end,
		},
	);
	(!range.is_empty()).then_some(range)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn item(decl: u16, value: u16) -> Item {
		Item {
			decl: Handle(decl),
			value: Handle(value),
			subitem: None,
		}
	}

	#[test]
	fn test_range_between_adjacent_items() {
		let items = [item(1, 2), item(5, 6)];
		assert_eq!(
			subitem_search_range(&items, 0, Handle(20)),
			Some(HandleRange::new(Handle(3), Handle(4)))
		);
	}

	#[test]
	fn test_range_for_last_item_extends_to_collection_end() {
		let items = [item(1, 2), item(5, 6)];
		assert_eq!(
			subitem_search_range(&items, 1, Handle(9)),
			Some(HandleRange::new(Handle(7), Handle(9)))
		);
	}

	#[test]
	fn test_empty_gap_yields_no_range() {
		// Next item declared directly after this item's value.
		let items = [item(1, 2), item(3, 4)];
		assert_eq!(subitem_search_range(&items, 0, Handle(20)), None);

		// Last item's value handle sits at the collection end.
		let items = [item(1, 2)];
		assert_eq!(subitem_search_range(&items, 0, Handle(2)), None);
	}

	#[test]
	fn test_out_of_bounds_index_yields_no_range() {
		assert_eq!(subitem_search_range(&[], 0, Handle(20)), None);
		assert_eq!(subitem_search_range(&[item(1, 2)], 5, Handle(20)), None);
	}

	#[test]
	fn test_session_starts_idle() {
		let session = Session::new();
		assert!(!session.is_in_progress());
		assert_eq!(session.connection(), None);
		assert_eq!(session.phase, Phase::Idle);
	}
}
