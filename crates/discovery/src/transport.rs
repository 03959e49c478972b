//! Transport seam: outgoing discovery requests and incoming transport events.

use crate::types::{
	CollectionId, ConnectionId, Handle, HandleRange, ItemInfo, SubitemInfo, TransportError,
};

/// Issues discovery requests toward the remote peer.
///
/// Requests are asynchronous at the protocol level: a successful return means
/// the request was accepted for transmission, and the matching response
/// arrives later through
/// [`Engine::on_transport_event`](crate::Engine::on_transport_event). A
/// synchronous `Err` means the request was never sent.
pub trait DiscoveryTransport: Send + Sync {
	/// Request discovery of the collection `id`, scanning from `start`.
	fn discover_collections(
		&self,
		conn: ConnectionId,
		start: Handle,
		id: CollectionId,
	) -> Result<(), TransportError>;

	/// Request discovery of the items inside `range`.
	fn discover_items(&self, conn: ConnectionId, range: HandleRange)
	-> Result<(), TransportError>;

	/// Request discovery of the sub-items inside `range`.
	fn discover_subitems(
		&self,
		conn: ConnectionId,
		range: HandleRange,
	) -> Result<(), TransportError>;
}

/// Responses and connection lifecycle notifications delivered by the
/// transport, all through one entry point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
	/// A collection matching the requested id was found.
	CollectionFound {
		/// Id the peer reported for the collection.
		id: CollectionId,
		/// Handle range owned by the collection.
		range: HandleRange,
	},
	/// The requested collection does not exist on the peer.
	CollectionNotFound,
	/// A batch of items, possibly a partial result. An empty batch means the
	/// searched range holds no further items.
	ItemsFound {
		/// Items reported by the peer, in handle order.
		items: Vec<ItemInfo>,
	},
	/// A batch of sub-items for the item currently being resolved.
	SubitemsFound {
		/// Sub-items reported by the peer, in handle order.
		subitems: Vec<SubitemInfo>,
	},
	/// The connection was established.
	Connected {
		/// Connection the session is now bound to.
		conn: ConnectionId,
	},
	/// The connection dropped.
	Disconnected,
}
