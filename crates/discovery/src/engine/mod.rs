//! The discovery engine: request dispatch and response handling.
//!
//! [`Engine`] drives one serial conversation per session: discover the
//! collection for the current registration, walk its items, probe the
//! sub-item gap of each item, then move to the next registration. Exactly one
//! request is outstanding per session at any time; the engine never blocks
//! and is re-entered through [`Engine::on_transport_event`] from the
//! transport's delivery context.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::consumer::{DiscoveryOutcome, SharedConsumer};
use crate::registry::Registry;
use crate::session::{Collection, Item, PendingOutcome, Phase, Session, subitem_search_range};
use crate::transport::{DiscoveryTransport, TransportEvent};
use crate::types::{
	CollectionId, ConnectionId, Handle, HandleRange, ItemInfo, SubitemInfo, TransportError,
};
use crate::{Error, Result};


/// Client-side engine that learns a remote peer's collection/item/sub-item
/// tree through serial discovery requests.
///
/// The engine owns the consumer [`Registry`] and the transport handle, but no
/// per-connection state: callers keep one [`Session`] per connection and
/// route that connection's transport events to it.
pub struct Engine {
	config: EngineConfig,
	registry: Registry,
	transport: Arc<dyn DiscoveryTransport>,
}

impl Engine {
	/// Create an engine issuing requests through `transport`.
	///
	/// Fails with [`Error::InvalidArgument`] if any configured capacity is
	/// zero.
	pub fn new(config: EngineConfig, transport: Arc<dyn DiscoveryTransport>) -> Result<Self> {
		if config.max_consumers == 0
			|| config.max_collections == 0
			|| config.max_items_per_collection == 0
		{
			return Err(Error::InvalidArgument("capacities must be non-zero"));
		}
		Ok(Self {
			registry: Registry::new(config.max_consumers),
			config,
			transport,
		})
	}

	/// Register a consumer for `id`. Returns the new registration count.
	pub fn register(&self, id: CollectionId, consumer: SharedConsumer) -> Result<usize> {
		self.registry.register(id, consumer)
	}

	/// Access the consumer registry.
	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	/// Begin discovery for `conn` on `session`.
	///
	/// Issues the first collection request and returns; responses re-enter
	/// the engine through [`Engine::on_transport_event`]. Fails with
	/// [`Error::Busy`] while a run is in progress (nothing is mutated, no
	/// request is issued) and with [`Error::NotInitialized`] when no consumer
	/// is registered. A synchronous transport rejection is returned as
	/// [`Error::Transport`] and leaves the session idle.
	pub fn start(&self, session: &mut Session, conn: ConnectionId) -> Result<()> {
		if session.in_progress {
			return Err(Error::Busy);
		}
		let first = self.registry.get(0).ok_or(Error::NotInitialized)?;

		session.reset();
		session.conn = Some(conn);
		info!(%conn, registrations = self.registry.len(), "starting discovery");

		self.transport
			.discover_collections(conn, Handle::FIRST, first.id)?;
		session.in_progress = true;
		session.phase = Phase::DiscoveringCollection;
		Ok(())
	}

	/// Feed a transport event into `session`'s state machine.
	///
	/// There is no observable return value: progress surfaces as further
	/// requests on the transport and, eventually, consumer outcomes.
	pub fn on_transport_event(&self, session: &mut Session, event: TransportEvent) {
		match event {
			TransportEvent::Connected { conn } => {
				debug!(%conn, "connection established, resetting session");
				session.reset();
				session.conn = Some(conn);
			}
			TransportEvent::Disconnected => {
				debug!(conn = ?session.conn, "connection dropped, resetting session");
				session.reset();
			}
			TransportEvent::CollectionFound { id, range } => {
				self.on_collection_found(session, id, range);
			}
			TransportEvent::CollectionNotFound => self.on_collection_not_found(session),
			TransportEvent::ItemsFound { items } => self.on_items_found(session, items),
			TransportEvent::SubitemsFound { subitems } => {
				self.on_subitems_found(session, subitems);
			}
		}
	}

	fn on_collection_found(&self, session: &mut Session, id: CollectionId, range: HandleRange) {
		if session.phase != Phase::DiscoveringCollection {
			debug!(phase = ?session.phase, %id, "dropping out-of-phase collection response");
			return;
		}
		let Some(conn) = session.conn else { return };

		if session.collections.len() >= self.config.max_collections {
			warn!(%conn, %id, "collection table full, treating as not found");
			self.finish_collection(session, DiscoveryOutcome::NotFound);
			return;
		}

		debug!(%conn, %id, %range, "collection found");
		session.collections.push(Collection {
			id,
			range,
			items: Vec::new(),
		});
		session.item_index = 0;
		session.phase = Phase::DiscoveringItems;
		if let Err(err) = self.transport.discover_items(conn, range) {
			self.abort(session, err);
		}
	}

	fn on_collection_not_found(&self, session: &mut Session) {
		if session.phase != Phase::DiscoveringCollection {
			debug!(phase = ?session.phase, "dropping out-of-phase collection response");
			return;
		}
		debug!(conn = ?session.conn, registration = session.collection_index, "collection not found");
		self.finish_collection(session, DiscoveryOutcome::NotFound);
	}

	fn on_items_found(&self, session: &mut Session, items: Vec<ItemInfo>) {
		if session.phase != Phase::DiscoveringItems {
			debug!(phase = ?session.phase, "dropping out-of-phase item response");
			return;
		}
		let Some(conn) = session.conn else { return };
		let cap = self.config.max_items_per_collection;
		let batch_empty = items.is_empty();

		// Append the batch, truncating at the per-collection cap.
		let continuation = {
			let Some(collection) = session.current_collection_mut() else {
				return;
			};
			let room = cap.saturating_sub(collection.items.len());
			if items.len() > room {
				warn!(%conn, reported = items.len(), cap, "item cap reached, dropping extra items");
			}
			collection.items.extend(items.iter().take(room).map(|info| Item {
				decl: info.decl,
				value: info.value,
				subitem: None,
			}));

			// More items may exist past the last one recorded, unless the
			// peer signalled the end with an empty batch or the table is
			// full.
			let full = collection.items.len() >= cap;
			match collection.items.last() {
				Some(last) if !batch_empty && !full && last.value < collection.range.end => {
					Some(HandleRange::new(last.value.next(), collection.range.end))
				}
				_ => None,
			}
		};

		match continuation {
			Some(range) => {
				debug!(%conn, %range, "continuing item discovery");
				if let Err(err) = self.transport.discover_items(conn, range) {
					self.abort(session, err);
				}
			}
			None => {
				session.item_index = 0;
				session.phase = Phase::DiscoveringSubitems;
				self.advance_subitems(session);
			}
		}
	}

	fn on_subitems_found(&self, session: &mut Session, subitems: Vec<SubitemInfo>) {
		if session.phase != Phase::DiscoveringSubitems {
			debug!(phase = ?session.phase, "dropping out-of-phase sub-item response");
			return;
		}

		let conn = session.conn;
		let notable = self.config.notable_subitem;
		if let Some(info) = subitems.iter().find(|info| info.kind == notable) {
			let index = session.item_index;
			if let Some(item) = session
				.current_collection_mut()
				.and_then(|collection| collection.items.get_mut(index))
			{
				debug!(conn = ?conn, item = index, handle = %info.handle, "notable sub-item found");
				item.subitem = Some(info.handle);
			}
		}

		session.item_index += 1;
		self.advance_subitems(session);
	}

	/// Issue the next sub-item request at or after `session.item_index`,
	/// skipping items whose search range is empty; completes the collection
	/// once no items remain.
	fn advance_subitems(&self, session: &mut Session) {
		let Some(conn) = session.conn else { return };
		loop {
			let (item_count, range) = {
				let Some(collection) = session.current_collection() else {
					return;
				};
				(
					collection.items.len(),
					subitem_search_range(
						&collection.items,
						session.item_index,
						collection.range.end,
					),
				)
			};

			if session.item_index >= item_count {
				if let Some(collection) = session.current_collection().cloned() {
					self.finish_collection(session, DiscoveryOutcome::Complete(collection));
				}
				return;
			}

			match range {
				Some(range) => {
					debug!(%conn, item = session.item_index, %range, "discovering sub-items");
					if let Err(err) = self.transport.discover_subitems(conn, range) {
						self.abort(session, err);
					}
					return;
				}
				// Empty gap: the item cannot have sub-items, skip the round
				// trip.
				None => session.item_index += 1,
			}
		}
	}

	/// Record `outcome` for the registration currently being resolved, then
	/// move to the next registration or flush.
	fn finish_collection(&self, session: &mut Session, outcome: DiscoveryOutcome) {
		let Some(conn) = session.conn else { return };
		let registration = session.collection_index;
		session.pending.push(PendingOutcome {
			registration,
			outcome,
		});
		session.collection_index += 1;
		session.item_index = 0;

		match self.registry.get(session.collection_index) {
			Some(next) => {
				debug!(%conn, id = %next.id, registration = session.collection_index, "discovering next collection");
				session.phase = Phase::DiscoveringCollection;
				if let Err(err) = self.transport.discover_collections(conn, Handle::FIRST, next.id)
				{
					self.abort(session, err);
				}
			}
			None => self.flush(session, conn),
		}
	}

	/// Deliver one outcome per registration, in registration order, and
	/// return the session to idle.
	fn flush(&self, session: &mut Session, conn: ConnectionId) {
		let pending = std::mem::take(&mut session.pending);
		info!(%conn, outcomes = pending.len(), "discovery complete, flushing outcomes");

		session.phase = Phase::Idle;
		session.in_progress = false;
		session.collection_index = 0;
		session.item_index = 0;
		session.collections.clear();

		for entry in pending {
			if let Some(registration) = self.registry.get(entry.registration) {
				registration.consumer.on_outcome(conn, entry.outcome);
			}
		}
	}

	/// Abort on a synchronous transport failure: the active registration's
	/// consumer receives a `Failed` outcome immediately, outcomes pending for
	/// earlier registrations are discarded, registrations not yet reached get
	/// nothing. The caller must `start` again to resume.
	fn abort(&self, session: &mut Session, err: TransportError) {
		let registration = session.collection_index;
		warn!(
			conn = ?session.conn,
			registration,
			code = err.code,
			"transport rejected discovery request, aborting"
		);
		let conn = session.conn;
		session.phase = Phase::Idle;
		session.in_progress = false;
		session.pending.clear();

		if let Some(conn) = conn
			&& let Some(entry) = self.registry.get(registration)
		{
			entry.consumer.on_outcome(conn, DiscoveryOutcome::Failed(err));
		}
	}
}

impl std::fmt::Debug for Engine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Engine")
			.field("config", &self.config)
			.field("registrations", &self.registry.len())
			.finish_non_exhaustive()
	}
}
