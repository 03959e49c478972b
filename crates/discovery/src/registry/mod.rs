//! Consumer registry.
//!
//! Bounded table mapping collection ids to registered consumers. Populated
//! during setup and treated as read-only while discovery runs; discovery
//! walks the table in registration order.

use parking_lot::RwLock;

use crate::consumer::SharedConsumer;
use crate::types::CollectionId;
use crate::{Error, Result};

#[cfg(test)]
mod tests;

/// One `(collection id, consumer)` registration.
#[derive(Clone)]
pub(crate) struct Registration {
	pub(crate) id: CollectionId,
	pub(crate) consumer: SharedConsumer,
}

/// Bounded table of consumer registrations.
///
/// Internally synchronized; can be shared across threads behind an
/// `Arc<Engine>`.
pub struct Registry {
	entries: RwLock<Vec<Registration>>,
	capacity: usize,
}

impl Registry {
	pub(crate) fn new(capacity: usize) -> Self {
		Self {
			entries: RwLock::new(Vec::new()),
			capacity,
		}
	}

	/// Register `consumer` for `id` and return the new registration count.
	///
	/// Duplicate ids are accepted; each registration is resolved and notified
	/// independently.
	pub fn register(&self, id: CollectionId, consumer: SharedConsumer) -> Result<usize> {
		if !id.is_valid() {
			return Err(Error::InvalidArgument("collection id must be non-zero"));
		}
		let mut entries = self.entries.write();
		if entries.len() >= self.capacity {
			return Err(Error::AlreadyFull);
		}
		entries.push(Registration { id, consumer });
		Ok(entries.len())
	}

	/// Find the first consumer registered for `id`.
	pub fn lookup(&self, id: CollectionId) -> Option<SharedConsumer> {
		self.entries
			.read()
			.iter()
			.find(|entry| entry.id == id)
			.map(|entry| entry.consumer.clone())
	}

	/// Number of registrations.
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	/// Whether no consumers are registered.
	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}

	/// Registration at `index`, in registration order.
	pub(crate) fn get(&self, index: usize) -> Option<Registration> {
		self.entries.read().get(index).cloned()
	}
}
