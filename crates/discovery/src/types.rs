//! Core identifier and handle types shared across the discovery engine.

use serde::{Deserialize, Serialize};

/// Opaque, monotonically ordered address of an attribute on the remote peer.
///
/// `Handle(0)` is reserved as invalid; real attributes live in
/// `[Handle::FIRST, Handle::LAST]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Handle(pub u16);

impl Handle {
	/// The reserved invalid handle.
	pub const INVALID: Handle = Handle(0);
	/// Lowest valid handle in a peer's attribute table.
	pub const FIRST: Handle = Handle(1);
	/// Highest addressable handle.
	pub const LAST: Handle = Handle(u16::MAX);

	/// Whether this handle addresses a real attribute.
	pub fn is_valid(self) -> bool {
		self.0 != 0
	}

	/// The handle directly after this one, saturating at the table end.
	pub fn next(self) -> Handle {
		Handle(self.0.saturating_add(1))
	}

	/// The handle directly before this one, saturating at the invalid handle.
	pub fn prev(self) -> Handle {
		Handle(self.0.saturating_sub(1))
	}
}

impl std::fmt::Display for Handle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "0x{:04x}", self.0)
	}
}

/// Inclusive range of handles owned by a collection or searched for
/// sub-items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandleRange {
	/// First handle of the range.
	pub start: Handle,
	/// Last handle of the range.
	pub end: Handle,
}

impl HandleRange {
	/// The whole addressable attribute table.
	pub const FULL: HandleRange = HandleRange {
		start: Handle::FIRST,
		end: Handle::LAST,
	};

	/// Create a range covering `start..=end`.
	pub fn new(start: Handle, end: Handle) -> Self {
		Self { start, end }
	}

	/// A range is empty when its bounds have crossed.
	pub fn is_empty(self) -> bool {
		self.start > self.end
	}

	/// Whether `handle` falls inside the range.
	pub fn contains(self, handle: Handle) -> bool {
		self.start <= handle && handle <= self.end
	}
}

impl std::fmt::Display for HandleRange {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "[{}..{}]", self.start, self.end)
	}
}

/// Type/id of a top-level discoverable collection (e.g. a service id).
///
/// `CollectionId(0)` is reserved as invalid and rejected at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionId(pub u16);

impl CollectionId {
	/// The reserved invalid id.
	pub const INVALID: CollectionId = CollectionId(0);

	/// Whether this id may be registered and discovered.
	pub fn is_valid(self) -> bool {
		self.0 != 0
	}
}

impl std::fmt::Display for CollectionId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "0x{:04x}", self.0)
	}
}

/// Type tag of a sub-item attached to an item (e.g. a descriptor kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubitemKind(pub u16);

impl std::fmt::Display for SubitemKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "0x{:04x}", self.0)
	}
}

/// Unique identifier for a peer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

impl std::fmt::Display for ConnectionId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "conn#{}", self.0)
	}
}

/// An item as reported by the transport inside an `ItemsFound` batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemInfo {
	/// Declaration handle of the item.
	pub decl: Handle,
	/// Value handle of the item.
	pub value: Handle,
}

/// A sub-item as reported by the transport inside a `SubitemsFound` batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubitemInfo {
	/// Handle of the sub-item.
	pub handle: Handle,
	/// Kind tag of the sub-item.
	pub kind: SubitemKind,
}

/// Opaque failure reported by the transport when it rejects a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transport error {code}: {message}")]
pub struct TransportError {
	/// Transport-specific error code, passed through unchanged.
	pub code: u32,
	/// Human-readable description.
	pub message: String,
}

impl TransportError {
	/// Create a transport error from a code and description.
	pub fn new(code: u32, message: impl Into<String>) -> Self {
		Self {
			code,
			message: message.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_handle_ordering_and_bounds() {
		assert!(!Handle::INVALID.is_valid());
		assert!(Handle::FIRST.is_valid());
		assert_eq!(Handle(5).next(), Handle(6));
		assert_eq!(Handle::LAST.next(), Handle::LAST);
		assert_eq!(Handle(5).prev(), Handle(4));
		assert_eq!(Handle(0).prev(), Handle(0));
	}

	#[test]
	fn test_range_emptiness() {
		assert!(HandleRange::new(Handle(4), Handle(3)).is_empty());
		assert!(!HandleRange::new(Handle(4), Handle(4)).is_empty());
		assert!(HandleRange::FULL.contains(Handle(0x1234)));
		assert!(!HandleRange::new(Handle(2), Handle(9)).contains(Handle(10)));
	}

	#[test]
	fn test_display_formats() {
		assert_eq!(Handle(0x2902).to_string(), "0x2902");
		assert_eq!(
			HandleRange::new(Handle(1), Handle(0xffff)).to_string(),
			"[0x0001..0xffff]"
		);
		assert_eq!(ConnectionId(7).to_string(), "conn#7");
	}
}
