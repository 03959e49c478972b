//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::types::SubitemKind;

/// Capacity and policy configuration for an [`Engine`](crate::Engine).
///
/// The capacities bound every table the engine owns; responses reporting more
/// entries than a bound allows are truncated, never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
	/// Maximum number of consumer registrations.
	#[serde(default = "default_max_consumers")]
	pub max_consumers: usize,
	/// Maximum number of collections tracked per session.
	#[serde(default = "default_max_collections")]
	pub max_collections: usize,
	/// Maximum number of items stored per collection.
	#[serde(default = "default_max_items")]
	pub max_items_per_collection: usize,
	/// Sub-item kind recorded onto items during sub-item discovery.
	pub notable_subitem: SubitemKind,
}

fn default_max_consumers() -> usize {
	8
}

fn default_max_collections() -> usize {
	8
}

fn default_max_items() -> usize {
	16
}

impl EngineConfig {
	/// Create a configuration with default capacities, scanning for
	/// `notable_subitem` during sub-item discovery.
	pub fn new(notable_subitem: SubitemKind) -> Self {
		Self {
			max_consumers: default_max_consumers(),
			max_collections: default_max_collections(),
			max_items_per_collection: default_max_items(),
			notable_subitem,
		}
	}

	/// Set the registration capacity.
	pub fn max_consumers(mut self, n: usize) -> Self {
		self.max_consumers = n;
		self
	}

	/// Set the per-session collection capacity.
	pub fn max_collections(mut self, n: usize) -> Self {
		self.max_collections = n;
		self
	}

	/// Set the per-collection item capacity.
	pub fn max_items_per_collection(mut self, n: usize) -> Self {
		self.max_items_per_collection = n;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_config_builder() {
		let config = EngineConfig::new(SubitemKind(0x2902))
			.max_consumers(4)
			.max_items_per_collection(32);

		assert_eq!(config.max_consumers, 4);
		assert_eq!(config.max_collections, 8);
		assert_eq!(config.max_items_per_collection, 32);
		assert_eq!(config.notable_subitem, SubitemKind(0x2902));
	}

	#[test]
	fn test_config_deserialize_defaults() {
		let config: EngineConfig =
			serde_json::from_value(serde_json::json!({ "notable_subitem": 0x2902 }))
				.expect("valid config");

		assert_eq!(config.max_consumers, 8);
		assert_eq!(config.max_collections, 8);
		assert_eq!(config.max_items_per_collection, 16);
		assert_eq!(config.notable_subitem, SubitemKind(0x2902));
	}
}
