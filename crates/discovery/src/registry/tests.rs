use std::sync::Arc;

use super::*;
use crate::consumer::NoOpConsumer;

fn consumer() -> SharedConsumer {
	Arc::new(NoOpConsumer)
}

#[test]
fn test_register_returns_count() {
	let registry = Registry::new(4);
	assert_eq!(registry.register(CollectionId(0x180f), consumer()).ok(), Some(1));
	assert_eq!(registry.register(CollectionId(0x180d), consumer()).ok(), Some(2));
	assert_eq!(registry.len(), 2);
	assert!(!registry.is_empty());
}

#[test]
fn test_register_rejects_invalid_id() {
	let registry = Registry::new(4);
	assert!(matches!(
		registry.register(CollectionId::INVALID, consumer()),
		Err(Error::InvalidArgument(_))
	));
	assert!(registry.is_empty());
}

#[test]
fn test_register_rejects_when_full() {
	let registry = Registry::new(2);
	registry.register(CollectionId(1), consumer()).unwrap();
	registry.register(CollectionId(2), consumer()).unwrap();
	assert!(matches!(
		registry.register(CollectionId(3), consumer()),
		Err(Error::AlreadyFull)
	));
	assert_eq!(registry.len(), 2);
}

#[test]
fn test_lookup_returns_first_match() {
	let registry = Registry::new(4);
	let first = consumer();
	let second = consumer();
	registry.register(CollectionId(7), first.clone()).unwrap();
	registry.register(CollectionId(7), second).unwrap();

	let found = registry.lookup(CollectionId(7)).expect("registered id");
	assert!(Arc::ptr_eq(&found, &first));
	assert!(registry.lookup(CollectionId(8)).is_none());
}
