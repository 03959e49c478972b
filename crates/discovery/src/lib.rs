//! Hierarchical attribute discovery for remote peers.
//!
//! A client-side state machine that learns a remote peer's nested object
//! model — collections containing items containing sub-items — through a
//! bounded sequence of asynchronous requests issued over a narrow
//! request/response transport, without ever fetching the whole tree in one
//! call.
//!
//! The crate is centered on [`Engine`], which owns the consumer [`Registry`]
//! and a [`DiscoveryTransport`] handle. Callers keep one [`Session`] per
//! connection: [`Engine::start`] issues the first request, and every
//! transport response or lifecycle change re-enters the engine through
//! [`Engine::on_transport_event`]. Discovery is strictly serial — one
//! outstanding request per session — and once every registered consumer has
//! an outcome, the outcomes are delivered together in registration order.
//!
//! ```ignore
//! use std::sync::Arc;
//! use rove_discovery::{CollectionId, Engine, EngineConfig, Session, SubitemKind};
//!
//! let engine = Engine::new(EngineConfig::new(SubitemKind(0x2902)), transport)?;
//! engine.register(CollectionId(0x180f), Arc::new(BatteryConsumer))?;
//!
//! let mut session = Session::new();
//! engine.start(&mut session, conn)?;
//! // The transport later feeds responses back:
//! // engine.on_transport_event(&mut session, event);
//! ```
//!
//! There is no timeout or retry: a response that never arrives leaves the
//! session in progress until the connection drops. Liveness is the
//! transport's concern.
#![warn(missing_docs)]

mod config;
mod consumer;
mod engine;
mod registry;
mod session;
mod transport;
mod types;

pub use config::EngineConfig;
pub use consumer::{DiscoveryConsumer, DiscoveryOutcome, NoOpConsumer, SharedConsumer};
pub use engine::Engine;
pub use registry::Registry;
pub use session::{Collection, Item, Phase, Session, subitem_search_range};
pub use transport::{DiscoveryTransport, TransportEvent};
pub use types::{
	CollectionId, ConnectionId, Handle, HandleRange, ItemInfo, SubitemInfo, TransportError,
};

/// A convenient type alias for `Result` with `E` = [`enum@crate::Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Possible errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
	/// Malformed input: an invalid id or a zero capacity.
	#[error("invalid argument: {0}")]
	InvalidArgument(&'static str),
	/// The registration table is at capacity.
	#[error("registration table full")]
	AlreadyFull,
	/// Discovery was started before any consumer was registered.
	#[error("no consumers registered")]
	NotInitialized,
	/// A discovery run is already in progress on this session.
	#[error("discovery already in progress")]
	Busy,
	/// The transport rejected a request synchronously.
	#[error("{0}")]
	Transport(#[from] TransportError),
}
