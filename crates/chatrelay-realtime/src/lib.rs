//! # chatrelay-realtime
//!
//! Room-scoped chat relay engine. Provides:
//!
//! - Connection handles and a pool of live WebSocket connections
//! - A membership registry with case-insensitive unique names per room
//! - Event routing for join, messages, locations, and disconnects
//! - Pluggable profanity filtering
//! - Heartbeat timing and relay metrics

pub mod connection;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod message;
pub mod metrics;
pub mod registry;
pub mod router;
pub mod server;

pub use connection::pool::ConnectionPool;
pub use error::AckError;
pub use filter::{ProfanityFilter, WordListFilter};
pub use lifecycle::{ConnectionLifecycleHook, FrameOutcome};
pub use registry::membership::MembershipRegistry;
pub use router::EventRouter;
pub use server::RealtimeEngine;
