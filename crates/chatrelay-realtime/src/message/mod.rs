//! WebSocket event types, formatting, serialization, and validation.

pub mod formatter;
pub mod serializer;
pub mod types;
pub mod validator;

pub use types::{EventName, InboundEvent, InboundFrame, OutboundEvent};
