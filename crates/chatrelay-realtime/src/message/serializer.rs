//! JSON serialization for WebSocket frames.

use super::types::{InboundFrame, OutboundEvent};

/// Serialize an outbound event to a text frame.
pub fn serialize_outbound(event: &OutboundEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(event)
}

/// Deserialize an inbound text frame.
pub fn deserialize_inbound(text: &str) -> Result<InboundFrame, serde_json::Error> {
    serde_json::from_str(text)
}
