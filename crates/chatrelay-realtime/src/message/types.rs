//! Inbound and outbound WebSocket event definitions.
//!
//! Every text frame carries one named event. Clients send
//! `{"event": "...", "data": ..., "ack": n}`; the server answers with
//! `{"event": "...", "data": ...}`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AckError;
use crate::registry::session::Session;

/// Names of the events a client may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    /// Join a room under a display name.
    Join,
    /// Send a text message to the current room.
    SendMessage,
    /// Share a location with the current room.
    SendLocation,
    /// Leave and close the connection.
    Disconnect,
}

impl EventName {
    /// Every inbound event, in dispatch-table order.
    pub const ALL: [EventName; 4] = [
        EventName::Join,
        EventName::SendMessage,
        EventName::SendLocation,
        EventName::Disconnect,
    ];

    /// Wire name of the event.
    pub fn as_str(self) -> &'static str {
        match self {
            EventName::Join => "join",
            EventName::SendMessage => "sendMessage",
            EventName::SendLocation => "sendLocation",
            EventName::Disconnect => "disconnect",
        }
    }

    /// Looks up an event by its wire name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == name)
    }

    /// Whether the event expects an acknowledgement.
    pub fn is_acknowledged(self) -> bool {
        !matches!(self, EventName::Disconnect)
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw inbound frame before the payload is decoded.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    /// Event name.
    pub event: String,
    /// Event payload; shape depends on the event.
    #[serde(default)]
    pub data: Value,
    /// Client-chosen acknowledgement id, echoed back in the `ack` event.
    #[serde(default)]
    pub ack: Option<u64>,
}

/// Payload of the `join` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinPayload {
    /// Requested display name.
    #[serde(default)]
    pub username: String,
    /// Requested room.
    #[serde(default)]
    pub room: String,
}

/// Payload of the `sendLocation` event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

/// A decoded client event.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// `join {username, room}`
    Join(JoinPayload),
    /// `sendMessage "text"`
    SendMessage(String),
    /// `sendLocation {latitude, longitude}`
    SendLocation(Coordinates),
    /// `disconnect`
    Disconnect,
}

impl InboundEvent {
    /// Decodes the payload declared for `name`.
    pub fn decode(name: EventName, data: Value) -> Result<Self, AckError> {
        let invalid = |e: serde_json::Error| AckError::InvalidPayload {
            event: name.as_str(),
            reason: e.to_string(),
        };

        match name {
            EventName::Join => serde_json::from_value(data).map(Self::Join).map_err(invalid),
            EventName::SendMessage => serde_json::from_value(data)
                .map(Self::SendMessage)
                .map_err(invalid),
            EventName::SendLocation => serde_json::from_value(data)
                .map(Self::SendLocation)
                .map_err(invalid),
            EventName::Disconnect => Ok(Self::Disconnect),
        }
    }

    /// Name of this event.
    pub fn name(&self) -> EventName {
        match self {
            Self::Join(_) => EventName::Join,
            Self::SendMessage(_) => EventName::SendMessage,
            Self::SendLocation(_) => EventName::SendLocation,
            Self::Disconnect => EventName::Disconnect,
        }
    }
}

/// A text message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Username of the author, or `"Admin"` for system notices.
    pub sender: String,
    /// Message text.
    pub body: String,
    /// Creation time, serialized as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// A shared location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationMessage {
    /// Username of the author.
    pub sender: String,
    /// Map link embedding the coordinates.
    pub url: String,
    /// Creation time, serialized as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// Membership snapshot of a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomData {
    /// Room name.
    pub room: String,
    /// Current members in join order.
    pub users: Vec<Session>,
}

/// Acknowledgement of one inbound event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AckReply {
    /// The ack id the client sent.
    pub id: u64,
    /// Error description; absent on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Report for a frame that could not be acknowledged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReply {
    /// Error description.
    pub message: String,
}

/// Events sent by the server to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum OutboundEvent {
    /// Text message or admin notice.
    Message(ChatMessage),
    /// Shared location.
    LocationMessage(LocationMessage),
    /// Room membership snapshot.
    RoomData(RoomData),
    /// Acknowledgement of an inbound event.
    Ack(AckReply),
    /// Malformed frame without an ack id.
    Error(ErrorReply),
}

impl OutboundEvent {
    /// Builds the acknowledgement for a handler result.
    pub fn ack(id: u64, result: &Result<(), AckError>) -> Self {
        OutboundEvent::Ack(AckReply {
            id,
            error: result.as_ref().err().map(ToString::to_string),
        })
    }
}
