//! Session record binding one connection to a username and room.

use serde::{Deserialize, Serialize};

use crate::connection::handle::ConnectionId;

/// A joined client.
///
/// Username and room are stored trimmed with their original casing; use
/// [`Session::room_key`] and [`Session::name_key`] for comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Owning connection.
    pub id: ConnectionId,
    /// Display name.
    pub username: String,
    /// Room name as first typed by this client.
    pub room: String,
}

impl Session {
    /// Grouping key of this session's room.
    pub fn room_key(&self) -> String {
        normalize(&self.room)
    }

    /// Uniqueness key of this session's username.
    pub fn name_key(&self) -> String {
        normalize(&self.username)
    }
}

/// Case-insensitive, whitespace-trimmed comparison key.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}
