//! Single room with its ordered member list.

use crate::connection::handle::ConnectionId;

/// A room and the connections currently in it.
///
/// Members are kept in join order so membership snapshots are
/// deterministic.
#[derive(Debug, Clone)]
pub struct Room {
    /// Room name as typed by the first member.
    pub name: String,
    /// Member connection IDs in join order.
    members: Vec<ConnectionId>,
}

impl Room {
    /// Creates a new empty room.
    pub fn new(name: String) -> Self {
        Self {
            name,
            members: Vec::new(),
        }
    }

    /// Adds a member if not already present.
    pub fn join(&mut self, conn_id: ConnectionId) {
        if !self.members.contains(&conn_id) {
            self.members.push(conn_id);
        }
    }

    /// Removes a member.
    pub fn leave(&mut self, conn_id: ConnectionId) {
        self.members.retain(|id| *id != conn_id);
    }

    /// Returns whether the room has no members left.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member connection IDs in join order.
    pub fn members(&self) -> &[ConnectionId] {
        &self.members
    }
}
