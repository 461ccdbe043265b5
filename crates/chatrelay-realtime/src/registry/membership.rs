//! Membership registry: the authoritative set of joined sessions.
//!
//! Sessions are indexed by connection ID and grouped into rooms by a
//! case-insensitive room key. The room index doubles as the audience index
//! used for broadcasts.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::connection::handle::ConnectionId;
use crate::error::AckError;
use crate::message::validator::validate_name;

use super::room::Room;
use super::session::{Session, normalize};

#[derive(Debug, Default)]
struct RegistryState {
    /// Connection ID → session.
    sessions: HashMap<ConnectionId, Session>,
    /// Room key → room.
    rooms: HashMap<String, Room>,
}

/// Registry of all joined sessions.
///
/// Every operation takes the same lock and never awaits while holding it,
/// so a join and a leave can never interleave.
#[derive(Debug)]
pub struct MembershipRegistry {
    state: Mutex<RegistryState>,
    max_name_length: usize,
}

impl MembershipRegistry {
    /// Creates an empty registry.
    pub fn new(max_name_length: usize) -> Self {
        Self {
            state: Mutex::new(RegistryState::default()),
            max_name_length,
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Registers a session for `id` in `room` under `username`.
    ///
    /// Both names are trimmed before they are stored.
    pub fn add_session(
        &self,
        id: ConnectionId,
        username: &str,
        room: &str,
    ) -> Result<Session, AckError> {
        let username = validate_name("Username", username, self.max_name_length)?;
        let room = validate_name("Room", room, self.max_name_length)?;
        let room_key = normalize(room);
        let name_key = normalize(username);

        let mut guard = self.lock();
        let state = &mut *guard;

        if state.sessions.contains_key(&id) {
            return Err(AckError::AlreadyJoined);
        }

        if let Some(existing) = state.rooms.get(&room_key) {
            let taken = existing
                .members()
                .iter()
                .filter_map(|member| state.sessions.get(member))
                .any(|s| s.name_key() == name_key);
            if taken {
                return Err(AckError::NameTaken {
                    room: room_key,
                    username: username.to_string(),
                });
            }
        }

        let session = Session {
            id,
            username: username.to_string(),
            room: room.to_string(),
        };

        state
            .rooms
            .entry(room_key)
            .or_insert_with(|| Room::new(room.to_string()))
            .join(id);
        state.sessions.insert(id, session.clone());

        debug!(conn_id = %id, username = %session.username, room = %session.room, "Session added");

        Ok(session)
    }

    /// Removes and returns the session owned by `id`, if any.
    pub fn remove_session(&self, id: ConnectionId) -> Option<Session> {
        let mut guard = self.lock();
        let state = &mut *guard;

        let session = state.sessions.remove(&id)?;
        let room_key = session.room_key();
        if let Some(room) = state.rooms.get_mut(&room_key) {
            room.leave(id);
            if room.is_empty() {
                state.rooms.remove(&room_key);
            }
        }

        debug!(conn_id = %id, room = %session.room, "Session removed");
        Some(session)
    }

    /// Returns the session owned by `id`.
    pub fn get_session(&self, id: ConnectionId) -> Option<Session> {
        self.lock().sessions.get(&id).cloned()
    }

    /// Snapshot of the sessions in `room`, in join order.
    pub fn list_sessions_in_room(&self, room: &str) -> Vec<Session> {
        let state = self.lock();
        state
            .rooms
            .get(&normalize(room))
            .map(|r| {
                r.members()
                    .iter()
                    .filter_map(|id| state.sessions.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Display name of `room`, as typed by the member who opened it.
    pub fn room_name(&self, room: &str) -> Option<String> {
        self.lock().rooms.get(&normalize(room)).map(|r| r.name.clone())
    }

    /// Connection IDs of the members of `room`, in join order.
    pub fn room_members(&self, room: &str) -> Vec<ConnectionId> {
        self.lock()
            .rooms
            .get(&normalize(room))
            .map(|r| r.members().to_vec())
            .unwrap_or_default()
    }

    /// Number of joined sessions.
    pub fn session_count(&self) -> usize {
        self.lock().sessions.len()
    }

    /// Number of non-empty rooms.
    pub fn room_count(&self) -> usize {
        self.lock().rooms.len()
    }
}
