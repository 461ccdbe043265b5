//! Event router: turns inbound events into registry updates and
//! outbound fan-out.
//!
//! Each handler runs to completion without awaiting: registry calls take a
//! short lock and delivery is a non-blocking queue push. The handler's
//! return value is the acknowledgement for the originating connection.

use std::sync::Arc;

use tracing::{debug, info};

use crate::connection::handle::{ConnectionHandle, ConnectionId, ConnectionState, SendOutcome};
use crate::connection::pool::ConnectionPool;
use crate::error::AckError;
use crate::filter::ProfanityFilter;
use crate::message::formatter::{
    format_location_message, format_message, joined_notice, left_notice, location_url,
    welcome_notice,
};
use crate::message::types::{Coordinates, InboundEvent, JoinPayload, OutboundEvent, RoomData};
use crate::metrics::RelayMetrics;
use crate::registry::membership::MembershipRegistry;
use crate::registry::session::Session;

/// Who receives an outbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Audience {
    /// A single connection.
    Connection(ConnectionId),
    /// Every member of a room.
    Room(String),
    /// Every member of a room except one connection.
    RoomExcept {
        /// Room name.
        room: String,
        /// Excluded connection.
        except: ConnectionId,
    },
}

/// Routes inbound events for all connections.
#[derive(Debug)]
pub struct EventRouter {
    registry: Arc<MembershipRegistry>,
    pool: Arc<ConnectionPool>,
    filter: Arc<dyn ProfanityFilter>,
    metrics: Arc<RelayMetrics>,
}

impl EventRouter {
    /// Creates a router over shared registry and pool.
    pub fn new(
        registry: Arc<MembershipRegistry>,
        pool: Arc<ConnectionPool>,
        filter: Arc<dyn ProfanityFilter>,
        metrics: Arc<RelayMetrics>,
    ) -> Self {
        Self {
            registry,
            pool,
            filter,
            metrics,
        }
    }

    /// Handles one decoded event from `conn_id`.
    pub fn dispatch(&self, conn_id: ConnectionId, event: InboundEvent) -> Result<(), AckError> {
        debug!(conn_id = %conn_id, event = %event.name(), "Dispatching event");

        match event {
            InboundEvent::Join(payload) => self.join(conn_id, &payload).map(|_| ()),
            InboundEvent::SendMessage(text) => self.send_message(conn_id, &text),
            InboundEvent::SendLocation(coords) => self.send_location(conn_id, coords),
            InboundEvent::Disconnect => {
                if let Some(handle) = self.pool.get(&conn_id) {
                    self.disconnect(&handle);
                }
                Ok(())
            }
        }
    }

    /// `join`: registers a session and announces it to the room.
    pub fn join(&self, conn_id: ConnectionId, payload: &JoinPayload) -> Result<Session, AckError> {
        let handle = self.pool.get(&conn_id).ok_or(AckError::Disconnected)?;
        match handle.state() {
            ConnectionState::Connected => {}
            ConnectionState::Joined => return Err(AckError::AlreadyJoined),
            ConnectionState::Disconnected => return Err(AckError::Disconnected),
        }

        let session = self
            .registry
            .add_session(conn_id, &payload.username, &payload.room)?;
        handle.transition(ConnectionState::Joined);

        self.emit(
            &Audience::Connection(conn_id),
            OutboundEvent::Message(welcome_notice(&session.room)),
        );
        self.emit(
            &Audience::RoomExcept {
                room: session.room.clone(),
                except: conn_id,
            },
            OutboundEvent::Message(joined_notice(&session.username)),
        );
        self.emit(
            &Audience::Room(session.room.clone()),
            self.room_data(&session.room),
        );

        info!(
            conn_id = %conn_id,
            username = %session.username,
            room = %session.room,
            "User joined room"
        );

        Ok(session)
    }

    /// `sendMessage`: relays text to the sender's room.
    ///
    /// A connection without a session gets a success ack and nothing is
    /// relayed.
    pub fn send_message(&self, conn_id: ConnectionId, text: &str) -> Result<(), AckError> {
        let Some(session) = self.registry.get_session(conn_id) else {
            debug!(conn_id = %conn_id, "sendMessage before join, ignoring");
            return Ok(());
        };

        if self.filter.is_profane(text) {
            debug!(conn_id = %conn_id, room = %session.room, "Message rejected by profanity filter");
            return Err(AckError::ProfanityRejected);
        }

        self.emit(
            &Audience::Room(session.room.clone()),
            OutboundEvent::Message(format_message(&session.username, text)),
        );
        Ok(())
    }

    /// `sendLocation`: relays a map link to the sender's room.
    pub fn send_location(&self, conn_id: ConnectionId, coords: Coordinates) -> Result<(), AckError> {
        let Some(session) = self.registry.get_session(conn_id) else {
            debug!(conn_id = %conn_id, "sendLocation before join, ignoring");
            return Ok(());
        };

        let url = location_url(coords);
        self.emit(
            &Audience::Room(session.room.clone()),
            OutboundEvent::LocationMessage(format_location_message(&session.username, &url)),
        );
        Ok(())
    }

    /// `disconnect`: drops the session and tells the remaining members.
    ///
    /// Safe to call more than once; only the call that removes the session
    /// broadcasts.
    pub fn disconnect(&self, handle: &ConnectionHandle) -> Option<Session> {
        handle.transition(ConnectionState::Disconnected);

        let session = self.registry.remove_session(handle.id)?;

        self.emit(
            &Audience::Room(session.room.clone()),
            OutboundEvent::Message(left_notice(&session.username)),
        );
        self.emit(
            &Audience::Room(session.room.clone()),
            self.room_data(&session.room),
        );

        info!(
            conn_id = %handle.id,
            username = %session.username,
            room = %session.room,
            "User left room"
        );

        Some(session)
    }

    /// Current `roomData` event for `room`.
    pub fn room_data(&self, room: &str) -> OutboundEvent {
        OutboundEvent::RoomData(RoomData {
            room: self
                .registry
                .room_name(room)
                .unwrap_or_else(|| room.to_string()),
            users: self.registry.list_sessions_in_room(room),
        })
    }

    /// Queues `event` for every connection in `audience`.
    ///
    /// Returns how many connections accepted the event.
    pub fn emit(&self, audience: &Audience, event: OutboundEvent) -> usize {
        let targets = match audience {
            Audience::Connection(id) => vec![*id],
            Audience::Room(room) => self.registry.room_members(room),
            Audience::RoomExcept { room, except } => self
                .registry
                .room_members(room)
                .into_iter()
                .filter(|id| id != except)
                .collect(),
        };

        let mut queued = 0;
        for conn_id in &targets {
            if let Some(handle) = self.pool.get(conn_id) {
                let outcome = handle.send(event.clone());
                self.metrics.record_send(outcome);
                if outcome == SendOutcome::Queued {
                    queued += 1;
                }
            }
        }
        queued
    }
}
