//! Individual WebSocket connection handle.

use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::message::types::OutboundEvent;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// Where a connection is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Transport connected, no session yet.
    Connected,
    /// A `join` succeeded.
    Joined,
    /// Torn down; terminal.
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => write!(f, "connected"),
            Self::Joined => write!(f, "joined"),
            Self::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Result of pushing an event onto a connection's outbound queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Queued for the writer task.
    Queued,
    /// Queue full; the event was dropped.
    Dropped,
    /// The connection is gone.
    Closed,
}

/// A handle to a single WebSocket connection.
///
/// Holds the sender for pushing events to the client plus the
/// connection's lifecycle state.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Sender for outbound events
    sender: mpsc::Sender<OutboundEvent>,
    /// Lifecycle state
    state: Mutex<ConnectionState>,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    /// Last inbound activity (frame or pong)
    last_activity: Mutex<DateTime<Utc>>,
    /// Whether the connection is still alive
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new connection handle
    pub fn new(sender: mpsc::Sender<OutboundEvent>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sender,
            state: Mutex::new(ConnectionState::Connected),
            connected_at: now,
            last_activity: Mutex::new(now),
            alive: AtomicBool::new(true),
        }
    }

    /// Queue an outbound event without waiting.
    pub fn send(&self, event: OutboundEvent) -> SendOutcome {
        if !self.is_alive() {
            return SendOutcome::Closed;
        }
        match self.sender.try_send(event) {
            Ok(()) => SendOutcome::Queued,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Send buffer full, dropping event");
                SendOutcome::Dropped
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                SendOutcome::Closed
            }
        }
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark connection as dead
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConnectionState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Moves to `next`, returning the previous state.
    ///
    /// `Disconnected` is terminal: once reached, further transitions are
    /// ignored.
    pub fn transition(&self, next: ConnectionState) -> ConnectionState {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let previous = *state;
        if previous != ConnectionState::Disconnected {
            *state = next;
        }
        previous
    }

    /// Update last activity timestamp
    pub fn touch(&self) {
        let mut la = self.last_activity.lock().unwrap_or_else(|e| e.into_inner());
        *la = Utc::now();
    }

    /// Last inbound activity
    pub fn last_activity(&self) -> DateTime<Utc> {
        *self.last_activity.lock().unwrap_or_else(|e| e.into_inner())
    }
}
