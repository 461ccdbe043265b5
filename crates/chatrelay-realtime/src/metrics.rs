//! Relay metrics counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::connection::handle::SendOutcome;

/// Engine-level metrics counters.
#[derive(Debug, Default)]
pub struct RelayMetrics {
    /// Total connections established
    connections_total: AtomicU64,
    /// Connections currently open
    connections_active: AtomicU64,
    /// Inbound events processed
    events_received: AtomicU64,
    /// Inbound events answered with an error
    events_rejected: AtomicU64,
    /// Outbound events queued for delivery
    events_delivered: AtomicU64,
    /// Outbound events dropped (queue full or connection gone)
    events_dropped: AtomicU64,
}

impl RelayMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new connection.
    pub fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a closed connection.
    pub fn connection_closed(&self) {
        let _ = self
            .connections_active
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    /// Record an inbound event and whether it was accepted.
    pub fn event_received(&self, accepted: bool) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
        if !accepted {
            self.events_rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record the outcome of one outbound send.
    pub fn record_send(&self, outcome: SendOutcome) {
        match outcome {
            SendOutcome::Queued => self.events_delivered.fetch_add(1, Ordering::Relaxed),
            SendOutcome::Dropped | SendOutcome::Closed => {
                self.events_dropped.fetch_add(1, Ordering::Relaxed)
            }
        };
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            events_received: self.events_received.load(Ordering::Relaxed),
            events_rejected: self.events_rejected.load(Ordering::Relaxed),
            events_delivered: self.events_delivered.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total connections ever established
    pub connections_total: u64,
    /// Currently active connections
    pub connections_active: u64,
    /// Inbound events processed
    pub events_received: u64,
    /// Inbound events rejected
    pub events_rejected: u64,
    /// Outbound events queued
    pub events_delivered: u64,
    /// Outbound events dropped
    pub events_dropped: u64,
}
