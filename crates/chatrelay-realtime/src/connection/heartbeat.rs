//! Ping/pong heartbeat for WebSocket keepalive.
//!
//! The transport sends a ping every `ping_interval`; any inbound frame or
//! pong counts as activity. A connection idle for longer than
//! `ping_interval + ping_timeout` is considered dead.

use std::time::Duration;

use chrono::{DateTime, Utc};

use chatrelay_core::config::RealtimeConfig;

use super::handle::ConnectionHandle;

/// Heartbeat configuration
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    /// Interval between pings
    pub ping_interval: Duration,
    /// Grace period after a missed ping
    pub ping_timeout: Duration,
}

impl From<&RealtimeConfig> for HeartbeatConfig {
    fn from(config: &RealtimeConfig) -> Self {
        Self {
            ping_interval: Duration::from_secs(config.ping_interval_seconds.max(1)),
            ping_timeout: Duration::from_secs(config.ping_timeout_seconds),
        }
    }
}

impl HeartbeatConfig {
    /// Longest tolerated silence.
    pub fn max_idle(&self) -> Duration {
        self.ping_interval + self.ping_timeout
    }

    /// Whether `handle` has been silent for too long as of `now`.
    pub fn is_expired(&self, handle: &ConnectionHandle, now: DateTime<Utc>) -> bool {
        if !handle.is_alive() {
            return true;
        }
        match (now - handle.last_activity()).to_std() {
            Ok(idle) => idle > self.max_idle(),
            // last activity is in the future relative to `now`
            Err(_) => false,
        }
    }
}
