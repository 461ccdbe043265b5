//! Response DTOs.

use serde::{Deserialize, Serialize};

use chatrelay_realtime::metrics::MetricsSnapshot;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok`, or `shutting_down` once the engine stops accepting connections.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: u64,
    /// Open WebSocket connections.
    pub connections: usize,
    /// Joined sessions.
    pub sessions: usize,
    /// Non-empty rooms.
    pub rooms: usize,
    /// Relay counters.
    pub metrics: MetricsSnapshot,
}
