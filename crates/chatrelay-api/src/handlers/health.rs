//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let engine = &state.realtime;
    let status = if engine.is_accepting() {
        "ok"
    } else {
        "shutting_down"
    };

    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: u64::try_from(engine.uptime_seconds()).unwrap_or_default(),
        connections: engine.connections.connection_count(),
        sessions: engine.registry.session_count(),
        rooms: engine.registry.room_count(),
        metrics: engine.metrics.snapshot(),
    }))
}
