//! Route definitions for the ChatRelay HTTP surface.
//!
//! JSON endpoints are mounted under `/api`, the WebSocket endpoint at `/ws`,
//! and every other path falls through to the static asset directory.

use axum::{Router, middleware as axum_middleware, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new().merge(health_routes());
    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);
    let static_files = ServeDir::new(&state.config.server.public_dir);

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Liveness and counters
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
