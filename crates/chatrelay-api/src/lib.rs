//! # chatrelay-api
//!
//! HTTP layer for ChatRelay built on Axum.
//!
//! Provides the WebSocket upgrade endpoint, the health check, static asset
//! serving, middleware (CORS, request logging), response DTOs, and error
//! mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use state::AppState;
