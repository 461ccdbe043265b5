//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use chatrelay_core::config::AppConfig;
use chatrelay_realtime::server::RealtimeEngine;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Relay engine
    pub realtime: Arc<RealtimeEngine>,
}

impl AppState {
    /// Builds the state and a fresh relay engine from `config`.
    pub fn new(config: AppConfig) -> Self {
        let realtime = Arc::new(RealtimeEngine::new(&config.realtime));
        Self::with_engine(config, realtime)
    }

    /// Builds the state around an existing engine.
    pub fn with_engine(config: AppConfig, realtime: Arc<RealtimeEngine>) -> Self {
        Self {
            config: Arc::new(config),
            realtime,
        }
    }
}
