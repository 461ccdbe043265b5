//! Application builder: wires router, middleware, and state into an Axum app
//! and runs it with graceful shutdown.

use std::future::{Future, IntoFuture};
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use chatrelay_core::error::{AppError, ErrorKind};
use chatrelay_core::result::AppResult;

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Serves the application on `listener` until `signal` resolves.
///
/// On the signal the relay engine is shut down, which closes every
/// WebSocket; in-flight HTTP requests then get
/// `server.shutdown_grace_seconds` to finish.
pub async fn serve<F>(listener: TcpListener, state: AppState, signal: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let engine = state.realtime.clone();
    let grace = Duration::from_secs(state.config.server.shutdown_grace_seconds);
    let (stopping_tx, stopping_rx) = oneshot::channel::<()>();

    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "ChatRelay server listening");
    }

    let server = axum::serve(listener, build_app(state)).with_graceful_shutdown(async move {
        signal.await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        engine.shutdown();
        let _ = stopping_tx.send(());
    });

    let deadline = async move {
        match stopping_rx.await {
            Ok(()) => tokio::time::sleep(grace).await,
            Err(_) => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        result = server.into_future() => {
            result.map_err(|e| AppError::with_source(ErrorKind::Io, "Server error", e))?;
        }
        _ = deadline => {
            tracing::warn!(grace_seconds = grace.as_secs(), "Graceful shutdown timed out");
        }
    }

    tracing::info!("ChatRelay server shut down");
    Ok(())
}
