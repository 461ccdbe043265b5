//! WebSocket upgrade handler.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use chatrelay_core::error::AppError;
use chatrelay_realtime::lifecycle::FrameOutcome;
use chatrelay_realtime::message::serializer::serialize_outbound;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /ws: WebSocket upgrade
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    if !state.realtime.is_accepting() {
        return Err(AppError::unavailable("Server is shutting down").into());
    }

    // Frames past the soft limit get an error event; past this one the
    // transport drops the connection.
    let hard_limit = state.config.realtime.max_frame_bytes.saturating_mul(2);

    Ok(ws
        .max_message_size(hard_limit)
        .on_upgrade(move |socket| handle_ws_connection(state, socket)))
}

/// Handles an established WebSocket connection.
async fn handle_ws_connection(state: AppState, mut socket: WebSocket) {
    let engine = state.realtime.clone();
    let (handle, mut outbound_rx) = engine.lifecycle.on_connect();
    let conn_id = handle.id;

    // Shutdown may have started between the upgrade check and registration.
    let Some(mut shutdown_rx) = engine.subscribe_shutdown() else {
        debug!(conn_id = %conn_id, "Refusing connection during shutdown");
        engine.lifecycle.on_disconnect(conn_id);
        let _ = socket.send(Message::Close(None)).await;
        return;
    };

    let (mut ws_tx, mut ws_rx) = socket.split();

    // Outbound forwarder + heartbeat
    let heartbeat = engine.heartbeat;
    let mut send_task = tokio::spawn(async move {
        let mut ping = tokio::time::interval(heartbeat.ping_interval);
        ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ping.tick().await;

        loop {
            tokio::select! {
                next = outbound_rx.recv() => {
                    let Some(event) = next else { break };
                    let text = match serialize_outbound(&event) {
                        Ok(text) => text,
                        Err(e) => {
                            error!(conn_id = %conn_id, error = %e, "Failed to serialize outbound event");
                            continue;
                        }
                    };
                    if ws_tx.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                _ = ping.tick() => {
                    if !handle.is_alive() {
                        break;
                    }
                    if heartbeat.is_expired(&handle, Utc::now()) {
                        warn!(conn_id = %conn_id, "Heartbeat timed out, closing connection");
                        break;
                    }
                    if ws_tx.send(Message::Ping(Default::default())).await.is_err() {
                        break;
                    }
                }
                _ = shutdown_rx.recv() => {
                    debug!(conn_id = %conn_id, "Closing connection for shutdown");
                    break;
                }
            }
        }

        let _ = ws_tx.send(Message::Close(None)).await;
    });

    // Inbound frames, processed in arrival order
    let recv_engine = engine.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = ws_rx.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    if recv_engine.lifecycle.on_frame(conn_id, text.as_str()) == FrameOutcome::Close {
                        break;
                    }
                }
                Ok(Message::Binary(_)) => {
                    recv_engine.lifecycle.on_activity(conn_id);
                    debug!(conn_id = %conn_id, "Ignoring binary frame");
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    recv_engine.lifecycle.on_activity(conn_id);
                }
                Ok(Message::Close(_)) => break,
                Err(e) => {
                    warn!(conn_id = %conn_id, error = %e, "WebSocket error");
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    // Cleanup
    let session = engine.lifecycle.on_disconnect(conn_id);

    info!(
        conn_id = %conn_id,
        username = session.as_ref().map(|s| s.username.as_str()).unwrap_or("-"),
        "WebSocket connection closed"
    );
}
