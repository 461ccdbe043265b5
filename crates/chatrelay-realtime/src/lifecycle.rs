//! Connection lifecycle hook: the glue between a transport connection
//! and the event router.
//!
//! The transport calls [`ConnectionLifecycleHook::on_connect`] once,
//! [`ConnectionLifecycleHook::on_frame`] for every text frame in arrival
//! order, and [`ConnectionLifecycleHook::on_disconnect`] when the socket
//! goes away. Acknowledgements are pushed onto the same outbound queue as
//! broadcasts, so a client always sees an event's side effects before its
//! ack.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use chatrelay_core::config::RealtimeConfig;

use crate::connection::handle::{ConnectionHandle, ConnectionId};
use crate::connection::pool::ConnectionPool;
use crate::error::AckError;
use crate::message::serializer::deserialize_inbound;
use crate::message::types::{ErrorReply, EventName, InboundEvent, OutboundEvent};
use crate::message::validator::validate_frame;
use crate::metrics::RelayMetrics;
use crate::registry::session::Session;
use crate::router::EventRouter;

/// What the transport should do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Keep reading.
    Continue,
    /// Close the connection.
    Close,
}

/// Per-connection entry points used by the transport adapter.
#[derive(Debug)]
pub struct ConnectionLifecycleHook {
    pool: Arc<ConnectionPool>,
    router: Arc<EventRouter>,
    metrics: Arc<RelayMetrics>,
    channel_buffer_size: usize,
    max_frame_bytes: usize,
}

impl ConnectionLifecycleHook {
    /// Creates the hook.
    pub fn new(
        config: &RealtimeConfig,
        pool: Arc<ConnectionPool>,
        router: Arc<EventRouter>,
        metrics: Arc<RelayMetrics>,
    ) -> Self {
        Self {
            pool,
            router,
            metrics,
            channel_buffer_size: config.channel_buffer_size.max(1),
            max_frame_bytes: config.max_frame_bytes,
        }
    }

    /// Registers a new connection.
    ///
    /// Returns the connection handle and a receiver for outbound events.
    pub fn on_connect(&self) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundEvent>) {
        let (tx, rx) = mpsc::channel(self.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(tx));

        self.pool.add(handle.clone());
        self.metrics.connection_opened();

        info!(conn_id = %handle.id, "WebSocket connection registered");

        (handle, rx)
    }

    /// Processes one inbound text frame.
    pub fn on_frame(&self, conn_id: ConnectionId, raw: &str) -> FrameOutcome {
        let Some(handle) = self.pool.get(&conn_id) else {
            warn!(conn_id = %conn_id, "Frame from unknown connection");
            return FrameOutcome::Close;
        };

        handle.touch();

        if let Err(e) = validate_frame(raw, self.max_frame_bytes) {
            self.reject(&handle, None, e);
            return FrameOutcome::Continue;
        }

        let frame = match deserialize_inbound(raw) {
            Ok(f) => f,
            Err(e) => {
                self.reject(&handle, None, AckError::MalformedFrame(e.to_string()));
                return FrameOutcome::Continue;
            }
        };

        let ack = frame.ack;
        let Some(name) = EventName::parse(&frame.event) else {
            self.reject(&handle, ack, AckError::UnknownEvent(frame.event));
            return FrameOutcome::Continue;
        };

        let event = match InboundEvent::decode(name, frame.data) {
            Ok(event) => event,
            Err(e) => {
                self.reject(&handle, ack, e);
                return FrameOutcome::Continue;
            }
        };

        if !name.is_acknowledged() {
            debug!(conn_id = %conn_id, event = %name, "Client requested disconnect");
            self.metrics.event_received(true);
            return FrameOutcome::Close;
        }

        let result = self.router.dispatch(conn_id, event);
        self.metrics.event_received(result.is_ok());

        if let Err(e) = &result {
            debug!(conn_id = %conn_id, event = %name, code = e.code(), error = %e, "Event rejected");
        }

        if let Some(id) = ack {
            self.reply(&handle, OutboundEvent::ack(id, &result));
        }

        FrameOutcome::Continue
    }

    /// Records transport-level activity such as a pong.
    pub fn on_activity(&self, conn_id: ConnectionId) {
        if let Some(handle) = self.pool.get(&conn_id) {
            handle.touch();
        }
    }

    /// Tears the connection down.
    ///
    /// Runs the router's disconnect transition exactly once per connection;
    /// later calls for the same ID do nothing.
    pub fn on_disconnect(&self, conn_id: ConnectionId) -> Option<Session> {
        let handle = self.pool.remove(&conn_id)?;
        handle.mark_dead();

        let session = self.router.disconnect(&handle);
        self.metrics.connection_closed();

        info!(
            conn_id = %conn_id,
            joined = session.is_some(),
            "WebSocket connection unregistered"
        );

        session
    }

    fn reject(&self, handle: &ConnectionHandle, ack: Option<u64>, err: AckError) {
        debug!(conn_id = %handle.id, code = err.code(), error = %err, "Frame rejected");
        self.metrics.event_received(false);

        let reply = match ack {
            Some(id) => OutboundEvent::ack(id, &Err(err)),
            None => OutboundEvent::Error(ErrorReply {
                message: err.to_string(),
            }),
        };
        self.reply(handle, reply);
    }

    fn reply(&self, handle: &ConnectionHandle, event: OutboundEvent) {
        self.metrics.record_send(handle.send(event));
    }
}
