//! Top-level relay engine that ties together all subsystems.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::info;

use chatrelay_core::config::RealtimeConfig;

use crate::connection::heartbeat::HeartbeatConfig;
use crate::connection::pool::ConnectionPool;
use crate::filter::{ProfanityFilter, WordListFilter};
use crate::lifecycle::ConnectionLifecycleHook;
use crate::metrics::RelayMetrics;
use crate::registry::membership::MembershipRegistry;
use crate::router::EventRouter;

/// Central relay engine shared by every WebSocket task.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Joined sessions and rooms.
    pub registry: Arc<MembershipRegistry>,
    /// Live connections.
    pub connections: Arc<ConnectionPool>,
    /// Event router.
    pub router: Arc<EventRouter>,
    /// Transport entry points.
    pub lifecycle: Arc<ConnectionLifecycleHook>,
    /// Metrics collector.
    pub metrics: Arc<RelayMetrics>,
    /// Keepalive timing.
    pub heartbeat: HeartbeatConfig,
    started_at: DateTime<Utc>,
    accepting: Arc<AtomicBool>,
    shutdown_tx: broadcast::Sender<()>,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine")
            .field("connections", &self.connections.connection_count())
            .field("sessions", &self.registry.session_count())
            .finish()
    }
}

impl RealtimeEngine {
    /// Creates an engine using the configured word-list filter.
    pub fn new(config: &RealtimeConfig) -> Self {
        let filter = WordListFilter::from_config(&config.profanity);
        info!(
            enabled = config.profanity.enabled,
            words = filter.word_count(),
            "Profanity filter loaded"
        );
        Self::with_filter(config, Arc::new(filter))
    }

    /// Creates an engine with a caller-supplied profanity filter.
    pub fn with_filter(config: &RealtimeConfig, filter: Arc<dyn ProfanityFilter>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let metrics = Arc::new(RelayMetrics::new());
        let registry = Arc::new(MembershipRegistry::new(config.max_name_length));
        let connections = Arc::new(ConnectionPool::new());
        let router = Arc::new(EventRouter::new(
            registry.clone(),
            connections.clone(),
            filter,
            metrics.clone(),
        ));
        let lifecycle = Arc::new(ConnectionLifecycleHook::new(
            config,
            connections.clone(),
            router.clone(),
            metrics.clone(),
        ));

        info!("Relay engine initialized");

        Self {
            registry,
            connections,
            router,
            lifecycle,
            metrics,
            heartbeat: HeartbeatConfig::from(config),
            started_at: Utc::now(),
            accepting: Arc::new(AtomicBool::new(true)),
            shutdown_tx,
        }
    }

    /// Returns a shutdown receiver for graceful shutdown coordination.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Subscribes a new connection task to the shutdown signal.
    ///
    /// Returns `None` once shutdown has begun. The flag is read after
    /// subscribing, so a task that misses the broadcast always sees it.
    pub fn subscribe_shutdown(&self) -> Option<broadcast::Receiver<()>> {
        let rx = self.shutdown_receiver();
        self.is_accepting().then_some(rx)
    }

    /// Signals every connection task to close and stops accepting new ones.
    ///
    /// Outbound queues are closed immediately; each task still runs its own
    /// disconnect path as it exits, which clears the registry.
    pub fn shutdown(&self) {
        info!(
            connections = self.connections.connection_count(),
            "Shutting down relay engine"
        );

        self.accepting.store(false, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(());

        for handle in self.connections.all_connections() {
            handle.mark_dead();
        }
    }

    /// Whether new connections are still accepted.
    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::SeqCst)
    }

    /// Seconds since the engine was created.
    pub fn uptime_seconds(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds().max(0)
    }
}
