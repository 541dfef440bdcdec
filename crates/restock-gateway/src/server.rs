//! Gateway server — application state, router, and serve loop.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::routing::{get, post};
use restock_broadcast::Broadcaster;
use restock_channels::LineChannel;
use restock_core::{InventorySource, Messenger, RestockConfig, Result, RestockError};
use restock_dispatch::Dispatcher;
use restock_scheduler::Scheduler;
use tower_http::trace::TraceLayer;

use crate::routes;
use crate::update::{INVENTORY_JOB, InventoryUpdater};

/// Shared state behind every route handler.
pub struct AppState {
    pub config: RestockConfig,
    /// Concrete LINE channel, kept for webhook signature checks.
    pub line: Arc<LineChannel>,
    /// Delivery port for ad-hoc sends (`/test/message`).
    pub messenger: Arc<dyn Messenger>,
    pub dispatcher: Dispatcher,
    pub updater: Arc<InventoryUpdater>,
    pub scheduler: Arc<Scheduler>,
    pub start_time: Instant,
}

impl AppState {
    /// Wire the bot together. `messenger` is the delivery port used for
    /// replies and broadcasts — in production the LINE channel itself.
    pub fn new(
        config: RestockConfig,
        line: Arc<LineChannel>,
        messenger: Arc<dyn Messenger>,
        source: Arc<dyn InventorySource>,
    ) -> Self {
        if !line.can_verify() {
            tracing::warn!(
                "no channel secret configured; webhook signature verification is disabled"
            );
        }
        let dispatcher = Dispatcher::new(messenger.clone());
        let updater = Arc::new(InventoryUpdater::new(
            source,
            Broadcaster::new(messenger.clone()),
            config.line.group_ids.clone(),
        ));
        Self {
            config,
            line,
            messenger,
            dispatcher,
            updater,
            scheduler: Arc::new(Scheduler::new()),
            start_time: Instant::now(),
        }
    }

    /// (Re)install the recurring inventory-update job. Fails on an
    /// unusable period (`schedule.period_days = 0`).
    pub fn start_inventory_schedule(&self) -> Result<()> {
        let updater = self.updater.clone();
        self.scheduler.schedule(INVENTORY_JOB, self.config.broadcast_period(), move || {
            let updater = updater.clone();
            async move { updater.run_to_completion().await }
        })
    }
}

/// Build the HTTP router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/status", get(routes::status))
        .route("/webhook", get(routes::webhook_verify).post(routes::webhook))
        .route("/inventory/update", post(routes::trigger_update))
        .route("/inventory/schedule/start", post(routes::schedule_start))
        .route("/inventory/schedule/stop", post(routes::schedule_stop))
        .route("/test/message", post(routes::test_message))
        .route("/test/getId", post(routes::test_get_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(state: Arc<AppState>) -> Result<()> {
    let addr = format!("{}:{}", state.config.gateway.host, state.config.gateway.port);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RestockError::Gateway(format!("bind {addr}: {e}")))?;
    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, router)
        .await
        .map_err(|e| RestockError::Gateway(format!("server error: {e}")))
}
