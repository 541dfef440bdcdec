//! The inventory-update job: fetch the re-order list, format the weekly
//! message, broadcast it to every configured group.

use std::sync::Arc;

use restock_broadcast::Broadcaster;
use restock_core::types::BroadcastReport;
use restock_core::{InventorySource, Result, RestockError};

/// Scheduler name of the recurring broadcast.
pub const INVENTORY_JOB: &str = "inventory-update";

/// Format the weekly inventory message around the fetched re-order list.
pub fn format_inventory_message(reorder_items: &str) -> String {
    format!(
        "\n🛒 *Weekly Inventory Update* 🛒\n\n\
         This week's inventory status:\n\n\
         *Items to be re-ordered:* {reorder_items}\n\n\
         Please proceed with the necessary orders."
    )
}

/// Runs one inventory update end to end. Shared between the scheduled
/// job, the manual HTTP trigger, and the CLI.
pub struct InventoryUpdater {
    source: Arc<dyn InventorySource>,
    broadcaster: Broadcaster,
    targets: Vec<String>,
}

impl InventoryUpdater {
    pub fn new(
        source: Arc<dyn InventorySource>,
        broadcaster: Broadcaster,
        targets: Vec<String>,
    ) -> Self {
        Self { source, broadcaster, targets }
    }

    /// Fetch, format, broadcast. Missing targets fail before any fetch;
    /// per-target delivery failures land in the report, not in `Err`.
    pub async fn run(&self) -> Result<BroadcastReport> {
        if self.targets.is_empty() {
            return Err(RestockError::config("no LINE group IDs configured"));
        }

        tracing::info!("running inventory update");
        let reorder_items = self.source.fetch().await?;
        let message = format_inventory_message(&reorder_items);

        let report = self.broadcaster.broadcast(&message, &self.targets).await?;
        if report.all_succeeded() {
            tracing::info!("inventory update sent to {} groups", report.succeeded);
        } else {
            tracing::warn!(
                failed = report.failed,
                succeeded = report.succeeded,
                "inventory update only partially delivered"
            );
        }
        Ok(report)
    }

    /// Like [`run`](Self::run), but folds a partial delivery into an
    /// error — the shape the scheduler wants, so a partly-failed run is
    /// logged as failed and retried at the next period.
    pub async fn run_to_completion(&self) -> Result<()> {
        let report = self.run().await?;
        if !report.all_succeeded() {
            return Err(RestockError::delivery(format!(
                "{} of {} targets failed",
                report.failed,
                report.per_target.len()
            )));
        }
        Ok(())
    }
}
