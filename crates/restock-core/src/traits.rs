//! Port traits consumed by the bot core.
//!
//! The broadcast and dispatch crates never talk to a transport directly;
//! they depend on these two narrow contracts. `Messenger` carries the two
//! addressing modes of the chat platform: persistent target ids for push
//! messages and one-shot reply tokens for responding to an inbound event.

use async_trait::async_trait;

use crate::error::Result;

/// Outbound message delivery.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Push a text message to a persistent target (group/room/user id).
    async fn push(&self, to: &str, text: &str) -> Result<()>;

    /// Reply to a specific inbound event via its one-shot reply token.
    async fn reply(&self, reply_token: &str, text: &str) -> Result<()>;
}

/// Inventory data source, read once per scheduled run.
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Fetch the current re-order list as a single display string.
    async fn fetch(&self) -> Result<String>;
}
