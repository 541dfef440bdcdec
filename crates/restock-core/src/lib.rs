//! # restock-core
//!
//! Shared foundation for the restock workspace: the error taxonomy, the
//! port traits the bot core depends on (message delivery, inventory data
//! source), the event/report types that flow between crates, and the
//! TOML configuration.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::RestockConfig;
pub use error::{RestockError, Result};
pub use traits::{InventorySource, Messenger};
