//! HTTP gateway for restock.
//!
//! Hosts the webhook endpoint, the manual inventory trigger, and the
//! scheduler control routes, and owns the inventory-update job that the
//! scheduler fires.

pub mod routes;
pub mod server;
pub mod update;

pub use server::{AppState, serve};
pub use update::{INVENTORY_JOB, InventoryUpdater, format_inventory_message};
