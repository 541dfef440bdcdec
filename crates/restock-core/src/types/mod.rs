//! Shared types flowing between the restock crates.

pub mod event;
pub mod report;

pub use event::{EventKind, EventSource, InboundEvent, Reply};
pub use report::{BroadcastReport, SendOutcome, TargetOutcome};
