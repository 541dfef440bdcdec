//! Channel implementations for restock.
//!
//! Currently a single channel: the LINE Messaging API, which carries both
//! the outbound side (push to groups, reply by token) and the inbound
//! side (webhook signature verification and payload parsing).

pub mod events;
pub mod line;

pub use line::LineChannel;
