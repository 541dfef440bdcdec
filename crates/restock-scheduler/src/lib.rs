//! # Restock Scheduler
//!
//! Named recurring-job scheduler for the inventory bot.
//!
//! ## Design Principles
//! - No external job queue — tokio timers only, zero overhead when idle
//! - One live timer per job name; rescheduling replaces atomically
//! - A job fires once immediately on scheduling, then on a fixed period
//! - A failing run is logged and retried at the next natural period
//! - Runs of the same job never overlap; a late run skips the tick
//!
//! ## Architecture
//! ```text
//! Scheduler (registry: name → driver task)
//!   └── driver (tokio interval, per job)
//!         ├── tick → try run gate
//!         │     ├── free → spawn run (callback)
//!         │     └── busy → "run skipped, previous still active"
//!         └── cancel/replace → abort driver (in-flight run completes)
//! ```

pub mod engine;

pub use engine::Scheduler;
