//! Broadcast outcome reporting.

use serde::{Deserialize, Serialize};

/// Outcome of a single send within a broadcast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase", tag = "result", content = "reason")]
pub enum SendOutcome {
    Success,
    Failure(String),
}

impl SendOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SendOutcome::Success)
    }
}

/// One entry per broadcast target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetOutcome {
    pub target: String,
    pub outcome: SendOutcome,
}

/// Aggregated result of one broadcast invocation. Exactly one entry per
/// target; counts are fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BroadcastReport {
    pub per_target: Vec<TargetOutcome>,
    pub succeeded: usize,
    pub failed: usize,
}

impl BroadcastReport {
    pub fn new(per_target: Vec<TargetOutcome>) -> Self {
        let succeeded = per_target.iter().filter(|t| t.outcome.is_success()).count();
        let failed = per_target.len() - succeeded;
        Self { per_target, succeeded, failed }
    }

    /// True when every target received the message.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
