//! Fan-out broadcast — one message, many targets, isolated failures.
//!
//! Every target gets exactly one send attempt per broadcast. Sends run
//! concurrently and each outcome is captured as a value in the report;
//! one target failing never blocks or aborts the others, and a partial
//! failure is not an error at the call level — the caller reads the
//! report and applies its own policy.

use std::sync::Arc;

use restock_core::types::{BroadcastReport, SendOutcome, TargetOutcome};
use restock_core::{Messenger, Result, RestockError};

/// Broadcasts one message to a set of targets through a [`Messenger`].
#[derive(Clone)]
pub struct Broadcaster {
    messenger: Arc<dyn Messenger>,
}

impl Broadcaster {
    pub fn new(messenger: Arc<dyn Messenger>) -> Self {
        Self { messenger }
    }

    /// Send `message` to every target, one push per target.
    ///
    /// An empty target list is a configuration error: a broadcast that
    /// silently reaches nobody would mask a missing config value.
    pub async fn broadcast(&self, message: &str, targets: &[String]) -> Result<BroadcastReport> {
        if targets.is_empty() {
            return Err(RestockError::config("no broadcast targets configured"));
        }

        let sends = targets.iter().map(|target| {
            let messenger = self.messenger.clone();
            async move {
                let outcome = match messenger.push(target, message).await {
                    Ok(()) => SendOutcome::Success,
                    Err(e) => {
                        tracing::warn!(target = %target, "broadcast send failed: {e}");
                        SendOutcome::Failure(e.to_string())
                    }
                };
                TargetOutcome { target: target.clone(), outcome }
            }
        });

        let per_target = futures::future::join_all(sends).await;
        let report = BroadcastReport::new(per_target);
        tracing::info!(
            succeeded = report.succeeded,
            failed = report.failed,
            "broadcast complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Messenger that records pushes and fails for listed targets.
    struct ScriptedMessenger {
        fail_targets: Vec<String>,
        pushed: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedMessenger {
        fn new(fail_targets: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                fail_targets: fail_targets.iter().map(|s| s.to_string()).collect(),
                pushed: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Messenger for ScriptedMessenger {
        async fn push(&self, to: &str, text: &str) -> Result<()> {
            self.pushed.lock().unwrap().push((to.into(), text.into()));
            if self.fail_targets.iter().any(|t| t == to) {
                return Err(RestockError::delivery(format!("push to {to} rejected")));
            }
            Ok(())
        }

        async fn reply(&self, _reply_token: &str, _text: &str) -> Result<()> {
            Ok(())
        }
    }

    fn targets(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn empty_targets_is_a_config_error() {
        let broadcaster = Broadcaster::new(ScriptedMessenger::new(&[]));
        let err = broadcaster.broadcast("hi", &[]).await.unwrap_err();
        assert!(matches!(err, RestockError::Config(_)));
    }

    #[tokio::test]
    async fn one_entry_per_target() {
        let messenger = ScriptedMessenger::new(&[]);
        let broadcaster = Broadcaster::new(messenger.clone());
        let report = broadcaster
            .broadcast("Items: 42", &targets(&["A", "B", "C"]))
            .await
            .unwrap();

        assert_eq!(report.per_target.len(), 3);
        assert_eq!(report.succeeded + report.failed, 3);
        assert_eq!(report.succeeded, 3);
        assert_eq!(messenger.pushed.lock().unwrap().len(), 3, "exactly one attempt per target");
    }

    #[tokio::test]
    async fn failed_target_does_not_block_the_others() {
        let messenger = ScriptedMessenger::new(&["B"]);
        let broadcaster = Broadcaster::new(messenger.clone());
        let report = broadcaster
            .broadcast("Items: 42", &targets(&["A", "B", "C"]))
            .await
            .unwrap();

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        for entry in &report.per_target {
            match entry.target.as_str() {
                "B" => assert!(matches!(entry.outcome, SendOutcome::Failure(_))),
                _ => assert!(entry.outcome.is_success()),
            }
        }
        // The failing target was still attempted exactly once, no retry.
        let pushed = messenger.pushed.lock().unwrap();
        assert_eq!(pushed.iter().filter(|(to, _)| to == "B").count(), 1);
    }

    #[tokio::test]
    async fn failure_reason_carries_the_delivery_error() {
        let broadcaster = Broadcaster::new(ScriptedMessenger::new(&["A"]));
        let report = broadcaster.broadcast("hi", &targets(&["A"])).await.unwrap();
        match &report.per_target[0].outcome {
            SendOutcome::Failure(reason) => assert!(reason.contains("push to A rejected")),
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
