//! Scheduler engine — job registry and per-job driver tasks.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use restock_core::{Result, RestockError};
use tokio::sync::Mutex as RunGate;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Boxed recurring-job callback. Each firing calls the closure to mint a
/// fresh future.
pub type JobCallback = Arc<dyn Fn() -> BoxFuture<'static, Result<()>> + Send + Sync>;

struct Job {
    driver: JoinHandle<()>,
    period: Duration,
}

/// Registry of named periodic jobs. Must live inside a tokio runtime;
/// timers are driven by one spawned task per job.
///
/// Mutation (`schedule`, `cancel`) is serialized by the registry lock and
/// `list` sees a consistent snapshot. The lock is a std mutex and is never
/// held across an await; the driver tasks own the actual timers.
#[derive(Default)]
pub struct Scheduler {
    jobs: Mutex<HashMap<String, Job>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install (or replace) the job named `name`. Any existing timer under
    /// that name is stopped before the new one is armed, so at most one
    /// live timer exists per name; a run already in flight from the old
    /// registration completes on its own. The callback fires once
    /// immediately, then every `period`. A zero period is a configuration
    /// error: the timer it would arm cannot tick.
    pub fn schedule<F, Fut>(&self, name: &str, period: Duration, callback: F) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let callback: JobCallback = Arc::new(move || callback().boxed());
        self.schedule_boxed(name, period, callback)
    }

    /// Non-generic form, for callers that already hold a [`JobCallback`].
    pub fn schedule_boxed(
        &self,
        name: &str,
        period: Duration,
        callback: JobCallback,
    ) -> Result<()> {
        if period.is_zero() {
            return Err(RestockError::config(format!("job '{name}': period must be non-zero")));
        }
        let mut jobs = self.lock_registry();
        // Stop the old timer before the new driver can fire, so the swap
        // never produces a tick from the outgoing registration.
        if let Some(old) = jobs.remove(name) {
            old.driver.abort();
            tracing::info!(job = %name, "replacing existing schedule");
        }
        let driver = tokio::spawn(drive(name.to_string(), period, callback));
        jobs.insert(name.to_string(), Job { driver, period });
        tracing::info!(job = %name, period_secs = period.as_secs(), "job scheduled");
        Ok(())
    }

    /// Stop and forget the job named `name`. Returns whether it existed;
    /// cancelling an unknown name is a no-op, not an error. A run already
    /// in flight completes, but no further tick fires.
    pub fn cancel(&self, name: &str) -> bool {
        let mut jobs = self.lock_registry();
        match jobs.remove(name) {
            Some(job) => {
                job.driver.abort();
                tracing::info!(job = %name, "job cancelled");
                true
            }
            None => false,
        }
    }

    /// Names of all active jobs, sorted.
    pub fn list(&self) -> Vec<String> {
        let jobs = self.lock_registry();
        let mut names: Vec<String> = jobs.keys().cloned().collect();
        names.sort();
        names
    }

    /// Period of an active job, if scheduled.
    pub fn period_of(&self, name: &str) -> Option<Duration> {
        self.lock_registry().get(name).map(|j| j.period)
    }

    fn lock_registry(&self) -> std::sync::MutexGuard<'_, HashMap<String, Job>> {
        // Driver tasks never touch the registry, so a poisoned lock can
        // only come from a panicking caller; the map itself stays valid.
        self.jobs.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        let jobs = self.lock_registry();
        for job in jobs.values() {
            job.driver.abort();
        }
    }
}

/// Per-job driver loop. The interval's first tick completes immediately,
/// which gives the fire-on-schedule behavior. Each tick claims the run
/// gate; a previous run still holding it means this tick is skipped
/// rather than overlapping.
async fn drive(name: String, period: Duration, callback: JobCallback) {
    let run_gate = Arc::new(RunGate::new(()));
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match run_gate.clone().try_lock_owned() {
            Ok(guard) => {
                let callback = callback.clone();
                let job = name.clone();
                // Runs are spawned so that aborting the driver (cancel or
                // replace) lets an in-flight run finish.
                tokio::spawn(async move {
                    let _running = guard;
                    if let Err(e) = callback().await {
                        tracing::warn!(job = %job, "scheduled run failed: {e}");
                    }
                });
            }
            Err(_) => {
                tracing::warn!(job = %name, "run skipped, previous still active");
            }
        }
    }
}
