//! Effect runner
//!
//! Executes the effects of an accepted transition: persist first, and only
//! once the write succeeded, dispatch notifications. Notification delivery
//! is retried on its own schedule and never rolls back the write.

use crate::config::ServiceConfig;
use crate::error::StoreError;
use crate::notify::Notifier;
use crate::store::LifecycleStore;
use hatch_engine::{LifecycleSignal, Transition};
use hatch_model::UserId;
use std::sync::Arc;
use std::time::Duration;

pub(crate) const NOTIFICATIONS_FAILED: &str = "hatch_notifications_failed_total";

/// What happened when effects were run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// Version now stored
    pub version: u64,
    pub delivered: usize,
    pub undelivered: usize,
}

pub struct EffectRunner {
    store: Arc<dyn LifecycleStore>,
    notifier: Arc<dyn Notifier>,
    attempts: u32,
    backoff: Duration,
}

impl std::fmt::Debug for EffectRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectRunner")
            .field("attempts", &self.attempts)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

impl EffectRunner {
    #[must_use]
    pub fn new(
        store: Arc<dyn LifecycleStore>,
        notifier: Arc<dyn Notifier>,
        config: &ServiceConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            attempts: config.notify_attempts.max(1),
            backoff: config.notify_backoff(),
        }
    }

    /// Persist `transition`, computed from `expected_version`, then notify.
    ///
    /// A store error means nothing was applied and nothing was sent.
    pub async fn run(
        &self,
        founder: UserId,
        expected_version: u64,
        transition: &Transition,
    ) -> Result<RunReport, StoreError> {
        let version = self
            .store
            .persist(founder, expected_version, &transition.effects)
            .await?;

        let mut report = RunReport {
            version,
            delivered: 0,
            undelivered: 0,
        };
        for signal in transition.signals() {
            if self.deliver(*signal).await {
                report.delivered += 1;
            } else {
                report.undelivered += 1;
            }
        }
        Ok(report)
    }

    /// At-least-once delivery with doubling backoff; `false` once attempts
    /// run out or the failure is permanent
    async fn deliver(&self, signal: LifecycleSignal) -> bool {
        let mut delay = self.backoff;
        for attempt in 1..=self.attempts {
            match self.notifier.notify(signal).await {
                Ok(()) => return true,
                Err(err) if err.is_retryable() && attempt < self.attempts => {
                    tracing::debug!(attempt, error = %err, "notification failed, retrying");
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                }
                Err(err) => {
                    tracing::warn!(
                        founder = %signal.founder_id(),
                        attempt,
                        error = %err,
                        "notification dropped"
                    );
                    break;
                }
            }
        }
        metrics::counter!(NOTIFICATIONS_FAILED).increment(1);
        false
    }
}
