//! Lifecycle service
//!
//! Executes commands against the store:
//!
//! 1. Re-read the founder's snapshot
//! 2. Apply the command with the pure engine
//! 3. Persist the effects against the version that was read
//! 4. On a version conflict, silently start over (bounded by config)
//! 5. Notify open sessions once the write landed

use crate::config::RuntimeConfig;
use crate::error::ServiceError;
use crate::notify::Notifier;
use crate::runner::EffectRunner;
use crate::store::LifecycleStore;
use chrono::Utc;
use hatch_engine::{apply_transition, Command, Effect, TransitionContext};
use hatch_model::{Actor, LifecycleSnapshot, Timestamp, UserId};
use std::sync::Arc;

const TRANSITIONS_APPLIED: &str = "hatch_transitions_applied_total";
const TRANSITIONS_REJECTED: &str = "hatch_transitions_rejected_total";
const CONCURRENCY_CONFLICTS: &str = "hatch_concurrency_conflicts_total";

/// Result of an executed command
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    /// Snapshot as stored after the command
    pub snapshot: LifecycleSnapshot,
    /// Effects that were persisted; empty for an idempotent re-entry
    pub effects: Vec<Effect>,
    /// Notifications that could not be delivered
    pub undelivered: usize,
}

impl CommandOutcome {
    #[inline]
    #[must_use]
    pub fn applied(&self) -> bool {
        !self.effects.is_empty()
    }
}

pub struct LifecycleService {
    store: Arc<dyn LifecycleStore>,
    runner: EffectRunner,
    config: RuntimeConfig,
}

impl std::fmt::Debug for LifecycleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleService")
            .field("runner", &self.runner)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LifecycleService {
    #[must_use]
    pub fn new(
        store: Arc<dyn LifecycleStore>,
        notifier: Arc<dyn Notifier>,
        config: RuntimeConfig,
    ) -> Self {
        let runner = EffectRunner::new(Arc::clone(&store), notifier, &config.service);
        Self { store, runner, config }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Current snapshot for `founder`
    pub async fn snapshot(&self, founder: UserId) -> Result<LifecycleSnapshot, ServiceError> {
        Ok(self.store.snapshot(founder).await?)
    }

    /// Execute `command` on `founder`'s lifecycle as `actor`
    pub async fn execute(
        &self,
        founder: UserId,
        actor: Actor,
        command: &Command,
    ) -> Result<CommandOutcome, ServiceError> {
        self.execute_at(founder, actor, command, Utc::now()).await
    }

    /// [`execute`](Self::execute) with an explicit clock reading
    pub async fn execute_at(
        &self,
        founder: UserId,
        actor: Actor,
        command: &Command,
        now: Timestamp,
    ) -> Result<CommandOutcome, ServiceError> {
        let ctx = TransitionContext::new(actor, now, &self.config.policy);
        let mut conflicts = 0u32;

        loop {
            let snapshot = self.store.snapshot(founder).await?;
            let transition = match apply_transition(&snapshot, command, &ctx) {
                Ok(transition) => transition,
                Err(err) => {
                    metrics::counter!(TRANSITIONS_REJECTED, "command" => command.name())
                        .increment(1);
                    return Err(err.into());
                }
            };

            if transition.is_noop() {
                return Ok(CommandOutcome {
                    snapshot: transition.snapshot,
                    effects: Vec::new(),
                    undelivered: 0,
                });
            }

            match self.runner.run(founder, snapshot.version, &transition).await {
                Ok(report) => {
                    metrics::counter!(TRANSITIONS_APPLIED, "command" => command.name())
                        .increment(1);
                    tracing::info!(
                        command = command.name(),
                        founder = %founder,
                        actor = %actor.user_id,
                        version = report.version,
                        effects = transition.effects.len(),
                        "transition applied"
                    );
                    let mut stored = transition.snapshot;
                    stored.version = report.version;
                    return Ok(CommandOutcome {
                        snapshot: stored,
                        effects: transition.effects,
                        undelivered: report.undelivered,
                    });
                }
                Err(err) if err.is_conflict() => {
                    metrics::counter!(CONCURRENCY_CONFLICTS).increment(1);
                    conflicts += 1;
                    if conflicts > self.config.service.conflict_retries {
                        tracing::warn!(
                            command = command.name(),
                            founder = %founder,
                            conflicts,
                            "giving up after conflicts"
                        );
                        return Err(ServiceError::ConcurrencyConflict {
                            founder,
                            attempts: conflicts,
                        });
                    }
                    tracing::warn!(
                        command = command.name(),
                        founder = %founder,
                        error = %err,
                        "stale snapshot, retrying"
                    );
                }
                Err(err) => {
                    tracing::error!(
                        command = command.name(),
                        founder = %founder,
                        error = %err,
                        "persistence failed"
                    );
                    return Err(ServiceError::PersistenceFailure(err));
                }
            }
        }
    }
}
