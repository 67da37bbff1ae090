//! Lifecycle store seam and the in-memory implementation
//!
//! A store persists the record effects of one transition atomically and
//! rejects writes computed from a stale snapshot version.

use crate::error::StoreError;
use async_trait::async_trait;
use dashmap::DashMap;
use hatch_engine::{AuditEntry, Effect};
use hatch_model::{LifecycleSnapshot, UserId};

#[async_trait]
pub trait LifecycleStore: Send + Sync {
    /// Current snapshot; a founder the store has never seen gets an empty one
    async fn snapshot(&self, founder: UserId) -> Result<LifecycleSnapshot, StoreError>;

    /// Apply the record effects of one transition, all or nothing.
    ///
    /// Fails with `ConcurrencyConflict` unless `expected_version` is the
    /// version currently stored. Returns the new version.
    async fn persist(
        &self,
        founder: UserId,
        expected_version: u64,
        effects: &[Effect],
    ) -> Result<u64, StoreError>;
}

#[derive(Debug, Clone)]
struct StoredLifecycle {
    current: LifecycleSnapshot,
    /// Chains closed by a reapplication, oldest first
    archived: Vec<LifecycleSnapshot>,
    audit: Vec<AuditEntry>,
}

impl StoredLifecycle {
    fn new(founder: UserId) -> Self {
        Self {
            current: LifecycleSnapshot::empty(founder),
            archived: Vec::new(),
            audit: Vec::new(),
        }
    }
}

/// Store backed by a concurrent map; one entry per founder
#[derive(Debug, Default)]
pub struct InMemoryStore {
    lifecycles: DashMap<UserId, StoredLifecycle>,
}

impl InMemoryStore {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a founder's snapshot, replacing whatever was stored
    pub fn insert(&self, snapshot: LifecycleSnapshot) {
        let founder = snapshot.founder_id;
        let mut stored = StoredLifecycle::new(founder);
        stored.current = snapshot;
        self.lifecycles.insert(founder, stored);
    }

    /// Audit trail of stage overrides for `founder`
    #[must_use]
    pub fn audit_log(&self, founder: UserId) -> Vec<AuditEntry> {
        self.lifecycles
            .get(&founder)
            .map(|stored| stored.audit.clone())
            .unwrap_or_default()
    }

    /// Application chains closed by reapplication
    #[must_use]
    pub fn archived(&self, founder: UserId) -> Vec<LifecycleSnapshot> {
        self.lifecycles
            .get(&founder)
            .map(|stored| stored.archived.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn founder_count(&self) -> usize {
        self.lifecycles.len()
    }
}

#[async_trait]
impl LifecycleStore for InMemoryStore {
    async fn snapshot(&self, founder: UserId) -> Result<LifecycleSnapshot, StoreError> {
        Ok(self
            .lifecycles
            .get(&founder)
            .map_or_else(|| LifecycleSnapshot::empty(founder), |stored| stored.current.clone()))
    }

    async fn persist(
        &self,
        founder: UserId,
        expected_version: u64,
        effects: &[Effect],
    ) -> Result<u64, StoreError> {
        // The entry guard holds the shard lock: check and write are atomic.
        let mut stored = self
            .lifecycles
            .entry(founder)
            .or_insert_with(|| StoredLifecycle::new(founder));

        let actual = stored.current.version;
        if actual != expected_version {
            return Err(StoreError::ConcurrencyConflict {
                founder,
                expected: expected_version,
                actual,
            });
        }

        let mut next = StoredLifecycle::clone(&stored);
        for effect in effects.iter().filter(|e| e.is_record()) {
            check_integrity(&next.current, effect)?;
            match effect {
                Effect::OpenSubmission(_) if next.current.submission.is_created() => {
                    next.archived.push(next.current.clone());
                }
                Effect::RecordAudit(entry) => next.audit.push(entry.clone()),
                _ => {}
            }
            effect.apply_to(&mut next.current);
        }
        next.current.version = actual + 1;

        let version = next.current.version;
        *stored = next;
        Ok(version)
    }
}

/// Invariants the store enforces regardless of what the engine planned
fn check_integrity(current: &LifecycleSnapshot, effect: &Effect) -> Result<(), StoreError> {
    match effect {
        Effect::CreateStartup(startup) => {
            if current
                .startup
                .get()
                .is_some_and(|existing| existing.submission_id == startup.submission_id)
            {
                return Err(StoreError::Integrity(format!(
                    "startup already exists for submission {}",
                    startup.submission_id
                )));
            }
        }
        Effect::UpdateScope(scope) => {
            if let Some(existing) = current.scope.get().filter(|s| s.id == scope.id) {
                let before = existing.comments();
                let after = scope.comments();
                if after.len() < before.len() || after[..before.len()] != *before {
                    return Err(StoreError::Integrity(format!(
                        "comments on scope {} are append-only",
                        scope.id
                    )));
                }
            }
        }
        Effect::UpdateContract(contract) => {
            if let Some(existing) = current.contract.get().filter(|c| c.id == contract.id) {
                let rewritten =
                    |before: Option<_>, after: Option<_>| before.is_some() && before != after;
                if rewritten(existing.sent_at, contract.sent_at)
                    || rewritten(existing.signed_at, contract.signed_at)
                {
                    return Err(StoreError::Integrity(format!(
                        "contract {} timestamps are set once",
                        contract.id
                    )));
                }
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hatch_model::{Submission, UserId};

    #[tokio::test]
    async fn unknown_founder_reads_empty() {
        let store = InMemoryStore::new();
        let founder = UserId::new();
        let snapshot = store.snapshot(founder).await.unwrap();
        assert_eq!(snapshot, LifecycleSnapshot::empty(founder));
    }

    #[tokio::test]
    async fn stale_version_is_a_conflict() {
        let store = InMemoryStore::new();
        let founder = UserId::new();
        let open = Effect::OpenSubmission(Submission::open(founder, 1, "Acme", chrono::Utc::now()));

        assert_eq!(store.persist(founder, 0, std::slice::from_ref(&open)).await.unwrap(), 1);
        let err = store.persist(founder, 0, &[open]).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::ConcurrencyConflict {
                founder,
                expected: 0,
                actual: 1
            }
        );
    }
}
