//! Effects: the record-level consequences of a transition
//!
//! The engine never performs them. A store persists the record effects; the
//! runtime dispatches `Notify` only after that write succeeded.

use hatch_model::{
    Contract, Evaluation, LifecycleSnapshot, Record, ScopeOfEngagement, Stage, StartupId,
    Startup, Submission, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

/// Audit trail entry for a manual stage override
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub startup_id: StartupId,
    pub actor_id: UserId,
    pub from: Stage,
    pub to: Stage,
    pub reason: String,
    pub at: Timestamp,
}

/// Cache-invalidation signal for open sessions. Carries no lifecycle data;
/// receivers re-fetch and re-resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LifecycleSignal {
    /// Delivered to the founder's sessions and the admin console as
    /// `dashboard_update`
    #[serde(rename = "dashboard_update")]
    SnapshotChanged { founder_id: UserId },
}

impl LifecycleSignal {
    #[inline]
    #[must_use]
    pub fn founder_id(&self) -> UserId {
        match self {
            LifecycleSignal::SnapshotChanged { founder_id } => *founder_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", content = "record", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    /// Start a new application chain; any previous chain is archived
    OpenSubmission(Submission),
    UpdateSubmission(Submission),
    UpsertEvaluation(Evaluation),
    CreateStartup(Startup),
    UpdateStartup(Startup),
    /// Create the live scope, replacing a rejected one
    CreateScope(ScopeOfEngagement),
    UpdateScope(ScopeOfEngagement),
    /// Create the contract, replacing a voided one
    CreateContract(Contract),
    UpdateContract(Contract),
    RecordAudit(AuditEntry),
    Notify(LifecycleSignal),
}

impl Effect {
    /// Whether the store must persist this effect
    #[inline]
    #[must_use]
    pub fn is_record(&self) -> bool {
        !matches!(self, Effect::Notify(_))
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Effect::OpenSubmission(_) => "open_submission",
            Effect::UpdateSubmission(_) => "update_submission",
            Effect::UpsertEvaluation(_) => "upsert_evaluation",
            Effect::CreateStartup(_) => "create_startup",
            Effect::UpdateStartup(_) => "update_startup",
            Effect::CreateScope(_) => "create_scope",
            Effect::UpdateScope(_) => "update_scope",
            Effect::CreateContract(_) => "create_contract",
            Effect::UpdateContract(_) => "update_contract",
            Effect::RecordAudit(_) => "record_audit",
            Effect::Notify(_) => "notify",
        }
    }

    /// Fold this effect into a snapshot.
    ///
    /// Audit entries and notifications do not live in the snapshot and are
    /// ignored here. The version is not touched; that is the store's job.
    pub fn apply_to(&self, snapshot: &mut LifecycleSnapshot) {
        match self {
            Effect::OpenSubmission(submission) => {
                snapshot.submission = Record::Created(submission.clone());
                snapshot.evaluation = Record::NotCreated;
                snapshot.startup = Record::NotCreated;
                snapshot.scope = Record::NotCreated;
                snapshot.contract = Record::NotCreated;
            }
            Effect::UpdateSubmission(submission) => {
                snapshot.submission = Record::Created(submission.clone());
            }
            Effect::UpsertEvaluation(evaluation) => {
                snapshot.evaluation = Record::Created(evaluation.clone());
            }
            Effect::CreateStartup(startup) | Effect::UpdateStartup(startup) => {
                snapshot.startup = Record::Created(startup.clone());
            }
            Effect::CreateScope(scope) | Effect::UpdateScope(scope) => {
                snapshot.scope = Record::Created(scope.clone());
            }
            Effect::CreateContract(contract) | Effect::UpdateContract(contract) => {
                snapshot.contract = Record::Created(contract.clone());
            }
            Effect::RecordAudit(_) | Effect::Notify(_) => {}
        }
    }
}

/// Fold every effect, in order, into a copy of `snapshot`
#[must_use]
pub fn replay(snapshot: &LifecycleSnapshot, effects: &[Effect]) -> LifecycleSnapshot {
    let mut next = snapshot.clone();
    for effect in effects {
        effect.apply_to(&mut next);
    }
    next
}
