//! Lifecycle snapshot for one founder

use crate::contract::Contract;
use crate::evaluation::Evaluation;
use crate::ids::UserId;
use crate::record::Record;
use crate::scope::ScopeOfEngagement;
use crate::stage::Stage;
use crate::startup::Startup;
use crate::submission::{Submission, SubmissionStatus};
use serde::{Deserialize, Serialize};

/// Everything the engine and resolver know about one founder's current
/// application chain.
///
/// `version` is the optimistic concurrency token: the store only accepts a
/// write computed from the version it currently holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleSnapshot {
    pub founder_id: UserId,
    pub version: u64,
    pub submission: Record<Submission>,
    pub evaluation: Record<Evaluation>,
    pub startup: Record<Startup>,
    pub scope: Record<ScopeOfEngagement>,
    pub contract: Record<Contract>,
}

impl LifecycleSnapshot {
    /// A founder who has never started a submission
    #[must_use]
    pub fn empty(founder_id: UserId) -> Self {
        Self {
            founder_id,
            version: 0,
            submission: Record::NotCreated,
            evaluation: Record::NotCreated,
            startup: Record::NotCreated,
            scope: Record::NotCreated,
            contract: Record::NotCreated,
        }
    }

    /// Submission status, `NOT_STARTED` when there is no submission
    #[inline]
    #[must_use]
    pub fn submission_status(&self) -> SubmissionStatus {
        self.submission
            .get()
            .map_or(SubmissionStatus::NotStarted, |s| s.status)
    }

    #[inline]
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        self.startup.get().map(|s| s.current_stage)
    }

    /// Attempt number of the current submission, 0 if none
    #[inline]
    #[must_use]
    pub fn attempt(&self) -> u32 {
        self.submission.get().map_or(0, |s| s.attempt)
    }
}
