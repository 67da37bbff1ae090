//! Product policy values consumed by the engine

use chrono::Duration;
use hatch_model::{LifecycleSnapshot, SubmissionStatus, Timestamp};
use serde::{Deserialize, Serialize};

/// Lifecycle policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LifecyclePolicy {
    /// Days after a rejected submission was submitted before the founder may
    /// apply again
    pub reapply_cooldown_days: u32,
    /// Milestone set when a startup is activated without one
    pub default_next_milestone: String,
    /// Boilerplate for a freshly drafted scope
    pub default_product_scope: String,
    pub default_gtm_scope: String,
}

impl LifecyclePolicy {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_cooldown_days(mut self, days: u32) -> Self {
        self.reapply_cooldown_days = days;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_default_milestone(mut self, milestone: impl Into<String>) -> Self {
        self.default_next_milestone = milestone.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn cooldown(&self) -> Duration {
        Duration::days(i64::from(self.reapply_cooldown_days))
    }
}

impl Default for LifecyclePolicy {
    fn default() -> Self {
        Self {
            reapply_cooldown_days: 30,
            default_next_milestone: "Validate the problem with ten customer interviews".to_string(),
            default_product_scope: "Product discovery, MVP definition and build support."
                .to_string(),
            default_gtm_scope: "Positioning, first-customer acquisition and launch plan."
                .to_string(),
        }
    }
}

/// When a rejected founder may open a new submission.
///
/// `None` unless the current submission is rejected. The cooldown runs from
/// `submitted_at`, falling back to `created_at` for records that never
/// carried one.
#[must_use]
pub fn reapply_available_at(
    snapshot: &LifecycleSnapshot,
    policy: &LifecyclePolicy,
) -> Option<Timestamp> {
    let submission = snapshot.submission.get()?;
    if submission.status != SubmissionStatus::Rejected {
        return None;
    }
    let anchor = submission.submitted_at.unwrap_or(submission.created_at);
    Some(anchor + policy.cooldown())
}

/// Whether the founder may start a submission right now
#[must_use]
pub fn can_reapply(snapshot: &LifecycleSnapshot, now: Timestamp, policy: &LifecyclePolicy) -> bool {
    match snapshot.submission_status() {
        SubmissionStatus::NotStarted => true,
        SubmissionStatus::Rejected => {
            reapply_available_at(snapshot, policy).is_some_and(|available| now >= available)
        }
        SubmissionStatus::Pending | SubmissionStatus::InReview | SubmissionStatus::Approved => {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use hatch_model::{Record, Submission, UserId};

    fn rejected_at(submitted: Timestamp) -> LifecycleSnapshot {
        let founder = UserId::new();
        let mut submission = Submission::open(founder, 1, "Acme", submitted - Duration::days(3));
        submission.status = SubmissionStatus::Rejected;
        submission.submitted_at = Some(submitted);
        let mut snapshot = LifecycleSnapshot::empty(founder);
        snapshot.submission = Record::Created(submission);
        snapshot
    }

    #[test]
    fn cooldown_runs_from_submitted_at() {
        let policy = LifecyclePolicy::default();
        let submitted = Utc::now();
        let snapshot = rejected_at(submitted);

        assert_eq!(reapply_available_at(&snapshot, &policy), Some(submitted + Duration::days(30)));
        assert!(!can_reapply(&snapshot, submitted + Duration::days(29), &policy));
        assert!(can_reapply(&snapshot, submitted + Duration::days(30), &policy));
    }

    #[test]
    fn fresh_founder_can_apply() {
        let snapshot = LifecycleSnapshot::empty(UserId::new());
        assert!(can_reapply(&snapshot, Utc::now(), &LifecyclePolicy::default()));
        assert_eq!(reapply_available_at(&snapshot, &LifecyclePolicy::default()), None);
    }

    #[test]
    fn zero_day_policy_allows_immediate_reapply() {
        let policy = LifecyclePolicy::new().with_cooldown_days(0);
        let submitted = Utc::now();
        assert!(can_reapply(&rejected_at(submitted), submitted, &policy));
    }
}
