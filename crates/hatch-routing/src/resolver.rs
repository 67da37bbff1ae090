//! Routing resolver
//!
//! Decision order, first match wins:
//! 1. no actor: `LOGIN`
//! 2. admin: `ADMIN_HOME`
//! 3. founder without a loaded snapshot: `LOADING`
//! 4. by submission status, then by startup stage once approved
//!
//! The resolver never fails. A snapshot it cannot place (approved without a
//! startup, or a stage it does not recognize) goes to the earliest
//! post-approval screen.

use crate::destination::Destination;
use hatch_model::{Actor, LifecycleSnapshot, Role, Stage, SubmissionStatus};

/// Where `actor` belongs right now
#[must_use]
pub fn resolve(actor: Option<&Actor>, snapshot: Option<&LifecycleSnapshot>) -> Destination {
    let Some(actor) = actor else {
        return Destination::Login;
    };
    match actor.role {
        Role::Admin => Destination::AdminHome,
        Role::Founder => match snapshot {
            // A snapshot for someone else is as good as none.
            Some(snapshot) if snapshot.founder_id == actor.user_id => for_founder(snapshot),
            _ => Destination::Loading,
        },
    }
}

fn for_founder(snapshot: &LifecycleSnapshot) -> Destination {
    match snapshot.submission_status() {
        SubmissionStatus::NotStarted => Destination::StartSubmission,
        SubmissionStatus::Pending => Destination::SubmissionChat,
        SubmissionStatus::InReview => Destination::PendingReview,
        SubmissionStatus::Rejected => Destination::RejectedSubmission,
        SubmissionStatus::Approved => match snapshot.stage() {
            Some(Stage::Scoping) => Destination::ScopeReview,
            Some(Stage::Contract) => Destination::ContractSigning,
            Some(stage) if stage.is_operating() => Destination::FounderDashboard,
            Some(Stage::Evaluation) => Destination::EvaluationTasks,
            Some(stage) => {
                tracing::warn!(
                    founder = %snapshot.founder_id,
                    stage = %stage,
                    "unplaceable stage, routing conservatively"
                );
                Destination::EvaluationTasks
            }
            None => {
                tracing::warn!(
                    founder = %snapshot.founder_id,
                    "approved submission without a startup"
                );
                Destination::EvaluationTasks
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hatch_model::UserId;

    #[test]
    fn unauthenticated_goes_to_login() {
        let founder = UserId::new();
        let snapshot = LifecycleSnapshot::empty(founder);
        assert_eq!(resolve(None, Some(&snapshot)), Destination::Login);
        assert_eq!(resolve(None, None), Destination::Login);
    }

    #[test]
    fn founder_without_snapshot_is_loading() {
        let founder = Actor::founder(UserId::new());
        assert_eq!(resolve(Some(&founder), None), Destination::Loading);

        let other = LifecycleSnapshot::empty(UserId::new());
        assert_eq!(resolve(Some(&founder), Some(&other)), Destination::Loading);
    }

    #[test]
    fn empty_snapshot_starts_submission() {
        let founder = Actor::founder(UserId::new());
        let snapshot = LifecycleSnapshot::empty(founder.user_id);
        assert_eq!(resolve(Some(&founder), Some(&snapshot)), Destination::StartSubmission);
    }
}
