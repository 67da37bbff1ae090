//! Status graphs for submissions, scopes and contracts
//!
//! Every command handler checks its precondition through these tables, so
//! the allowed moves live in one place.

use crate::error::{Entity, TransitionError};
use hatch_model::{ContractStatus, ScopeStatus, SubmissionStatus};

pub fn allowed_submission_transitions(from: SubmissionStatus) -> &'static [SubmissionStatus] {
    use SubmissionStatus::*;
    match from {
        NotStarted => &[Pending],
        Pending => &[InReview],
        InReview => &[Approved, Rejected],
        Approved => &[],
        // A rejected founder reapplies with a fresh submission, never by
        // reopening this one.
        Rejected => &[],
    }
}

pub fn allowed_scope_transitions(from: ScopeStatus) -> &'static [ScopeStatus] {
    use ScopeStatus::*;
    match from {
        Draft => &[InDiscussion, Accepted, Rejected],
        InDiscussion => &[Accepted, Rejected],
        Accepted => &[],
        Rejected => &[],
    }
}

pub fn allowed_contract_transitions(from: ContractStatus) -> &'static [ContractStatus] {
    use ContractStatus::*;
    match from {
        Draft => &[Sent, Voided],
        Sent => &[Signed, Voided],
        Signed => &[],
        Voided => &[],
    }
}

pub fn validate_submission_transition(
    from: SubmissionStatus,
    to: SubmissionStatus,
) -> Result<(), TransitionError> {
    if allowed_submission_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(TransitionError::invalid(Entity::Submission, from.as_str(), to.as_str()))
    }
}

pub fn validate_scope_transition(
    from: ScopeStatus,
    to: ScopeStatus,
) -> Result<(), TransitionError> {
    if allowed_scope_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(TransitionError::invalid(Entity::Scope, from.as_str(), to.as_str()))
    }
}

pub fn validate_contract_transition(
    from: ContractStatus,
    to: ContractStatus,
) -> Result<(), TransitionError> {
    if allowed_contract_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(TransitionError::invalid(Entity::Contract, from.as_str(), to.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn submission_review_paths() {
        use SubmissionStatus::{Approved, InReview, Pending, Rejected};
        assert!(validate_submission_transition(Pending, InReview).is_ok());
        assert!(validate_submission_transition(InReview, Approved).is_ok());
        assert!(validate_submission_transition(InReview, Rejected).is_ok());

        // Invalid
        assert!(validate_submission_transition(Pending, Approved).is_err());
        assert!(validate_submission_transition(Approved, InReview).is_err());
        assert!(validate_submission_transition(Rejected, Pending).is_err());
    }

    #[test]
    fn accepted_scope_is_final() {
        assert!(allowed_scope_transitions(ScopeStatus::Accepted).is_empty());
        assert!(
            validate_scope_transition(ScopeStatus::Accepted, ScopeStatus::InDiscussion).is_err()
        );
    }

    #[test]
    fn signed_contract_cannot_be_voided() {
        use ContractStatus::{Draft, Sent, Signed, Voided};
        assert!(validate_contract_transition(Sent, Voided).is_ok());
        assert!(validate_contract_transition(Signed, Voided).is_err());
        assert!(validate_contract_transition(Draft, Signed).is_err());
    }

    proptest! {
        #[test]
        fn prop_submission_validation_matches_table(
            from in prop::sample::select(SubmissionStatus::ALL.to_vec()),
            to in prop::sample::select(SubmissionStatus::ALL.to_vec()),
        ) {
            let res = validate_submission_transition(from, to);
            prop_assert_eq!(res.is_ok(), allowed_submission_transitions(from).contains(&to));
        }

        #[test]
        fn prop_no_status_transitions_to_itself(
            scope in prop::sample::select(ScopeStatus::ALL.to_vec()),
            contract in prop::sample::select(ContractStatus::ALL.to_vec()),
        ) {
            prop_assert!(validate_scope_transition(scope, scope).is_err());
            prop_assert!(validate_contract_transition(contract, contract).is_err());
        }
    }
}
