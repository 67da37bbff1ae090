//! Command-level rules: authorization, reapplication, scope discussion,
//! stage movement and overrides.

use chrono::Duration;
use hatch_engine::{
    apply_transition, Command, Effect, LifecyclePolicy, ScopeUpdate, Transition,
    TransitionContext, TransitionError,
};
use hatch_model::{
    Actor, AnalysisSection, ContractStatus, LifecycleSnapshot, Role, ScopeStatus, Stage,
    StartupStatus, SubmissionId, SubmissionStatus,
};
use hatch_test_utils::{
    admin, approved_snapshot, contract_snapshot, founder, in_review_snapshot, operating_snapshot,
    pending_snapshot, rejected_snapshot, t0, LifecycleBuilder,
};
use pretty_assertions::assert_eq;

fn run(
    snapshot: &LifecycleSnapshot,
    actor: Actor,
    command: Command,
) -> Result<Transition, TransitionError> {
    let policy = LifecyclePolicy::default();
    let ctx = TransitionContext::new(actor, t0(), &policy);
    apply_transition(snapshot, &command, &ctx)
}

#[test]
fn first_submission_opens_attempt_one() {
    let owner = founder();
    let snapshot = LifecycleSnapshot::empty(owner.user_id);

    let transition = run(
        &snapshot,
        owner,
        Command::StartSubmission {
            startup_name: "  Acme Rockets ".into(),
        },
    )
    .unwrap();

    let submission = transition.snapshot.submission.get().unwrap();
    assert_eq!(submission.status, SubmissionStatus::Pending);
    assert_eq!(submission.attempt, 1);
    assert_eq!(submission.startup_name, "Acme Rockets");
    assert_eq!(submission.id, SubmissionId::for_attempt(owner.user_id, 1));
    assert_eq!(submission.submitted_at, None);
}

#[test]
fn names_in_any_script_start_and_finalize() {
    let owner = founder();
    let snapshot = LifecycleSnapshot::empty(owner.user_id);

    let started = run(
        &snapshot,
        owner,
        Command::StartSubmission {
            startup_name: "東京ロボティクス".into(),
        },
    )
    .unwrap();
    let finalized = run(&started.snapshot, owner, Command::FinalizeSubmission).unwrap();

    let startup = finalized.snapshot.startup.get().unwrap();
    assert_eq!(startup.name, "東京ロボティクス");
    assert_eq!(startup.slug, "東京ロボティクス");
    assert_eq!(finalized.snapshot.submission_status(), SubmissionStatus::InReview);
}

#[test]
fn symbol_only_names_get_an_id_slug() {
    let owner = founder();
    let snapshot = LifecycleSnapshot::empty(owner.user_id);

    let started = run(
        &snapshot,
        owner,
        Command::StartSubmission {
            startup_name: "???".into(),
        },
    )
    .unwrap();
    let finalized = run(&started.snapshot, owner, Command::FinalizeSubmission).unwrap();

    let startup = finalized.snapshot.startup.get().unwrap();
    assert_eq!(startup.name, "???");
    assert!(startup.slug.starts_with("startup-"));
    assert_eq!(startup.slug.len(), "startup-".len() + 12);
}

#[test]
fn starting_twice_is_rejected() {
    let owner = founder();
    let snapshot = pending_snapshot(owner.user_id);

    let err = run(
        &snapshot,
        owner,
        Command::StartSubmission {
            startup_name: "Acme Rockets".into(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, TransitionError::InvalidTransition { from: "PENDING", .. }));
}

#[test]
fn answers_upsert_and_repeat_is_noop() {
    let owner = founder();
    let snapshot = pending_snapshot(owner.user_id);
    let answer = Command::AnswerSubmission {
        question: "What problem do you solve?".into(),
        answer: "Cheap orbital launches".into(),
    };

    let answered = run(&snapshot, owner, answer.clone()).unwrap();
    let submission = answered.snapshot.submission.get().unwrap();
    assert_eq!(submission.answer("What problem do you solve?"), Some("Cheap orbital launches"));

    let again = run(&answered.snapshot, owner, answer).unwrap();
    assert!(again.is_noop());
}

#[test]
fn answers_close_after_finalize() {
    let owner = founder();
    let snapshot = in_review_snapshot(owner.user_id, false);

    let err = run(
        &snapshot,
        owner,
        Command::AnswerSubmission {
            question: "Team size?".into(),
            answer: "4".into(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, TransitionError::InvalidTransition { from: "IN_REVIEW", .. }));
}

#[test]
fn founders_cannot_approve() {
    let owner = founder();
    let snapshot = in_review_snapshot(owner.user_id, true);

    let err = run(
        &snapshot,
        owner,
        Command::SetSubmissionStatus {
            status: SubmissionStatus::Approved,
        },
    )
    .unwrap_err();

    assert!(matches!(err, TransitionError::Unauthorized { role: Role::Founder, .. }));
    assert!(!err.is_recoverable());
}

#[test]
fn founders_cannot_act_on_other_founders() {
    let owner = founder();
    let stranger = founder();
    let snapshot = pending_snapshot(owner.user_id);

    let err = run(&snapshot, stranger, Command::FinalizeSubmission).unwrap_err();
    assert!(matches!(err, TransitionError::Unauthorized { .. }));
}

#[test]
fn staff_cannot_finalize_for_a_founder() {
    let owner = founder();
    let snapshot = pending_snapshot(owner.user_id);

    let err = run(&snapshot, admin(), Command::FinalizeSubmission).unwrap_err();
    assert!(matches!(err, TransitionError::Unauthorized { role: Role::Admin, .. }));
}

#[test]
fn reapplying_inside_cooldown_reports_availability() {
    let owner = founder();
    let snapshot = rejected_snapshot(owner.user_id, 10);

    let err = run(
        &snapshot,
        owner,
        Command::StartSubmission {
            startup_name: "Acme Rockets".into(),
        },
    )
    .unwrap_err();

    assert_eq!(
        err,
        TransitionError::CooldownActive {
            available_at: t0() + Duration::days(20)
        }
    );
}

#[test]
fn reapplying_after_cooldown_opens_new_chain() {
    let owner = founder();
    let snapshot = rejected_snapshot(owner.user_id, 31);
    let old_startup = snapshot.startup.get().unwrap().id;

    let transition = run(
        &snapshot,
        owner,
        Command::StartSubmission {
            startup_name: "Acme Rockets".into(),
        },
    )
    .unwrap();

    assert!(matches!(transition.effects[0], Effect::OpenSubmission(_)));
    assert_eq!(transition.snapshot.attempt(), 2);
    assert_eq!(transition.snapshot.submission_status(), SubmissionStatus::Pending);
    assert!(!transition.snapshot.startup.is_created());
    assert!(!transition.snapshot.evaluation.is_created());

    let reviewed = run(&transition.snapshot, owner, Command::FinalizeSubmission).unwrap();
    assert_ne!(reviewed.snapshot.startup.get().unwrap().id, old_startup);
}

#[test]
fn shorter_cooldown_policy_applies() {
    let owner = founder();
    let snapshot = rejected_snapshot(owner.user_id, 10);
    let policy = LifecyclePolicy::default().with_cooldown_days(7);
    let ctx = TransitionContext::new(owner, t0(), &policy);

    let transition = apply_transition(
        &snapshot,
        &Command::StartSubmission {
            startup_name: "Acme Rockets".into(),
        },
        &ctx,
    )
    .unwrap();
    assert_eq!(transition.snapshot.attempt(), 2);
}

#[test]
fn section_mean_stands_in_for_a_missing_overall_score() {
    let owner = founder();
    let snapshot = in_review_snapshot(owner.user_id, false);
    let input = hatch_engine::EvaluationInput {
        sections: vec![
            AnalysisSection {
                title: "Market".into(),
                findings: "Large".into(),
                score: Some(80),
            },
            AnalysisSection {
                title: "Team".into(),
                findings: "Unscored".into(),
                score: None,
            },
            AnalysisSection {
                title: "Product".into(),
                findings: "Early".into(),
                score: Some(61),
            },
        ],
        overall_score: None,
        final_decision: None,
    };

    let recorded = run(&snapshot, admin(), Command::RecordEvaluation(input.clone())).unwrap();
    assert_eq!(recorded.snapshot.evaluation.get().unwrap().overall_score, Some(70));

    let again = run(&recorded.snapshot, admin(), Command::RecordEvaluation(input.clone())).unwrap();
    assert!(again.is_noop());

    let explicit = hatch_engine::EvaluationInput {
        overall_score: Some(90),
        ..input
    };
    let overridden = run(&recorded.snapshot, admin(), Command::RecordEvaluation(explicit)).unwrap();
    assert_eq!(overridden.snapshot.evaluation.get().unwrap().overall_score, Some(90));
}

#[test]
fn evaluation_scores_are_bounded() {
    let owner = founder();
    let snapshot = in_review_snapshot(owner.user_id, false);

    let err = run(
        &snapshot,
        admin(),
        Command::RecordEvaluation(hatch_engine::EvaluationInput {
            overall_score: Some(101),
            ..Default::default()
        }),
    )
    .unwrap_err();
    assert!(matches!(err, TransitionError::InvalidInput(_)));
}

#[test]
fn first_comment_opens_discussion() {
    let owner = founder();
    let snapshot = approved_snapshot(owner.user_id);

    let commented = run(
        &snapshot,
        owner,
        Command::AddScopeComment {
            text: "Can we add a pilot customer?".into(),
        },
    )
    .unwrap();

    let scope = commented.snapshot.scope.get().unwrap();
    assert_eq!(scope.status, ScopeStatus::InDiscussion);
    assert_eq!(scope.comments().len(), 1);
    assert_eq!(scope.comments()[0].author_role, Role::Founder);

    let replied = run(
        &commented.snapshot,
        admin(),
        Command::AddScopeComment {
            text: "Yes, in phase two".into(),
        },
    )
    .unwrap();
    let scope = replied.snapshot.scope.get().unwrap();
    assert_eq!(scope.status, ScopeStatus::InDiscussion);
    let texts: Vec<_> = scope.ordered_comments().iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["Can we add a pilot customer?", "Yes, in phase two"]);
}

#[test]
fn accepted_scope_is_frozen() {
    let owner = founder();
    let snapshot = contract_snapshot(owner.user_id, ContractStatus::Draft);

    let err = run(
        &snapshot,
        admin(),
        Command::UpdateScope(ScopeUpdate {
            product_scope: Some("Bigger MVP".into()),
            gtm_scope: None,
        }),
    )
    .unwrap_err();
    assert!(matches!(err, TransitionError::InvalidTransition { from: "ACCEPTED", .. }));
}

#[test]
fn rejected_scope_is_redrafted_by_staff() {
    let owner = founder();
    let staff = admin();
    let snapshot = approved_snapshot(owner.user_id);

    let rejected = run(
        &snapshot,
        owner,
        Command::SetScopeStatus {
            status: ScopeStatus::Rejected,
        },
    )
    .unwrap();
    assert_eq!(rejected.snapshot.stage(), Some(Stage::Scoping));
    assert!(!rejected.snapshot.contract.is_created());

    let redrafted = run(&rejected.snapshot, staff, Command::DraftScope).unwrap();
    let scope = redrafted.snapshot.scope.get().unwrap();
    assert_eq!(scope.draft_number, 2);
    assert_eq!(scope.status, ScopeStatus::Draft);
    assert_ne!(scope.id, snapshot.scope.get().unwrap().id);

    let err = run(&redrafted.snapshot, staff, Command::DraftScope).unwrap_err();
    assert!(matches!(err, TransitionError::InvalidTransition { from: "DRAFT", .. }));
}

#[test]
fn voided_contract_recovers_through_override_and_redraft() {
    let owner = founder();
    let staff = admin();
    let snapshot = contract_snapshot(owner.user_id, ContractStatus::Draft);

    let voided = run(
        &snapshot,
        staff,
        Command::SetContractStatus {
            status: ContractStatus::Voided,
            document_url: None,
        },
    )
    .unwrap();
    let back = run(
        &voided.snapshot,
        staff,
        Command::OverrideStage {
            target: Stage::Scoping,
            reason: "contract voided, renegotiating".into(),
        },
    )
    .unwrap();
    let redrafted = run(&back.snapshot, staff, Command::DraftScope).unwrap();
    let accepted = run(
        &redrafted.snapshot,
        owner,
        Command::SetScopeStatus {
            status: ScopeStatus::Accepted,
        },
    )
    .unwrap();

    let contract = accepted.snapshot.contract.get().unwrap();
    assert_eq!(contract.status, ContractStatus::Draft);
    assert_eq!(contract.scope_id, redrafted.snapshot.scope.get().unwrap().id);
    assert_eq!(accepted.snapshot.stage(), Some(Stage::Contract));
}

#[test]
fn signatories_need_valid_unique_emails() {
    let owner = founder();
    let staff = admin();
    let snapshot = contract_snapshot(owner.user_id, ContractStatus::Draft);

    let err = run(
        &snapshot,
        staff,
        Command::AddSignatory {
            name: "Bob".into(),
            email: "not-an-email".into(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, TransitionError::InvalidInput(_)));

    let err = run(
        &snapshot,
        staff,
        Command::AddSignatory {
            name: "Ada again".into(),
            email: "ADA@acme.io".into(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, TransitionError::InvalidInput(_)));

    let added = run(
        &snapshot,
        staff,
        Command::AddSignatory {
            name: "Bob Cofounder".into(),
            email: "bob@acme.io".into(),
        },
    )
    .unwrap();
    assert_eq!(added.snapshot.contract.get().unwrap().signatories.len(), 2);
}

#[test]
fn advance_stage_is_forward_only() {
    let owner = founder();
    let staff = admin();
    let snapshot = operating_snapshot(owner.user_id, Stage::Mvp);

    let advanced = run(&snapshot, staff, Command::AdvanceStage { target: Stage::Seed }).unwrap();
    assert_eq!(advanced.snapshot.stage(), Some(Stage::Seed));

    let err = run(&advanced.snapshot, staff, Command::AdvanceStage { target: Stage::Idea })
        .unwrap_err();
    assert!(matches!(err, TransitionError::InvalidTransition { from: "SEED", to: "IDEA", .. }));

    let err = run(&snapshot, staff, Command::AdvanceStage { target: Stage::Contract }).unwrap_err();
    assert!(matches!(err, TransitionError::InvalidTransition { .. }));
}

#[test]
fn override_lowers_stage_with_audit() {
    let owner = founder();
    let staff = admin();
    let snapshot = operating_snapshot(owner.user_id, Stage::Seed);

    let err = run(
        &snapshot,
        staff,
        Command::OverrideStage {
            target: Stage::Mvp,
            reason: "  ".into(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, TransitionError::InvalidInput(_)));

    let overridden = run(
        &snapshot,
        staff,
        Command::OverrideStage {
            target: Stage::Mvp,
            reason: "seed round fell through".into(),
        },
    )
    .unwrap();

    assert_eq!(overridden.snapshot.stage(), Some(Stage::Mvp));
    let audit = overridden
        .effects
        .iter()
        .find_map(|e| match e {
            Effect::RecordAudit(entry) => Some(entry),
            _ => None,
        })
        .unwrap();
    assert_eq!(audit.from, Stage::Seed);
    assert_eq!(audit.to, Stage::Mvp);
    assert_eq!(audit.actor_id, staff.user_id);
    assert_eq!(audit.reason, "seed round fell through");
}

#[test]
fn graduation_is_terminal() {
    let owner = founder();
    let staff = admin();
    let snapshot = operating_snapshot(owner.user_id, Stage::Growth);

    let graduated = run(
        &snapshot,
        staff,
        Command::SetStartupStatus {
            status: StartupStatus::Graduated,
        },
    )
    .unwrap();
    assert_eq!(graduated.snapshot.startup.get().unwrap().status, StartupStatus::Graduated);

    let err = run(
        &graduated.snapshot,
        staff,
        Command::SetStartupStatus {
            status: StartupStatus::Active,
        },
    )
    .unwrap_err();
    assert!(matches!(err, TransitionError::InvalidTransition { from: "GRADUATED", .. }));
}

#[test]
fn graduation_needs_an_operating_stage() {
    let owner = founder();
    let snapshot = approved_snapshot(owner.user_id);

    let err = run(
        &snapshot,
        admin(),
        Command::SetStartupStatus {
            status: StartupStatus::Graduated,
        },
    )
    .unwrap_err();
    assert!(matches!(err, TransitionError::InvalidTransition { .. }));
}

#[test]
fn unrecognized_stage_blocks_rank_moves() {
    let owner = founder();
    let staff = admin();
    let snapshot = LifecycleBuilder::new(owner.user_id)
        .pending()
        .in_review()
        .evaluated()
        .approved()
        .stage(Stage::Unrecognized)
        .build();

    let err = run(
        &snapshot,
        staff,
        Command::SetScopeStatus {
            status: ScopeStatus::Accepted,
        },
    )
    .unwrap_err();
    assert!(matches!(err, TransitionError::InvalidTransition { from: "UNRECOGNIZED", .. }));

    let repaired = run(
        &snapshot,
        staff,
        Command::OverrideStage {
            target: Stage::Scoping,
            reason: "repair unknown stored stage".into(),
        },
    )
    .unwrap();
    assert_eq!(repaired.snapshot.stage(), Some(Stage::Scoping));
}

#[test]
fn noop_keeps_the_bumped_version() {
    let owner = founder();
    let snapshot = LifecycleBuilder::new(owner.user_id).version(7).pending().build();

    let noop = run(&snapshot, owner, Command::FinalizeSubmission)
        .and_then(|t| run(&t.snapshot, owner, Command::FinalizeSubmission))
        .unwrap();
    assert_eq!(noop.snapshot.version, 8);
    assert!(noop.is_noop());
}
