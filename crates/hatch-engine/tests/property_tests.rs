//! Property tests over random command sequences

use hatch_engine::{apply_transition, replay, Command, Effect, LifecyclePolicy, TransitionContext};
use hatch_model::{
    Actor, ContractStatus, LifecycleSnapshot, ScopeStatus, Stage, StartupStatus, SubmissionStatus,
    UserId,
};
use hatch_test_utils::{every_position, t0};
use proptest::prelude::*;
use std::collections::HashSet;

fn operating_stage() -> impl Strategy<Value = Stage> {
    prop::sample::select(vec![Stage::Idea, Stage::Mvp, Stage::Seed, Stage::SeriesA, Stage::Growth])
}

fn submission_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::StartSubmission {
            startup_name: "Acme Rockets".into()
        }),
        Just(Command::AnswerSubmission {
            question: "Team?".into(),
            answer: "Four".into()
        }),
        Just(Command::FinalizeSubmission),
        (0u8..=100).prop_map(|score| Command::RecordEvaluation(hatch_engine::EvaluationInput {
            overall_score: Some(score),
            ..Default::default()
        })),
        prop::sample::select(SubmissionStatus::ALL.to_vec())
            .prop_map(|status| Command::SetSubmissionStatus { status }),
    ]
}

fn onboarding_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        Just(Command::AddScopeComment { text: "ok".into() }),
        prop::sample::select(ScopeStatus::ALL.to_vec())
            .prop_map(|status| Command::SetScopeStatus { status }),
        Just(Command::DraftScope),
        Just(Command::AddSignatory {
            name: "Ada".into(),
            email: "ada@acme.io".into()
        }),
        prop::sample::select(ContractStatus::ALL.to_vec()).prop_map(|status| {
            Command::SetContractStatus {
                status,
                document_url: Some(hatch_test_utils::DOCUMENT_URL.into()),
            }
        }),
        Just(Command::ActivateStartup),
        operating_stage().prop_map(|target| Command::AdvanceStage { target }),
        prop::sample::select(StartupStatus::ALL.to_vec())
            .prop_map(|status| Command::SetStartupStatus { status }),
    ]
}

/// Every command except `OverrideStage`, with arguments drawn from a small
/// pool so sequences actually make progress.
fn command() -> impl Strategy<Value = Command> {
    prop_oneof![submission_command(), onboarding_command()]
}

/// Signatory ids exist only at run time, so a comment issued while the
/// contract is out for signature becomes the next signature instead.
fn with_signatures(snapshot: &LifecycleSnapshot, command: Command) -> Command {
    match (&command, snapshot.contract.get()) {
        (Command::AddScopeComment { .. }, Some(contract))
            if contract.status == ContractStatus::Sent =>
        {
            match contract.signatories.iter().find(|s| !s.signed) {
                Some(signatory) => Command::RecordSignature {
                    signatory_id: signatory.id,
                },
                None => command,
            }
        }
        _ => command,
    }
}

fn rank_of(snapshot: &LifecycleSnapshot) -> Option<u8> {
    snapshot.stage().and_then(Stage::rank)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn stage_rank_never_decreases(
        commands in prop::collection::vec((any::<bool>(), command()), 1..60)
    ) {
        let founder = Actor::founder(UserId::new());
        let staff = Actor::admin(UserId::new());
        let policy = LifecyclePolicy::default();
        let mut snapshot = LifecycleSnapshot::empty(founder.user_id);
        let mut startups = HashSet::new();

        for (by_staff, command) in commands {
            let actor = if by_staff { staff } else { founder };
            let command = with_signatures(&snapshot, command);
            let ctx = TransitionContext::new(actor, t0(), &policy);

            let Ok(transition) = apply_transition(&snapshot, &command, &ctx) else {
                continue;
            };

            // A new submission chain starts a new lifecycle.
            let reopened =
                transition.effects.iter().any(|e| matches!(e, Effect::OpenSubmission(_)));
            if !reopened {
                let ranks = (rank_of(&snapshot), rank_of(&transition.snapshot));
                if let (Some(before), Some(after)) = ranks {
                    prop_assert!(
                        after >= before,
                        "{} lowered rank {} -> {}",
                        command.name(),
                        before,
                        after
                    );
                }
            }

            for effect in &transition.effects {
                if let Effect::CreateStartup(startup) = effect {
                    prop_assert!(
                        startups.insert(startup.submission_id),
                        "second startup for one submission"
                    );
                }
            }

            let contracts = (snapshot.contract.get(), transition.snapshot.contract.get());
            if let (Some(before), Some(after)) = contracts {
                if before.id == after.id && before.sent_at.is_some() {
                    prop_assert_eq!(before.sent_at, after.sent_at);
                }
            }

            snapshot = transition.snapshot;
        }
    }

    #[test]
    fn transition_snapshot_is_replay_of_effects(
        index in 0usize..16,
        by_staff in any::<bool>(),
        command in command(),
    ) {
        let founder = UserId::new();
        let positions = every_position(founder);
        let snapshot = &positions[index % positions.len()];
        let actor = if by_staff { Actor::admin(UserId::new()) } else { Actor::founder(founder) };
        let policy = LifecyclePolicy::default();
        let ctx = TransitionContext::new(actor, t0(), &policy);

        match apply_transition(snapshot, &command, &ctx) {
            Ok(transition) if transition.is_noop() => {
                prop_assert_eq!(&transition.snapshot, snapshot);
            }
            Ok(transition) => {
                let mut replayed = replay(snapshot, &transition.effects);
                replayed.version += 1;
                prop_assert_eq!(&transition.snapshot, &replayed);
                prop_assert!(matches!(transition.effects.last(), Some(Effect::Notify(_))));
                prop_assert_eq!(transition.signals().count(), 1);
            }
            Err(_) => {}
        }
    }
}
