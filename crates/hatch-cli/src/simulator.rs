//! Lifecycle simulator
//!
//! Drives several founders through randomized but plausible command
//! sequences against a [`LifecycleService`] backed by the in-memory store,
//! and checks every outcome against the lifecycle invariants:
//!
//! - stage rank only moves forward, except by audited override or a fresh
//!   application chain
//! - a submission never gets a second startup
//! - `submitted_at`, `sent_at` and `signed_at` are never rewritten
//! - rejected commands and idempotent re-entries leave the store untouched
//! - every applied command bumps the version by exactly one
//! - the resolver is stable, and its destination passes its own guard
//! - a session router that refreshes after the write lands where the
//!   resolver says
//!
//! A fixed seed reproduces the same run, clock readings included.

use chrono::{DateTime, Duration, Utc};
use hatch_engine::{Command, Effect, EvaluationInput, ScopeUpdate};
use hatch_model::{
    Actor, AnalysisSection, ContractStatus, Decision, LifecycleSnapshot, Role, ScopeStatus, Stage,
    StartupId, StartupStatus, SubmissionId, SubmissionStatus, Timestamp, UserId,
};
use hatch_routing::{resolve, RouteGuard, SessionRouter};
use hatch_runtime::{
    BroadcastNotifier, InMemoryStore, LifecycleService, RuntimeConfig, ServiceError,
};
use rand::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Simulated clock start: 2025-01-01T00:00:00Z
const SIM_EPOCH_SECS: i64 = 1_735_689_600;

const STARTUP_NAMES: &[&str] = &[
    "Acme Rockets",
    "Northwind Labs",
    "Blue Heron",
    "Quiet Forge",
    "Tidewater AI",
    "Paper Lantern",
];

const QUESTIONS: &[&str] = &[
    "What problem are you solving?",
    "Who is your customer?",
    "Why now?",
    "What have you built so far?",
];

#[derive(Debug, Clone, Serialize)]
pub struct SimulatorConfig {
    pub seed: u64,
    /// Number of founders driven concurrently through the lifecycle
    pub founders: usize,
    /// Total commands issued across all founders
    pub operations: u64,
    /// Chance a command is picked at random instead of from the plan
    pub chaos: f64,
    /// Chance a command is issued by an actor who may not issue it
    pub impostor: f64,
    pub stop_on_first_violation: bool,
    pub runtime: RuntimeConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            founders: 8,
            operations: 2_000,
            chaos: 0.15,
            impostor: 0.05,
            stop_on_first_violation: false,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl SimulatorConfig {
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_founders(mut self, founders: usize) -> Self {
        self.founders = founders.max(1);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_operations(mut self, operations: u64) -> Self {
        self.operations = operations;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_runtime(mut self, runtime: RuntimeConfig) -> Self {
        self.runtime = runtime;
        self
    }

    #[inline]
    #[must_use]
    pub fn stop_on_first_violation(mut self, stop: bool) -> Self {
        self.stop_on_first_violation = stop;
        self
    }
}

/// An invariant broken during a run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "violation", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Violation {
    RankRegressed {
        founder: UserId,
        command: &'static str,
        from: Stage,
        to: Stage,
    },
    DuplicateStartup {
        submission: SubmissionId,
        first: StartupId,
        second: StartupId,
    },
    TimestampRewritten {
        founder: UserId,
        field: &'static str,
    },
    VersionSkipped {
        founder: UserId,
        before: u64,
        after: u64,
    },
    RejectionMutated {
        founder: UserId,
        command: &'static str,
    },
    NoopMutated {
        founder: UserId,
        command: &'static str,
    },
    StoreDiverged {
        founder: UserId,
        command: &'static str,
    },
    UnauthorizedApplied {
        founder: UserId,
        command: &'static str,
        role: Role,
    },
    ResolverUnstable {
        founder: UserId,
        status: SubmissionStatus,
        stage: Option<Stage>,
    },
    SessionDiverged {
        founder: UserId,
        expected: hatch_routing::Destination,
        actual: hatch_routing::Destination,
    },
    UnexpectedFailure {
        founder: UserId,
        command: &'static str,
        message: String,
    },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RankRegressed { founder, command, from, to } => {
                write!(f, "{founder}: {command} lowered stage {from} -> {to}")
            }
            Self::DuplicateStartup { submission, first, second } => {
                write!(f, "submission {submission} has startups {first} and {second}")
            }
            Self::TimestampRewritten { founder, field } => {
                write!(f, "{founder}: {field} rewritten")
            }
            Self::VersionSkipped { founder, before, after } => {
                write!(f, "{founder}: version {before} -> {after}")
            }
            Self::RejectionMutated { founder, command } => {
                write!(f, "{founder}: rejected {command} changed the store")
            }
            Self::NoopMutated { founder, command } => {
                write!(f, "{founder}: idempotent {command} changed the store")
            }
            Self::StoreDiverged { founder, command } => {
                write!(f, "{founder}: stored snapshot differs from {command} outcome")
            }
            Self::UnauthorizedApplied { founder, command, role } => {
                write!(f, "{founder}: {role} applied {command}")
            }
            Self::ResolverUnstable { founder, status, stage } => {
                write!(f, "{founder}: resolver unstable at {status} / {stage:?}")
            }
            Self::SessionDiverged { founder, expected, actual } => {
                write!(f, "{founder}: session at {actual}, resolver says {expected}")
            }
            Self::UnexpectedFailure { founder, command, message } => {
                write!(f, "{founder}: {command} failed: {message}")
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulatorStats {
    pub commands: u64,
    pub applied: u64,
    pub noops: u64,
    pub rejected_invalid: u64,
    pub rejected_missing: u64,
    pub rejected_unauthorized: u64,
    pub rejected_input: u64,
    pub rejected_cooldown: u64,
    pub startups_created: u64,
    pub contracts_signed: u64,
    pub activations: u64,
    pub overrides: u64,
    pub reapplications: u64,
    pub redirects: u64,
}

impl SimulatorStats {
    #[must_use]
    pub fn rejected(&self) -> u64 {
        self.rejected_invalid
            + self.rejected_missing
            + self.rejected_unauthorized
            + self.rejected_input
            + self.rejected_cooldown
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulatorReport {
    pub config: SimulatorConfig,
    pub stats: SimulatorStats,
    pub violations: Vec<Violation>,
    /// Submission status per founder at the end of the run
    pub final_positions: Vec<(UserId, SubmissionStatus, Option<Stage>)>,
}

impl SimulatorReport {
    #[inline]
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut out = String::new();
        out.push_str("Lifecycle Simulator Report\n");
        out.push_str("==========================\n\n");

        out.push_str("Configuration:\n");
        out.push_str(&format!("  Seed: {}\n", self.config.seed));
        out.push_str(&format!("  Founders: {}\n", self.config.founders));
        out.push_str(&format!("  Operations: {}\n", self.config.operations));
        out.push_str(&format!(
            "  Reapply cooldown: {} days\n\n",
            self.config.runtime.policy.reapply_cooldown_days
        ));

        out.push_str("Statistics:\n");
        out.push_str(&format!("  Commands: {}\n", self.stats.commands));
        out.push_str(&format!("  Applied: {}\n", self.stats.applied));
        out.push_str(&format!("  Idempotent: {}\n", self.stats.noops));
        out.push_str(&format!("  Rejected: {}\n", self.stats.rejected()));
        out.push_str(&format!("    invalid transition: {}\n", self.stats.rejected_invalid));
        out.push_str(&format!("    missing dependency: {}\n", self.stats.rejected_missing));
        out.push_str(&format!("    unauthorized: {}\n", self.stats.rejected_unauthorized));
        out.push_str(&format!("    invalid input: {}\n", self.stats.rejected_input));
        out.push_str(&format!("    cooldown: {}\n", self.stats.rejected_cooldown));
        out.push_str(&format!("  Startups created: {}\n", self.stats.startups_created));
        out.push_str(&format!("  Contracts signed: {}\n", self.stats.contracts_signed));
        out.push_str(&format!("  Activations: {}\n", self.stats.activations));
        out.push_str(&format!("  Stage overrides: {}\n", self.stats.overrides));
        out.push_str(&format!("  Reapplications: {}\n", self.stats.reapplications));
        out.push_str(&format!("  Session redirects: {}\n\n", self.stats.redirects));

        out.push_str("Final positions:\n");
        for (founder, status, stage) in &self.final_positions {
            match stage {
                Some(stage) => out.push_str(&format!("  {founder}: {status} / {stage}\n")),
                None => out.push_str(&format!("  {founder}: {status}\n")),
            }
        }
        out.push('\n');

        if self.violations.is_empty() {
            out.push_str("Result: PASSED\n");
        } else {
            out.push_str(&format!("Result: FAILED ({} violations)\n", self.violations.len()));
            for violation in &self.violations {
                out.push_str(&format!("  - {violation}\n"));
            }
        }
        out
    }
}

/// One simulated founder and the session watching their screen
struct FounderState {
    actor: Actor,
    router: SessionRouter,
}

/// Run the simulator to completion
pub async fn run_simulator(config: SimulatorConfig) -> SimulatorReport {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let store = Arc::new(InMemoryStore::new());
    let notifier = Arc::new(BroadcastNotifier::default());
    let service = LifecycleService::new(store, notifier, config.runtime.clone());

    let admin = Actor::admin(UserId(Uuid::from_u128(rng.gen())));
    let founders: Vec<FounderState> = (0..config.founders.max(1))
        .map(|_| {
            let actor = Actor::founder(UserId(Uuid::from_u128(rng.gen())));
            FounderState {
                actor,
                router: SessionRouter::new(Some(actor)),
            }
        })
        .collect();

    let mut now = DateTime::<Utc>::from_timestamp(SIM_EPOCH_SECS, 0).unwrap_or_default();
    let mut stats = SimulatorStats::default();
    let mut violations = Vec::new();
    let mut startups: HashMap<SubmissionId, StartupId> = HashMap::new();

    tracing::info!(
        seed = config.seed,
        founders = founders.len(),
        operations = config.operations,
        "simulation started"
    );

    for _ in 0..config.operations {
        now = advance_clock(&mut rng, now);
        let founder = &founders[rng.gen_range(0..founders.len())];
        let founder_id = founder.actor.user_id;

        let before = match service.snapshot(founder_id).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                violations.push(Violation::UnexpectedFailure {
                    founder: founder_id,
                    command: "snapshot",
                    message: err.to_string(),
                });
                break;
            }
        };

        let command = if rng.gen_bool(config.chaos.clamp(0.0, 1.0)) {
            random_command(&mut rng, &before)
        } else {
            planned_command(&mut rng, &before)
        };
        let impostor = config.impostor.clamp(0.0, 1.0);
        let actor = pick_actor(&mut rng, &command, founder.actor, admin, &founders, impostor);
        let permitted =
            command.permits(actor.role) && (actor.is_admin() || actor.user_id == founder_id);

        stats.commands += 1;
        let found = match service.execute_at(founder_id, actor, &command, now).await {
            Ok(outcome) => {
                let stored = service.snapshot(founder_id).await.ok();
                let mut found = Vec::new();
                if stored.as_ref() != Some(&outcome.snapshot) {
                    found.push(Violation::StoreDiverged {
                        founder: founder_id,
                        command: command.name(),
                    });
                }
                if !permitted && outcome.applied() {
                    found.push(Violation::UnauthorizedApplied {
                        founder: founder_id,
                        command: command.name(),
                        role: actor.role,
                    });
                }
                if outcome.applied() {
                    stats.applied += 1;
                    if matches!(command, Command::ActivateStartup) {
                        stats.activations += 1;
                    }
                    count_effects(&mut stats, &outcome.effects);
                    found.extend(check_applied(
                        &before,
                        &outcome.snapshot,
                        &command,
                        &outcome.effects,
                        &mut startups,
                    ));
                } else {
                    stats.noops += 1;
                    if outcome.snapshot != before {
                        found.push(Violation::NoopMutated {
                            founder: founder_id,
                            command: command.name(),
                        });
                    }
                }
                found.extend(check_routing(founder, &outcome.snapshot, &mut stats));
                found
            }
            Err(ServiceError::Rejected(err)) => {
                count_rejection(&mut stats, &err);
                let after = service.snapshot(founder_id).await.ok();
                if after.as_ref() != Some(&before) {
                    vec![Violation::RejectionMutated {
                        founder: founder_id,
                        command: command.name(),
                    }]
                } else {
                    Vec::new()
                }
            }
            Err(err) => vec![Violation::UnexpectedFailure {
                founder: founder_id,
                command: command.name(),
                message: err.to_string(),
            }],
        };

        if !found.is_empty() {
            for violation in &found {
                tracing::warn!(%violation, "invariant violated");
            }
            violations.extend(found);
            if config.stop_on_first_violation {
                break;
            }
        }
    }

    let mut final_positions = Vec::with_capacity(founders.len());
    for founder in &founders {
        if let Ok(snapshot) = service.snapshot(founder.actor.user_id).await {
            final_positions.push((
                founder.actor.user_id,
                snapshot.submission_status(),
                snapshot.stage(),
            ));
        }
    }

    tracing::info!(
        applied = stats.applied,
        rejected = stats.rejected(),
        violations = violations.len(),
        "simulation finished"
    );

    SimulatorReport {
        config,
        stats,
        violations,
        final_positions,
    }
}

/// Mostly minutes apart, occasionally weeks, so cooldowns both hold and lapse
fn advance_clock(rng: &mut StdRng, now: Timestamp) -> Timestamp {
    if rng.gen_bool(0.03) {
        now + Duration::days(rng.gen_range(5..=40))
    } else {
        now + Duration::minutes(rng.gen_range(1..=180))
    }
}

fn pick_actor(
    rng: &mut StdRng,
    command: &Command,
    founder: Actor,
    admin: Actor,
    founders: &[FounderState],
    impostor: f64,
) -> Actor {
    if rng.gen_bool(impostor) {
        return match rng.gen_range(0..3) {
            0 => admin,
            1 => founder,
            _ => founders[rng.gen_range(0..founders.len())].actor,
        };
    }
    if command.permits(Role::Founder) && (!command.permits(Role::Admin) || rng.gen_bool(0.5)) {
        founder
    } else {
        admin
    }
}

/// A command that plausibly moves the founder along from where they are
fn planned_command(rng: &mut StdRng, snapshot: &LifecycleSnapshot) -> Command {
    match snapshot.submission_status() {
        SubmissionStatus::NotStarted | SubmissionStatus::Rejected => start_submission(rng),
        SubmissionStatus::Pending => match rng.gen_range(0..6) {
            0..=2 => answer(rng),
            3 => Command::RecordEvaluation(evaluation(rng)),
            _ => Command::FinalizeSubmission,
        },
        SubmissionStatus::InReview => {
            if !snapshot.evaluation.is_created() || rng.gen_bool(0.2) {
                Command::RecordEvaluation(evaluation(rng))
            } else {
                let status = if rng.gen_bool(0.8) {
                    SubmissionStatus::Approved
                } else {
                    SubmissionStatus::Rejected
                };
                Command::SetSubmissionStatus { status }
            }
        }
        SubmissionStatus::Approved => onboarding_command(rng, snapshot),
    }
}

fn onboarding_command(rng: &mut StdRng, snapshot: &LifecycleSnapshot) -> Command {
    let Some(startup) = snapshot.startup.get() else {
        return Command::RecordEvaluation(evaluation(rng));
    };
    if startup.status == StartupStatus::Graduated {
        return comment(rng);
    }
    match startup.current_stage {
        Stage::Evaluation | Stage::Unrecognized => Command::OverrideStage {
            target: Stage::Scoping,
            reason: "stage repair".into(),
        },
        Stage::Scoping => scoping_command(rng, snapshot),
        Stage::Contract => contract_command(rng, snapshot),
        stage => match rng.gen_range(0..20) {
            0 => Command::SetStartupStatus {
                status: StartupStatus::Graduated,
            },
            1 => Command::OverrideStage {
                target: Stage::ORDERED[rng.gen_range(0..Stage::ORDERED.len())],
                reason: "portfolio review".into(),
            },
            _ => next_operating(stage).map_or_else(
                || Command::SetStartupStatus {
                    status: StartupStatus::Graduated,
                },
                |target| Command::AdvanceStage { target },
            ),
        },
    }
}

fn scoping_command(rng: &mut StdRng, snapshot: &LifecycleSnapshot) -> Command {
    let status = snapshot.scope.get().map(|scope| scope.status);
    match status {
        None | Some(ScopeStatus::Rejected) => Command::DraftScope,
        Some(ScopeStatus::Accepted) => match snapshot.contract.get().map(|c| c.status) {
            Some(ContractStatus::Voided) => Command::DraftScope,
            // Overridden back after contracting; return to where the work is.
            Some(_) => Command::OverrideStage {
                target: Stage::Contract,
                reason: "restore contract stage".into(),
            },
            None => comment(rng),
        },
        Some(ScopeStatus::Draft | ScopeStatus::InDiscussion) => match rng.gen_range(0..10) {
            0..=1 => Command::UpdateScope(ScopeUpdate {
                product_scope: Some(format!("Build the MVP, iteration {}", rng.gen_range(1..10))),
                gtm_scope: None,
            }),
            2..=4 => comment(rng),
            5 => Command::SetScopeStatus {
                status: ScopeStatus::Rejected,
            },
            _ => Command::SetScopeStatus {
                status: ScopeStatus::Accepted,
            },
        },
    }
}

fn contract_command(rng: &mut StdRng, snapshot: &LifecycleSnapshot) -> Command {
    let Some(contract) = snapshot.contract.get() else {
        return Command::SetScopeStatus {
            status: ScopeStatus::Accepted,
        };
    };
    match contract.status {
        ContractStatus::Draft => {
            if contract.signatories.is_empty() || rng.gen_bool(0.2) {
                signatory(rng)
            } else {
                send_contract(rng)
            }
        }
        ContractStatus::Sent => {
            let unsigned: Vec<_> = contract.signatories.iter().filter(|s| !s.signed).collect();
            match (unsigned.is_empty(), rng.gen_range(0..12)) {
                (_, 0) => Command::SetContractStatus {
                    status: ContractStatus::Voided,
                    document_url: None,
                },
                (_, 1) => send_contract(rng),
                (false, _) => Command::RecordSignature {
                    signatory_id: unsigned[rng.gen_range(0..unsigned.len())].id,
                },
                (true, _) => Command::SetContractStatus {
                    status: ContractStatus::Signed,
                    document_url: None,
                },
            }
        }
        ContractStatus::Signed => Command::ActivateStartup,
        ContractStatus::Voided => Command::OverrideStage {
            target: Stage::Scoping,
            reason: "contract voided, renegotiating".into(),
        },
    }
}

/// Any command at all, usually out of place
fn random_command(rng: &mut StdRng, snapshot: &LifecycleSnapshot) -> Command {
    match rng.gen_range(0..16) {
        0 => start_submission(rng),
        1 => answer(rng),
        2 => Command::FinalizeSubmission,
        3 => Command::RecordEvaluation(evaluation(rng)),
        4 => Command::SetSubmissionStatus {
            status: *pick(rng, SubmissionStatus::ALL),
        },
        5 => Command::UpdateScope(ScopeUpdate::default()),
        6 => comment(rng),
        7 => Command::SetScopeStatus {
            status: *pick(rng, ScopeStatus::ALL),
        },
        8 => Command::DraftScope,
        9 => signatory(rng),
        10 => match snapshot.contract.get().and_then(|c| c.signatories.first()) {
            Some(signatory) => Command::RecordSignature {
                signatory_id: signatory.id,
            },
            None => Command::ActivateStartup,
        },
        11 => Command::SetContractStatus {
            status: *pick(rng, ContractStatus::ALL),
            document_url: rng.gen_bool(0.5).then(|| "https://docs.example.com/c.pdf".to_string()),
        },
        12 => Command::ActivateStartup,
        13 => Command::AdvanceStage {
            target: *pick(rng, &Stage::ORDERED),
        },
        14 => Command::SetStartupStatus {
            status: *pick(rng, StartupStatus::ALL),
        },
        _ => Command::OverrideStage {
            target: *pick(rng, &Stage::ORDERED),
            reason: if rng.gen_bool(0.8) { "manual correction".into() } else { String::new() },
        },
    }
}

fn pick<'a, T>(rng: &mut StdRng, values: &'a [T]) -> &'a T {
    &values[rng.gen_range(0..values.len())]
}

fn next_operating(stage: Stage) -> Option<Stage> {
    let rank = stage.rank()?;
    Stage::ORDERED
        .iter()
        .copied()
        .find(|s| s.rank() == Some(rank + 1))
        .filter(|s| s.is_operating())
}

fn start_submission(rng: &mut StdRng) -> Command {
    Command::StartSubmission {
        startup_name: (*pick(rng, STARTUP_NAMES)).to_string(),
    }
}

fn answer(rng: &mut StdRng) -> Command {
    Command::AnswerSubmission {
        question: (*pick(rng, QUESTIONS)).to_string(),
        answer: format!("answer {}", rng.gen_range(0..100)),
    }
}

fn comment(rng: &mut StdRng) -> Command {
    Command::AddScopeComment {
        text: format!("comment {}", rng.gen_range(0..1000)),
    }
}

fn signatory(rng: &mut StdRng) -> Command {
    let n = rng.gen_range(0..4);
    Command::AddSignatory {
        name: format!("Signer {n}"),
        email: format!("signer{n}@example.com"),
    }
}

fn send_contract(rng: &mut StdRng) -> Command {
    Command::SetContractStatus {
        status: ContractStatus::Sent,
        document_url: Some(format!(
            "https://docs.example.com/contract-{}.pdf",
            rng.gen_range(0..10)
        )),
    }
}

fn evaluation(rng: &mut StdRng) -> EvaluationInput {
    let sections = ["Market", "Team", "Product"]
        .iter()
        .map(|title| AnalysisSection {
            title: (*title).to_string(),
            findings: "Reviewed".into(),
            score: Some(rng.gen_range(0..=100)),
        })
        .collect();
    EvaluationInput {
        sections,
        overall_score: rng.gen_bool(0.5).then(|| rng.gen_range(0..=100)),
        final_decision: Some(*pick(rng, Decision::ALL)),
    }
}

fn count_effects(stats: &mut SimulatorStats, effects: &[Effect]) {
    for effect in effects {
        match effect {
            Effect::CreateStartup(_) => stats.startups_created += 1,
            Effect::RecordAudit(_) => stats.overrides += 1,
            Effect::OpenSubmission(submission) if submission.attempt > 1 => {
                stats.reapplications += 1;
            }
            Effect::UpdateContract(contract) if contract.status == ContractStatus::Signed => {
                stats.contracts_signed += 1;
            }
            _ => {}
        }
    }
}

fn count_rejection(stats: &mut SimulatorStats, err: &hatch_engine::TransitionError) {
    use hatch_engine::TransitionError;
    match err {
        TransitionError::InvalidTransition { .. } => stats.rejected_invalid += 1,
        TransitionError::MissingDependency(_) => stats.rejected_missing += 1,
        TransitionError::Unauthorized { .. } => stats.rejected_unauthorized += 1,
        TransitionError::InvalidInput(_) => stats.rejected_input += 1,
        TransitionError::CooldownActive { .. } => stats.rejected_cooldown += 1,
    }
}

/// Invariants every applied transition must hold
fn check_applied(
    before: &LifecycleSnapshot,
    after: &LifecycleSnapshot,
    command: &Command,
    effects: &[Effect],
    startups: &mut HashMap<SubmissionId, StartupId>,
) -> Vec<Violation> {
    let founder = after.founder_id;
    let mut found = Vec::new();

    if after.version != before.version + 1 {
        found.push(Violation::VersionSkipped {
            founder,
            before: before.version,
            after: after.version,
        });
    }

    let reopened = effects.iter().any(|e| matches!(e, Effect::OpenSubmission(_)));
    let overridden = matches!(command, Command::OverrideStage { .. });
    if let (Some(from), Some(to)) = (before.stage(), after.stage()) {
        let lowered = matches!((from.rank(), to.rank()), (Some(a), Some(b)) if b < a);
        if lowered && !reopened && !overridden {
            found.push(Violation::RankRegressed {
                founder,
                command: command.name(),
                from,
                to,
            });
        }
    }

    if let Some(startup) = after.startup.get() {
        let first = *startups.entry(startup.submission_id).or_insert(startup.id);
        if first != startup.id {
            found.push(Violation::DuplicateStartup {
                submission: startup.submission_id,
                first,
                second: startup.id,
            });
        }
    }

    if !reopened {
        let submitted = |s: &LifecycleSnapshot| s.submission.get().and_then(|s| s.submitted_at);
        if submitted(before).is_some() && submitted(before) != submitted(after) {
            found.push(Violation::TimestampRewritten {
                founder,
                field: "submitted_at",
            });
        }
    }
    if let (Some(old), Some(new)) = (before.contract.get(), after.contract.get()) {
        if old.id == new.id {
            if old.sent_at.is_some() && old.sent_at != new.sent_at {
                found.push(Violation::TimestampRewritten {
                    founder,
                    field: "sent_at",
                });
            }
            if old.signed_at.is_some() && old.signed_at != new.signed_at {
                found.push(Violation::TimestampRewritten {
                    founder,
                    field: "signed_at",
                });
            }
        }
    }
    found
}

/// The resolver agrees with itself and with its guard, and a session that
/// refreshes after the write ends up on the resolved screen
fn check_routing(
    founder: &FounderState,
    snapshot: &LifecycleSnapshot,
    stats: &mut SimulatorStats,
) -> Vec<Violation> {
    let actor = Some(&founder.actor);
    let resolved = resolve(actor, Some(snapshot));
    let stable = resolved == resolve(actor, Some(snapshot))
        && RouteGuard::new(actor).check(resolved, Some(snapshot)).is_allowed();
    let mut found = Vec::new();
    if !stable {
        found.push(Violation::ResolverUnstable {
            founder: founder.actor.user_id,
            status: snapshot.submission_status(),
            stage: snapshot.stage(),
        });
    }

    let ticket = founder.router.begin_refresh();
    let outcome = founder.router.complete_refresh(ticket, snapshot.clone());
    if let hatch_routing::RefreshOutcome::Redirected(_) = outcome {
        stats.redirects += 1;
    }
    if founder.router.current() != resolved {
        found.push(Violation::SessionDiverged {
            founder: founder.actor.user_id,
            expected: resolved,
            actual: founder.router.current(),
        });
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_operating_walks_the_ladder() {
        assert_eq!(next_operating(Stage::Idea), Some(Stage::Mvp));
        assert_eq!(next_operating(Stage::SeriesA), Some(Stage::Growth));
        assert_eq!(next_operating(Stage::Growth), None);
        assert_eq!(next_operating(Stage::Unrecognized), None);
    }

    #[test]
    fn planned_command_for_new_founder_starts_a_submission() {
        let mut rng = StdRng::seed_from_u64(1);
        let snapshot = LifecycleSnapshot::empty(UserId::new());
        assert!(matches!(planned_command(&mut rng, &snapshot), Command::StartSubmission { .. }));
    }

    #[test]
    fn staff_commands_go_to_the_admin() {
        let mut rng = StdRng::seed_from_u64(7);
        let founder = Actor::founder(UserId::new());
        let admin = Actor::admin(UserId::new());
        let founders = vec![FounderState {
            actor: founder,
            router: SessionRouter::new(Some(founder)),
        }];
        for _ in 0..50 {
            let activate = Command::ActivateStartup;
            let actor = pick_actor(&mut rng, &activate, founder, admin, &founders, 0.0);
            assert_eq!(actor, admin);
            let finalize = Command::FinalizeSubmission;
            let actor = pick_actor(&mut rng, &finalize, founder, admin, &founders, 0.0);
            assert_eq!(actor, founder);
        }
    }

    #[test]
    fn report_text_lists_violations() {
        let founder = UserId::new();
        let report = SimulatorReport {
            config: SimulatorConfig::default(),
            stats: SimulatorStats::default(),
            violations: vec![Violation::TimestampRewritten {
                founder,
                field: "sent_at",
            }],
            final_positions: Vec::new(),
        };
        assert!(!report.passed());
        let text = report.generate_text();
        assert!(text.contains("Result: FAILED (1 violations)"));
        assert!(text.contains("sent_at rewritten"));
    }
}
