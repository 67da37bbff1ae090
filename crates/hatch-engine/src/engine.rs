//! Transition engine
//!
//! [`apply_transition`] validates a command against the snapshot it was
//! issued on and returns the next snapshot together with the effects that
//! produce it. It performs no I/O; the same inputs always give the same
//! output.
//!
//! # Workflow
//! 1. Authorize the actor for the command
//! 2. Check the command's precondition against the *current* statuses
//! 3. Plan record effects (creations are looked up before they are emitted,
//!    so re-applying never duplicates a row)
//! 4. Replay the effects onto the snapshot and bump its version
//! 5. Append the notification effect

use crate::command::{Command, EvaluationInput, ScopeUpdate};
use crate::effect::{replay, AuditEntry, Effect, LifecycleSignal};
use crate::error::{Dependency, Entity, TransitionError};
use crate::policy::{can_reapply, reapply_available_at, LifecyclePolicy};
use crate::state_machine::{
    validate_contract_transition, validate_scope_transition, validate_submission_transition,
};
use hatch_model::{
    slugify, validate_email, Actor, Contract, ContractStatus, Evaluation, LifecycleSnapshot,
    Role, ScopeOfEngagement, ScopeStatus, SignatoryId, Stage, Startup, StartupId, StartupStatus,
    Submission, SubmissionStatus, Timestamp,
};

/// Who is acting, when, and under which policy
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    pub actor: Actor,
    pub now: Timestamp,
    pub policy: &'a LifecyclePolicy,
}

impl<'a> TransitionContext<'a> {
    #[inline]
    #[must_use]
    pub fn new(actor: Actor, now: Timestamp, policy: &'a LifecyclePolicy) -> Self {
        Self { actor, now, policy }
    }
}

/// Outcome of an accepted command
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// Snapshot after the effects; version bumped unless this is a no-op
    pub snapshot: LifecycleSnapshot,
    /// Record effects in application order, then notifications
    pub effects: Vec<Effect>,
}

impl Transition {
    /// Accepted but nothing changed (idempotent re-entry)
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn record_effects(&self) -> impl Iterator<Item = &Effect> {
        self.effects.iter().filter(|e| e.is_record())
    }

    pub fn signals(&self) -> impl Iterator<Item = &LifecycleSignal> {
        self.effects.iter().filter_map(|e| match e {
            Effect::Notify(signal) => Some(signal),
            _ => None,
        })
    }
}

/// Validate `command` against `snapshot` and compute its consequences
pub fn apply_transition(
    snapshot: &LifecycleSnapshot,
    command: &Command,
    ctx: &TransitionContext<'_>,
) -> Result<Transition, TransitionError> {
    let planner = Planner { snapshot, ctx };
    let planned = authorize(snapshot, command, &ctx.actor).and_then(|()| planner.plan(command));

    let mut effects = match planned {
        Ok(effects) => effects,
        Err(err) => {
            tracing::debug!(
                command = command.name(),
                founder = %snapshot.founder_id,
                version = snapshot.version,
                error = %err,
                "transition rejected"
            );
            return Err(err);
        }
    };

    if effects.is_empty() {
        tracing::debug!(
            command = command.name(),
            founder = %snapshot.founder_id,
            "transition is a no-op"
        );
        return Ok(Transition {
            snapshot: snapshot.clone(),
            effects,
        });
    }

    let mut next = replay(snapshot, &effects);
    next.version = snapshot.version + 1;
    effects.push(Effect::Notify(LifecycleSignal::SnapshotChanged {
        founder_id: snapshot.founder_id,
    }));

    Ok(Transition {
        snapshot: next,
        effects,
    })
}

/// Slug for a startup whose name yields none: `startup-` and the first
/// twelve hex digits of its id
fn fallback_slug(id: StartupId) -> String {
    let hex = id.as_uuid().simple().to_string();
    format!("startup-{}", &hex[..12])
}

fn authorize(
    snapshot: &LifecycleSnapshot,
    command: &Command,
    actor: &Actor,
) -> Result<(), TransitionError> {
    let owns_snapshot = actor.role == Role::Admin || actor.user_id == snapshot.founder_id;
    if command.permits(actor.role) && owns_snapshot {
        Ok(())
    } else {
        Err(TransitionError::Unauthorized {
            role: actor.role,
            action: command.action(),
        })
    }
}

struct Planner<'s, 'c> {
    snapshot: &'s LifecycleSnapshot,
    ctx: &'c TransitionContext<'c>,
}

type Planned = Result<Vec<Effect>, TransitionError>;

impl<'s, 'c> Planner<'s, 'c> {
    fn plan(&self, command: &Command) -> Planned {
        match command {
            Command::StartSubmission { startup_name } => self.start_submission(startup_name),
            Command::AnswerSubmission { question, answer } => {
                self.answer_submission(question, answer)
            }
            Command::FinalizeSubmission => self.finalize_submission(),
            Command::RecordEvaluation(input) => self.record_evaluation(input),
            Command::SetSubmissionStatus { status } => self.set_submission_status(*status),
            Command::UpdateScope(update) => self.update_scope(update),
            Command::AddScopeComment { text } => self.add_scope_comment(text),
            Command::SetScopeStatus { status } => self.set_scope_status(*status),
            Command::DraftScope => self.draft_scope(),
            Command::AddSignatory { name, email } => self.add_signatory(name, email),
            Command::RecordSignature { signatory_id } => self.record_signature(*signatory_id),
            Command::SetContractStatus {
                status,
                document_url,
            } => self.set_contract_status(*status, document_url.as_deref()),
            Command::ActivateStartup => self.activate_startup(),
            Command::AdvanceStage { target } => self.advance_stage(*target),
            Command::SetStartupStatus { status } => self.set_startup_status(*status),
            Command::OverrideStage { target, reason } => self.override_stage(*target, reason),
        }
    }

    #[inline]
    fn now(&self) -> Timestamp {
        self.ctx.now
    }

    #[inline]
    fn policy(&self) -> &LifecyclePolicy {
        self.ctx.policy
    }

    fn submission(&self) -> Result<&'s Submission, TransitionError> {
        self.snapshot
            .submission
            .get()
            .ok_or(TransitionError::MissingDependency(Dependency::Submission))
    }

    fn startup(&self) -> Result<&'s Startup, TransitionError> {
        self.snapshot
            .startup
            .get()
            .ok_or(TransitionError::MissingDependency(Dependency::Startup))
    }

    fn scope(&self) -> Result<&'s ScopeOfEngagement, TransitionError> {
        self.snapshot
            .scope
            .get()
            .ok_or(TransitionError::MissingDependency(Dependency::Scope))
    }

    fn contract(&self) -> Result<&'s Contract, TransitionError> {
        self.snapshot
            .contract
            .get()
            .ok_or(TransitionError::MissingDependency(Dependency::Contract))
    }

    fn require_evaluation(&self, submission: &Submission) -> Result<(), TransitionError> {
        self.snapshot
            .evaluation
            .get()
            .filter(|e| e.submission_id == submission.id)
            .map(|_| ())
            .ok_or(TransitionError::MissingDependency(Dependency::Evaluation))
    }

    /// Startup bound to `submission`, fetched if the snapshot has it,
    /// otherwise a fresh one at `EVALUATION`. A name with no letters or
    /// digits gets a slug derived from the startup id.
    fn startup_for(&self, submission: &Submission) -> Startup {
        if let Some(existing) = self
            .snapshot
            .startup
            .get()
            .filter(|s| s.submission_id == submission.id)
        {
            return existing.clone();
        }
        let slug = slugify(&submission.startup_name)
            .unwrap_or_else(|_| fallback_slug(StartupId::for_submission(submission.id)));
        Startup::for_submission(
            submission.id,
            submission.founder_id,
            submission.startup_name.clone(),
            slug,
            self.now(),
        )
    }

    /// Emit `CreateStartup` for a startup the snapshot lacks, `UpdateStartup`
    /// for a changed one, nothing for an unchanged one.
    fn emit_startup(&self, effects: &mut Vec<Effect>, startup: Startup) {
        match self.snapshot.startup.get().filter(|s| s.id == startup.id) {
            Some(existing) if *existing == startup => {}
            Some(_) => effects.push(Effect::UpdateStartup(startup)),
            None => effects.push(Effect::CreateStartup(startup)),
        }
    }

    /// Move a startup forward. Engine-driven moves never lower the rank.
    fn advanced(&self, startup: &Startup, target: Stage) -> Result<Startup, TransitionError> {
        if !startup.current_stage.can_advance_to(target) {
            return Err(TransitionError::invalid(
                Entity::Stage,
                startup.current_stage.as_str(),
                target.as_str(),
            ));
        }
        let mut next = startup.clone();
        if next.current_stage != target {
            next.current_stage = target;
            next.updated_at = self.now();
        }
        Ok(next)
    }

    // ---- submission -------------------------------------------------------

    fn start_submission(&self, startup_name: &str) -> Planned {
        let name = startup_name.trim();
        if name.is_empty() {
            return Err(TransitionError::input("startup name must not be empty"));
        }

        let founder = self.snapshot.founder_id;
        let Some(current) = self.snapshot.submission.get() else {
            return Ok(vec![Effect::OpenSubmission(Submission::open(founder, 1, name, self.now()))]);
        };

        match current.status {
            SubmissionStatus::NotStarted => {
                validate_submission_transition(current.status, SubmissionStatus::Pending)?;
                let mut submission = current.clone();
                submission.startup_name = name.to_string();
                submission.status = SubmissionStatus::Pending;
                Ok(vec![Effect::UpdateSubmission(submission)])
            }
            SubmissionStatus::Rejected => {
                if can_reapply(self.snapshot, self.now(), self.policy()) {
                    let attempt = current.attempt + 1;
                    let submission = Submission::open(founder, attempt, name, self.now());
                    Ok(vec![Effect::OpenSubmission(submission)])
                } else {
                    let available_at =
                        reapply_available_at(self.snapshot, self.policy()).unwrap_or(self.now());
                    Err(TransitionError::CooldownActive { available_at })
                }
            }
            status @ (SubmissionStatus::Pending
            | SubmissionStatus::InReview
            | SubmissionStatus::Approved) => Err(TransitionError::invalid(
                Entity::Submission,
                status.as_str(),
                SubmissionStatus::Pending.as_str(),
            )),
        }
    }

    fn answer_submission(&self, question: &str, answer: &str) -> Planned {
        let question = question.trim();
        if question.is_empty() {
            return Err(TransitionError::input("question must not be empty"));
        }
        let current = self.submission()?;
        if current.status != SubmissionStatus::Pending {
            return Err(TransitionError::invalid(
                Entity::Submission,
                current.status.as_str(),
                "ANSWERED",
            ));
        }
        if current.answer(question) == Some(answer) {
            return Ok(Vec::new());
        }
        let mut submission = current.clone();
        submission.upsert_answer(question, answer);
        Ok(vec![Effect::UpdateSubmission(submission)])
    }

    fn finalize_submission(&self) -> Planned {
        let current = self.submission()?;
        if current.status == SubmissionStatus::InReview {
            return Ok(Vec::new());
        }
        validate_submission_transition(current.status, SubmissionStatus::InReview)?;
        self.enter_review(current)
    }

    /// PENDING -> IN_REVIEW: stamp `submitted_at` once, create-or-fetch the startup
    fn enter_review(&self, current: &Submission) -> Planned {
        let mut submission = current.clone();
        submission.status = SubmissionStatus::InReview;
        submission.submitted_at.get_or_insert(self.now());

        let startup = self.startup_for(&submission);
        let mut effects = vec![Effect::UpdateSubmission(submission)];
        self.emit_startup(&mut effects, startup);
        Ok(effects)
    }

    /// Create or update the evaluation. Without an overall score, the mean
    /// of the scored sections stands in.
    fn record_evaluation(&self, input: &EvaluationInput) -> Planned {
        let submission = self.submission()?;
        if !submission.status.is_open() {
            return Err(TransitionError::invalid(
                Entity::Evaluation,
                submission.status.as_str(),
                "EVALUATED",
            ));
        }
        let out_of_range = |score: Option<u8>| score.is_some_and(|s| s > 100);
        if out_of_range(input.overall_score)
            || input.sections.iter().any(|s| out_of_range(s.score))
        {
            return Err(TransitionError::input("scores must be between 0 and 100"));
        }
        if input.sections.iter().any(|s| s.title.trim().is_empty()) {
            return Err(TransitionError::input("analysis sections need a title"));
        }

        let existing = self
            .snapshot
            .evaluation
            .get()
            .filter(|e| e.submission_id == submission.id);

        let mut evaluation = existing
            .cloned()
            .unwrap_or_else(|| Evaluation::new(submission.id, self.now()));
        evaluation.sections.clone_from(&input.sections);
        evaluation.final_decision = input.final_decision;
        let average = evaluation.section_average();
        evaluation.overall_score = input.overall_score.or(average);

        if let Some(current) = existing {
            if current.sections == evaluation.sections
                && current.overall_score == evaluation.overall_score
                && current.final_decision == evaluation.final_decision
            {
                return Ok(Vec::new());
            }
            evaluation.updated_at = self.now();
        }
        Ok(vec![Effect::UpsertEvaluation(evaluation)])
    }

    fn set_submission_status(&self, target: SubmissionStatus) -> Planned {
        let current = self.submission()?;
        if current.status == target {
            return Ok(Vec::new());
        }

        match target {
            SubmissionStatus::InReview => {
                validate_submission_transition(current.status, target)?;
                self.require_evaluation(current)?;
                self.enter_review(current)
            }
            SubmissionStatus::Approved => {
                validate_submission_transition(current.status, target)?;
                self.require_evaluation(current)?;

                let mut submission = current.clone();
                submission.status = SubmissionStatus::Approved;
                let startup = self.startup_for(&submission);
                let startup = self.advanced(&startup, Stage::Scoping)?;

                let mut effects = vec![Effect::UpdateSubmission(submission)];
                if self.snapshot.scope.get().map_or(true, |s| s.startup_id != startup.id) {
                    let policy = self.policy();
                    effects.push(Effect::CreateScope(ScopeOfEngagement::draft(
                        startup.id,
                        1,
                        policy.default_product_scope.clone(),
                        policy.default_gtm_scope.clone(),
                        self.now(),
                    )));
                }
                self.emit_startup(&mut effects, startup);
                Ok(effects)
            }
            SubmissionStatus::Rejected => {
                validate_submission_transition(current.status, target)?;
                let mut submission = current.clone();
                submission.status = SubmissionStatus::Rejected;
                let mut effects = vec![Effect::UpdateSubmission(submission)];

                if let Some(startup) = self
                    .snapshot
                    .startup
                    .get()
                    .filter(|s| s.submission_id == current.id && s.status == StartupStatus::Active)
                {
                    let mut startup = startup.clone();
                    startup.status = StartupStatus::Inactive;
                    startup.updated_at = self.now();
                    effects.push(Effect::UpdateStartup(startup));
                }
                Ok(effects)
            }
            SubmissionStatus::NotStarted | SubmissionStatus::Pending => {
                Err(TransitionError::invalid(
                    Entity::Submission,
                    current.status.as_str(),
                    target.as_str(),
                ))
            }
        }
    }

    // ---- scope ------------------------------------------------------------

    fn update_scope(&self, update: &ScopeUpdate) -> Planned {
        if update.product_scope.is_none() && update.gtm_scope.is_none() {
            return Err(TransitionError::input("scope update names no fields"));
        }
        let scope = self.scope()?;
        if !scope.status.is_negotiable() {
            return Err(TransitionError::invalid(Entity::Scope, scope.status.as_str(), "EDITED"));
        }

        let mut next = scope.clone();
        if let Some(product) = &update.product_scope {
            next.product_scope.clone_from(product);
        }
        if let Some(gtm) = &update.gtm_scope {
            next.gtm_scope.clone_from(gtm);
        }
        if next == *scope {
            return Ok(Vec::new());
        }
        next.updated_at = self.now();
        Ok(vec![Effect::UpdateScope(next)])
    }

    fn add_scope_comment(&self, text: &str) -> Planned {
        let text = text.trim();
        if text.is_empty() {
            return Err(TransitionError::input("comment must not be empty"));
        }
        let scope = self.scope()?;

        let mut next = scope.clone();
        next.append_comment(self.ctx.actor.role, self.ctx.actor.user_id, text, self.now());
        // Discussion opens a draft; settled scopes keep their status.
        if next.status == ScopeStatus::Draft {
            next.status = ScopeStatus::InDiscussion;
        }
        Ok(vec![Effect::UpdateScope(next)])
    }

    fn set_scope_status(&self, target: ScopeStatus) -> Planned {
        let scope = self.scope()?;
        if target == ScopeStatus::InDiscussion && scope.status == ScopeStatus::InDiscussion {
            return Ok(Vec::new());
        }
        validate_scope_transition(scope.status, target)?;

        let mut next = scope.clone();
        next.status = target;
        next.updated_at = self.now();

        if target != ScopeStatus::Accepted {
            return Ok(vec![Effect::UpdateScope(next)]);
        }

        let startup = self.advanced(self.startup()?, Stage::Contract)?;
        if let Some(contract) = self
            .snapshot
            .contract
            .get()
            .filter(|c| c.status != ContractStatus::Voided)
        {
            return Err(TransitionError::invalid(
                Entity::Contract,
                contract.status.as_str(),
                ContractStatus::Draft.as_str(),
            ));
        }

        let contract = Contract::draft(startup.id, next.id, self.now());
        let mut effects = vec![Effect::UpdateScope(next), Effect::CreateContract(contract)];
        self.emit_startup(&mut effects, startup);
        Ok(effects)
    }

    fn draft_scope(&self) -> Planned {
        let startup = self.startup()?;
        if startup.current_stage != Stage::Scoping {
            return Err(TransitionError::invalid(
                Entity::Stage,
                startup.current_stage.as_str(),
                Stage::Scoping.as_str(),
            ));
        }

        let contract_voided = self
            .snapshot
            .contract
            .get()
            .is_some_and(|c| c.status == ContractStatus::Voided);

        let draft_number = match self.snapshot.scope.get() {
            None => 1,
            Some(scope) if scope.status == ScopeStatus::Rejected => scope.draft_number + 1,
            Some(scope) if scope.status == ScopeStatus::Accepted && contract_voided => {
                scope.draft_number + 1
            }
            Some(scope) => {
                return Err(TransitionError::invalid(
                    Entity::Scope,
                    scope.status.as_str(),
                    "REDRAFTED",
                ));
            }
        };

        let policy = self.policy();
        Ok(vec![Effect::CreateScope(ScopeOfEngagement::draft(
            startup.id,
            draft_number,
            policy.default_product_scope.clone(),
            policy.default_gtm_scope.clone(),
            self.now(),
        ))])
    }

    // ---- contract ---------------------------------------------------------

    fn add_signatory(&self, name: &str, email: &str) -> Planned {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(TransitionError::input("signatory name must not be empty"));
        }
        validate_email(email).map_err(|e| TransitionError::input(e.to_string()))?;

        let contract = self.contract()?;
        if !matches!(contract.status, ContractStatus::Draft | ContractStatus::Sent) {
            return Err(TransitionError::invalid(
                Entity::Contract,
                contract.status.as_str(),
                "SIGNATORY_ADDED",
            ));
        }
        if contract.signatories.iter().any(|s| s.email.eq_ignore_ascii_case(email)) {
            return Err(TransitionError::input(format!("{email} is already a signatory")));
        }

        let mut next = contract.clone();
        next.add_signatory(name, email);
        next.updated_at = self.now();
        Ok(vec![Effect::UpdateContract(next)])
    }

    fn record_signature(&self, signatory_id: SignatoryId) -> Planned {
        let contract = self.contract()?;
        if contract.status != ContractStatus::Sent {
            return Err(TransitionError::invalid(
                Entity::Contract,
                contract.status.as_str(),
                "SIGNATURE",
            ));
        }
        let Some(signatory) = contract.signatory(signatory_id) else {
            return Err(TransitionError::input(format!("unknown signatory {signatory_id}")));
        };
        if signatory.signed {
            return Ok(Vec::new());
        }

        let now = self.now();
        let mut next = contract.clone();
        if let Some(signatory) = next.signatories.iter_mut().find(|s| s.id == signatory_id) {
            signatory.signed = true;
            signatory.signed_at = Some(now);
        }
        next.updated_at = now;
        Ok(vec![Effect::UpdateContract(next)])
    }

    fn set_contract_status(&self, target: ContractStatus, document_url: Option<&str>) -> Planned {
        let contract = self.contract()?;
        let document_url = document_url.map(str::trim).filter(|u| !u.is_empty());

        if contract.status == target {
            // Re-entry never touches the timestamps. A resend may carry a
            // corrected document.
            return match document_url {
                Some(url)
                    if target == ContractStatus::Sent
                        && contract.document_url.as_deref() != Some(url) =>
                {
                    let mut next = contract.clone();
                    next.document_url = Some(url.to_string());
                    next.updated_at = self.now();
                    Ok(vec![Effect::UpdateContract(next)])
                }
                _ => Ok(Vec::new()),
            };
        }
        validate_contract_transition(contract.status, target)?;

        let now = self.now();
        let mut next = contract.clone();
        if let Some(url) = document_url {
            next.document_url = Some(url.to_string());
        }
        match target {
            ContractStatus::Sent => {
                if next.document_url.is_none() {
                    return Err(TransitionError::MissingDependency(Dependency::Document));
                }
                next.sent_at.get_or_insert(now);
            }
            ContractStatus::Signed => {
                if !next.fully_signed() {
                    return Err(TransitionError::MissingDependency(Dependency::Signatures));
                }
                next.signed_at.get_or_insert(now);
            }
            ContractStatus::Draft | ContractStatus::Voided => {}
        }
        next.status = target;
        next.updated_at = now;
        Ok(vec![Effect::UpdateContract(next)])
    }

    // ---- startup ----------------------------------------------------------

    fn activate_startup(&self) -> Planned {
        let startup = self.startup()?;
        if startup.current_stage.is_operating() {
            return Ok(Vec::new());
        }
        if startup.current_stage != Stage::Contract {
            return Err(TransitionError::invalid(
                Entity::Stage,
                startup.current_stage.as_str(),
                Stage::FIRST_OPERATING.as_str(),
            ));
        }
        let contract = self.contract()?;
        if contract.status != ContractStatus::Signed {
            return Err(TransitionError::invalid(
                Entity::Contract,
                contract.status.as_str(),
                "ACTIVATED",
            ));
        }

        let mut next = self.advanced(startup, Stage::FIRST_OPERATING)?;
        if next.next_milestone.is_none() {
            next.next_milestone = Some(self.policy().default_next_milestone.clone());
        }
        if next.status == StartupStatus::Inactive {
            next.status = StartupStatus::Active;
        }
        let mut effects = Vec::new();
        self.emit_startup(&mut effects, next);
        Ok(effects)
    }

    fn advance_stage(&self, target: Stage) -> Planned {
        let startup = self.startup()?;
        if !startup.current_stage.is_operating() || !target.is_operating() {
            return Err(TransitionError::invalid(
                Entity::Stage,
                startup.current_stage.as_str(),
                target.as_str(),
            ));
        }
        let next = self.advanced(startup, target)?;
        let mut effects = Vec::new();
        self.emit_startup(&mut effects, next);
        Ok(effects)
    }

    fn set_startup_status(&self, target: StartupStatus) -> Planned {
        let startup = self.startup()?;
        if startup.status == target {
            return Ok(Vec::new());
        }
        let graduating_early =
            target == StartupStatus::Graduated && !startup.current_stage.is_operating();
        if startup.status == StartupStatus::Graduated || graduating_early {
            return Err(TransitionError::invalid(
                Entity::Startup,
                startup.status.as_str(),
                target.as_str(),
            ));
        }

        let mut next = startup.clone();
        next.status = target;
        next.updated_at = self.now();
        Ok(vec![Effect::UpdateStartup(next)])
    }

    fn override_stage(&self, target: Stage, reason: &str) -> Planned {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(TransitionError::input("a stage override needs a reason"));
        }
        if target == Stage::Unrecognized {
            return Err(TransitionError::input("cannot override to an unrecognized stage"));
        }
        let startup = self.startup()?;
        if startup.current_stage == target {
            return Ok(Vec::new());
        }

        let mut next = startup.clone();
        next.current_stage = target;
        next.updated_at = self.now();
        let audit = AuditEntry {
            startup_id: startup.id,
            actor_id: self.ctx.actor.user_id,
            from: startup.current_stage,
            to: target,
            reason: reason.to_string(),
            at: self.now(),
        };
        Ok(vec![Effect::UpdateStartup(next), Effect::RecordAudit(audit)])
    }
}
