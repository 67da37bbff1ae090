//! Testing utilities for the Hatchery workspace
//!
//! Snapshot fixtures for every position in the lifecycle, built directly
//! from model types so engine tests never depend on the engine to set up.

#![allow(missing_docs)]

use chrono::{Duration, TimeZone, Utc};
use hatch_model::{
    Actor, AnalysisSection, Contract, ContractStatus, Decision, Evaluation, LifecycleSnapshot,
    Record, ScopeOfEngagement, ScopeStatus, Stage, Startup, Submission, SubmissionStatus,
    Timestamp, UserId,
};

pub const STARTUP_NAME: &str = "Acme Rockets";
pub const DOCUMENT_URL: &str = "https://docs.example.com/contracts/acme.pdf";

/// Fixed reference instant so timestamps compare exactly
pub fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub fn founder() -> Actor {
    Actor::founder(UserId::new())
}

pub fn admin() -> Actor {
    Actor::admin(UserId::new())
}

/// Step-by-step snapshot builder.
///
/// Each step assumes the previous ones ran; the `*_snapshot` functions
/// below chain them for the common positions.
#[derive(Debug, Clone)]
pub struct LifecycleBuilder {
    snapshot: LifecycleSnapshot,
    now: Timestamp,
}

impl LifecycleBuilder {
    pub fn new(founder: UserId) -> Self {
        Self {
            snapshot: LifecycleSnapshot::empty(founder),
            now: t0(),
        }
    }

    pub fn at(mut self, now: Timestamp) -> Self {
        self.now = now;
        self
    }

    pub fn version(mut self, version: u64) -> Self {
        self.snapshot.version = version;
        self
    }

    pub fn pending(mut self) -> Self {
        let submission = Submission::open(self.snapshot.founder_id, 1, STARTUP_NAME, self.now);
        self.snapshot.submission = Record::Created(submission);
        self
    }

    pub fn in_review(mut self) -> Self {
        let now = self.now;
        let submission = self.submission_mut();
        submission.status = SubmissionStatus::InReview;
        submission.submitted_at = Some(now);
        let startup = Startup::for_submission(
            submission.id,
            submission.founder_id,
            STARTUP_NAME,
            "acme-rockets",
            now,
        );
        self.snapshot.startup = Record::Created(startup);
        self
    }

    pub fn evaluated(mut self) -> Self {
        let submission_id = self.submission_mut().id;
        let mut evaluation = Evaluation::new(submission_id, self.now);
        evaluation.sections = vec![AnalysisSection {
            title: "market".to_string(),
            findings: "large and growing".to_string(),
            score: Some(82),
        }];
        evaluation.overall_score = Some(80);
        evaluation.final_decision = Some(Decision::Approve);
        self.snapshot.evaluation = Record::Created(evaluation);
        self
    }

    pub fn rejected(mut self) -> Self {
        self.submission_mut().status = SubmissionStatus::Rejected;
        self
    }

    pub fn approved(mut self) -> Self {
        let now = self.now;
        self.submission_mut().status = SubmissionStatus::Approved;
        let startup = self.startup_mut();
        startup.current_stage = Stage::Scoping;
        let startup_id = startup.id;
        let scope = ScopeOfEngagement::draft(startup_id, 1, "MVP build", "Launch plan", now);
        self.snapshot.scope = Record::Created(scope);
        self
    }

    pub fn scope_status(mut self, status: ScopeStatus) -> Self {
        if let Some(scope) = self.snapshot.scope.get_mut() {
            scope.status = status;
        }
        self
    }

    /// Scope accepted, contract drafted, stage `CONTRACT`
    pub fn contracted(mut self) -> Self {
        let now = self.now;
        let scope_id = match self.snapshot.scope.get_mut() {
            Some(scope) => {
                scope.status = ScopeStatus::Accepted;
                scope.id
            }
            None => panic!("contracted() needs a scope; call approved() first"),
        };
        let startup = self.startup_mut();
        startup.current_stage = Stage::Contract;
        let startup_id = startup.id;
        self.snapshot.contract = Record::Created(Contract::draft(startup_id, scope_id, now));
        self
    }

    pub fn with_signatory(mut self, name: &str, email: &str, signed: bool) -> Self {
        let now = self.now;
        let contract = self.contract_mut();
        let id = contract.add_signatory(name, email);
        if signed {
            if let Some(signatory) = contract.signatories.iter_mut().find(|s| s.id == id) {
                signatory.signed = true;
                signatory.signed_at = Some(now);
            }
        }
        self
    }

    /// Move the contract to `status`, stamping the timestamps a real
    /// workflow would have set on the way.
    pub fn contract_status(mut self, status: ContractStatus) -> Self {
        let now = self.now;
        let contract = self.contract_mut();
        if matches!(status, ContractStatus::Sent | ContractStatus::Signed) {
            contract.document_url = Some(DOCUMENT_URL.to_string());
            contract.sent_at = Some(now);
        }
        if status == ContractStatus::Signed {
            contract.signed_at = Some(now);
        }
        contract.status = status;
        self
    }

    pub fn stage(mut self, stage: Stage) -> Self {
        self.startup_mut().current_stage = stage;
        self
    }

    pub fn build(self) -> LifecycleSnapshot {
        self.snapshot
    }

    fn submission_mut(&mut self) -> &mut Submission {
        self.snapshot
            .submission
            .get_mut()
            .unwrap_or_else(|| panic!("no submission; call pending() first"))
    }

    fn startup_mut(&mut self) -> &mut Startup {
        self.snapshot
            .startup
            .get_mut()
            .unwrap_or_else(|| panic!("no startup; call in_review() first"))
    }

    fn contract_mut(&mut self) -> &mut Contract {
        self.snapshot
            .contract
            .get_mut()
            .unwrap_or_else(|| panic!("no contract; call contracted() first"))
    }
}

pub fn pending_snapshot(founder: UserId) -> LifecycleSnapshot {
    LifecycleBuilder::new(founder).pending().build()
}

/// In review, startup at `EVALUATION`, optionally with an evaluation
pub fn in_review_snapshot(founder: UserId, evaluated: bool) -> LifecycleSnapshot {
    let builder = LifecycleBuilder::new(founder).pending().in_review();
    if evaluated {
        builder.evaluated().build()
    } else {
        builder.build()
    }
}

/// Rejected `days_ago` days before [`t0`]
pub fn rejected_snapshot(founder: UserId, days_ago: i64) -> LifecycleSnapshot {
    LifecycleBuilder::new(founder)
        .at(t0() - Duration::days(days_ago))
        .pending()
        .in_review()
        .evaluated()
        .rejected()
        .build()
}

/// Approved, startup at `SCOPING`, scope in `DRAFT`
pub fn approved_snapshot(founder: UserId) -> LifecycleSnapshot {
    LifecycleBuilder::new(founder)
        .pending()
        .in_review()
        .evaluated()
        .approved()
        .build()
}

/// Scope accepted, startup at `CONTRACT`, contract in `status`
pub fn contract_snapshot(founder: UserId, status: ContractStatus) -> LifecycleSnapshot {
    let builder = LifecycleBuilder::new(founder)
        .pending()
        .in_review()
        .evaluated()
        .approved()
        .contracted()
        .with_signatory("Ada Founder", "ada@acme.io", status == ContractStatus::Signed);
    builder.contract_status(status).build()
}

/// Signed contract and an operating stage
pub fn operating_snapshot(founder: UserId, stage: Stage) -> LifecycleSnapshot {
    let mut builder = LifecycleBuilder::new(founder)
        .pending()
        .in_review()
        .evaluated()
        .approved()
        .contracted()
        .with_signatory("Ada Founder", "ada@acme.io", true)
        .contract_status(ContractStatus::Signed)
        .stage(stage);
    if let Some(startup) = builder.snapshot.startup.get_mut() {
        startup.next_milestone = Some("Ship the MVP".to_string());
    }
    builder.build()
}

/// One snapshot per lifecycle position, for table-driven tests
pub fn every_position(founder: UserId) -> Vec<LifecycleSnapshot> {
    let mut positions = vec![
        LifecycleSnapshot::empty(founder),
        pending_snapshot(founder),
        in_review_snapshot(founder, false),
        in_review_snapshot(founder, true),
        rejected_snapshot(founder, 1),
        approved_snapshot(founder),
    ];
    positions.extend(ContractStatus::ALL.iter().map(|s| contract_snapshot(founder, *s)));
    positions.extend(
        Stage::ORDERED
            .iter()
            .filter(|s| s.is_operating())
            .map(|s| operating_snapshot(founder, *s)),
    );
    positions
}
