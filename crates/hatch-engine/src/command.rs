//! Commands accepted by the transition engine
//!
//! Commands carry only ids and fields. The founder they act on is the one
//! whose snapshot is passed alongside.

use hatch_model::{
    AnalysisSection, ContractStatus, Decision, Role, ScopeStatus, SignatoryId, Stage,
    StartupStatus, SubmissionStatus,
};
use serde::{Deserialize, Serialize};

/// Fields for creating or updating an evaluation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EvaluationInput {
    pub sections: Vec<AnalysisSection>,
    pub overall_score: Option<u8>,
    pub final_decision: Option<Decision>,
}

/// Scope text edits; `None` leaves a field unchanged
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScopeUpdate {
    pub product_scope: Option<String>,
    pub gtm_scope: Option<String>,
}

/// Who may issue a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Issuer {
    /// Only the founder who owns the snapshot
    Founder,
    /// Only staff
    Staff,
    /// Staff, or the founder who owns the snapshot
    Either,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    StartSubmission { startup_name: String },
    AnswerSubmission { question: String, answer: String },
    FinalizeSubmission,
    RecordEvaluation(EvaluationInput),
    SetSubmissionStatus { status: SubmissionStatus },
    UpdateScope(ScopeUpdate),
    AddScopeComment { text: String },
    SetScopeStatus { status: ScopeStatus },
    /// Staff redraft after a rejected scope or voided contract
    DraftScope,
    AddSignatory { name: String, email: String },
    RecordSignature { signatory_id: SignatoryId },
    SetContractStatus {
        status: ContractStatus,
        #[serde(default)]
        document_url: Option<String>,
    },
    ActivateStartup,
    AdvanceStage { target: Stage },
    SetStartupStatus { status: StartupStatus },
    /// Audited manual stage change; the only way to lower a stage
    OverrideStage { target: Stage, reason: String },
}

impl Command {
    /// Stable name for logs and metrics labels
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::StartSubmission { .. } => "start_submission",
            Command::AnswerSubmission { .. } => "answer_submission",
            Command::FinalizeSubmission => "finalize_submission",
            Command::RecordEvaluation(_) => "record_evaluation",
            Command::SetSubmissionStatus { .. } => "set_submission_status",
            Command::UpdateScope(_) => "update_scope",
            Command::AddScopeComment { .. } => "add_scope_comment",
            Command::SetScopeStatus { .. } => "set_scope_status",
            Command::DraftScope => "draft_scope",
            Command::AddSignatory { .. } => "add_signatory",
            Command::RecordSignature { .. } => "record_signature",
            Command::SetContractStatus { .. } => "set_contract_status",
            Command::ActivateStartup => "activate_startup",
            Command::AdvanceStage { .. } => "advance_stage",
            Command::SetStartupStatus { .. } => "set_startup_status",
            Command::OverrideStage { .. } => "override_stage",
        }
    }

    #[must_use]
    pub fn issuer(&self) -> Issuer {
        match self {
            Command::StartSubmission { .. }
            | Command::AnswerSubmission { .. }
            | Command::FinalizeSubmission => Issuer::Founder,
            Command::AddScopeComment { .. }
            | Command::SetScopeStatus { .. }
            | Command::RecordSignature { .. } => Issuer::Either,
            Command::RecordEvaluation(_)
            | Command::SetSubmissionStatus { .. }
            | Command::UpdateScope(_)
            | Command::DraftScope
            | Command::AddSignatory { .. }
            | Command::SetContractStatus { .. }
            | Command::ActivateStartup
            | Command::AdvanceStage { .. }
            | Command::SetStartupStatus { .. }
            | Command::OverrideStage { .. } => Issuer::Staff,
        }
    }

    /// Human phrasing used in authorization errors
    pub(crate) fn action(&self) -> &'static str {
        match self {
            Command::StartSubmission { .. } => "start a submission",
            Command::AnswerSubmission { .. } => "answer submission questions",
            Command::FinalizeSubmission => "finalize a submission",
            Command::RecordEvaluation(_) => "record evaluations",
            Command::SetSubmissionStatus { .. } => "change submission status",
            Command::UpdateScope(_) => "edit the scope",
            Command::AddScopeComment { .. } => "comment on the scope",
            Command::SetScopeStatus { .. } => "change scope status",
            Command::DraftScope => "draft a scope",
            Command::AddSignatory { .. } => "add signatories",
            Command::RecordSignature { .. } => "record signatures",
            Command::SetContractStatus { .. } => "change contract status",
            Command::ActivateStartup => "activate the startup",
            Command::AdvanceStage { .. } => "advance the stage",
            Command::SetStartupStatus { .. } => "change startup status",
            Command::OverrideStage { .. } => "override the stage",
        }
    }

    /// Whether `role` can ever issue this command
    #[must_use]
    pub fn permits(&self, role: Role) -> bool {
        match (self.issuer(), role) {
            (Issuer::Either, _)
            | (Issuer::Founder, Role::Founder)
            | (Issuer::Staff, Role::Admin) => true,
            (Issuer::Founder, Role::Admin) | (Issuer::Staff, Role::Founder) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_serialize_with_type_tag() {
        let command = Command::SetSubmissionStatus {
            status: SubmissionStatus::Approved,
        };
        let json = serde_json::to_value(&command).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "SET_SUBMISSION_STATUS", "status": "APPROVED" })
        );

        let parsed: Command =
            serde_json::from_str(r#"{ "type": "SET_CONTRACT_STATUS", "status": "SENT" }"#).unwrap();
        assert_eq!(
            parsed,
            Command::SetContractStatus {
                status: ContractStatus::Sent,
                document_url: None
            }
        );
    }

    #[test]
    fn founders_cannot_issue_staff_commands() {
        assert!(!Command::ActivateStartup.permits(Role::Founder));
        assert!(!Command::FinalizeSubmission.permits(Role::Admin));
        assert!(Command::AddScopeComment { text: "hi".into() }.permits(Role::Founder));
        assert!(Command::AddScopeComment { text: "hi".into() }.permits(Role::Admin));
    }
}
