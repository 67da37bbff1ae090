use crate::ids::{ContractId, ScopeId, SignatoryId, StartupId};
use crate::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    Draft,
    Sent,
    Signed,
    Voided,
}

status_names!(ContractStatus, "contract status", {
    Draft => "DRAFT",
    Sent => "SENT",
    Signed => "SIGNED",
    Voided => "VOIDED",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signatory {
    pub id: SignatoryId,
    pub name: String,
    pub email: String,
    pub signed: bool,
    pub signed_at: Option<Timestamp>,
}

/// Legal document workflow for an accepted scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: ContractId,
    pub startup_id: StartupId,
    /// Scope this contract was generated from
    pub scope_id: ScopeId,
    pub document_url: Option<String>,
    pub status: ContractStatus,
    /// Set the first time the contract becomes `SENT`, never overwritten
    pub sent_at: Option<Timestamp>,
    /// Set the first time the contract becomes `SIGNED`, never overwritten
    pub signed_at: Option<Timestamp>,
    pub signatories: Vec<Signatory>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Contract {
    #[must_use]
    pub fn draft(startup_id: StartupId, scope_id: ScopeId, now: Timestamp) -> Self {
        Self {
            id: ContractId::for_scope(scope_id),
            startup_id,
            scope_id,
            document_url: None,
            status: ContractStatus::Draft,
            sent_at: None,
            signed_at: None,
            signatories: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Every signatory has signed and there is at least one
    #[inline]
    #[must_use]
    pub fn fully_signed(&self) -> bool {
        !self.signatories.is_empty() && self.signatories.iter().all(|s| s.signed)
    }

    #[must_use]
    pub fn signatory(&self, id: SignatoryId) -> Option<&Signatory> {
        self.signatories.iter().find(|s| s.id == id)
    }

    /// Add an unsigned signatory with the next derived id
    pub fn add_signatory(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> SignatoryId {
        #[allow(clippy::cast_possible_truncation)]
        let id = SignatoryId::for_contract(self.id, self.signatories.len() as u32);
        self.signatories.push(Signatory {
            id,
            name: name.into(),
            email: email.into(),
            signed: false,
            signed_at: None,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StartupId, SubmissionId, UserId};
    use chrono::Utc;

    #[test]
    fn fully_signed_requires_someone_to_sign() {
        let startup = StartupId::for_submission(SubmissionId::for_attempt(UserId::new(), 1));
        let scope = ScopeId::for_draft(startup, 1);
        let mut contract = Contract::draft(startup, scope, Utc::now());
        assert!(!contract.fully_signed());

        let a = contract.add_signatory("Ada", "ada@acme.io");
        let b = contract.add_signatory("Bob", "bob@hatch.vc");
        assert_ne!(a, b);
        assert!(!contract.fully_signed());

        for s in &mut contract.signatories {
            s.signed = true;
        }
        assert!(contract.fully_signed());
    }
}
