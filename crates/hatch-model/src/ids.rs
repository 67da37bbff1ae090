//! Entity identifiers
//!
//! Dependent entities derive their ids from their causal parent (UUID v5),
//! so recomputing a side effect always lands on the same row.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace for every derived lifecycle id.
const LIFECYCLE_NAMESPACE: Uuid = Uuid::from_u128(0x6a1c_52e4_9d3b_4f7a_b0c8_1e2f_3a4b_5c6d);

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Raw UUID
            #[inline]
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

entity_id!(
    /// Stable identity issued by the identity provider.
    UserId
);
entity_id!(
    /// One application attempt.
    SubmissionId
);
entity_id!(StartupId);
entity_id!(ScopeId);
entity_id!(ContractId);
entity_id!(SignatoryId);

impl UserId {
    /// Generate a random user id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

fn derive(parent: &Uuid, label: &str, ordinal: u32) -> Uuid {
    let mut name = Vec::with_capacity(16 + label.len() + 4);
    name.extend_from_slice(parent.as_bytes());
    name.extend_from_slice(label.as_bytes());
    name.extend_from_slice(&ordinal.to_be_bytes());
    Uuid::new_v5(&LIFECYCLE_NAMESPACE, &name)
}

impl SubmissionId {
    /// Id of the founder's `attempt`-th application (1-based).
    #[must_use]
    pub fn for_attempt(founder: UserId, attempt: u32) -> Self {
        Self(derive(&founder.0, "submission", attempt))
    }
}

impl StartupId {
    /// A submission yields at most one startup, so the id is a function of it.
    #[must_use]
    pub fn for_submission(submission: SubmissionId) -> Self {
        Self(derive(&submission.0, "startup", 0))
    }
}

impl ScopeId {
    #[must_use]
    pub fn for_draft(startup: StartupId, draft_number: u32) -> Self {
        Self(derive(&startup.0, "scope", draft_number))
    }
}

impl ContractId {
    #[must_use]
    pub fn for_scope(scope: ScopeId) -> Self {
        Self(derive(&scope.0, "contract", 0))
    }
}

impl SignatoryId {
    #[must_use]
    pub fn for_contract(contract: ContractId, index: u32) -> Self {
        Self(derive(&contract.0, "signatory", index))
    }
}
