//! Error types for the transition engine
//!
//! Every rejection leaves the snapshot untouched; the caller decides whether
//! to surface, refresh, or retry.

use hatch_model::{Role, Timestamp};

/// Entity whose status precondition failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Submission,
    Evaluation,
    Startup,
    Scope,
    Contract,
    Stage,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Entity::Submission => "submission",
            Entity::Evaluation => "evaluation",
            Entity::Startup => "startup",
            Entity::Scope => "scope of engagement",
            Entity::Contract => "contract",
            Entity::Stage => "stage",
        };
        f.write_str(name)
    }
}

/// Related record a command needs but the snapshot lacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependency {
    Submission,
    Evaluation,
    Startup,
    Scope,
    Contract,
    /// Contract document URL, needed before sending
    Document,
    /// Every signatory's signature
    Signatures,
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Dependency::Submission => "submission",
            Dependency::Evaluation => "evaluation",
            Dependency::Startup => "startup",
            Dependency::Scope => "scope of engagement",
            Dependency::Contract => "contract",
            Dependency::Document => "contract document",
            Dependency::Signatures => "signatures",
        };
        f.write_str(name)
    }
}

/// Why a command was not applied
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The current status does not admit the requested change
    #[error("invalid transition for {entity}: {from} -> {to}")]
    InvalidTransition {
        entity: Entity,
        from: &'static str,
        to: &'static str,
    },

    /// A required related record is absent
    #[error("missing dependency: {0}")]
    MissingDependency(Dependency),

    /// The actor's role or identity does not permit the command
    #[error("{role} may not {action}")]
    Unauthorized { role: Role, action: &'static str },

    /// Command fields failed validation
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Reapplication attempted before the cooldown ended
    #[error("reapplication available at {available_at}")]
    CooldownActive { available_at: Timestamp },
}

impl TransitionError {
    #[inline]
    pub(crate) fn invalid(entity: Entity, from: &'static str, to: &'static str) -> Self {
        Self::InvalidTransition { entity, from, to }
    }

    #[inline]
    pub(crate) fn input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Recoverable errors can be resolved by the actor (refresh, complete a
    /// step, wait); none of them leave partial state behind.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Unauthorized { .. })
    }

    /// Message shown to the actor
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidTransition { .. } => {
                "This action is no longer available. Refresh to see the latest status.".to_string()
            }
            Self::MissingDependency(Dependency::Evaluation) => {
                "The evaluation must be completed first.".to_string()
            }
            Self::MissingDependency(Dependency::Signatures) => {
                "Every signatory must sign before the contract is complete.".to_string()
            }
            Self::MissingDependency(Dependency::Document) => {
                "Attach the contract document before sending it.".to_string()
            }
            Self::MissingDependency(dep) => format!("The {dep} must exist first."),
            Self::Unauthorized { .. } => "You do not have permission to do that.".to_string(),
            Self::InvalidInput(message) => message.clone(),
            Self::CooldownActive { available_at } => {
                format!(
                    "You can submit a new application after {}.",
                    available_at.format("%Y-%m-%d")
                )
            }
        }
    }
}
