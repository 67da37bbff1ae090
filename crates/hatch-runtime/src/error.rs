//! Error types for the lifecycle runtime
//!
//! - Store writes: version conflicts, unavailable backends, integrity breaks
//! - Notification delivery
//! - Command execution, which folds the above with engine rejections
//! - Configuration loading

use hatch_engine::TransitionError;
use hatch_model::UserId;
use std::path::PathBuf;

/// Lifecycle store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The snapshot moved since it was read
    #[error("version conflict for founder {founder}: expected {expected}, found {actual}")]
    ConcurrencyConflict {
        founder: UserId,
        expected: u64,
        actual: u64,
    },

    /// Backend could not be reached or refused the write
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The effects would break a stored invariant (e.g. rewriting comments)
    #[error("integrity violation: {0}")]
    Integrity(String),
}

impl StoreError {
    #[inline]
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict { .. })
    }
}

/// Notification delivery errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    /// Channel has no live receivers or was shut down
    #[error("notification channel closed")]
    Closed,

    /// Transport failure; worth retrying
    #[error("delivery failed: {0}")]
    Failed(String),
}

impl NotifyError {
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Errors from executing a command end to end
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The engine rejected the command
    #[error(transparent)]
    Rejected(#[from] TransitionError),

    /// The snapshot kept moving across every retry
    #[error("concurrency conflict for founder {founder} after {attempts} attempts")]
    ConcurrencyConflict { founder: UserId, attempts: u32 },

    /// The write failed; the command was not applied
    #[error("persistence failed: {0}")]
    PersistenceFailure(StoreError),
}

impl ServiceError {
    /// Whether the actor can recover (refresh, complete a prerequisite,
    /// or simply try again)
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Rejected(err) => err.is_recoverable(),
            Self::ConcurrencyConflict { .. } => true,
            Self::PersistenceFailure(_) => false,
        }
    }

    /// Whether re-issuing the same command may succeed without user action
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConcurrencyConflict { .. } | Self::PersistenceFailure(StoreError::Unavailable(_))
        )
    }

    /// Text shown to the actor
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(err) => err.user_message(),
            Self::ConcurrencyConflict { .. } => {
                "Someone else just changed this application. Refresh and try again.".to_string()
            }
            Self::PersistenceFailure(_) => {
                "We could not save that change. Nothing was applied; please try again later."
                    .to_string()
            }
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        Self::PersistenceFailure(err)
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
