//! Hatchery transition engine
//!
//! Pure state transitions for the admission lifecycle: submission review,
//! scoping, contracting and activation.
//!
//! # Example
//!
//! ```rust,ignore
//! use hatch_engine::{apply_transition, Command, LifecyclePolicy, TransitionContext};
//!
//! let policy = LifecyclePolicy::default();
//! let ctx = TransitionContext::new(admin, Utc::now(), &policy);
//! let transition = apply_transition(&snapshot, &Command::SetSubmissionStatus {
//!     status: SubmissionStatus::Approved,
//! }, &ctx)?;
//!
//! // Persist the record effects, then dispatch the signals
//! store.persist(snapshot.version, &transition.effects).await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod command;
pub mod effect;
pub mod engine;
pub mod error;
pub mod policy;
pub mod state_machine;

pub use command::{Command, EvaluationInput, Issuer, ScopeUpdate};
pub use effect::{replay, AuditEntry, Effect, LifecycleSignal};
pub use engine::{apply_transition, Transition, TransitionContext};
pub use error::{Dependency, Entity, TransitionError};
pub use policy::{can_reapply, reapply_available_at, LifecyclePolicy};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
