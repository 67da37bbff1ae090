//! Hatchery lifecycle data model
//!
//! The shapes the transition engine and routing resolver operate over.
//!
//! # Core Concepts
//!
//! - [`Submission`]: a founder's application, the root of one lifecycle chain
//! - [`Evaluation`]: staff's structured assessment of a submission
//! - [`Startup`]: the operating account, created once review begins
//! - [`ScopeOfEngagement`]: the negotiated work agreement
//! - [`Contract`]: the signable document derived from an accepted scope
//! - [`LifecycleSnapshot`]: everything above for one founder, plus the
//!   optimistic concurrency version
//!
//! Entities that may not exist yet are held in a [`Record`] slot rather than
//! an `Option`, so every match over a snapshot names the not-created case.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

#[macro_use]
mod macros;

mod actor;
mod contract;
mod error;
mod evaluation;
mod ids;
mod record;
mod scope;
mod snapshot;
mod stage;
mod startup;
mod submission;
mod validation;

pub use actor::{Actor, Role};
pub use contract::{Contract, ContractStatus, Signatory};
pub use error::ModelError;
pub use evaluation::{AnalysisSection, Decision, Evaluation};
pub use ids::{ContractId, ScopeId, SignatoryId, StartupId, SubmissionId, UserId};
pub use record::Record;
pub use scope::{Comment, ScopeOfEngagement, ScopeStatus};
pub use snapshot::LifecycleSnapshot;
pub use stage::Stage;
pub use startup::{Startup, StartupStatus};
pub use submission::{Answer, Submission, SubmissionStatus};
pub use validation::{slugify, validate_email};

/// Timestamps across the model are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
