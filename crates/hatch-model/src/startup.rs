use crate::ids::{StartupId, SubmissionId, UserId};
use crate::stage::Stage;
use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// Account status. Startups are never deleted, only made `INACTIVE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StartupStatus {
    Active,
    Inactive,
    Graduated,
}

status_names!(StartupStatus, "startup status", {
    Active => "ACTIVE",
    Inactive => "INACTIVE",
    Graduated => "GRADUATED",
});

/// The operating account, created the first time its submission enters review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Startup {
    pub id: StartupId,
    pub founder_id: UserId,
    /// Immutable back-reference
    pub submission_id: SubmissionId,
    pub name: String,
    pub slug: String,
    pub status: StartupStatus,
    pub current_stage: Stage,
    pub next_milestone: Option<String>,
    pub founders: Vec<UserId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Startup {
    /// Startup for a submission entering review. `slug` is taken as given.
    #[must_use]
    pub fn for_submission(
        submission_id: SubmissionId,
        founder_id: UserId,
        name: impl Into<String>,
        slug: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: StartupId::for_submission(submission_id),
            founder_id,
            submission_id,
            name: name.into(),
            slug: slug.into(),
            status: StartupStatus::Active,
            current_stage: Stage::Evaluation,
            next_milestone: None,
            founders: vec![founder_id],
            created_at: now,
            updated_at: now,
        }
    }
}
