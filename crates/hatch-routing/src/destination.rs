//! Screens the resolver can send an actor to

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Destination {
    Login,
    AdminHome,
    StartSubmission,
    SubmissionChat,
    PendingReview,
    RejectedSubmission,
    EvaluationTasks,
    ScopeReview,
    ContractSigning,
    FounderDashboard,
    /// Identity known, snapshot not fetched yet
    Loading,
}

impl Destination {
    pub const ALL: [Destination; 11] = [
        Destination::Login,
        Destination::AdminHome,
        Destination::StartSubmission,
        Destination::SubmissionChat,
        Destination::PendingReview,
        Destination::RejectedSubmission,
        Destination::EvaluationTasks,
        Destination::ScopeReview,
        Destination::ContractSigning,
        Destination::FounderDashboard,
        Destination::Loading,
    ];

    /// Canonical path
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Destination::Login => "/login",
            Destination::AdminHome => "/admin",
            Destination::StartSubmission => "/apply",
            Destination::SubmissionChat => "/apply/chat",
            Destination::PendingReview => "/apply/pending",
            Destination::RejectedSubmission => "/apply/rejected",
            Destination::EvaluationTasks => "/evaluation",
            Destination::ScopeReview => "/scope",
            Destination::ContractSigning => "/contract",
            Destination::FounderDashboard => "/dashboard",
            Destination::Loading => "/loading",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Destination::Login => "LOGIN",
            Destination::AdminHome => "ADMIN_HOME",
            Destination::StartSubmission => "START_SUBMISSION",
            Destination::SubmissionChat => "SUBMISSION_CHAT",
            Destination::PendingReview => "PENDING_REVIEW",
            Destination::RejectedSubmission => "REJECTED_SUBMISSION",
            Destination::EvaluationTasks => "EVALUATION_TASKS",
            Destination::ScopeReview => "SCOPE_REVIEW",
            Destination::ContractSigning => "CONTRACT_SIGNING",
            Destination::FounderDashboard => "FOUNDER_DASHBOARD",
            Destination::Loading => "LOADING",
        }
    }

    /// Sections that own a subtree of pages
    #[inline]
    #[must_use]
    pub fn owns_subtree(self) -> bool {
        matches!(self, Destination::AdminHome | Destination::FounderDashboard)
    }

    /// Classify a requested path.
    ///
    /// Exact matches win. The admin console and the founder dashboard own
    /// their subtrees (`/dashboard/fundraising` is the dashboard); every
    /// other destination is a single page. Query strings, fragments and a
    /// trailing slash are ignored.
    #[must_use]
    pub fn for_path(path: &str) -> Option<Destination> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        if let Some(exact) = Destination::ALL.into_iter().find(|d| d.path() == path) {
            return Some(exact);
        }
        Destination::ALL.into_iter().find(|d| {
            d.owns_subtree()
                && path
                    .strip_prefix(d.path())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
