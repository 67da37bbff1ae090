//! Scope of engagement and its discussion thread

use crate::actor::Role;
use crate::ids::{ScopeId, StartupId, UserId};
use crate::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScopeStatus {
    Draft,
    InDiscussion,
    Accepted,
    Rejected,
}

status_names!(ScopeStatus, "scope status", {
    Draft => "DRAFT",
    InDiscussion => "IN_DISCUSSION",
    Accepted => "ACCEPTED",
    Rejected => "REJECTED",
});

impl ScopeStatus {
    /// Still under negotiation
    #[inline]
    #[must_use]
    pub fn is_negotiable(self) -> bool {
        matches!(self, ScopeStatus::Draft | ScopeStatus::InDiscussion)
    }
}

/// Append-only discussion entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Insertion sequence, breaks timestamp ties
    pub seq: u32,
    pub author_role: Role,
    pub author_id: UserId,
    pub text: String,
    pub created_at: Timestamp,
}

/// Negotiated work agreement. At most one live instance per startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeOfEngagement {
    pub id: ScopeId,
    pub startup_id: StartupId,
    /// 1 for the first draft; staff redrafts after a rejection increment it
    pub draft_number: u32,
    pub product_scope: String,
    pub gtm_scope: String,
    pub status: ScopeStatus,
    comments: Vec<Comment>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ScopeOfEngagement {
    #[must_use]
    pub fn draft(
        startup_id: StartupId,
        draft_number: u32,
        product_scope: impl Into<String>,
        gtm_scope: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: ScopeId::for_draft(startup_id, draft_number),
            startup_id,
            draft_number,
            product_scope: product_scope.into(),
            gtm_scope: gtm_scope.into(),
            status: ScopeStatus::Draft,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a comment and return it
    pub fn append_comment(
        &mut self,
        author_role: Role,
        author_id: UserId,
        text: impl Into<String>,
        now: Timestamp,
    ) -> &Comment {
        #[allow(clippy::cast_possible_truncation)]
        let seq = self.comments.len() as u32;
        self.comments.push(Comment {
            seq,
            author_role,
            author_id,
            text: text.into(),
            created_at: now,
        });
        self.updated_at = now;
        &self.comments[self.comments.len() - 1]
    }

    /// Comments in insertion order
    #[inline]
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Comments in display order: timestamp, then insertion sequence
    #[must_use]
    pub fn ordered_comments(&self) -> Vec<&Comment> {
        let mut ordered: Vec<&Comment> = self.comments.iter().collect();
        ordered.sort_by_key(|c| (c.created_at, c.seq));
        ordered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn comments_order_by_time_then_insertion() {
        let now = Utc::now();
        let startup = StartupId::for_submission(crate::SubmissionId::for_attempt(UserId::new(), 1));
        let mut scope = ScopeOfEngagement::draft(startup, 1, "mvp", "launch", now);
        let author = UserId::new();

        scope.append_comment(Role::Admin, author, "second", now + Duration::seconds(5));
        scope.append_comment(Role::Founder, author, "first", now);
        scope.append_comment(Role::Founder, author, "tie", now + Duration::seconds(5));

        let texts: Vec<&str> = scope.ordered_comments().iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "tie"]);
        assert_eq!(scope.comments()[0].text, "second");
    }
}
