use crate::ids::{SubmissionId, UserId};
use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// Submission status
///
/// `PENDING` and `IN_REVIEW` are open; a founder holds at most one open
/// submission. `REJECTED` is terminal until the reapplication cooldown ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    NotStarted,
    Pending,
    InReview,
    Approved,
    Rejected,
}

status_names!(SubmissionStatus, "submission status", {
    NotStarted => "NOT_STARTED",
    Pending => "PENDING",
    InReview => "IN_REVIEW",
    Approved => "APPROVED",
    Rejected => "REJECTED",
});

impl SubmissionStatus {
    #[inline]
    #[must_use]
    pub fn is_open(self) -> bool {
        matches!(self, SubmissionStatus::Pending | SubmissionStatus::InReview)
    }
}

/// One question/answer pair collected by the submission chat or form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub answer: String,
}

/// A founder's application attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: SubmissionId,
    pub founder_id: UserId,
    /// 1-based attempt counter for this founder
    pub attempt: u32,
    pub startup_name: String,
    /// Free-text answers, in the order first answered
    pub answers: Vec<Answer>,
    pub status: SubmissionStatus,
    /// Set once, when the submission first enters review
    pub submitted_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl Submission {
    /// Open a new `PENDING` submission
    #[must_use]
    pub fn open(
        founder_id: UserId,
        attempt: u32,
        startup_name: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: SubmissionId::for_attempt(founder_id, attempt),
            founder_id,
            attempt,
            startup_name: startup_name.into(),
            answers: Vec::new(),
            status: SubmissionStatus::Pending,
            submitted_at: None,
            created_at: now,
        }
    }

    /// Record an answer; answering the same question again replaces it in place.
    pub fn upsert_answer(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        let question = question.into();
        let answer = answer.into();
        match self.answers.iter_mut().find(|a| a.question == question) {
            Some(existing) => existing.answer = answer,
            None => self.answers.push(Answer { question, answer }),
        }
    }

    #[inline]
    #[must_use]
    pub fn answer(&self, question: &str) -> Option<&str> {
        self.answers
            .iter()
            .find(|a| a.question == question)
            .map(|a| a.answer.as_str())
    }
}
