use crate::ids::SubmissionId;
use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// Staff's recommendation recorded on an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approve,
    Reject,
    Defer,
}

status_names!(Decision, "decision", {
    Approve => "APPROVE",
    Reject => "REJECT",
    Defer => "DEFER",
});

/// One structured analysis section (market, team, product, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSection {
    pub title: String,
    pub findings: String,
    /// Section score, 0-100
    pub score: Option<u8>,
}

/// Staff assessment of a submission. At most one per submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub submission_id: SubmissionId,
    pub sections: Vec<AnalysisSection>,
    /// Overall score, 0-100
    pub overall_score: Option<u8>,
    pub final_decision: Option<Decision>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Evaluation {
    #[must_use]
    pub fn new(submission_id: SubmissionId, now: Timestamp) -> Self {
        Self {
            submission_id,
            sections: Vec::new(),
            overall_score: None,
            final_decision: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mean of the scored sections, used when no overall score was given
    #[must_use]
    pub fn section_average(&self) -> Option<u8> {
        let scores: Vec<u32> = self
            .sections
            .iter()
            .filter_map(|s| s.score.map(u32::from))
            .collect();
        if scores.is_empty() {
            return None;
        }
        let total: u32 = scores.iter().sum();
        #[allow(clippy::cast_possible_truncation)]
        let mean = (total / scores.len() as u32) as u8;
        Some(mean)
    }
}
