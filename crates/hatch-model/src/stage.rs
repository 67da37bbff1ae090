//! Startup stage and its rank
//!
//! Stages form a fixed path:
//! `EVALUATION → SCOPING → CONTRACT → IDEA → MVP → SEED → SERIES_A → GROWTH`.
//! The first three are onboarding stages; the rest are operating stages.
//! Engine-driven transitions may only raise the rank.

use crate::ModelError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Stage {
    Evaluation,
    Scoping,
    Contract,
    Idea,
    Mvp,
    Seed,
    SeriesA,
    Growth,
    /// A stored value this build does not know. Has no rank.
    Unrecognized,
}

impl Stage {
    /// Every ranked stage, in order
    pub const ORDERED: [Stage; 8] = [
        Stage::Evaluation,
        Stage::Scoping,
        Stage::Contract,
        Stage::Idea,
        Stage::Mvp,
        Stage::Seed,
        Stage::SeriesA,
        Stage::Growth,
    ];

    /// Position on the stage path, `None` for [`Stage::Unrecognized`]
    #[inline]
    #[must_use]
    pub fn rank(self) -> Option<u8> {
        match self {
            Stage::Evaluation => Some(0),
            Stage::Scoping => Some(1),
            Stage::Contract => Some(2),
            Stage::Idea => Some(3),
            Stage::Mvp => Some(4),
            Stage::Seed => Some(5),
            Stage::SeriesA => Some(6),
            Stage::Growth => Some(7),
            Stage::Unrecognized => None,
        }
    }

    /// Stage the startup enters when activated
    pub const FIRST_OPERATING: Stage = Stage::Idea;

    #[inline]
    #[must_use]
    pub fn is_operating(self) -> bool {
        self.rank()
            .zip(Stage::FIRST_OPERATING.rank())
            .is_some_and(|(rank, first)| rank >= first)
    }

    #[inline]
    #[must_use]
    pub fn is_onboarding(self) -> bool {
        self.rank()
            .zip(Stage::FIRST_OPERATING.rank())
            .is_some_and(|(rank, first)| rank < first)
    }

    /// True when moving from `self` to `to` would not lower the rank.
    ///
    /// Unrecognized stages are never ordered against anything.
    #[inline]
    #[must_use]
    pub fn can_advance_to(self, to: Stage) -> bool {
        match (self.rank(), to.rank()) {
            (Some(from), Some(to)) => to >= from,
            _ => false,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Evaluation => "EVALUATION",
            Stage::Scoping => "SCOPING",
            Stage::Contract => "CONTRACT",
            Stage::Idea => "IDEA",
            Stage::Mvp => "MVP",
            Stage::Seed => "SEED",
            Stage::SeriesA => "SERIES_A",
            Stage::Growth => "GROWTH",
            Stage::Unrecognized => "UNRECOGNIZED",
        }
    }

    fn parse(value: &str) -> Option<Stage> {
        Stage::ORDERED
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(value))
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lenient: unknown labels become [`Stage::Unrecognized`] so stored data
/// from newer builds never fails to load.
impl From<String> for Stage {
    fn from(value: String) -> Self {
        Stage::parse(&value).unwrap_or(Stage::Unrecognized)
    }
}

impl From<Stage> for String {
    fn from(stage: Stage) -> Self {
        stage.as_str().to_string()
    }
}

/// Strict: used for operator input where a typo should be an error.
impl std::str::FromStr for Stage {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::parse(s).ok_or_else(|| ModelError::unknown("stage", s))
    }
}
