use serde::{Deserialize, Serialize};
use std::fmt;

use super::evaluation::AdmissionDecision;

/// Node of the admission decision process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Docs,
    Academic,
    Activities,
    Interview,
    Accepted,
    Rejected,
}

impl Stage {
    /// Stage every new application starts in.
    pub const INITIAL: Self = Self::Docs;

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Docs => "S1",
            Self::Academic => "S2",
            Self::Activities => "S3",
            Self::Interview => "S4",
            Self::Accepted => "S5",
            Self::Rejected => "S6",
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Docs => "DOCS",
            Self::Academic => "ACADEMIC",
            Self::Activities => "ACTIVITIES",
            Self::Interview => "INTERVIEW",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Docs => "Documentation Submission & Verification",
            Self::Academic => "Academic Evaluation (Percentage Based)",
            Self::Activities => "Extracurricular Activities Check",
            Self::Interview => "Interview Evaluation (Percentage)",
            Self::Accepted => "Accepted / Accepted with Scholarship",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scholarship discount, in percentage points, carried across stages.
///
/// Academic evaluation assigns 0, 10, 20 or 30; the activities bonus moves it in steps of
/// five and never past the configured cap.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ScholarshipTier(u8);

impl ScholarshipTier {
    pub const NONE: Self = Self(0);

    pub const fn new(percent: u8) -> Self {
        Self(percent)
    }

    pub const fn percent(self) -> u8 {
        self.0
    }

    pub const fn is_awarded(self) -> bool {
        self.0 > 0
    }

    pub(crate) fn boosted(self, points: u32, cap: ScholarshipTier) -> Self {
        let raised = u32::from(self.0)
            .saturating_add(points)
            .min(u32::from(cap.0));
        // bounded by the cap, which is itself a u8
        Self(raised as u8)
    }
}

impl fmt::Display for ScholarshipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// One completed stage attempt. Appended to a session history and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionResult {
    pub from_stage: Stage,
    pub next_stage: Stage,
    pub outcome: String,
    pub condition: String,
    pub stage_score: f64,
    /// Final disposition, present only when `next_stage` is terminal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<AdmissionDecision>,
}

impl TransitionResult {
    pub fn is_terminal(&self) -> bool {
        self.next_stage.is_terminal()
    }
}
