use serde::{Deserialize, Serialize};

use super::domain::Stage;
use super::evaluation::EvaluationError;
use super::inputs::StageInputs;

/// Inputs for a whole application, used to replay an applicant through every stage.
///
/// A stage with no inputs stops the replay at that stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicantScript {
    #[serde(default)]
    pub documents_verified: Option<bool>,
    #[serde(default)]
    pub marks_second_year: Option<f64>,
    #[serde(default)]
    pub marks_admission_test: Option<f64>,
    #[serde(default)]
    pub activity_count: Option<u32>,
    #[serde(default)]
    pub interview_percentage: Option<f64>,
}

impl ApplicantScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(mut self, verified: bool) -> Self {
        self.documents_verified = Some(verified);
        self
    }

    pub fn academic(mut self, marks_second_year: f64, marks_admission_test: f64) -> Self {
        self.marks_second_year = Some(marks_second_year);
        self.marks_admission_test = Some(marks_admission_test);
        self
    }

    pub fn activities(mut self, activity_count: u32) -> Self {
        self.activity_count = Some(activity_count);
        self
    }

    pub fn interview(mut self, interview_percentage: f64) -> Self {
        self.interview_percentage = Some(interview_percentage);
        self
    }

    /// Inputs for `stage`, `None` when the script has nothing for it.
    ///
    /// Academic marks come as a pair; supplying only one of them is an input error.
    pub fn inputs_for(&self, stage: Stage) -> Result<Option<StageInputs>, EvaluationError> {
        let inputs = match stage {
            Stage::Docs => self
                .documents_verified
                .map(|documents_verified| StageInputs::Docs { documents_verified }),
            Stage::Academic => match (self.marks_second_year, self.marks_admission_test) {
                (Some(marks_second_year), Some(marks_admission_test)) => {
                    Some(StageInputs::Academic {
                        marks_second_year,
                        marks_admission_test,
                    })
                }
                (None, None) => None,
                (None, Some(_)) => {
                    return Err(EvaluationError::invalid_input(
                        "marks_second_year",
                        "value is required alongside marks_admission_test",
                    ))
                }
                (Some(_), None) => {
                    return Err(EvaluationError::invalid_input(
                        "marks_admission_test",
                        "value is required alongside marks_second_year",
                    ))
                }
            },
            Stage::Activities => self
                .activity_count
                .map(|activity_count| StageInputs::Activities { activity_count }),
            Stage::Interview => self
                .interview_percentage
                .map(|interview_percentage| StageInputs::Interview {
                    interview_percentage,
                }),
            Stage::Accepted | Stage::Rejected => None,
        };

        Ok(inputs)
    }
}
