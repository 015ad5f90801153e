use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::Stage;
use super::evaluation::EvaluationError;

/// Caller supplied values for a single stage. Each variant carries exactly the fields its
/// stage reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum StageInputs {
    Docs {
        documents_verified: bool,
    },
    Academic {
        marks_second_year: f64,
        marks_admission_test: f64,
    },
    Activities {
        activity_count: u32,
    },
    Interview {
        interview_percentage: f64,
    },
}

impl StageInputs {
    pub const fn stage(&self) -> Stage {
        match self {
            StageInputs::Docs { .. } => Stage::Docs,
            StageInputs::Academic { .. } => Stage::Academic,
            StageInputs::Activities { .. } => Stage::Activities,
            StageInputs::Interview { .. } => Stage::Interview,
        }
    }

    /// Rejects numbers the scoring rules cannot compare (NaN, infinities). Ranges are not
    /// checked.
    pub fn validate(&self) -> Result<(), EvaluationError> {
        match self {
            StageInputs::Docs { .. } | StageInputs::Activities { .. } => Ok(()),
            StageInputs::Academic {
                marks_second_year,
                marks_admission_test,
            } => {
                ensure_finite("marks_second_year", *marks_second_year)?;
                ensure_finite("marks_admission_test", *marks_admission_test)
            }
            StageInputs::Interview {
                interview_percentage,
            } => ensure_finite("interview_percentage", *interview_percentage),
        }
    }

    /// Builds inputs for `stage` from raw form fields.
    ///
    /// Booleans accept `on`, `true`, `yes` and `1`. Activities are either an explicit
    /// `activity_count` or the number of `activity_*` fields that are checked.
    pub fn from_fields(
        stage: Stage,
        fields: &BTreeMap<String, String>,
    ) -> Result<Self, EvaluationError> {
        match stage {
            Stage::Docs => Ok(StageInputs::Docs {
                documents_verified: fields
                    .get("documents_verified")
                    .map(|value| parse_flag("documents_verified", value))
                    .transpose()?
                    .unwrap_or(false),
            }),
            Stage::Academic => Ok(StageInputs::Academic {
                marks_second_year: required_number(fields, "marks_second_year")?,
                marks_admission_test: required_number(fields, "marks_admission_test")?,
            }),
            Stage::Activities => {
                let activity_count = match fields.get("activity_count") {
                    Some(raw) => raw.trim().parse::<u32>().map_err(|_| {
                        EvaluationError::invalid_input(
                            "activity_count",
                            format!("'{raw}' is not a whole number"),
                        )
                    })?,
                    None => count_checked_activities(fields),
                };
                Ok(StageInputs::Activities { activity_count })
            }
            Stage::Interview => Ok(StageInputs::Interview {
                interview_percentage: required_number(fields, "interview_percentage")?,
            }),
            Stage::Accepted | Stage::Rejected => {
                Err(EvaluationError::TerminalStageTransition { stage })
            }
        }
    }
}

fn ensure_finite(field: &'static str, value: f64) -> Result<(), EvaluationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EvaluationError::invalid_input(
            field,
            format!("{value} is not a finite number"),
        ))
    }
}

fn required_number(
    fields: &BTreeMap<String, String>,
    field: &'static str,
) -> Result<f64, EvaluationError> {
    let raw = fields
        .get(field)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| EvaluationError::invalid_input(field, "value is required"))?;

    let value = raw.parse::<f64>().map_err(|_| {
        EvaluationError::invalid_input(field, format!("'{raw}' is not a number"))
    })?;
    ensure_finite(field, value)?;
    Ok(value)
}

pub(crate) fn parse_flag(field: &'static str, raw: &str) -> Result<bool, EvaluationError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "y" | "1" => Ok(true),
        "off" | "false" | "no" | "n" | "0" | "" => Ok(false),
        other => Err(EvaluationError::invalid_input(
            field,
            format!("'{other}' is not a yes/no value"),
        )),
    }
}

fn count_checked_activities(fields: &BTreeMap<String, String>) -> u32 {
    let checked = fields
        .iter()
        .filter(|(key, _)| key.starts_with("activity_"))
        .filter(|(_, value)| matches!(value.trim(), "1" | "on" | "true"))
        .count();
    u32::try_from(checked).unwrap_or(u32::MAX)
}

/// Everything the applicant has supplied so far; later submissions overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicantData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marks_second_year: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marks_admission_test: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_percentage: Option<f64>,
}

impl ApplicantData {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn absorb(&mut self, inputs: &StageInputs) {
        match *inputs {
            StageInputs::Docs { documents_verified } => {
                self.documents_verified = Some(documents_verified);
            }
            StageInputs::Academic {
                marks_second_year,
                marks_admission_test,
            } => {
                self.marks_second_year = Some(marks_second_year);
                self.marks_admission_test = Some(marks_admission_test);
            }
            StageInputs::Activities { activity_count } => {
                self.activity_count = Some(activity_count);
            }
            StageInputs::Interview {
                interview_percentage,
            } => {
                self.interview_percentage = Some(interview_percentage);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn from_fields_counts_checked_activity_boxes() {
        let raw = fields(&[
            ("activity_sports", "1"),
            ("activity_volunteer", "on"),
            ("activity_certificate", "0"),
            ("notes", "1"),
        ]);

        let inputs = StageInputs::from_fields(Stage::Activities, &raw).expect("activities parse");

        assert_eq!(inputs, StageInputs::Activities { activity_count: 2 });
    }

    #[test]
    fn from_fields_reports_missing_marks() {
        let raw = fields(&[("marks_admission_test", "80")]);

        match StageInputs::from_fields(Stage::Academic, &raw) {
            Err(EvaluationError::InvalidInput { field, .. }) => {
                assert_eq!(field, "marks_second_year")
            }
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn from_fields_rejects_non_numeric_percentages() {
        let raw = fields(&[("interview_percentage", "great")]);

        assert!(matches!(
            StageInputs::from_fields(Stage::Interview, &raw),
            Err(EvaluationError::InvalidInput {
                field: "interview_percentage",
                ..
            })
        ));
    }

    #[test]
    fn from_fields_treats_unchecked_documents_as_unverified() {
        let inputs = StageInputs::from_fields(Stage::Docs, &BTreeMap::new()).expect("docs parse");
        assert_eq!(
            inputs,
            StageInputs::Docs {
                documents_verified: false
            }
        );
    }

    #[test]
    fn validate_flags_non_finite_marks() {
        let inputs = StageInputs::Academic {
            marks_second_year: f64::NAN,
            marks_admission_test: 80.0,
        };
        assert!(inputs.validate().is_err());
    }

    #[test]
    fn applicant_data_keeps_latest_values() {
        let mut data = ApplicantData::default();
        data.absorb(&StageInputs::Interview {
            interview_percentage: 40.0,
        });
        data.absorb(&StageInputs::Interview {
            interview_percentage: 72.5,
        });

        assert_eq!(data.interview_percentage, Some(72.5));
        assert!(data.marks_second_year.is_none());
    }

    #[test]
    fn stage_inputs_use_stage_tag_on_the_wire() {
        let payload = serde_json::json!({ "stage": "activities", "activity_count": 3 });
        let inputs: StageInputs = serde_json::from_value(payload).expect("tagged inputs");
        assert_eq!(inputs.stage(), Stage::Activities);
    }
}
