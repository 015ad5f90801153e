use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{ScholarshipTier, Stage};
use super::evaluation::{DecisionEngine, EvaluationConfig, EvaluationError};
use super::inputs::parse_flag;
use super::script::ApplicantScript;
use super::session::AdmissionSession;

#[derive(Debug)]
pub enum BatchImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Input { row: usize, source: EvaluationError },
}

impl std::fmt::Display for BatchImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchImportError::Io(err) => write!(f, "failed to read applicant batch: {}", err),
            BatchImportError::Csv(err) => write!(f, "invalid applicant CSV data: {}", err),
            BatchImportError::Input { row, source } => {
                write!(f, "applicant row {} is invalid: {}", row, source)
            }
        }
    }
}

impl std::error::Error for BatchImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchImportError::Io(err) => Some(err),
            BatchImportError::Csv(err) => Some(err),
            BatchImportError::Input { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for BatchImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BatchImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// One applicant read from a batch file.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedApplicant {
    pub applicant: String,
    pub script: ApplicantScript,
}

/// Where a batch applicant ended up.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub applicant: String,
    pub final_stage: Stage,
    pub outcome: String,
    pub scholarship_tier: ScholarshipTier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct BatchImporter;

impl BatchImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ImportedApplicant>, BatchImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Reads `applicant,documents_verified,marks_second_year,marks_admission_test,
    /// activity_count,interview_percentage` rows. Blank cells leave that stage unscripted.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ImportedApplicant>, BatchImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut applicants = Vec::new();

        for (index, record) in csv_reader.deserialize::<ApplicantRow>().enumerate() {
            let row = record?;
            // header is line 1
            let line = index + 2;
            let documents_verified = row
                .documents_verified
                .as_deref()
                .map(|raw| parse_flag("documents_verified", raw))
                .transpose()
                .map_err(|source| BatchImportError::Input { row: line, source })?;

            applicants.push(ImportedApplicant {
                applicant: row.applicant,
                script: ApplicantScript {
                    documents_verified,
                    marks_second_year: row.marks_second_year,
                    marks_admission_test: row.marks_admission_test,
                    activity_count: row.activity_count,
                    interview_percentage: row.interview_percentage,
                },
            });
        }

        Ok(applicants)
    }
}

/// Evaluate every applicant in its own session. Input problems are reported per applicant
/// instead of aborting the batch.
pub fn evaluate_batch(config: &EvaluationConfig, applicants: &[ImportedApplicant]) -> Vec<BatchOutcome> {
    let engine = Arc::new(DecisionEngine::new(config.clone()));

    applicants
        .iter()
        .map(|imported| {
            let mut session = AdmissionSession::with_engine(engine.clone());
            let error = session
                .run_script(&imported.script)
                .err()
                .map(|err| err.to_string());
            let outcome = match session.decision() {
                Some(decision) => decision.summary(),
                None => format!("Pending at {}", session.current_stage()),
            };

            BatchOutcome {
                applicant: imported.applicant.clone(),
                final_stage: session.current_stage(),
                outcome,
                scholarship_tier: session.scholarship_tier(),
                error,
            }
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct ApplicantRow {
    applicant: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    documents_verified: Option<String>,
    #[serde(default)]
    marks_second_year: Option<f64>,
    #[serde(default)]
    marks_admission_test: Option<f64>,
    #[serde(default)]
    activity_count: Option<u32>,
    #[serde(default)]
    interview_percentage: Option<f64>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
