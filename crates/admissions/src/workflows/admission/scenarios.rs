//! Canned applicants that exercise every disposition of the admission process.

use std::sync::Arc;

use serde::Serialize;

use super::domain::{ScholarshipTier, Stage};
use super::evaluation::{ActivitiesPolicy, AdmissionDecision, DecisionEngine, EvaluationConfig};
use super::script::ApplicantScript;
use super::session::AdmissionSession;

/// Disposition a scenario is expected to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedDisposition {
    ScholarshipAcceptance,
    RegularAcceptance,
    /// Any acceptance, with or without a scholarship.
    Accepted,
    Rejected,
}

impl ExpectedDisposition {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ScholarshipAcceptance => "Accepted with Scholarship",
            Self::RegularAcceptance => "Accepted Regular",
            Self::Accepted => "Accepted",
            Self::Rejected => "Rejected",
        }
    }

    fn matches(self, decision: Option<&AdmissionDecision>) -> bool {
        match (self, decision) {
            (Self::ScholarshipAcceptance, Some(AdmissionDecision::ScholarshipAwarded { .. })) => {
                true
            }
            (
                Self::RegularAcceptance,
                Some(AdmissionDecision::Regular | AdmissionDecision::ScholarshipRevoked),
            ) => true,
            (Self::Accepted, Some(decision)) => decision.is_accepted(),
            (Self::Rejected, Some(AdmissionDecision::Rejected { .. })) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScenarioCase {
    pub name: String,
    /// Overrides the suite's activities policy for this case.
    pub policy: Option<ActivitiesPolicy>,
    pub script: ApplicantScript,
    pub expected: ExpectedDisposition,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub name: String,
    pub policy: ActivitiesPolicy,
    pub path: Vec<Stage>,
    pub final_stage: Stage,
    pub final_outcome: String,
    pub scholarship_tier: ScholarshipTier,
    pub expected: ExpectedDisposition,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub results: Vec<ScenarioResult>,
    pub passed: bool,
}

impl ScenarioReport {
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioResult> {
        self.results.iter().filter(|result| !result.passed)
    }
}

pub fn standard_suite() -> Vec<ScenarioCase> {
    vec![
        ScenarioCase {
            name: "Scholarship T3 (90%+ Academics)".to_string(),
            policy: None,
            script: ApplicantScript::new()
                .documents(true)
                .academic(1000.0, 80.0)
                .activities(3)
                .interview(90.0),
            expected: ExpectedDisposition::ScholarshipAcceptance,
        },
        ScenarioCase {
            name: "Regular Acceptance (65% Academics)".to_string(),
            policy: None,
            script: ApplicantScript::new()
                .documents(true)
                .academic(700.0, 80.0)
                .activities(2)
                .interview(60.0),
            expected: ExpectedDisposition::RegularAcceptance,
        },
        ScenarioCase {
            name: "Scholarship Revoked (Weak Interview)".to_string(),
            policy: None,
            script: ApplicantScript::new()
                .documents(true)
                .academic(900.0, 80.0)
                .activities(3)
                .interview(60.0),
            expected: ExpectedDisposition::RegularAcceptance,
        },
        ScenarioCase {
            name: "Academic Rejection (50% Academics)".to_string(),
            policy: None,
            script: ApplicantScript::new()
                .documents(true)
                .academic(500.0, 100.0),
            expected: ExpectedDisposition::Rejected,
        },
        ScenarioCase {
            name: "Activity Rejection (Strict Policy)".to_string(),
            policy: Some(ActivitiesPolicy::Strict),
            script: ApplicantScript::new()
                .documents(true)
                .academic(750.0, 80.0)
                .activities(1),
            expected: ExpectedDisposition::Rejected,
        },
    ]
}

/// Run each case in a fresh session and compare the final disposition.
pub fn run_suite(config: &EvaluationConfig, cases: &[ScenarioCase]) -> ScenarioReport {
    let results: Vec<ScenarioResult> = cases
        .iter()
        .map(|case| run_case(config, case))
        .collect();
    let passed = results.iter().all(|result| result.passed);

    ScenarioReport { results, passed }
}

fn run_case(config: &EvaluationConfig, case: &ScenarioCase) -> ScenarioResult {
    let policy = case.policy.unwrap_or(config.activities_policy);
    let engine = DecisionEngine::new(config.clone().with_activities_policy(policy));
    let mut session = AdmissionSession::with_engine(Arc::new(engine));

    let error = session
        .run_script(&case.script)
        .err()
        .map(|err| err.to_string());

    let final_outcome = match session.decision() {
        Some(decision) => decision.summary(),
        None => format!("Incomplete (stopped at {})", session.current_stage()),
    };
    let passed = error.is_none() && case.expected.matches(session.decision());

    ScenarioResult {
        name: case.name.clone(),
        policy,
        path: session.path(),
        final_stage: session.current_stage(),
        final_outcome,
        scholarship_tier: session.scholarship_tier(),
        expected: case.expected,
        passed,
        error,
    }
}
