use admissions::error::AppError;
use admissions::workflows::admission::{
    evaluate_batch, run_suite, standard_suite, ActivitiesPolicy, AdmissionSession,
    ApplicantScript, BatchImporter, BatchOutcome, EvaluationConfig, ScenarioReport,
    TransitionResult,
};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct EvaluateArgs {
    /// Mark the mandatory documents as verified (omit to fail the document check)
    #[arg(long)]
    pub(crate) documents_verified: bool,
    /// Second-year marks out of 1100
    #[arg(long)]
    pub(crate) marks_second_year: Option<f64>,
    /// Admission test marks out of 100
    #[arg(long)]
    pub(crate) marks_admission_test: Option<f64>,
    /// Number of extracurricular activities
    #[arg(long)]
    pub(crate) activity_count: Option<u32>,
    /// Interview score as a percentage
    #[arg(long)]
    pub(crate) interview_percentage: Option<f64>,
    /// Reject applicants below the minimum activity count
    #[arg(long)]
    pub(crate) strict_activities: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Run the suite with the strict activities policy for every case
    #[arg(long)]
    pub(crate) strict_activities: bool,
    /// Print the scenario report as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export with one applicant per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Reject applicants below the minimum activity count
    #[arg(long)]
    pub(crate) strict_activities: bool,
    /// Print outcomes as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

fn evaluation_config(strict_activities: bool) -> EvaluationConfig {
    let policy = if strict_activities {
        ActivitiesPolicy::Strict
    } else {
        ActivitiesPolicy::Lenient
    };
    EvaluationConfig::standard().with_activities_policy(policy)
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let config = evaluation_config(args.strict_activities);
    let script = ApplicantScript {
        documents_verified: Some(args.documents_verified),
        marks_second_year: args.marks_second_year,
        marks_admission_test: args.marks_admission_test,
        activity_count: args.activity_count,
        interview_percentage: args.interview_percentage,
    };

    let mut session = AdmissionSession::new(config);
    session.run_script(&script)?;

    println!(
        "Admission evaluation ({} activities policy)",
        session.config().activities_policy.label()
    );
    render_history(session.history());
    render_session_summary(&session);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let cases = if args.strict_activities {
        standard_suite()
            .into_iter()
            .map(|mut case| {
                case.policy = Some(ActivitiesPolicy::Strict);
                case
            })
            .collect()
    } else {
        standard_suite()
    };
    let report = run_suite(&EvaluationConfig::standard(), &cases);

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(err) => println!("Scenario report unavailable: {}", err),
        }
        return Ok(());
    }

    render_scenario_report(&report);
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let applicants = BatchImporter::from_path(&args.csv)?;
    let config = evaluation_config(args.strict_activities);
    let outcomes = evaluate_batch(&config, &applicants);

    if args.json {
        match serde_json::to_string_pretty(&outcomes) {
            Ok(json) => println!("{}", json),
            Err(err) => println!("Batch outcomes unavailable: {}", err),
        }
        return Ok(());
    }

    println!(
        "Batch evaluation of {} applicant(s) from {}",
        outcomes.len(),
        args.csv.display()
    );
    for outcome in &outcomes {
        println!("{}", batch_line(outcome));
    }
    Ok(())
}

fn render_history(history: &[TransitionResult]) {
    if history.is_empty() {
        println!("\nNo stages evaluated");
        return;
    }

    println!("\nStage history");
    for transition in history {
        println!(
            "- {} -> {} | {} | {} | score {}",
            transition.from_stage.label(),
            transition.next_stage.label(),
            transition.outcome,
            transition.condition,
            format_score(transition.stage_score)
        );
    }
}

fn render_session_summary(session: &AdmissionSession) {
    let summary = session.summary();

    println!("\nCurrent stage: {} ({})", summary.stage_label, summary.stage.code());
    match &summary.decision {
        Some(decision) => println!("Final decision: {}", decision),
        None => println!("Final decision: pending"),
    }
    println!("Scholarship tier: {}", summary.scholarship_tier);
    if let Some(academic) = summary.academic_percentage {
        println!("Academic percentage: {}%", format_score(academic));
    }
    if let Some(interview) = summary.interview_percentage {
        println!("Interview percentage: {}%", format_score(interview));
    }
}

fn render_scenario_report(report: &ScenarioReport) {
    println!("Admission scenario suite");
    for result in &report.results {
        let status = if result.passed { "PASS" } else { "FAIL" };
        let path = result
            .path
            .iter()
            .map(|stage| stage.name())
            .collect::<Vec<_>>()
            .join(" -> ");
        println!(
            "- [{}] {} ({} activities): {}",
            status,
            result.name,
            result.policy.label(),
            path
        );
        println!(
            "    outcome {} | tier {}",
            result.final_outcome, result.scholarship_tier
        );
        if let Some(error) = &result.error {
            println!("    error: {}", error);
        }
    }

    let failed = report.failures().count();
    if failed == 0 {
        println!("\nAll {} scenarios matched", report.results.len());
    } else {
        println!("\n{} of {} scenarios failed", failed, report.results.len());
    }
}

fn batch_line(outcome: &BatchOutcome) -> String {
    let mut line = format!(
        "- {}: {} | {} | tier {}",
        outcome.applicant,
        outcome.final_stage.label(),
        outcome.outcome,
        outcome.scholarship_tier
    );
    if let Some(error) = &outcome.error {
        line.push_str(&format!(" | input error: {}", error));
    }
    line
}

/// Whole scores print without decimals; fractional interview scores keep one place.
pub(crate) fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{:.0}", score)
    } else {
        format!("{:.1}", score)
    }
}
