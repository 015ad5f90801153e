use super::super::domain::{ScholarshipTier, Stage, TransitionResult};
use super::config::AdmissionThresholds;

/// Recorded score for a stage that completes without producing a percentage.
pub(crate) const COMPLETED_STAGE_SCORE: f64 = 100.0;

/// Half-up rounding; `f64::round` rounds negative halves away from zero.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Combined academic percentage, rounded to a whole number. Scaling before dividing keeps
/// exact halves such as 678/1200 at .5.
pub(crate) fn academic_percentage(
    marks_second_year: f64,
    marks_admission_test: f64,
    thresholds: &AdmissionThresholds,
) -> f64 {
    let total_marks = marks_second_year + marks_admission_test;
    round_half_up(total_marks * 100.0 / thresholds.total_max_marks())
}

/// Highest tier whose threshold the score reaches.
pub(crate) fn tier_for_score(score: f64, thresholds: &AdmissionThresholds) -> ScholarshipTier {
    thresholds
        .scholarship_tiers
        .iter()
        .filter(|threshold| score >= threshold.minimum_score)
        .map(|threshold| threshold.tier)
        .max()
        .unwrap_or(ScholarshipTier::NONE)
}

/// Points added per selected activity; only a tier that is already awarded is boosted.
pub(crate) fn activity_bonus(
    tier: ScholarshipTier,
    activity_count: u32,
    thresholds: &AdmissionThresholds,
) -> ScholarshipTier {
    if !tier.is_awarded() || activity_count == 0 {
        return tier;
    }

    let points = activity_count.saturating_mul(thresholds.activity_bonus_points);
    tier.boosted(points, thresholds.scholarship_cap)
}

/// Academic percentage recorded earlier in the session, or 0 when the stage never ran.
pub(crate) fn recorded_academic_percentage(history: &[TransitionResult]) -> f64 {
    history
        .iter()
        .find(|entry| entry.from_stage == Stage::Academic)
        .map(|entry| entry.stage_score)
        .unwrap_or(0.0)
}
