//! Badge evaluation: threshold rules checked against aggregated user
//! statistics. Awards are monotonic; evaluation returns only badges the
//! user does not already hold.

use crate::engine::types::{Badge, BadgeRequirementKind, LearnerSnapshot, UserStats};

/// Evaluate the whole catalog against a snapshot of the learner's stats
/// and return the ids of newly earned badges. Pure over the snapshot;
/// the caller persists the union of held and newly earned badges.
///
/// All four requirement types are handled uniformly, including those a
/// given deployment's catalog may not currently use.
pub fn evaluate(snapshot: &LearnerSnapshot, stats: &UserStats, catalog: &[Badge]) -> Vec<String> {
    catalog
        .iter()
        .filter(|badge| !snapshot.badges.iter().any(|held| held == &badge.id))
        .filter(|badge| statistic_for(badge.requirement_type, snapshot, stats) >= badge.requirement_value)
        .map(|badge| badge.id.clone())
        .collect()
}

fn statistic_for(
    kind: BadgeRequirementKind,
    snapshot: &LearnerSnapshot,
    stats: &UserStats,
) -> u64 {
    match kind {
        BadgeRequirementKind::CoursesCompleted => stats.completed_courses,
        BadgeRequirementKind::StreakDays => snapshot.streak as u64,
        BadgeRequirementKind::PointsEarned => snapshot.points,
        BadgeRequirementKind::PerfectScore => stats.perfect_scores,
    }
}
