//! Consecutive-day learning streak. Days are compared as UTC calendar
//! dates regardless of where the learner or tenant is located; see
//! DESIGN.md for the timezone decision.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub streak: u32,
    pub last_learning_date: Option<NaiveDate>,
    /// False when today's activity was already counted.
    pub changed: bool,
}

/// Fold one day of learning activity into the streak counter.
///
/// Same day: no-op. Yesterday: streak + 1. Any larger gap, or no prior
/// activity at all, restarts at 1 ("first day" semantics).
pub fn record_activity(
    streak: u32,
    last_learning_date: Option<NaiveDate>,
    today: NaiveDate,
) -> StreakUpdate {
    match last_learning_date {
        Some(last) if last == today => StreakUpdate {
            streak,
            last_learning_date: Some(last),
            changed: false,
        },
        Some(last) if last.succ_opt() == Some(today) => StreakUpdate {
            streak: streak + 1,
            last_learning_date: Some(today),
            changed: true,
        },
        _ => StreakUpdate {
            streak: 1,
            last_learning_date: Some(today),
            changed: true,
        },
    }
}
