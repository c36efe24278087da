use crate::types::StreakState;
use chrono::{Duration as ChronoDuration, NaiveDate};

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Rolls the daily study streak forward to `today`.
///
/// A second session on the same day keeps the count, a session the day after
/// the last visit extends it, and any longer gap (or no history) restarts at 1.
pub fn advance_streak(state: &StreakState, today: NaiveDate) -> StreakState {
    let last_visit = state
        .last_visit
        .as_deref()
        .and_then(|value| NaiveDate::parse_from_str(value.trim(), DAY_FORMAT).ok());

    let count = match last_visit {
        Some(day) if day == today => state.count,
        Some(day) if day + ChronoDuration::days(1) == today => state.count.saturating_add(1),
        _ => 1,
    };

    StreakState {
        count,
        last_visit: Some(today.format(DAY_FORMAT).to_string()),
    }
}
