//! Consecutive-day work streaks.

use std::collections::HashSet;

use chrono::{Duration, NaiveDate};

use super::StreakStats;

/// Compute current and best streaks from the distinct local days that have
/// work, given most recent first.
///
/// The current streak is anchored at `today`, or at yesterday when today has
/// no work yet, and walks back one day at a time. The best streak is the
/// longest run of neighbouring entries exactly one day apart.
pub fn calculate_streak(days: &[NaiveDate], today: NaiveDate) -> StreakStats {
    if days.is_empty() {
        return StreakStats::default();
    }

    let present: HashSet<NaiveDate> = days.iter().copied().collect();
    let one_day = Duration::days(1);

    let mut current_streak = 0;
    let anchor = if present.contains(&today) {
        Some(today)
    } else {
        Some(today - one_day).filter(|yesterday| present.contains(yesterday))
    };
    if let Some(mut day) = anchor {
        while present.contains(&day) {
            current_streak += 1;
            day = day - one_day;
        }
    }

    let mut best_streak = 1;
    let mut run = 1;
    for pair in days.windows(2) {
        if pair[0] - pair[1] == one_day {
            run += 1;
            best_streak = best_streak.max(run);
        } else {
            run = 1;
        }
    }

    StreakStats {
        current_streak,
        best_streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn streak(days: &[NaiveDate], today: NaiveDate) -> (u32, u32) {
        let s = calculate_streak(days, today);
        (s.current_streak, s.best_streak)
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(streak(&[], day(2026, 2, 8)), (0, 0));
    }

    #[test]
    fn gap_breaks_current_streak() {
        let days = [day(2026, 2, 8), day(2026, 2, 7), day(2026, 2, 5)];
        assert_eq!(streak(&days, day(2026, 2, 8)), (2, 2));
    }

    #[test]
    fn no_consecutive_days() {
        let days = [day(2026, 2, 8), day(2026, 2, 6)];
        assert_eq!(streak(&days, day(2026, 2, 8)), (1, 1));
    }

    #[test]
    fn yesterday_keeps_current_streak_alive() {
        let days = [day(2026, 2, 7), day(2026, 2, 6), day(2026, 2, 5)];
        assert_eq!(streak(&days, day(2026, 2, 8)), (3, 3));
    }

    #[test]
    fn stale_days_have_no_current_streak() {
        let days = [day(2026, 2, 5), day(2026, 2, 4)];
        assert_eq!(streak(&days, day(2026, 2, 8)), (0, 2));
    }

    #[test]
    fn single_day() {
        assert_eq!(streak(&[day(2026, 2, 8)], day(2026, 2, 8)), (1, 1));
        assert_eq!(streak(&[day(2026, 2, 7)], day(2026, 2, 8)), (1, 1));
        assert_eq!(streak(&[day(2026, 2, 1)], day(2026, 2, 8)), (0, 1));
    }

    #[test]
    fn best_streak_from_older_run() {
        let days = [
            day(2026, 2, 8),
            day(2026, 1, 31),
            day(2026, 1, 30),
            day(2026, 1, 29),
            day(2026, 1, 28),
            day(2026, 1, 20),
        ];
        assert_eq!(streak(&days, day(2026, 2, 8)), (1, 4));
    }

    #[test]
    fn streak_crosses_month_boundary() {
        let days = [day(2026, 3, 1), day(2026, 2, 28), day(2026, 2, 27)];
        assert_eq!(streak(&days, day(2026, 3, 1)), (3, 3));
    }

    proptest! {
        #[test]
        fn current_never_exceeds_best(offsets in proptest::collection::btree_set(0i64..60, 1..30)) {
            let today = day(2026, 3, 1);
            // descending, distinct
            let days: Vec<NaiveDate> = offsets.iter().map(|o| today - Duration::days(*o)).collect();
            let s = calculate_streak(&days, today);

            prop_assert!(s.best_streak >= 1);
            prop_assert!(s.current_streak <= s.best_streak);
            prop_assert!(s.best_streak as usize <= days.len());
        }
    }
}
