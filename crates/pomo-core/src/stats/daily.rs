use std::collections::HashMap;

use chrono::{Datelike, Duration, Months, NaiveDate};

use super::DailyStat;

/// Whole months before the current one shown by the heat map.
pub const DEFAULT_HEATMAP_MONTHS: u32 = 3;

/// Upper bound for the months window, ten years of history.
pub const MAX_HEATMAP_MONTHS: u32 = 120;

/// Inclusive seven-day window ending `today`.
pub fn weekly_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(6), today)
}

/// Inclusive window from the first day of the month `months` before
/// `today`'s month through `today`.
///
/// Returns `None` when `months` exceeds [`MAX_HEATMAP_MONTHS`] or the start
/// falls outside the calendar.
pub fn months_window(today: NaiveDate, months: u32) -> Option<(NaiveDate, NaiveDate)> {
    if months > MAX_HEATMAP_MONTHS {
        return None;
    }
    let first_of_month = today - Duration::days(i64::from(today.day0()));
    let from = first_of_month.checked_sub_months(Months::new(months))?;
    Some((from, today))
}

/// One entry per day of `[from, to]`, ascending; days missing from `raw`
/// get zero work time. An inverted range yields no entries.
pub fn normalize_daily(from: NaiveDate, to: NaiveDate, raw: &[DailyStat]) -> Vec<DailyStat> {
    let by_day: HashMap<NaiveDate, Duration> =
        raw.iter().map(|s| (s.date, s.work_duration)).collect();

    from.iter_days()
        .take_while(|day| *day <= to)
        .map(|date| DailyStat {
            date,
            work_duration: by_day.get(&date).copied().unwrap_or_else(Duration::zero),
        })
        .collect()
}
