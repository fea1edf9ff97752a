use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{AllTimeStats, DailyStat, StreakStats};
use crate::error::StatsError;
use crate::storage::SessionStore;

/// Everything the stats view draws, fetched in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsReport {
    pub all_time: AllTimeStats,
    pub weekly: Vec<DailyStat>,
    pub monthly: Vec<DailyStat>,
    pub streak: StreakStats,
}

/// Run every stats query against `store`.
///
/// # Errors
/// Stops at the first failing query and names it in the returned error.
pub fn fetch_report<S: SessionStore + ?Sized>(
    store: &S,
    today: NaiveDate,
    months: u32,
) -> Result<StatsReport, StatsError> {
    let all_time = store.all_time_stats().map_err(StatsError::AllTime)?;
    let weekly = store.weekly_stats(today).map_err(StatsError::Weekly)?;
    let monthly = store
        .last_months_stats(today, months)
        .map_err(StatsError::Monthly)?;
    let streak = store.streak_stats(today).map_err(StatsError::Streak)?;

    Ok(StatsReport {
        all_time,
        weekly,
        monthly,
        streak,
    })
}

/// Work time logged on `today`, zero when it is not in `stats`.
pub fn today_work(stats: &[DailyStat], today: NaiveDate) -> Duration {
    stats
        .iter()
        .find(|s| s.date == today)
        .map(|s| s.work_duration)
        .unwrap_or_else(Duration::zero)
}

/// Short human form: `0m`, `42s`, `25m`, `2h`, `1h30m`.
pub fn format_compact(d: Duration) -> String {
    if d <= Duration::zero() {
        return "0m".into();
    }

    if d < Duration::minutes(1) {
        return format!("{}s", d.num_seconds().max(1));
    }

    let hours = d.num_hours();
    let minutes = d.num_minutes() % 60;

    match (hours, minutes) {
        (0, _) => format!("{}m", d.num_minutes()),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h{m}m"),
    }
}
