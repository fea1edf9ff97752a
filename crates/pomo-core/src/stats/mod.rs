//! Statistics module for pomo
//!
//! Derives everything the stats view shows from the session store:
//! all-time totals, per-day work time over a date range, and consecutive-day
//! streaks. Nothing here is persisted.

mod daily;
mod report;
mod streak;

pub use daily::{
    months_window, normalize_daily, weekly_window, DEFAULT_HEATMAP_MONTHS, MAX_HEATMAP_MONTHS,
};
pub use report::{fetch_report, format_compact, today_work, StatsReport};
pub use streak::calculate_streak;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar day format used in queries and output.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllTimeStats {
    pub total_sessions: u64,
    #[serde(rename = "total_work_ms", with = "duration_ms")]
    pub total_work_duration: Duration,
    #[serde(rename = "total_break_ms", with = "duration_ms")]
    pub total_break_duration: Duration,
}

impl Default for AllTimeStats {
    fn default() -> Self {
        Self {
            total_sessions: 0,
            total_work_duration: Duration::zero(),
            total_break_duration: Duration::zero(),
        }
    }
}

/// Work time for one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: NaiveDate,
    #[serde(rename = "work_ms", with = "duration_ms")]
    pub work_duration: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakStats {
    pub current_streak: u32,
    pub best_streak: u32,
}

/// Durations travel as integer milliseconds.
mod duration_ms {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(d.num_milliseconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        i64::deserialize(d).map(Duration::milliseconds)
    }
}
