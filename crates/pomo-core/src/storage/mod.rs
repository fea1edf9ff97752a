mod config;
pub mod database;

pub use config::{Config, StatsConfig, TaskConfig};
pub use database::Database;

use std::path::PathBuf;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::DatabaseError;
use crate::stats::{self, AllTimeStats, DailyStat, StreakStats};
use crate::timer::TaskType;

/// Durable log of completed intervals.
///
/// Implemented by [`Database`]; the engine runner only sees this trait, so it
/// can be driven against a fake in tests.
pub trait SessionStore {
    /// Insert one row. `duration` must be positive.
    fn create_session(
        &self,
        started_at: DateTime<Utc>,
        duration: Duration,
        task_type: TaskType,
    ) -> Result<(), DatabaseError>;

    /// Add `extra` to the most recently inserted row of `task_type`.
    ///
    /// # Errors
    /// [`DatabaseError::NotFound`] when no row of that type exists yet.
    fn extend_latest_session(
        &self,
        extra: Duration,
        task_type: TaskType,
    ) -> Result<(), DatabaseError>;

    fn all_time_stats(&self) -> Result<AllTimeStats, DatabaseError>;

    /// Work time per local calendar day, one entry for every day of the
    /// inclusive range.
    fn daily_stats(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyStat>, DatabaseError>;

    /// Local dates with at least one work session, most recent first.
    fn distinct_work_days(&self) -> Result<Vec<NaiveDate>, DatabaseError>;

    /// The seven days ending `today`.
    fn weekly_stats(&self, today: NaiveDate) -> Result<Vec<DailyStat>, DatabaseError> {
        let (from, to) = stats::weekly_window(today);
        self.daily_stats(from, to)
    }

    /// From the first day of the month `months` before `today`'s month
    /// through `today`.
    ///
    /// # Errors
    /// [`DatabaseError::InvalidData`] when `months` is above
    /// [`stats::MAX_HEATMAP_MONTHS`].
    fn last_months_stats(
        &self,
        today: NaiveDate,
        months: u32,
    ) -> Result<Vec<DailyStat>, DatabaseError> {
        let (from, to) = stats::months_window(today, months).ok_or_else(|| {
            DatabaseError::InvalidData(format!(
                "months window of {months} is out of range (max {})",
                stats::MAX_HEATMAP_MONTHS
            ))
        })?;
        self.daily_stats(from, to)
    }

    fn streak_stats(&self, today: NaiveDate) -> Result<StreakStats, DatabaseError> {
        Ok(stats::calculate_streak(&self.distinct_work_days()?, today))
    }
}

/// Returns `~/.config/pomo[-dev]/` based on POMO_ENV.
///
/// Set POMO_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMO_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomo-dev")
    } else {
        base_dir.join("pomo")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
