//! SQLite-based session storage and statistics.
//!
//! One table, `sessions`, holds every recorded interval. Day grouping is done
//! by SQLite with the `'localtime'` modifier, so a session that crosses local
//! midnight counts towards the day it started on.

use std::path::Path;

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection};

use super::{data_dir, SessionStore};
use crate::error::DatabaseError;
use crate::stats::{normalize_daily, AllTimeStats, DailyStat, DATE_FORMAT};
use crate::timer::TaskType;

/// SQLite database for session storage.
///
/// Stores recorded intervals and answers the aggregate queries the
/// statistics view needs.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/pomo/pomo.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let path = data_dir()?.join("pomo.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        tracing::debug!(path = %path.display(), "session database opened");
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                started_at  TEXT NOT NULL,
                duration_ms INTEGER NOT NULL CHECK (duration_ms > 0),
                type        TEXT NOT NULL CHECK (type IN ('work', 'break'))
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_type ON sessions(type);
            CREATE INDEX IF NOT EXISTS idx_sessions_started_at ON sessions(started_at);",
        )?;
        Ok(())
    }
}

fn parse_day(raw: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| DatabaseError::InvalidData(format!("bad day '{raw}': {e}")))
}

impl SessionStore for Database {
    fn create_session(
        &self,
        started_at: DateTime<Utc>,
        duration: Duration,
        task_type: TaskType,
    ) -> Result<(), DatabaseError> {
        if duration <= Duration::zero() {
            return Err(DatabaseError::InvalidData(format!(
                "session duration must be positive, got {}ms",
                duration.num_milliseconds()
            )));
        }
        self.conn.execute(
            "INSERT INTO sessions (started_at, duration_ms, type) VALUES (?1, ?2, ?3)",
            params![
                started_at.to_rfc3339_opts(SecondsFormat::Millis, true),
                duration.num_milliseconds(),
                task_type.as_str(),
            ],
        )?;
        tracing::debug!(
            %task_type,
            started_at = %started_at,
            duration_ms = duration.num_milliseconds(),
            "session recorded"
        );
        Ok(())
    }

    fn extend_latest_session(
        &self,
        extra: Duration,
        task_type: TaskType,
    ) -> Result<(), DatabaseError> {
        // Latest by insertion order: a short retry can start before the
        // row it extends.
        let updated = self.conn.execute(
            "UPDATE sessions
             SET duration_ms = duration_ms + ?1
             WHERE id = (
                 SELECT id FROM sessions
                 WHERE type = ?2
                 ORDER BY id DESC
                 LIMIT 1
             )",
            params![extra.num_milliseconds(), task_type.as_str()],
        )?;
        if updated == 0 {
            return Err(DatabaseError::NotFound(task_type.as_str().to_string()));
        }
        tracing::debug!(%task_type, extra_ms = extra.num_milliseconds(), "session extended");
        Ok(())
    }

    fn all_time_stats(&self) -> Result<AllTimeStats, DatabaseError> {
        let (total_sessions, work_ms, break_ms) = self.conn.query_row(
            "SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN type = 'work' THEN duration_ms ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN type = 'break' THEN duration_ms ELSE 0 END), 0)
             FROM sessions",
            [],
            |row| {
                Ok((
                    row.get::<_, u64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            },
        )?;
        Ok(AllTimeStats {
            total_sessions,
            total_work_duration: Duration::milliseconds(work_ms),
            total_break_duration: Duration::milliseconds(break_ms),
        })
    }

    fn daily_stats(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyStat>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT
                date(started_at, 'localtime') AS day,
                COALESCE(SUM(CASE WHEN type = 'work' THEN duration_ms ELSE 0 END), 0)
             FROM sessions
             WHERE date(started_at, 'localtime') BETWEEN ?1 AND ?2
             GROUP BY day
             ORDER BY day",
        )?;
        let rows = stmt.query_map(
            params![
                from.format(DATE_FORMAT).to_string(),
                to.format(DATE_FORMAT).to_string()
            ],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
        )?;

        let mut raw = Vec::new();
        for row in rows {
            let (day, work_ms) = row?;
            raw.push(DailyStat {
                date: parse_day(&day)?,
                work_duration: Duration::milliseconds(work_ms),
            });
        }
        Ok(normalize_daily(from, to, &raw))
    }

    fn distinct_work_days(&self) -> Result<Vec<NaiveDate>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT date(started_at, 'localtime') AS day
             FROM sessions
             WHERE type = 'work'
             ORDER BY day DESC",
        )?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut days = Vec::new();
        for row in rows {
            days.push(parse_day(&row?)?);
        }
        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    /// Noon local time on the given day, as UTC.
    fn local_noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(y, m, d, 12, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_store_has_zero_totals() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.all_time_stats().unwrap(), AllTimeStats::default());
    }

    #[test]
    fn all_time_stats_partition_by_type() {
        let db = Database::open_in_memory().unwrap();
        let t = local_noon(2026, 2, 8);
        db.create_session(t, Duration::minutes(25), TaskType::Work).unwrap();
        db.create_session(t, Duration::minutes(5), TaskType::Break).unwrap();
        db.create_session(t, Duration::minutes(50), TaskType::Work).unwrap();

        let stats = db.all_time_stats().unwrap();
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.total_work_duration, Duration::minutes(75));
        assert_eq!(stats.total_break_duration, Duration::minutes(5));
    }

    #[test]
    fn create_rejects_non_positive_duration() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .create_session(Utc::now(), Duration::zero(), TaskType::Work)
            .unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidData(_)));
        assert_eq!(db.all_time_stats().unwrap().total_sessions, 0);
    }

    #[test]
    fn extend_latest_session_adds_duration() {
        let db = Database::open_in_memory().unwrap();
        db.create_session(local_noon(2026, 2, 13), Duration::hours(1), TaskType::Work)
            .unwrap();
        db.extend_latest_session(Duration::minutes(27), TaskType::Work)
            .unwrap();

        let stats = db.all_time_stats().unwrap();
        assert_eq!(stats.total_work_duration, Duration::hours(1) + Duration::minutes(27));
        assert_eq!(stats.total_sessions, 1);
    }

    #[test]
    fn extend_latest_session_no_rows() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .extend_latest_session(Duration::minutes(10), TaskType::Work)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn extend_ignores_other_type() {
        let db = Database::open_in_memory().unwrap();
        db.create_session(local_noon(2026, 2, 13), Duration::minutes(5), TaskType::Break)
            .unwrap();
        let err = db
            .extend_latest_session(Duration::minutes(2), TaskType::Work)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn extend_targets_latest_inserted_not_latest_started() {
        let db = Database::open_in_memory().unwrap();
        db.create_session(local_noon(2026, 2, 10), Duration::minutes(25), TaskType::Work)
            .unwrap();
        // inserted later, nominally started earlier
        db.create_session(local_noon(2026, 2, 9), Duration::minutes(30), TaskType::Work)
            .unwrap();
        db.extend_latest_session(Duration::minutes(2), TaskType::Work)
            .unwrap();

        let stats = db.daily_stats(day(2026, 2, 9), day(2026, 2, 10)).unwrap();
        assert_eq!(stats[0].work_duration, Duration::minutes(32));
        assert_eq!(stats[1].work_duration, Duration::minutes(25));
    }

    #[test]
    fn daily_stats_are_normalized() {
        let db = Database::open_in_memory().unwrap();
        db.create_session(local_noon(2026, 2, 3), Duration::minutes(25), TaskType::Work)
            .unwrap();
        db.create_session(local_noon(2026, 2, 3), Duration::minutes(5), TaskType::Break)
            .unwrap();
        db.create_session(local_noon(2026, 2, 5), Duration::minutes(40), TaskType::Work)
            .unwrap();
        // outside the range
        db.create_session(local_noon(2026, 1, 20), Duration::minutes(40), TaskType::Work)
            .unwrap();

        let stats = db.daily_stats(day(2026, 2, 1), day(2026, 2, 7)).unwrap();
        assert_eq!(stats.len(), 7);
        assert_eq!(stats[0].date, day(2026, 2, 1));
        assert_eq!(stats[6].date, day(2026, 2, 7));
        assert_eq!(stats[2].work_duration, Duration::minutes(25));
        assert_eq!(stats[3].work_duration, Duration::zero());
        assert_eq!(stats[4].work_duration, Duration::minutes(40));
    }

    #[test]
    fn distinct_work_days_descending() {
        let db = Database::open_in_memory().unwrap();
        for (d, task_type) in [
            (5, TaskType::Work),
            (8, TaskType::Work),
            (8, TaskType::Work),
            (7, TaskType::Work),
            (6, TaskType::Break),
        ] {
            db.create_session(local_noon(2026, 2, d), Duration::minutes(25), task_type)
                .unwrap();
        }
        assert_eq!(
            db.distinct_work_days().unwrap(),
            vec![day(2026, 2, 8), day(2026, 2, 7), day(2026, 2, 5)]
        );
    }

    #[test]
    fn open_at_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pomo.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.create_session(Utc::now(), Duration::minutes(25), TaskType::Work)
                .unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.all_time_stats().unwrap().total_sessions, 1);
    }
}
