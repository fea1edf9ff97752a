//! Per-run counters, kept in memory for the end-of-run report.

use std::fmt;

use chrono::Duration;

use super::task::TaskType;
use crate::stats::format_compact;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSummary {
    /// Full intervals recorded.
    pub sessions: u32,
    /// Everything recorded, short sessions included.
    pub elapsed: Duration,
}

impl Default for TypeSummary {
    fn default() -> Self {
        Self {
            sessions: 0,
            elapsed: Duration::zero(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    work: TypeSummary,
    break_: TypeSummary,
}

impl RunSummary {
    pub fn get(&self, task_type: TaskType) -> TypeSummary {
        match task_type {
            TaskType::Work => self.work,
            TaskType::Break => self.break_,
        }
    }

    /// Count one full interval.
    pub fn add_session(&mut self, task_type: TaskType, elapsed: Duration) {
        let entry = self.entry(task_type);
        entry.sessions += 1;
        entry.elapsed = entry.elapsed + elapsed;
    }

    /// Add time without counting a new interval (short sessions).
    pub fn add_duration(&mut self, task_type: TaskType, elapsed: Duration) {
        let entry = self.entry(task_type);
        entry.elapsed = entry.elapsed + elapsed;
    }

    pub fn is_empty(&self) -> bool {
        self.work.elapsed.is_zero() && self.break_.elapsed.is_zero()
    }

    fn entry(&mut self, task_type: TaskType) -> &mut TypeSummary {
        match task_type {
            TaskType::Work => &mut self.work,
            TaskType::Break => &mut self.break_,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, task_type) in [TaskType::Work, TaskType::Break].into_iter().enumerate() {
            let s = self.get(task_type);
            if i > 0 {
                writeln!(f)?;
            }
            let noun = if s.sessions == 1 { "session" } else { "sessions" };
            write!(
                f,
                "{task_type}: {} {noun}, {}",
                s.sessions,
                format_compact(s.elapsed)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_and_durations_are_tracked_per_type() {
        let mut s = RunSummary::default();
        assert!(s.is_empty());

        s.add_session(TaskType::Work, Duration::minutes(25));
        s.add_duration(TaskType::Work, Duration::minutes(2));
        s.add_session(TaskType::Break, Duration::minutes(5));

        assert_eq!(s.get(TaskType::Work).sessions, 1);
        assert_eq!(s.get(TaskType::Work).elapsed, Duration::minutes(27));
        assert_eq!(s.get(TaskType::Break).sessions, 1);
        assert!(!s.is_empty());
    }

    #[test]
    fn display_lists_both_types() {
        let mut s = RunSummary::default();
        s.add_session(TaskType::Work, Duration::minutes(90));
        assert_eq!(s.to_string(), "work: 1 session, 1h30m\nbreak: 0 sessions, 0m");
    }
}
