use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Fixed length of a short session, independent of configuration.
pub const SHORT_SESSION_MIN: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Work,
    Break,
}

impl TaskType {
    /// Work after break, break after work.
    pub fn opposite(self) -> Self {
        match self {
            TaskType::Work => TaskType::Break,
            TaskType::Break => TaskType::Work,
        }
    }

    /// Value stored in the `sessions.type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Work => "work",
            TaskType::Break => "break",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "work" => Ok(TaskType::Work),
            "break" => Ok(TaskType::Break),
            other => Err(format!("unknown task type '{other}' (expected work or break)")),
        }
    }
}

/// One configured interval: what it is called and how long it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub title: String,
    pub duration: Duration,
}

impl Task {
    pub fn new(title: impl Into<String>, duration_min: u32) -> Self {
        Self {
            title: title.into(),
            duration: Duration::minutes(i64::from(duration_min)),
        }
    }

    /// The abbreviated retry of this task.
    pub fn shortened(&self) -> Self {
        Self {
            title: format!("short {}", self.title),
            duration: Duration::minutes(SHORT_SESSION_MIN),
        }
    }
}

/// The work and break definitions a run alternates between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSet {
    pub work: Task,
    pub break_: Task,
}

impl TaskSet {
    pub fn get(&self, task_type: TaskType) -> &Task {
        match task_type {
            TaskType::Work => &self.work,
            TaskType::Break => &self.break_,
        }
    }
}

impl Default for TaskSet {
    fn default() -> Self {
        Self {
            work: Task::new("work session", 25),
            break_: Task::new("break session", 5),
        }
    }
}
