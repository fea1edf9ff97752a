//! Session lifecycle state machine.
//!
//! The engine is a plain value. Every input goes through [`TimerEngine::handle`]
//! together with the current time, and comes back as a list of [`Effect`]s for
//! the caller to execute. The engine itself never touches the database, the
//! clock or the terminal.
//!
//! ## State Transitions
//!
//! ```text
//! Running <-> Paused
//! Running/Paused -> (complete) -> ShowingConfirm | Quitting
//! ShowingConfirm -> Running | Quitting
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TaskType::Work, options);
//! // In a loop:
//! let effects = engine.handle(Input::Tick, Utc::now());
//! runner.run(&effects);
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::clock::{session_start_time, Countdown};
use super::summary::RunSummary;
use super::task::{Task, TaskSet, TaskType};

/// Intervals shorter than this are dropped instead of recorded.
pub const MIN_RECORDED_MS: i64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    Running,
    Paused,
    /// Interval finished; waiting for continue / short session / cancel.
    ShowingConfirm,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmChoice {
    /// Start the opposite task type.
    Confirm,
    /// Run a short retry of the task that just finished.
    ShortSession,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Tick,
    Pause,
    Reset,
    Skip,
    Quit,
    /// Add one minute to the running countdown.
    AddMinute,
    Choice(ConfirmChoice),
}

/// A write the runner should issue against the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistCommand {
    Create {
        started_at: DateTime<Utc>,
        duration: Duration,
        task_type: TaskType,
    },
    /// Extend the latest row of `task_type`; insert a new row when none exists.
    ExtendOrCreate {
        started_at: DateTime<Utc>,
        duration: Duration,
        task_type: TaskType,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Persist(PersistCommand),
    /// Run the configured post actions for a finished task and wait for them.
    RunPostActions { task_type: TaskType, task: Task },
    Quit,
}

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub tasks: TaskSet,
    /// Show the continue prompt after a completed interval instead of quitting.
    pub ask_to_continue: bool,
    /// Elapsed time added per tick.
    pub tick_interval: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            tasks: TaskSet::default(),
            ask_to_continue: true,
            tick_interval: Duration::seconds(1),
        }
    }
}

/// Serializable view of the engine for presentation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: TimerState,
    pub task_type: TaskType,
    pub title: String,
    pub short_session: bool,
    pub elapsed_ms: i64,
    pub remaining_ms: i64,
    pub total_ms: i64,
    pub percent: f64,
    /// Time spent at the confirm prompt, zero elsewhere.
    pub idle_ms: i64,
}

#[derive(Debug, Clone)]
pub struct TimerEngine {
    options: EngineOptions,
    state: TimerState,
    task_type: TaskType,
    task: Task,
    is_short_session: bool,
    countdown: Countdown,
    summary: RunSummary,
    confirm_since: Option<DateTime<Utc>>,
    idle: Duration,
}

impl TimerEngine {
    /// Create an engine already running the first task of `first` type.
    pub fn new(first: TaskType, options: EngineOptions) -> Self {
        let task = options.tasks.get(first).clone();
        Self {
            countdown: Countdown::new(task.duration),
            task,
            task_type: first,
            options,
            state: TimerState::Running,
            is_short_session: false,
            summary: RunSummary::default(),
            confirm_since: None,
            idle: Duration::zero(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn is_short_session(&self) -> bool {
        self.is_short_session
    }

    pub fn elapsed(&self) -> Duration {
        self.countdown.elapsed()
    }

    pub fn duration(&self) -> Duration {
        self.countdown.duration()
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn tick_interval(&self) -> Duration {
        self.options.tick_interval
    }

    /// Time spent at the confirm prompt as of the last tick.
    pub fn idle(&self) -> Duration {
        self.idle
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.state,
            task_type: self.task_type,
            title: self.task.title.clone(),
            short_session: self.is_short_session,
            elapsed_ms: self.countdown.elapsed().num_milliseconds(),
            remaining_ms: self.countdown.remaining().num_milliseconds(),
            total_ms: self.countdown.duration().num_milliseconds(),
            percent: self.countdown.percent(),
            idle_ms: self.idle.num_milliseconds(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Process one input to completion and return what must happen next.
    pub fn handle(&mut self, input: Input, now: DateTime<Utc>) -> Vec<Effect> {
        match self.state {
            TimerState::Quitting => Vec::new(),
            TimerState::ShowingConfirm => self.handle_confirm(input, now),
            TimerState::Running | TimerState::Paused => self.handle_timer(input, now),
        }
    }

    fn handle_timer(&mut self, input: Input, now: DateTime<Utc>) -> Vec<Effect> {
        match input {
            Input::Tick => self.tick(now),
            Input::Pause => {
                self.state = match self.state {
                    TimerState::Paused => TimerState::Running,
                    _ => TimerState::Paused,
                };
                tracing::debug!(state = ?self.state, elapsed_ms = self.elapsed().num_milliseconds(), "pause toggled");
                Vec::new()
            }
            Input::Reset => {
                // A paused timer stays paused at the full duration.
                self.countdown.restart(self.task.duration);
                Vec::new()
            }
            Input::AddMinute => {
                self.countdown.extend(Duration::minutes(1));
                Vec::new()
            }
            Input::Skip => {
                let effects = self.record_session(now);
                self.next_session();
                effects
            }
            Input::Quit => {
                let mut effects = self.record_session(now);
                effects.extend(self.quit());
                effects
            }
            Input::Choice(_) => Vec::new(),
        }
    }

    fn handle_confirm(&mut self, input: Input, now: DateTime<Utc>) -> Vec<Effect> {
        match input {
            Input::Tick => {
                if let Some(since) = self.confirm_since {
                    self.idle = (now - since).max(Duration::zero());
                }
                Vec::new()
            }
            Input::Choice(ConfirmChoice::Confirm) => {
                self.next_session();
                Vec::new()
            }
            Input::Choice(ConfirmChoice::ShortSession) => {
                self.short_session();
                Vec::new()
            }
            Input::Choice(ConfirmChoice::Cancel) => self.quit(),
            _ => Vec::new(),
        }
    }

    fn tick(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        if self.state == TimerState::Paused {
            return Vec::new();
        }
        self.countdown.advance(self.options.tick_interval);
        if self.countdown.is_complete() {
            return self.complete(now);
        }
        Vec::new()
    }

    fn complete(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        tracing::info!(task_type = %self.task_type, title = %self.task.title, "timer completed");

        let mut effects = self.record_session(now);
        effects.push(Effect::RunPostActions {
            task_type: self.task_type,
            task: self.task.clone(),
        });

        if self.options.ask_to_continue {
            self.state = TimerState::ShowingConfirm;
            self.confirm_since = Some(now);
            self.idle = Duration::zero();
        } else {
            effects.extend(self.quit());
        }
        effects
    }

    fn quit(&mut self) -> Vec<Effect> {
        self.state = TimerState::Quitting;
        vec![Effect::Quit]
    }

    /// Decide whether and how the current interval is recorded.
    fn record_session(&mut self, now: DateTime<Utc>) -> Vec<Effect> {
        let elapsed = self.countdown.elapsed();
        if elapsed < Duration::milliseconds(MIN_RECORDED_MS) {
            tracing::debug!(elapsed_ms = elapsed.num_milliseconds(), "interval too short to record");
            return Vec::new();
        }

        let started_at = session_start_time(now, elapsed);
        let task_type = self.task_type;

        let command = if self.is_short_session {
            // Short sessions add time without counting as a new interval.
            self.summary.add_duration(task_type, elapsed);
            PersistCommand::ExtendOrCreate {
                started_at,
                duration: elapsed,
                task_type,
            }
        } else {
            self.summary.add_session(task_type, elapsed);
            PersistCommand::Create {
                started_at,
                duration: elapsed,
                task_type,
            }
        };
        vec![Effect::Persist(command)]
    }

    fn next_session(&mut self) {
        let next = self.task_type.opposite();
        let task = self.options.tasks.get(next).clone();
        self.start_session(next, task, false);
    }

    fn short_session(&mut self) {
        let task = self.options.tasks.get(self.task_type).shortened();
        self.start_session(self.task_type, task, true);
    }

    fn start_session(&mut self, task_type: TaskType, task: Task, is_short_session: bool) {
        self.is_short_session = is_short_session;
        self.task_type = task_type;
        self.countdown.restart(task.duration);
        self.task = task;
        self.confirm_since = None;
        self.idle = Duration::zero();
        self.state = TimerState::Running;
        tracing::debug!(task_type = %task_type, short = is_short_session, "session started");
    }
}
