//! # pomo Core Library
//!
//! Core logic for the pomo focus timer. The CLI binary is a thin loop over
//! this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a pure state machine; the caller feeds it ticks and
//!   key inputs and executes the effects it returns
//! - **Storage**: SQLite session log and TOML configuration
//! - **Stats**: totals, per-day history and streaks derived from the log
//! - **Runner**: executes engine effects, best effort
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Session lifecycle state machine
//! - [`SessionStore`] / [`Database`]: Session persistence and aggregate queries
//! - [`Config`]: Application configuration
//! - [`EffectRunner`]: Boundary between the engine and the outside world

pub mod error;
pub mod runner;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, StatsError};
pub use runner::{EffectRunner, NoPostActions, PostActions};
pub use stats::{AllTimeStats, DailyStat, StatsReport, StreakStats};
pub use storage::{Config, Database, SessionStore};
pub use timer::{
    ConfirmChoice, Effect, EngineOptions, Input, PersistCommand, RunSummary, Task, TaskType,
    TimerEngine, TimerState,
};
