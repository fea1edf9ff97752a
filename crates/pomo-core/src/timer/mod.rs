mod clock;
mod engine;
mod summary;
mod task;

pub use clock::{session_start_time, Countdown};
pub use engine::{
    ConfirmChoice, Effect, EngineOptions, Input, PersistCommand, Snapshot, TimerEngine,
    TimerState, MIN_RECORDED_MS,
};
pub use summary::{RunSummary, TypeSummary};
pub use task::{Task, TaskSet, TaskType, SHORT_SESSION_MIN};
