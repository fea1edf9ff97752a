//! Executes engine effects at the process boundary.
//!
//! Persistence is best effort: a failed write is logged and dropped, never
//! retried and never surfaced to the timer. Without a store the runner skips
//! every write, which is a normal way to run.

use crate::error::DatabaseError;
use crate::storage::SessionStore;
use crate::timer::{Effect, PersistCommand, Task, TaskType};

/// Post-completion actions for a finished task.
///
/// The runner calls this synchronously and waits for it to return before the
/// next input is handled. Whatever the hook does is opaque to the caller.
pub trait PostActions {
    fn run(&self, task_type: TaskType, task: &Task);
}

/// Hook that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPostActions;

impl PostActions for NoPostActions {
    fn run(&self, _task_type: TaskType, _task: &Task) {}
}

pub struct EffectRunner<'a> {
    store: Option<&'a dyn SessionStore>,
    post_actions: &'a dyn PostActions,
}

impl<'a> EffectRunner<'a> {
    pub fn new(store: Option<&'a dyn SessionStore>, post_actions: &'a dyn PostActions) -> Self {
        Self {
            store,
            post_actions,
        }
    }

    /// Execute `effects` in order. Returns true when one of them asks the
    /// process to quit.
    pub fn run(&self, effects: &[Effect]) -> bool {
        let mut quit = false;
        for effect in effects {
            match effect {
                Effect::Persist(command) => self.persist(command),
                Effect::RunPostActions { task_type, task } => {
                    self.post_actions.run(*task_type, task)
                }
                Effect::Quit => quit = true,
            }
        }
        quit
    }

    /// Issue one write, logging and swallowing any failure.
    pub fn persist(&self, command: &PersistCommand) {
        let Some(store) = self.store else {
            return;
        };
        if let Err(e) = apply(store, command) {
            tracing::warn!(error = %e, ?command, "failed to record session");
        }
    }
}

/// Issue the store calls for one command.
///
/// Extend-or-create tries the extend first and inserts only when no row of
/// that type exists, so repeated short sessions never produce duplicates.
pub fn apply<S: SessionStore + ?Sized>(
    store: &S,
    command: &PersistCommand,
) -> Result<(), DatabaseError> {
    match command {
        PersistCommand::Create {
            started_at,
            duration,
            task_type,
        } => store.create_session(*started_at, *duration, *task_type),
        PersistCommand::ExtendOrCreate {
            started_at,
            duration,
            task_type,
        } => match store.extend_latest_session(*duration, *task_type) {
            Err(e) if e.is_not_found() => {
                tracing::debug!(%task_type, "no session to extend, inserting instead");
                store.create_session(*started_at, *duration, *task_type)
            }
            other => other,
        },
    }
}
