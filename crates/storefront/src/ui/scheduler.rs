//! Schedulable tasks with explicit cancel handles.
//!
//! Timer callbacks are plain closures run on the Tokio runtime. Registration
//! returns a [`TaskHandle`]; teardown is an explicit [`TaskHandle::cancel`]
//! (or dropping the handle), never an implicit side effect.

use std::time::Duration;

use tokio::task::AbortHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Handle to a scheduled task. Dropping it cancels the task.
#[derive(Debug)]
pub struct TaskHandle {
    abort: AbortHandle,
}

impl TaskHandle {
    /// Stop the task. Idempotent.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    /// Whether the task has completed or been cancelled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

/// Run `task` every `period`, starting one full period from now.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_repeating<F>(period: Duration, mut task: F) -> TaskHandle
where
    F: FnMut() + Send + 'static,
{
    let handle = tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            task();
        }
    });

    TaskHandle {
        abort: handle.abort_handle(),
    }
}

/// Run `task` once after `delay`.
///
/// Must be called from within a Tokio runtime.
pub fn spawn_after<F>(delay: Duration, task: F) -> TaskHandle
where
    F: FnOnce() + Send + 'static,
{
    let handle = tokio::spawn(async move {
        time::sleep(delay).await;
        task();
    });

    TaskHandle {
        abort: handle.abort_handle(),
    }
}
