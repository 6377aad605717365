//! One-shot result channels connecting a task to its observer.
//!
//! Every task added with [`crate::Scheduler::emplace`] gets a fresh channel:
//! the worker that runs the body fills the [`Promise`] half with the return
//! value (or the captured panic payload), and the caller observes it through
//! the [`TaskOutput`] half. `dispatch` reuses the same mechanism for its
//! completion latch, carrying `()`.

use std::any::Any;
use std::panic;
use std::sync::Arc;
use std::thread;

use parking_lot::{Condvar, Mutex};

use crate::error::{TaskError, TaskResult};

struct Slot<T> {
    value: Mutex<Option<thread::Result<T>>>,
    ready: Condvar,
}

/// Filling half of a result channel; owned by the task body wrapper.
pub(crate) struct Promise<T> {
    slot: Arc<Slot<T>>,
}

impl<T> Promise<T> {
    /// Publish the task's outcome and wake every blocked observer.
    pub(crate) fn complete(&self, result: thread::Result<T>) {
        let mut value = self.slot.value.lock();
        debug_assert!(value.is_none(), "result channel completed twice");
        *value = Some(result);
        self.slot.ready.notify_all();
    }
}

/// Observing half of a one-shot result channel.
///
/// Produced by [`crate::Scheduler::emplace`] (one per task) and by
/// [`crate::Scheduler::dispatch`] (completed when the dispatched topology
/// drains). May be consumed from any thread.
pub struct TaskOutput<T> {
    slot: Arc<Slot<T>>,
    task_id: usize,
}

impl<T> TaskOutput<T> {
    /// Whether the value (or panic) has been published yet. Never blocks.
    pub fn is_ready(&self) -> bool {
        self.slot.value.lock().is_some()
    }

    /// Block until the task completes and return its value.
    ///
    /// # Panics
    ///
    /// Re-raises the task's panic if the body panicked.
    pub fn get(self) -> T {
        match self.take() {
            Ok(value) => value,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Block until the task completes; a captured panic becomes
    /// [`TaskError::Panicked`] instead of unwinding the caller.
    pub fn wait(self) -> TaskResult<T> {
        let task_id = self.task_id;
        self.take().map_err(|payload| TaskError::Panicked {
            task_id,
            message: panic_message(payload.as_ref()),
        })
    }

    fn take(self) -> thread::Result<T> {
        let mut value = self.slot.value.lock();
        loop {
            if let Some(result) = value.take() {
                return result;
            }
            self.slot.ready.wait(&mut value);
        }
    }
}

/// Create a channel for the task at `task_id` in the current graph.
pub(crate) fn channel<T>(task_id: usize) -> (Promise<T>, TaskOutput<T>) {
    let slot = Arc::new(Slot {
        value: Mutex::new(None),
        ready: Condvar::new(),
    });
    (
        Promise {
            slot: Arc::clone(&slot),
        },
        TaskOutput { slot, task_id },
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
