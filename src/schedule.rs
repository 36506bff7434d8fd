//! One-shot deferred tasks.
//!
//! Every delayed action on the page (button revert, toast dismissal, heading
//! decoration) goes through a [`Scheduler`] so it can be cancelled and, in
//! tests, driven by a virtual clock.

pub mod manual;

use std::time::Duration;

use crate::error::Result;

/// Identifies a scheduled task; pass it back to [`Scheduler::cancel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(i32);

impl TaskHandle {
    pub fn from_raw(id: i32) -> Self {
        Self(id)
    }

    pub fn raw(self) -> i32 {
        self.0
    }
}

pub type Task = Box<dyn FnOnce()>;

pub trait Scheduler: Clone + 'static {
    fn schedule(&self, delay: Duration, task: Task) -> Result<TaskHandle>;
    /// Cancelling a task that already ran is a no-op.
    fn cancel(&self, handle: TaskHandle);
}
