//! Ownership of `setTimeout` callbacks.
//!
//! A callback handed to the browser has to stay alive until it fires or its
//! timer is cleared. `PendingTimers` keeps each one keyed by timer id and drops
//! it on `cancel`, or on the next `insert` once it has finished running.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    #[default]
    Waiting,
    Running,
    Done,
}

/// Shared between a stored callback and the timer table.
pub type StateCell = Rc<Cell<TimerState>>;

struct Entry<C> {
    _callback: C,
    state: StateCell,
}

pub struct PendingTimers<C> {
    entries: HashMap<i32, Entry<C>>,
}

impl<C> Default for PendingTimers<C> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<C> PendingTimers<C> {
    /// Keep `callback` alive for timer `id`. Callbacks that already ran are
    /// released first.
    pub fn insert(&mut self, id: i32, callback: C, state: StateCell) {
        self.sweep();
        self.entries.insert(
            id,
            Entry {
                _callback: callback,
                state,
            },
        );
    }

    /// Drop the callback of a timer that has not started. A running callback
    /// is left for the next sweep; freeing it mid-call is not allowed.
    pub fn cancel(&mut self, id: i32) -> bool {
        match self.entries.get(&id) {
            Some(entry) if entry.state.get() == TimerState::Waiting => {
                self.entries.remove(&id);
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sweep(&mut self) {
        self.entries.retain(|_, e| e.state.get() != TimerState::Done);
    }
}
