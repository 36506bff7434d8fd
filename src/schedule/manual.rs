use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::{Scheduler, Task, TaskHandle};
use crate::error::Result;

struct Pending {
    due: Duration,
    handle: TaskHandle,
    task: Task,
}

#[derive(Default)]
struct State {
    now: Duration,
    next_id: i32,
    pending: Vec<Pending>,
}

/// Scheduler on a virtual clock that only moves when [`ManualScheduler::advance`]
/// is called.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<State>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Move the clock forward, running every task that falls due (including
    /// tasks scheduled by other tasks) in due-time order.
    pub fn advance(&self, by: Duration) {
        let target = self.now() + by;
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                let idx = state
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.handle.raw()))
                    .map(|(i, _)| i);
                idx.map(|i| {
                    let p = state.pending.remove(i);
                    state.now = p.due;
                    p.task
                })
            };
            match next {
                Some(task) => task(),
                None => break,
            }
        }
        self.state.borrow_mut().now = target;
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> Result<TaskHandle> {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let handle = TaskHandle::from_raw(state.next_id);
        let due = state.now + delay;
        state.pending.push(Pending { due, handle, task });
        Ok(handle)
    }

    fn cancel(&self, handle: TaskHandle) {
        self.state
            .borrow_mut()
            .pending
            .retain(|p| p.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn runs_due_tasks_in_order() {
        let s = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (ms, tag) in [(300u64, "b"), (100, "a"), (900, "c")] {
            let log = Rc::clone(&log);
            s.schedule(Duration::from_millis(ms), Box::new(move || log.borrow_mut().push(tag)))
                .unwrap();
        }

        s.advance(Duration::from_millis(500));
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert_eq!(s.pending(), 1);
        assert_eq!(s.now(), Duration::from_millis(500));
    }

    #[test]
    fn nested_tasks_fire_within_same_advance() {
        let s = ManualScheduler::new();
        let fired = Rc::new(Cell::new(false));
        {
            let s2 = s.clone();
            let fired = Rc::clone(&fired);
            s.schedule(
                Duration::from_secs(5),
                Box::new(move || {
                    let fired = Rc::clone(&fired);
                    s2.schedule(Duration::from_millis(300), Box::new(move || fired.set(true)))
                        .unwrap();
                }),
            )
            .unwrap();
        }

        s.advance(Duration::from_millis(5_299));
        assert!(!fired.get());
        s.advance(Duration::from_millis(1));
        assert!(fired.get());
    }

    #[test]
    fn cancelled_tasks_never_run() {
        let s = ManualScheduler::new();
        let fired = Rc::new(Cell::new(false));
        let f = Rc::clone(&fired);
        let h = s
            .schedule(Duration::from_secs(1), Box::new(move || f.set(true)))
            .unwrap();
        s.cancel(h);
        s.advance(Duration::from_secs(2));
        assert!(!fired.get());
    }
}
