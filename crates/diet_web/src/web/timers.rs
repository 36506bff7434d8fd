use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use diet_ui::error::{Result, UiError};
use diet_ui::schedule::{Scheduler, Task, TaskHandle};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::pending::{PendingTimers, StateCell, TimerState};

/// `setTimeout`/`clearTimeout` on the page's window. Callbacks are owned here
/// so a cleared timer frees its closure.
#[derive(Clone)]
pub struct WindowScheduler {
    window: web_sys::Window,
    pending: Rc<RefCell<PendingTimers<Closure<dyn FnMut()>>>>,
}

impl WindowScheduler {
    pub fn new(window: web_sys::Window) -> Self {
        Self {
            window,
            pending: Rc::default(),
        }
    }
}

impl Scheduler for WindowScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> Result<TaskHandle> {
        let state = StateCell::default();
        let slot = RefCell::new(Some(task));
        let callback_state = Rc::clone(&state);
        let callback = Closure::wrap(Box::new(move || {
            callback_state.set(TimerState::Running);
            let task = slot.borrow_mut().take();
            if let Some(task) = task {
                task();
            }
            callback_state.set(TimerState::Done);
        }) as Box<dyn FnMut()>);

        let ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let id = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                ms,
            )
            .map_err(|e| UiError::Js(format!("setTimeout: {e:?}")))?;
        self.pending.borrow_mut().insert(id, callback, state);
        Ok(TaskHandle::from_raw(id))
    }

    fn cancel(&self, handle: TaskHandle) {
        self.window.clear_timeout_with_handle(handle.raw());
        self.pending.borrow_mut().cancel(handle.raw());
    }
}
