use std::time::Duration;

use tracing::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

use crate::host::Scheduler;

/// [`Scheduler`] over `window.setTimeout`.
pub struct TimeoutScheduler {
    window: Window,
}

impl TimeoutScheduler {
    #[must_use]
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let timeout_ms = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let callback = Closure::once_into_js(move || task());
        if let Err(err) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                timeout_ms,
            )
        {
            warn!(error = ?err, timeout_ms, "setTimeout failed");
        }
    }
}
