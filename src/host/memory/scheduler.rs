use std::cell::RefCell;
use std::time::Duration;

use crate::host::Scheduler;

struct PendingTask {
    due: Duration,
    seq: u64,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct SchedulerState {
    now: Duration,
    next_seq: u64,
    pending: Vec<PendingTask>,
}

/// Virtual-clock scheduler. Time only moves through [`advance`](Self::advance).
#[derive(Default)]
pub struct ManualScheduler {
    state: RefCell<SchedulerState>,
}

impl ManualScheduler {
    #[must_use]
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Moves the clock forward by `by`, running every task that comes due in
    /// (due time, scheduling order) order. Tasks scheduled by running tasks
    /// also run if they come due within the window. Returns the number of
    /// tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut ran = 0;
        while let Some(task) = self.pop_due(target) {
            task();
            ran += 1;
        }
        self.state.borrow_mut().now = target;
        ran
    }

    fn pop_due(&self, target: Duration) -> Option<Box<dyn FnOnce()>> {
        let mut state = self.state.borrow_mut();
        let index = state
            .pending
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due <= target)
            .min_by_key(|(_, pending)| (pending.due, pending.seq))
            .map(|(index, _)| index)?;
        let pending = state.pending.swap_remove(index);
        state.now = pending.due;
        Some(pending.task)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let mut state = self.state.borrow_mut();
        let due = state.now + delay;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.pending.push(PendingTask { due, seq, task });
    }
}
