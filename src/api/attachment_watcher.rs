use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::{debug, trace};

use crate::error::EnhanceResult;
use crate::host::{ElementHandle, HostContext};

use super::{ChartScanner, WatcherConfig};

/// Idempotent per-chart callback run by every pass.
pub type AttachFn<E> = Rc<dyn Fn(&E)>;

/// Keeps running an attach callback over every chart the page ever shows.
///
/// Three triggers feed the same pass: the initial [`start`](Self::start),
/// fixed re-scan checkpoints, and insertion notices that bring in a chart
/// container. Insertion-triggered passes are deferred by a short delay since
/// the charting library may still be mid-render when the notice arrives;
/// notices arriving while such a pass is pending fold into it. Observation
/// never stops.
pub struct AttachmentWatcher<E: ElementHandle> {
    host: HostContext<E>,
    scanner: ChartScanner<E>,
    config: WatcherConfig,
    attach: AttachFn<E>,
    started: Cell<bool>,
    rescan_pending: Cell<bool>,
    passes: Cell<usize>,
    self_ref: Weak<Self>,
}

impl<E: ElementHandle> AttachmentWatcher<E> {
    #[must_use]
    pub fn new(
        host: HostContext<E>,
        scanner: ChartScanner<E>,
        config: WatcherConfig,
        attach: AttachFn<E>,
    ) -> Rc<Self> {
        Rc::new_cyclic(|self_ref| Self {
            host,
            scanner,
            config,
            attach,
            started: Cell::new(false),
            rescan_pending: Cell::new(false),
            passes: Cell::new(0),
            self_ref: self_ref.clone(),
        })
    }

    /// Number of passes run so far.
    #[must_use]
    pub fn passes(&self) -> usize {
        self.passes.get()
    }

    #[must_use]
    pub fn is_rescan_pending(&self) -> bool {
        self.rescan_pending.get()
    }

    /// Runs the first pass, schedules the checkpoint re-scans and subscribes
    /// to insertions under the body. Later calls do nothing.
    pub fn start(&self) -> EnhanceResult<()> {
        if self.started.replace(true) {
            return Ok(());
        }

        self.run_pass();

        for delay in self.config.rescan_checkpoints() {
            self.schedule_pass(delay);
        }

        let watcher = self.self_ref.clone();
        let body = self.host.dom.body();
        self.host.dom.observe_insertions(
            &body,
            Rc::new(move |inserted: &[E]| {
                if let Some(watcher) = watcher.upgrade() {
                    watcher.on_insertions(inserted);
                }
            }),
        )?;
        debug!(
            checkpoints = self.config.rescan_checkpoints_ms.len(),
            "attachment watcher started"
        );
        Ok(())
    }

    /// Applies the attach callback to every chart currently present.
    pub fn run_pass(&self) -> usize {
        let charts = self.scanner.find_charts();
        for chart in &charts {
            (self.attach)(chart);
        }
        self.passes.set(self.passes.get() + 1);
        trace!(charts = charts.len(), pass = self.passes.get(), "attachment pass");
        charts.len()
    }

    /// Schedules a deferred pass when any inserted node is or holds a chart.
    pub fn on_insertions(&self, inserted: &[E]) {
        if !inserted
            .iter()
            .any(|node| self.scanner.matches_or_contains(node))
        {
            return;
        }
        if self.rescan_pending.replace(true) {
            return;
        }
        let watcher = self.self_ref.clone();
        self.host.scheduler.schedule(
            self.config.mutation_rescan_delay(),
            Box::new(move || {
                if let Some(watcher) = watcher.upgrade() {
                    watcher.rescan_pending.set(false);
                    watcher.run_pass();
                }
            }),
        );
    }

    fn schedule_pass(&self, delay: Duration) {
        let watcher = self.self_ref.clone();
        self.host.scheduler.schedule(
            delay,
            Box::new(move || {
                if let Some(watcher) = watcher.upgrade() {
                    watcher.run_pass();
                }
            }),
        );
    }
}
