use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::{debug, trace};

use crate::core::{ColorTable, Trace};
use crate::error::EnhanceResult;
use crate::host::{DomEvent, ElementHandle, EventKind, HostContext};

use super::{ChartScanner, ColorblindPreference, Labels};

pub const TOGGLE_CLASS: &str = "a11y-toggle";
pub const INDICATOR_CLASS: &str = "a11y-indicator";
/// Body class mirroring the preference so page CSS can follow it.
pub const MODE_CLASS: &str = "colorblind-mode";

/// Outcome of one recoloring pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecolorReport {
    /// Charts resubmitted with mapped colors.
    pub recolored: usize,
    /// Charts without data, color-bearing fields or a readable layout.
    pub skipped: usize,
    /// Charts whose resubmission the library rejected.
    pub failed: usize,
}

/// Rewrites chart color encodings between the source and colorblind palettes.
///
/// Every pass is derived from the charts' current data, so running it again
/// on already-recolored charts changes nothing.
pub struct RecolorEngine<E: ElementHandle> {
    host: HostContext<E>,
    scanner: ChartScanner<E>,
    table: ColorTable,
    preference: ColorblindPreference,
    labels: Labels,
    load_delay: Duration,
    toggle_control: RefCell<Option<E>>,
    self_ref: Weak<Self>,
}

impl<E: ElementHandle> RecolorEngine<E> {
    #[must_use]
    pub fn new(
        host: HostContext<E>,
        scanner: ChartScanner<E>,
        preference: ColorblindPreference,
        labels: Labels,
        load_delay: Duration,
    ) -> Rc<Self> {
        Rc::new_cyclic(|self_ref| Self {
            host,
            scanner,
            table: ColorTable::default(),
            preference,
            labels,
            load_delay,
            toggle_control: RefCell::new(None),
            self_ref: self_ref.clone(),
        })
    }

    #[must_use]
    pub fn preference(&self) -> &ColorblindPreference {
        &self.preference
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.preference.is_active()
    }

    #[must_use]
    pub fn toggle_control(&self) -> Option<E> {
        self.toggle_control.borrow().clone()
    }

    /// Appends the toggle button and the mode indicator to the body.
    ///
    /// Calling this again after a successful install does nothing.
    pub fn install_controls(&self) -> EnhanceResult<()> {
        if self.toggle_control.borrow().is_some() {
            return Ok(());
        }
        let dom = &self.host.dom;
        let body = dom.body();

        let button = dom.create_element("button")?;
        dom.add_class(&button, TOGGLE_CLASS);
        dom.set_attribute(&button, "aria-label", &self.labels.toggle_aria_label)?;
        dom.set_attribute(&button, "aria-pressed", "false")?;
        dom.set_attribute(&button, "title", &self.labels.toggle_title)?;
        for (class, icon) in [
            ("icon-normal", &self.labels.toggle_icon_normal),
            ("icon-active", &self.labels.toggle_icon_active),
        ] {
            let span = dom.create_element("span")?;
            dom.add_class(&span, class);
            dom.set_text(&span, icon);
            dom.append_child(&button, &span)?;
        }

        let engine = self.self_ref.clone();
        dom.listen(
            &button,
            EventKind::Click,
            Rc::new(move |_event: &DomEvent<E>| {
                if let Some(engine) = engine.upgrade() {
                    engine.toggle();
                }
            }),
        )?;
        dom.append_child(&body, &button)?;

        let indicator = dom.create_element("div")?;
        dom.add_class(&indicator, INDICATOR_CLASS);
        dom.set_text(&indicator, &self.labels.indicator_text);
        dom.append_child(&body, &indicator)?;

        *self.toggle_control.borrow_mut() = Some(button);
        Ok(())
    }

    /// Reflects a stored active preference right away and recolors after the
    /// load delay, once the charting library has had time to draw.
    pub fn restore_preference(&self) {
        if !self.preference.is_active() {
            return;
        }
        self.sync_presentation(true);

        let engine = self.self_ref.clone();
        debug!(delay_ms = self.load_delay.as_millis() as u64, "deferring load-time recolor");
        self.host.scheduler.schedule(
            self.load_delay,
            Box::new(move || {
                if let Some(engine) = engine.upgrade() {
                    engine.apply_recoloring(engine.is_active());
                }
            }),
        );
    }

    /// Flips the preference, persists it, updates the toggle presentation and
    /// recolors every chart currently on the page.
    pub fn toggle(&self) -> RecolorReport {
        let active = self.preference.toggle();
        self.sync_presentation(active);
        self.apply_recoloring(active)
    }

    /// Maps every discovered chart's colors toward (`active`) or away from the
    /// colorblind palette and resubmits only the color fields, keeping the
    /// chart's own layout.
    ///
    /// Charts without data, color fields or a readable layout are left
    /// untouched. A chart the library refuses to re-render is skipped; the
    /// pass goes on.
    pub fn apply_recoloring(&self, active: bool) -> RecolorReport {
        let mut report = RecolorReport::default();

        for chart in self.scanner.find_charts() {
            let Some(data) = self.host.charts.data(&chart).filter(|data| !data.is_empty())
            else {
                trace!(?chart, "skipping chart without data");
                report.skipped += 1;
                continue;
            };
            if !data.iter().any(Trace::has_color_fields) {
                trace!(?chart, "skipping chart without color fields");
                report.skipped += 1;
                continue;
            }

            if self.host.charts.layout(&chart).is_none() {
                trace!(?chart, "skipping chart without layout");
                report.skipped += 1;
                continue;
            }

            let recolored: Vec<Trace> = data
                .iter()
                .map(|trace| trace.recolored(&self.table, active))
                .collect();

            match self.host.charts.restyle_colors(&chart, &recolored) {
                Ok(()) => report.recolored += 1,
                Err(err) => {
                    debug!(?chart, error = %err, "chart not ready for recolor");
                    report.failed += 1;
                }
            }
        }

        debug!(
            active,
            recolored = report.recolored,
            skipped = report.skipped,
            failed = report.failed,
            "recolor pass finished"
        );
        report
    }

    fn sync_presentation(&self, active: bool) {
        let dom = &self.host.dom;
        let body = dom.body();
        if active {
            dom.add_class(&body, MODE_CLASS);
        } else {
            dom.remove_class(&body, MODE_CLASS);
        }
        if let Some(button) = self.toggle_control.borrow().as_ref() {
            let pressed = if active { "true" } else { "false" };
            if let Err(err) = dom.set_attribute(button, "aria-pressed", pressed) {
                debug!(error = %err, "failed to update toggle pressed state");
            }
        }
    }
}
