use std::rc::Rc;

use tracing::{trace, warn};

use crate::error::EnhanceResult;
use crate::host::{DomEvent, ElementHandle, EventKind, HostContext};

use super::{FullscreenModal, Labels};

/// Marker class of the injected fullscreen control.
pub const FULLSCREEN_CONTROL_CLASS: &str = "plotly-fullscreen-btn";

/// Adds one "view fullscreen" control to each chart container.
pub struct ControlInjector<E: ElementHandle> {
    host: HostContext<E>,
    modal: Rc<FullscreenModal<E>>,
    labels: Labels,
    marker: [String; 1],
}

impl<E: ElementHandle> ControlInjector<E> {
    #[must_use]
    pub fn new(host: HostContext<E>, modal: Rc<FullscreenModal<E>>, labels: Labels) -> Self {
        Self {
            host,
            modal,
            labels,
            marker: [FULLSCREEN_CONTROL_CLASS.to_owned()],
        }
    }

    #[must_use]
    pub fn has_control(&self, chart: &E) -> bool {
        self.host
            .dom
            .descendant_with_any_class(chart, &self.marker)
            .is_some()
    }

    /// Attaches the control unless `chart` already carries one.
    ///
    /// Returns whether a control was added.
    pub fn inject(&self, chart: &E) -> EnhanceResult<bool> {
        if self.has_control(chart) {
            return Ok(false);
        }
        let dom = &self.host.dom;

        if dom.computed_position(chart).as_deref() == Some("static") {
            dom.set_style(chart, "position", "relative")?;
        }

        let button = dom.create_element("button")?;
        dom.add_class(&button, FULLSCREEN_CONTROL_CLASS);
        dom.set_text(&button, &self.labels.fullscreen_text);
        dom.set_attribute(&button, "title", &self.labels.fullscreen_title)?;

        let modal = Rc::downgrade(&self.modal);
        let target = chart.clone();
        dom.listen(
            &button,
            EventKind::Click,
            Rc::new(move |event: &DomEvent<E>| {
                event.prevent_default();
                event.stop_propagation();
                let Some(modal) = modal.upgrade() else {
                    return;
                };
                if let Err(err) = modal.open(&target) {
                    warn!(chart = ?target, error = %err, "fullscreen open failed");
                }
            }),
        )?;
        dom.append_child(chart, &button)?;

        trace!(?chart, "fullscreen control injected");
        Ok(true)
    }
}
