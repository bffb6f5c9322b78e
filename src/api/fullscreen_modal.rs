use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, trace, warn};

use crate::core::{FullscreenLayoutConfig, Layout, Trace};
use crate::error::EnhanceResult;
use crate::host::{DomEvent, ElementHandle, EventKind, HostContext, PlotOptions};

use super::Labels;

pub const OVERLAY_CLASS: &str = "plotly-modal-overlay";
pub const CONTENT_CLASS: &str = "plotly-modal-content";
pub const CLOSE_CLASS: &str = "plotly-modal-close";
pub const CHART_CLASS: &str = "plotly-modal-chart";
pub const CHART_ID: &str = "plotly-modal-chart";
pub const HINT_CLASS: &str = "plotly-modal-hint";
pub const ACTIVE_CLASS: &str = "active";
pub const CANCEL_KEY: &str = "Escape";

/// Elements of the singleton overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayElements<E> {
    pub root: E,
    pub close: E,
    pub chart: E,
}

/// The clone currently rendered in the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct FullscreenSession<E> {
    pub source: E,
    pub data: Vec<Trace>,
    pub layout: Layout,
}

/// Fullscreen presentation of one chart at a time.
///
/// The overlay is built on the first [`open`](Self::open) and reused for the
/// rest of the page; its listeners are attached only at that point. Each
/// open/close pair is one session: opening while a session is live closes it
/// first, so at most one cloned render exists.
pub struct FullscreenModal<E: ElementHandle> {
    host: HostContext<E>,
    layout_config: FullscreenLayoutConfig,
    plot_options: PlotOptions,
    labels: Labels,
    overlay: RefCell<Option<OverlayElements<E>>>,
    session: RefCell<Option<FullscreenSession<E>>>,
    self_ref: Weak<Self>,
}

impl<E: ElementHandle> FullscreenModal<E> {
    #[must_use]
    pub fn new(
        host: HostContext<E>,
        layout_config: FullscreenLayoutConfig,
        plot_options: PlotOptions,
        labels: Labels,
    ) -> Rc<Self> {
        Rc::new_cyclic(|self_ref| Self {
            host,
            layout_config,
            plot_options,
            labels,
            overlay: RefCell::new(None),
            session: RefCell::new(None),
            self_ref: self_ref.clone(),
        })
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session.borrow().is_some()
    }

    #[must_use]
    pub fn overlay(&self) -> Option<OverlayElements<E>> {
        self.overlay.borrow().clone()
    }

    #[must_use]
    pub fn session(&self) -> Option<FullscreenSession<E>> {
        self.session.borrow().clone()
    }

    /// Shows `source` enlarged in the overlay.
    ///
    /// Returns `Ok(false)` without touching the overlay when the source has no
    /// data or no layout yet. A library render failure hides the overlay again
    /// and is returned to the caller.
    pub fn open(&self, source: &E) -> EnhanceResult<bool> {
        let charts = &self.host.charts;
        let Some(data) = charts.data(source).filter(|data| !data.is_empty()) else {
            debug!(?source, "fullscreen skipped: chart has no data");
            return Ok(false);
        };
        let Some(layout) = charts.layout(source) else {
            debug!(?source, "fullscreen skipped: chart has no layout");
            return Ok(false);
        };

        self.close();
        let overlay = self.ensure_overlay()?;
        let layout = layout.fullscreen(&self.layout_config);

        self.show(&overlay)?;
        if let Err(err) = charts.render(&overlay.chart, &data, &layout, Some(&self.plot_options)) {
            warn!(?source, error = %err, "fullscreen render failed");
            self.hide(&overlay);
            charts.destroy(&overlay.chart);
            return Err(err);
        }

        trace!(?source, traces = data.len(), "fullscreen opened");
        *self.session.borrow_mut() = Some(FullscreenSession {
            source: source.clone(),
            data,
            layout,
        });
        Ok(true)
    }

    /// Hides the overlay and destroys the cloned render.
    ///
    /// Returns `false` when nothing was open.
    pub fn close(&self) -> bool {
        let Some(session) = self.session.borrow_mut().take() else {
            return false;
        };
        if let Some(overlay) = self.overlay() {
            self.hide(&overlay);
            self.host.charts.destroy(&overlay.chart);
        }
        trace!(source = ?session.source, "fullscreen closed");
        true
    }

    fn show(&self, overlay: &OverlayElements<E>) -> EnhanceResult<()> {
        let dom = &self.host.dom;
        dom.add_class(&overlay.root, ACTIVE_CLASS);
        dom.set_style(&dom.body(), "overflow", "hidden")
    }

    fn hide(&self, overlay: &OverlayElements<E>) {
        let dom = &self.host.dom;
        dom.remove_class(&overlay.root, ACTIVE_CLASS);
        if let Err(err) = dom.set_style(&dom.body(), "overflow", "") {
            debug!(error = %err, "failed to restore page scroll");
        }
    }

    fn ensure_overlay(&self) -> EnhanceResult<OverlayElements<E>> {
        if let Some(overlay) = self.overlay() {
            return Ok(overlay);
        }

        let dom = &self.host.dom;
        let root = dom.create_element("div")?;
        dom.add_class(&root, OVERLAY_CLASS);

        let content = dom.create_element("div")?;
        dom.add_class(&content, CONTENT_CLASS);

        let close = dom.create_element("button")?;
        dom.add_class(&close, CLOSE_CLASS);
        dom.set_attribute(&close, "title", &self.labels.close_title)?;
        dom.set_text(&close, &self.labels.close_text);

        let chart = dom.create_element("div")?;
        dom.add_class(&chart, CHART_CLASS);
        dom.set_attribute(&chart, "id", CHART_ID)?;

        let hint = dom.create_element("div")?;
        dom.add_class(&hint, HINT_CLASS);
        dom.set_text(&hint, &self.labels.overlay_hint);

        for child in [&close, &chart, &hint] {
            dom.append_child(&content, child)?;
        }
        dom.append_child(&root, &content)?;

        let modal = self.self_ref.clone();
        dom.listen(
            &close,
            EventKind::Click,
            Rc::new(move |_event: &DomEvent<E>| {
                if let Some(modal) = modal.upgrade() {
                    modal.close();
                }
            }),
        )?;

        let modal = self.self_ref.clone();
        let background = root.clone();
        dom.listen(
            &root,
            EventKind::Click,
            Rc::new(move |event: &DomEvent<E>| {
                if event.target() != Some(&background) {
                    return;
                }
                if let Some(modal) = modal.upgrade() {
                    modal.close();
                }
            }),
        )?;

        let modal = self.self_ref.clone();
        dom.listen_document(
            EventKind::KeyDown,
            Rc::new(move |event: &DomEvent<E>| {
                if event.key() != Some(CANCEL_KEY) {
                    return;
                }
                if let Some(modal) = modal.upgrade().filter(|modal| modal.is_open()) {
                    modal.close();
                }
            }),
        )?;

        dom.append_child(&dom.body(), &root)?;

        let overlay = OverlayElements { root, close, chart };
        debug!(root = ?overlay.root, "fullscreen overlay created");
        *self.overlay.borrow_mut() = Some(overlay.clone());
        Ok(overlay)
    }
}
