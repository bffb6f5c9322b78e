mod attachment_watcher;
mod chart_scanner;
mod colorblind_preference;
mod control_injector;
mod enhancement_config;
mod fullscreen_modal;
mod recolor_engine;

use std::rc::Rc;

use tracing::{debug, warn};

use crate::error::EnhanceResult;
use crate::host::{ElementHandle, HostContext};

pub use attachment_watcher::{AttachFn, AttachmentWatcher};
pub use chart_scanner::ChartScanner;
pub use colorblind_preference::{ColorblindPreference, parse_persisted};
pub use control_injector::{ControlInjector, FULLSCREEN_CONTROL_CLASS};
pub use enhancement_config::{
    DEFAULT_CHART_MARKERS, DEFAULT_STORAGE_KEY, EnhancementConfig, Labels, WatcherConfig,
};
pub use fullscreen_modal::{
    ACTIVE_CLASS, CANCEL_KEY, CHART_CLASS, CHART_ID, CLOSE_CLASS, CONTENT_CLASS,
    FullscreenModal, FullscreenSession, HINT_CLASS, OVERLAY_CLASS, OverlayElements,
};
pub use recolor_engine::{
    INDICATOR_CLASS, MODE_CLASS, RecolorEngine, RecolorReport, TOGGLE_CLASS,
};

/// The whole enhancement layer wired against one host.
///
/// Both engines read the same scanner; they share no other mutable state.
pub struct EnhancementLayer<E: ElementHandle> {
    host: HostContext<E>,
    config: EnhancementConfig,
    scanner: ChartScanner<E>,
    recolor: Rc<RecolorEngine<E>>,
    modal: Rc<FullscreenModal<E>>,
    injector: Rc<ControlInjector<E>>,
    watcher: Rc<AttachmentWatcher<E>>,
}

impl<E: ElementHandle> EnhancementLayer<E> {
    /// Builds every component. Nothing touches the document until
    /// [`install`](Self::install).
    pub fn new(host: HostContext<E>, config: EnhancementConfig) -> EnhanceResult<Rc<Self>> {
        config.validate()?;

        let scanner = ChartScanner::new(host.dom.clone(), config.chart_markers.clone());
        let preference =
            ColorblindPreference::load(host.store.clone(), config.storage_key.clone());
        let recolor = RecolorEngine::new(
            host.clone(),
            scanner.clone(),
            preference,
            config.labels.clone(),
            config.recolor_on_load_delay(),
        );
        let modal = FullscreenModal::new(
            host.clone(),
            config.fullscreen_layout,
            config.plot_options.clone(),
            config.labels.clone(),
        );
        let injector = Rc::new(ControlInjector::new(
            host.clone(),
            modal.clone(),
            config.labels.clone(),
        ));

        let attach_injector = Rc::downgrade(&injector);
        let watcher = AttachmentWatcher::new(
            host.clone(),
            scanner.clone(),
            config.watcher.clone(),
            Rc::new(move |chart: &E| {
                let Some(injector) = attach_injector.upgrade() else {
                    return;
                };
                if let Err(err) = injector.inject(chart) {
                    warn!(?chart, error = %err, "failed to inject fullscreen control");
                }
            }),
        );

        Ok(Rc::new(Self {
            host,
            config,
            scanner,
            recolor,
            modal,
            injector,
            watcher,
        }))
    }

    /// Defers setup until the document is ready, then installs the toggle
    /// controls, restores the stored preference and starts the watcher.
    pub fn install(self: &Rc<Self>) {
        let layer = Rc::clone(self);
        self.host.dom.when_ready(Box::new(move || layer.on_ready()));
    }

    fn on_ready(&self) {
        if let Err(err) = self.recolor.install_controls() {
            warn!(error = %err, "failed to install colorblind toggle");
        }
        self.recolor.restore_preference();
        if let Err(err) = self.watcher.start() {
            warn!(error = %err, "failed to start attachment watcher");
        }
        debug!(
            active = self.recolor.is_active(),
            "enhancement layer ready"
        );
    }

    #[must_use]
    pub fn config(&self) -> &EnhancementConfig {
        &self.config
    }

    #[must_use]
    pub fn scanner(&self) -> &ChartScanner<E> {
        &self.scanner
    }

    #[must_use]
    pub fn recolor(&self) -> &Rc<RecolorEngine<E>> {
        &self.recolor
    }

    #[must_use]
    pub fn modal(&self) -> &Rc<FullscreenModal<E>> {
        &self.modal
    }

    #[must_use]
    pub fn injector(&self) -> &Rc<ControlInjector<E>> {
        &self.injector
    }

    #[must_use]
    pub fn watcher(&self) -> &Rc<AttachmentWatcher<E>> {
        &self.watcher
    }
}

/// Builds and installs the layer in one step.
pub fn install<E: ElementHandle>(
    host: HostContext<E>,
    config: EnhancementConfig,
) -> EnhanceResult<Rc<EnhancementLayer<E>>> {
    let layer = EnhancementLayer::new(host, config)?;
    layer.install();
    Ok(layer)
}
