//! Headless host used by tests and by embedders without a browser.
//!
//! Everything here is deterministic: insertion records are delivered only on
//! [`MemoryDocument::flush_mutations`], and deferred callbacks run only when
//! the [`ManualScheduler`] clock is advanced.

mod charts;
mod document;
mod scheduler;
mod store;

pub use charts::{MemoryChartLibrary, RenderCall};
pub use document::{MemoryDocument, NodeId};
pub use scheduler::ManualScheduler;
pub use store::MemoryStore;

use std::rc::Rc;

use super::HostContext;

/// A full in-memory host plus typed handles for test inspection.
pub struct MemoryHost {
    pub dom: Rc<MemoryDocument>,
    pub charts: Rc<MemoryChartLibrary>,
    pub store: Rc<MemoryStore>,
    pub scheduler: Rc<ManualScheduler>,
}

impl MemoryHost {
    /// Host whose document has already finished loading.
    #[must_use]
    pub fn new() -> Self {
        Self::with_document(MemoryDocument::new())
    }

    /// Host whose document is still parsing; see [`MemoryDocument::finish_loading`].
    #[must_use]
    pub fn loading() -> Self {
        Self::with_document(MemoryDocument::loading())
    }

    fn with_document(dom: MemoryDocument) -> Self {
        Self {
            dom: Rc::new(dom),
            charts: Rc::new(MemoryChartLibrary::default()),
            store: Rc::new(MemoryStore::default()),
            scheduler: Rc::new(ManualScheduler::default()),
        }
    }

    #[must_use]
    pub fn context(&self) -> HostContext<NodeId> {
        HostContext::new(
            self.dom.clone(),
            self.charts.clone(),
            self.store.clone(),
            self.scheduler.clone(),
        )
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}
