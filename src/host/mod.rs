//! Collaborator contracts between the enhancement layer and its page.
//!
//! Engines never touch a browser API directly; they go through these traits so
//! the same logic runs against the live document (`platform_web`) and against
//! the headless [`memory`] host used by tests.

mod event;
pub mod memory;
mod plot_options;

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::core::{Layout, Trace};
use crate::error::EnhanceResult;

pub use event::{DomEvent, EventHandler, EventKind, InsertionHandler};
pub use plot_options::PlotOptions;

/// Opaque element handle. Cloning a handle never clones the element.
pub trait ElementHandle: Clone + PartialEq + fmt::Debug + 'static {}

impl<T: Clone + PartialEq + fmt::Debug + 'static> ElementHandle for T {}

/// Structural access to the page document.
pub trait Dom {
    type Element: ElementHandle;

    fn body(&self) -> Self::Element;

    /// All elements carrying at least one of `classes`, in document order,
    /// each reported once.
    fn elements_with_any_class(&self, classes: &[String]) -> Vec<Self::Element>;

    /// First descendant of `scope` carrying at least one of `classes`.
    fn descendant_with_any_class(
        &self,
        scope: &Self::Element,
        classes: &[String],
    ) -> Option<Self::Element>;

    fn has_class(&self, element: &Self::Element, class: &str) -> bool;
    fn add_class(&self, element: &Self::Element, class: &str);
    fn remove_class(&self, element: &Self::Element, class: &str);

    fn create_element(&self, tag: &str) -> EnhanceResult<Self::Element>;
    fn set_attribute(
        &self,
        element: &Self::Element,
        name: &str,
        value: &str,
    ) -> EnhanceResult<()>;
    fn set_text(&self, element: &Self::Element, text: &str);

    /// Sets an inline style property. An empty value removes the property.
    fn set_style(
        &self,
        element: &Self::Element,
        property: &str,
        value: &str,
    ) -> EnhanceResult<()>;

    /// Resolved CSS `position` of the element, if the host can compute it.
    fn computed_position(&self, element: &Self::Element) -> Option<String>;

    fn append_child(&self, parent: &Self::Element, child: &Self::Element) -> EnhanceResult<()>;

    /// Subscribes `handler` to `kind` events dispatched on `target`.
    fn listen(
        &self,
        target: &Self::Element,
        kind: EventKind,
        handler: EventHandler<Self::Element>,
    ) -> EnhanceResult<()>;

    /// Subscribes `handler` to `kind` events at document level.
    fn listen_document(
        &self,
        kind: EventKind,
        handler: EventHandler<Self::Element>,
    ) -> EnhanceResult<()>;

    /// Reports element nodes inserted anywhere under `root`.
    ///
    /// The subscription lives for the rest of the page.
    fn observe_insertions(
        &self,
        root: &Self::Element,
        handler: InsertionHandler<Self::Element>,
    ) -> EnhanceResult<()>;

    /// Runs `task` once the document has finished parsing, immediately if it
    /// already has.
    fn when_ready(&self, task: Box<dyn FnOnce()>);
}

/// The external charting library, seen only through already-rendered
/// containers.
pub trait ChartLibrary<E> {
    /// Current series data of the chart rendered into `container`.
    fn data(&self, container: &E) -> Option<Vec<Trace>>;

    /// Current layout of the chart rendered into `container`.
    fn layout(&self, container: &E) -> Option<Layout>;

    /// Replaces whatever is rendered in `container` with `data` and `layout`.
    fn render(
        &self,
        container: &E,
        data: &[Trace],
        layout: &Layout,
        options: Option<&PlotOptions>,
    ) -> EnhanceResult<()>;

    /// Resubmits the chart in `container` with the color-bearing fields of
    /// `data` (`marker.color`, `marker.colors`, `line.color`), one entry per
    /// existing trace. Every other trace field and the chart's own layout are
    /// kept as the library holds them.
    fn restyle_colors(&self, container: &E, data: &[Trace]) -> EnhanceResult<()>;

    /// Tears down the chart rendered in `container`, releasing its resources.
    fn destroy(&self, container: &E);
}

/// Synchronous, origin-scoped string store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> EnhanceResult<()>;
}

/// One-shot deferred callbacks on the page's event loop.
pub trait Scheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

/// Shared handles to every collaborator an engine may need.
pub struct HostContext<E: ElementHandle> {
    pub dom: Rc<dyn Dom<Element = E>>,
    pub charts: Rc<dyn ChartLibrary<E>>,
    pub store: Rc<dyn KeyValueStore>,
    pub scheduler: Rc<dyn Scheduler>,
}

impl<E: ElementHandle> HostContext<E> {
    #[must_use]
    pub fn new(
        dom: Rc<dyn Dom<Element = E>>,
        charts: Rc<dyn ChartLibrary<E>>,
        store: Rc<dyn KeyValueStore>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            dom,
            charts,
            store,
            scheduler,
        }
    }
}

impl<E: ElementHandle> Clone for HostContext<E> {
    fn clone(&self) -> Self {
        Self {
            dom: Rc::clone(&self.dom),
            charts: Rc::clone(&self.charts),
            store: Rc::clone(&self.store),
            scheduler: Rc::clone(&self.scheduler),
        }
    }
}
