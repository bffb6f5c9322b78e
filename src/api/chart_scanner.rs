use std::rc::Rc;

use crate::host::{Dom, ElementHandle};

/// Stateless chart discovery by container marker classes.
///
/// Nothing is cached: the set of charts changes outside this crate's
/// control, so every call queries the live document.
pub struct ChartScanner<E: ElementHandle> {
    dom: Rc<dyn Dom<Element = E>>,
    markers: Vec<String>,
}

impl<E: ElementHandle> Clone for ChartScanner<E> {
    fn clone(&self) -> Self {
        Self {
            dom: Rc::clone(&self.dom),
            markers: self.markers.clone(),
        }
    }
}

impl<E: ElementHandle> ChartScanner<E> {
    #[must_use]
    pub fn new(dom: Rc<dyn Dom<Element = E>>, markers: Vec<String>) -> Self {
        Self { dom, markers }
    }

    #[must_use]
    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// Chart containers currently in the document, in document order.
    #[must_use]
    pub fn find_charts(&self) -> Vec<E> {
        self.dom.elements_with_any_class(&self.markers)
    }

    /// Whether `node` is a chart container or holds one.
    #[must_use]
    pub fn matches_or_contains(&self, node: &E) -> bool {
        self.markers
            .iter()
            .any(|marker| self.dom.has_class(node, marker))
            || self
                .dom
                .descendant_with_any_class(node, &self.markers)
                .is_some()
    }
}
