use js_sys::Array;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    Document, Element, Event, HtmlElement, KeyboardEvent, MutationObserver, MutationObserverInit,
    MutationRecord, Node, Window,
};

use crate::error::{EnhanceError, EnhanceResult};
use crate::host::{Dom, DomEvent, EventHandler, EventKind, InsertionHandler};

use super::js_error;

/// [`Dom`] over a live `web_sys::Document`.
pub struct WebDom {
    window: Window,
    document: Document,
    root: Element,
}

impl WebDom {
    pub fn from_window(window: &Window) -> EnhanceResult<Self> {
        let document = window
            .document()
            .ok_or_else(|| EnhanceError::Host("no document".to_owned()))?;
        let root = document
            .document_element()
            .ok_or_else(|| EnhanceError::Host("document has no root element".to_owned()))?;
        Ok(Self {
            window: window.clone(),
            document,
            root,
        })
    }
}

fn class_selector(classes: &[String]) -> String {
    classes
        .iter()
        .map(|class| format!(".{class}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn to_dom_event(kind: EventKind, event: &Event) -> DomEvent<Element> {
    let target = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok());
    match kind {
        EventKind::KeyDown => {
            let key = event
                .dyn_ref::<KeyboardEvent>()
                .map(KeyboardEvent::key)
                .unwrap_or_default();
            DomEvent::key_down(key, target)
        }
        EventKind::Click => DomEvent::new(kind, target),
    }
}

fn event_closure(kind: EventKind, handler: EventHandler<Element>) -> Closure<dyn FnMut(Event)> {
    Closure::<dyn FnMut(Event)>::wrap(Box::new(move |event: Event| {
        let dom_event = to_dom_event(kind, &event);
        handler(&dom_event);
        if dom_event.default_prevented() {
            event.prevent_default();
        }
        if dom_event.propagation_stopped() {
            event.stop_propagation();
        }
    }))
}

impl Dom for WebDom {
    type Element = Element;

    fn body(&self) -> Element {
        match self.document.body() {
            Some(body) => body.into(),
            None => self.root.clone(),
        }
    }

    fn elements_with_any_class(&self, classes: &[String]) -> Vec<Element> {
        let Ok(list) = self.document.query_selector_all(&class_selector(classes)) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|index| list.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn descendant_with_any_class(&self, scope: &Element, classes: &[String]) -> Option<Element> {
        scope
            .query_selector(&class_selector(classes))
            .ok()
            .flatten()
    }

    fn has_class(&self, element: &Element, class: &str) -> bool {
        element.class_list().contains(class)
    }

    fn add_class(&self, element: &Element, class: &str) {
        if let Err(err) = element.class_list().add_1(class) {
            debug!(class, error = ?err, "add class failed");
        }
    }

    fn remove_class(&self, element: &Element, class: &str) {
        if let Err(err) = element.class_list().remove_1(class) {
            debug!(class, error = ?err, "remove class failed");
        }
    }

    fn create_element(&self, tag: &str) -> EnhanceResult<Element> {
        self.document
            .create_element(tag)
            .map_err(|err| js_error("create element", err))
    }

    fn set_attribute(&self, element: &Element, name: &str, value: &str) -> EnhanceResult<()> {
        element
            .set_attribute(name, value)
            .map_err(|err| js_error("set attribute", err))
    }

    fn set_text(&self, element: &Element, text: &str) {
        element.set_text_content(Some(text));
    }

    fn set_style(&self, element: &Element, property: &str, value: &str) -> EnhanceResult<()> {
        let style = element
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| EnhanceError::Host("element has no inline style".to_owned()))?
            .style();
        if value.is_empty() {
            style
                .remove_property(property)
                .map(|_| ())
                .map_err(|err| js_error("remove style", err))
        } else {
            style
                .set_property(property, value)
                .map_err(|err| js_error("set style", err))
        }
    }

    fn computed_position(&self, element: &Element) -> Option<String> {
        self.window
            .get_computed_style(element)
            .ok()
            .flatten()
            .and_then(|style| style.get_property_value("position").ok())
    }

    fn append_child(&self, parent: &Element, child: &Element) -> EnhanceResult<()> {
        parent
            .append_child(child)
            .map(|_| ())
            .map_err(|err| js_error("append child", err))
    }

    fn listen(
        &self,
        target: &Element,
        kind: EventKind,
        handler: EventHandler<Element>,
    ) -> EnhanceResult<()> {
        let closure = event_closure(kind, handler);
        target
            .add_event_listener_with_callback(kind.dom_name(), closure.as_ref().unchecked_ref())
            .map_err(|err| js_error("add listener", err))?;
        closure.forget();
        Ok(())
    }

    fn listen_document(&self, kind: EventKind, handler: EventHandler<Element>) -> EnhanceResult<()> {
        let closure = event_closure(kind, handler);
        self.document
            .add_event_listener_with_callback(kind.dom_name(), closure.as_ref().unchecked_ref())
            .map_err(|err| js_error("add document listener", err))?;
        closure.forget();
        Ok(())
    }

    fn observe_insertions(
        &self,
        root: &Element,
        handler: InsertionHandler<Element>,
    ) -> EnhanceResult<()> {
        let closure = Closure::<dyn FnMut(Array, MutationObserver)>::wrap(Box::new(
            move |records: Array, _observer: MutationObserver| {
                let mut inserted = Vec::new();
                for record in records.iter() {
                    let Ok(record) = record.dyn_into::<MutationRecord>() else {
                        continue;
                    };
                    let added = record.added_nodes();
                    for index in 0..added.length() {
                        let Some(node) = added.get(index) else {
                            continue;
                        };
                        if node.node_type() != Node::ELEMENT_NODE {
                            continue;
                        }
                        if let Ok(element) = node.dyn_into::<Element>() {
                            inserted.push(element);
                        }
                    }
                }
                if !inserted.is_empty() {
                    handler(&inserted);
                }
            },
        ));

        let observer = MutationObserver::new(closure.as_ref().unchecked_ref())
            .map_err(|err| js_error("create mutation observer", err))?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer
            .observe_with_options(root, &init)
            .map_err(|err| js_error("observe", err))?;
        closure.forget();
        Ok(())
    }

    fn when_ready(&self, task: Box<dyn FnOnce()>) {
        if self.document.ready_state() != "loading" {
            task();
            return;
        }
        let callback = Closure::once_into_js(move || task());
        if let Err(err) = self
            .document
            .add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
        {
            warn!(error = ?err, "could not wait for DOMContentLoaded");
        }
    }
}
