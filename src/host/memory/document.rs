use std::cell::RefCell;
use std::fmt;

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::trace;

use crate::error::{EnhanceError, EnhanceResult};
use crate::host::{Dom, DomEvent, EventHandler, EventKind, InsertionHandler};

/// Handle to a node of a [`MemoryDocument`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

const BODY: NodeId = NodeId(0);

#[derive(Debug)]
struct Node {
    tag: String,
    classes: SmallVec<[String; 4]>,
    attributes: IndexMap<String, String>,
    styles: IndexMap<String, String>,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    stylesheet_position: Option<String>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            classes: SmallVec::new(),
            attributes: IndexMap::new(),
            styles: IndexMap::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
            stylesheet_position: None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ListenerTarget {
    Element(NodeId),
    Document,
}

struct Listener {
    target: ListenerTarget,
    kind: EventKind,
    handler: EventHandler<NodeId>,
}

struct Observer {
    root: NodeId,
    handler: InsertionHandler<NodeId>,
}

struct DocumentState {
    nodes: Vec<Node>,
    listeners: Vec<Listener>,
    observers: Vec<Observer>,
    pending_insertions: Vec<NodeId>,
    ready: bool,
    ready_tasks: Vec<Box<dyn FnOnce()>>,
    reject_listeners: bool,
}

/// Arena-backed document with a `body` root.
///
/// Insertions under an observed root are queued and only delivered to
/// observers on [`flush_mutations`](Self::flush_mutations), the way a browser
/// batches mutation records after the inserting script yields.
pub struct MemoryDocument {
    state: RefCell<DocumentState>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::with_ready(true)
    }

    /// Document still parsing; `when_ready` tasks wait for [`finish_loading`](Self::finish_loading).
    #[must_use]
    pub fn loading() -> Self {
        Self::with_ready(false)
    }

    fn with_ready(ready: bool) -> Self {
        Self {
            state: RefCell::new(DocumentState {
                nodes: vec![Node::new("body")],
                listeners: Vec::new(),
                observers: Vec::new(),
                pending_insertions: Vec::new(),
                ready,
                ready_tasks: Vec::new(),
                reject_listeners: false,
            }),
        }
    }

    /// Makes `listen` and `listen_document` fail until switched back.
    pub fn reject_listeners(&self, reject: bool) {
        self.state.borrow_mut().reject_listeners = reject;
    }

    /// Marks the document parsed and runs queued ready tasks in order.
    pub fn finish_loading(&self) {
        let tasks = {
            let mut state = self.state.borrow_mut();
            state.ready = true;
            std::mem::take(&mut state.ready_tasks)
        };
        for task in tasks {
            task();
        }
    }

    /// Creates an element with `classes` and appends it to `parent`.
    pub fn insert_element(
        &self,
        parent: NodeId,
        tag: &str,
        classes: &[&str],
    ) -> EnhanceResult<NodeId> {
        let element = self.create_element(tag)?;
        for class in classes {
            self.add_class(&element, class);
        }
        self.append_child(&parent, &element)?;
        Ok(element)
    }

    /// Gives the element a `position` as if it came from a stylesheet rule.
    pub fn set_stylesheet_position(&self, element: NodeId, position: &str) {
        if let Some(node) = self.state.borrow_mut().nodes.get_mut(element.0) {
            node.stylesheet_position = Some(position.to_owned());
        }
    }

    /// Delivers queued insertion records to every observer whose root holds
    /// them. Returns the number of records delivered.
    pub fn flush_mutations(&self) -> usize {
        let (inserted, observers) = {
            let mut state = self.state.borrow_mut();
            let inserted = std::mem::take(&mut state.pending_insertions);
            let observers: Vec<(NodeId, InsertionHandler<NodeId>)> = state
                .observers
                .iter()
                .map(|observer| (observer.root, observer.handler.clone()))
                .collect();
            (inserted, observers)
        };

        let mut delivered = 0;
        for (root, handler) in observers {
            let batch: Vec<NodeId> = inserted
                .iter()
                .copied()
                .filter(|node| *node != root && self.is_inclusive_ancestor(root, *node))
                .collect();
            if !batch.is_empty() {
                delivered += batch.len();
                handler(&batch);
            }
        }
        delivered
    }

    /// Dispatches a click on `target`, bubbling through its ancestors and then
    /// to document listeners unless a handler stops propagation.
    pub fn click(&self, target: NodeId) -> DomEvent<NodeId> {
        let event = DomEvent::click(target);
        let mut path = vec![ListenerTarget::Element(target)];
        path.extend(
            self.ancestors(target)
                .into_iter()
                .map(ListenerTarget::Element),
        );
        path.push(ListenerTarget::Document);
        self.dispatch(&event, &path);
        event
    }

    /// Dispatches a key press at document level.
    pub fn key_down(&self, key: &str) -> DomEvent<NodeId> {
        let event = DomEvent::key_down(key, Some(BODY));
        self.dispatch(&event, &[ListenerTarget::Element(BODY), ListenerTarget::Document]);
        event
    }

    fn dispatch(&self, event: &DomEvent<NodeId>, path: &[ListenerTarget]) {
        for target in path {
            let handlers: Vec<EventHandler<NodeId>> = self
                .state
                .borrow()
                .listeners
                .iter()
                .filter(|listener| listener.target == *target && listener.kind == event.kind())
                .map(|listener| listener.handler.clone())
                .collect();
            for handler in handlers {
                handler(event);
            }
            if event.propagation_stopped() {
                break;
            }
        }
    }

    #[must_use]
    pub fn listener_count(&self, target: NodeId, kind: EventKind) -> usize {
        self.count_listeners(ListenerTarget::Element(target), kind)
    }

    #[must_use]
    pub fn document_listener_count(&self, kind: EventKind) -> usize {
        self.count_listeners(ListenerTarget::Document, kind)
    }

    fn count_listeners(&self, target: ListenerTarget, kind: EventKind) -> usize {
        self.state
            .borrow()
            .listeners
            .iter()
            .filter(|listener| listener.target == target && listener.kind == kind)
            .count()
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.state.borrow().observers.len()
    }

    #[must_use]
    pub fn children(&self, element: NodeId) -> Vec<NodeId> {
        self.read(element, |node| node.children.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn parent(&self, element: NodeId) -> Option<NodeId> {
        self.read(element, |node| node.parent).flatten()
    }

    #[must_use]
    pub fn tag(&self, element: NodeId) -> Option<String> {
        self.read(element, |node| node.tag.clone())
    }

    #[must_use]
    pub fn attribute(&self, element: NodeId, name: &str) -> Option<String> {
        self.read(element, |node| node.attributes.get(name).cloned())
            .flatten()
    }

    #[must_use]
    pub fn inline_style(&self, element: NodeId, property: &str) -> Option<String> {
        self.read(element, |node| node.styles.get(property).cloned())
            .flatten()
    }

    #[must_use]
    pub fn text(&self, element: NodeId) -> String {
        self.read(element, |node| node.text.clone())
            .unwrap_or_default()
    }

    /// Elements under `scope` (excluding it) carrying `class`, in document order.
    #[must_use]
    pub fn descendants_with_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        let wanted = [class.to_owned()];
        let state = self.state.borrow();
        let mut found = Vec::new();
        collect_with_any_class(&state.nodes, scope, &wanted, &mut found);
        found.retain(|node| *node != scope);
        found
    }

    fn read<T>(&self, element: NodeId, f: impl FnOnce(&Node) -> T) -> Option<T> {
        self.state.borrow().nodes.get(element.0).map(f)
    }

    fn ancestors(&self, element: NodeId) -> Vec<NodeId> {
        let state = self.state.borrow();
        let mut chain = Vec::new();
        let mut cursor = state.nodes.get(element.0).and_then(|node| node.parent);
        while let Some(parent) = cursor {
            chain.push(parent);
            cursor = state.nodes.get(parent.0).and_then(|node| node.parent);
        }
        chain
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).contains(&ancestor)
    }

    fn with_node<T>(&self, element: NodeId, f: impl FnOnce(&mut Node) -> T) -> EnhanceResult<T> {
        self.state
            .borrow_mut()
            .nodes
            .get_mut(element.0)
            .map(f)
            .ok_or_else(|| EnhanceError::Host(format!("unknown node {element:?}")))
    }
}

fn collect_with_any_class(
    nodes: &[Node],
    from: NodeId,
    classes: &[String],
    found: &mut Vec<NodeId>,
) {
    let Some(node) = nodes.get(from.0) else {
        return;
    };
    if node
        .classes
        .iter()
        .any(|class| classes.iter().any(|wanted| wanted == class))
    {
        found.push(from);
    }
    for child in &node.children {
        collect_with_any_class(nodes, *child, classes, found);
    }
}

impl Dom for MemoryDocument {
    type Element = NodeId;

    fn body(&self) -> NodeId {
        BODY
    }

    fn elements_with_any_class(&self, classes: &[String]) -> Vec<NodeId> {
        let state = self.state.borrow();
        let mut found = Vec::new();
        collect_with_any_class(&state.nodes, BODY, classes, &mut found);
        found
    }

    fn descendant_with_any_class(&self, scope: &NodeId, classes: &[String]) -> Option<NodeId> {
        let state = self.state.borrow();
        let mut found = Vec::new();
        collect_with_any_class(&state.nodes, *scope, classes, &mut found);
        found.into_iter().find(|node| node != scope)
    }

    fn has_class(&self, element: &NodeId, class: &str) -> bool {
        self.read(*element, |node| node.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    fn add_class(&self, element: &NodeId, class: &str) {
        let added = self.with_node(*element, |node| {
            if !node.classes.iter().any(|c| c == class) {
                node.classes.push(class.to_owned());
            }
        });
        if let Err(err) = added {
            trace!(?element, class, error = %err, "add_class ignored");
        }
    }

    fn remove_class(&self, element: &NodeId, class: &str) {
        if let Err(err) = self.with_node(*element, |node| node.classes.retain(|c| c.as_str() != class)) {
            trace!(?element, class, error = %err, "remove_class ignored");
        }
    }

    fn create_element(&self, tag: &str) -> EnhanceResult<NodeId> {
        let mut state = self.state.borrow_mut();
        state.nodes.push(Node::new(tag));
        Ok(NodeId(state.nodes.len() - 1))
    }

    fn set_attribute(&self, element: &NodeId, name: &str, value: &str) -> EnhanceResult<()> {
        self.with_node(*element, |node| {
            node.attributes.insert(name.to_owned(), value.to_owned());
        })
    }

    fn set_text(&self, element: &NodeId, text: &str) {
        if let Err(err) = self.with_node(*element, |node| node.text = text.to_owned()) {
            trace!(?element, error = %err, "set_text ignored");
        }
    }

    fn set_style(&self, element: &NodeId, property: &str, value: &str) -> EnhanceResult<()> {
        self.with_node(*element, |node| {
            if value.is_empty() {
                node.styles.shift_remove(property);
            } else {
                node.styles.insert(property.to_owned(), value.to_owned());
            }
        })
    }

    fn computed_position(&self, element: &NodeId) -> Option<String> {
        self.read(*element, |node| {
            node.styles
                .get("position")
                .cloned()
                .or_else(|| node.stylesheet_position.clone())
                .unwrap_or_else(|| "static".to_owned())
        })
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> EnhanceResult<()> {
        if *child == BODY || self.is_inclusive_ancestor(*child, *parent) {
            return Err(EnhanceError::Host(format!(
                "cannot append {child:?} under its own subtree {parent:?}"
            )));
        }
        let connected = self.is_inclusive_ancestor(BODY, *parent);

        let mut state = self.state.borrow_mut();
        if state.nodes.get(parent.0).is_none() || state.nodes.get(child.0).is_none() {
            return Err(EnhanceError::Host(format!(
                "unknown node in append {parent:?} <- {child:?}"
            )));
        }
        if let Some(old_parent) = state.nodes[child.0].parent {
            state.nodes[old_parent.0].children.retain(|c| c != child);
        }
        state.nodes[child.0].parent = Some(*parent);
        state.nodes[parent.0].children.push(*child);
        if connected {
            state.pending_insertions.push(*child);
        }
        Ok(())
    }

    fn listen(
        &self,
        target: &NodeId,
        kind: EventKind,
        handler: EventHandler<NodeId>,
    ) -> EnhanceResult<()> {
        let mut state = self.state.borrow_mut();
        if state.reject_listeners {
            return Err(EnhanceError::Host(format!("listener on {target:?} rejected")));
        }
        state.listeners.push(Listener {
            target: ListenerTarget::Element(*target),
            kind,
            handler,
        });
        Ok(())
    }

    fn listen_document(&self, kind: EventKind, handler: EventHandler<NodeId>) -> EnhanceResult<()> {
        let mut state = self.state.borrow_mut();
        if state.reject_listeners {
            return Err(EnhanceError::Host("document listener rejected".to_owned()));
        }
        state.listeners.push(Listener {
            target: ListenerTarget::Document,
            kind,
            handler,
        });
        Ok(())
    }

    fn observe_insertions(
        &self,
        root: &NodeId,
        handler: InsertionHandler<NodeId>,
    ) -> EnhanceResult<()> {
        self.state.borrow_mut().observers.push(Observer {
            root: *root,
            handler,
        });
        Ok(())
    }

    fn when_ready(&self, task: Box<dyn FnOnce()>) {
        let run_now = {
            let mut state = self.state.borrow_mut();
            if state.ready {
                Some(task)
            } else {
                state.ready_tasks.push(task);
                None
            }
        };
        if let Some(task) = run_now {
            task();
        }
    }
}
