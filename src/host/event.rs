use std::cell::Cell;
use std::rc::Rc;

/// DOM event kinds the enhancement layer subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyDown,
}

impl EventKind {
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::KeyDown => "keydown",
        }
    }
}

/// Host-neutral view of one dispatched DOM event.
///
/// Handlers request default-prevention and propagation stop through flags;
/// the host applies them to the native event once the handler returns.
#[derive(Debug)]
pub struct DomEvent<E> {
    kind: EventKind,
    target: Option<E>,
    key: Option<String>,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl<E> DomEvent<E> {
    #[must_use]
    pub fn new(kind: EventKind, target: Option<E>) -> Self {
        Self {
            kind,
            target,
            key: None,
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    #[must_use]
    pub fn click(target: E) -> Self {
        Self::new(EventKind::Click, Some(target))
    }

    #[must_use]
    pub fn key_down(key: impl Into<String>, target: Option<E>) -> Self {
        let mut event = Self::new(EventKind::KeyDown, target);
        event.key = Some(key.into());
        event
    }

    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    #[must_use]
    pub fn target(&self) -> Option<&E> {
        self.target.as_ref()
    }

    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    #[must_use]
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

pub type EventHandler<E> = Rc<dyn Fn(&DomEvent<E>)>;

/// Receives the element nodes of one batch of insertions.
pub type InsertionHandler<E> = Rc<dyn Fn(&[E])>;
