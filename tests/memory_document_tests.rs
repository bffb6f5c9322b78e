use std::rc::Rc;

use chart_enhance::host::memory::{MemoryDocument, NodeId};
use chart_enhance::host::{Dom, DomEvent, EventHandler, EventKind};

#[test]
fn infallible_writes_to_unknown_nodes_are_ignored() {
    let other = MemoryDocument::new();
    let mut foreign = other.body();
    for _ in 0..3 {
        foreign = other.create_element("div").unwrap();
    }
    let document = MemoryDocument::new();

    document.add_class(&foreign, "active");
    document.remove_class(&foreign, "active");
    document.set_text(&foreign, "ignored");

    assert!(!document.has_class(&foreign, "active"));
    assert!(document.set_attribute(&foreign, "id", "x").is_err());
    assert!(document.children(document.body()).is_empty());
}

#[test]
fn rejected_listeners_surface_as_errors() {
    let document = MemoryDocument::new();
    let element = document.create_element("div").unwrap();
    document.reject_listeners(true);

    let handler: EventHandler<NodeId> = Rc::new(|_: &DomEvent<NodeId>| {});
    assert!(document.listen(&element, EventKind::Click, handler.clone()).is_err());
    assert!(document.listen_document(EventKind::KeyDown, handler).is_err());
    assert_eq!(document.document_listener_count(EventKind::KeyDown), 0);
    assert_eq!(document.listener_count(element, EventKind::Click), 0);
}
