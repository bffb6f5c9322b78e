mod support;

use std::rc::Rc;

use chart_enhance::api::{ControlInjector, FULLSCREEN_CONTROL_CLASS, FullscreenModal, Labels};
use chart_enhance::core::FullscreenLayoutConfig;
use chart_enhance::host::memory::{MemoryHost, NodeId};
use chart_enhance::host::{Dom, PlotOptions};
use serde_json::json;
use support::{add_chart, bar_trace};

fn injector(host: &MemoryHost) -> (Rc<FullscreenModal<NodeId>>, ControlInjector<NodeId>) {
    let modal = FullscreenModal::new(
        host.context(),
        FullscreenLayoutConfig::default(),
        PlotOptions::default(),
        Labels::default(),
    );
    let injector = ControlInjector::new(host.context(), modal.clone(), Labels::default());
    (modal, injector)
}

#[test]
fn inject_is_idempotent() {
    let host = MemoryHost::new();
    let chart = add_chart(&host, vec![bar_trace(&["#3CB44B"])], json!({}));
    let (_modal, injector) = injector(&host);

    assert!(injector.inject(&chart).unwrap());
    assert!(!injector.inject(&chart).unwrap());
    assert!(injector.has_control(&chart));

    let controls = host.dom.descendants_with_class(chart, FULLSCREEN_CONTROL_CLASS);
    assert_eq!(controls.len(), 1);
    assert_eq!(host.dom.tag(controls[0]).as_deref(), Some("button"));
    assert_eq!(host.dom.text(controls[0]), "⛶ Expandir");
    assert_eq!(
        host.dom.attribute(controls[0], "title").as_deref(),
        Some("Abrir em tela cheia")
    );
}

#[test]
fn statically_positioned_chart_becomes_relative() {
    let host = MemoryHost::new();
    let chart = add_chart(&host, vec![bar_trace(&["#3CB44B"])], json!({}));
    let (_modal, injector) = injector(&host);

    injector.inject(&chart).unwrap();

    assert_eq!(host.dom.inline_style(chart, "position").as_deref(), Some("relative"));
}

#[test]
fn positioned_chart_keeps_its_position() {
    let host = MemoryHost::new();
    let chart = add_chart(&host, vec![bar_trace(&["#3CB44B"])], json!({}));
    host.dom.set_stylesheet_position(chart, "absolute");
    let (_modal, injector) = injector(&host);

    injector.inject(&chart).unwrap();

    assert_eq!(host.dom.inline_style(chart, "position"), None);
}

#[test]
fn control_click_opens_fullscreen_without_bubbling() {
    let host = MemoryHost::new();
    let chart = add_chart(&host, vec![bar_trace(&["#3CB44B"])], json!({}));
    let (modal, injector) = injector(&host);
    injector.inject(&chart).unwrap();
    let control = host.dom.descendants_with_class(chart, FULLSCREEN_CONTROL_CLASS)[0];

    let event = host.dom.click(control);

    assert!(event.default_prevented());
    assert!(event.propagation_stopped());
    assert!(modal.is_open());
    assert_eq!(modal.session().unwrap().source, chart);
}

#[test]
fn control_on_unrendered_chart_does_nothing_when_clicked() {
    let host = MemoryHost::new();
    let chart = host
        .dom
        .insert_element(host.dom.body(), "div", &["plotly-graph-div"])
        .unwrap();
    let (modal, injector) = injector(&host);
    injector.inject(&chart).unwrap();
    let control = host.dom.descendants_with_class(chart, FULLSCREEN_CONTROL_CLASS)[0];

    host.dom.click(control);

    assert!(!modal.is_open());
    assert!(modal.overlay().is_none());
}
