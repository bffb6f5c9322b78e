mod support;

use std::time::Duration;

use chart_enhance::api::{DEFAULT_STORAGE_KEY, MODE_CLASS, RecolorReport, TOGGLE_CLASS, INDICATOR_CLASS};
use chart_enhance::host::memory::MemoryHost;
use chart_enhance::host::{Dom, KeyValueStore};
use serde_json::json;
use support::{add_chart, bar_trace, build_layer, chart_data, installed_layer, trace};

#[test]
fn toggle_recolors_every_chart_and_back() {
    let host = MemoryHost::new();
    let first = add_chart(&host, vec![bar_trace(&["#3CB44B", "#E6194B"])], json!({}));
    let second = add_chart(
        &host,
        vec![trace(json!({ "line": { "color": "#E6194B" } }))],
        json!({ "title": { "text": "Saldo" } }),
    );
    let layer = build_layer(&host);

    let report = layer.recolor().toggle();
    assert_eq!(
        report,
        RecolorReport {
            recolored: 2,
            skipped: 0,
            failed: 0
        }
    );
    assert_eq!(
        chart_data(&host, first)[0].marker_color(),
        Some(&json!(["#1976D2", "#E65100"]))
    );
    assert_eq!(chart_data(&host, second)[0].line_color(), Some(&json!("#E65100")));

    layer.recolor().toggle();
    assert_eq!(
        chart_data(&host, first)[0].marker_color(),
        Some(&json!(["#3CB44B", "#E6194B"]))
    );
    assert_eq!(chart_data(&host, second)[0].line_color(), Some(&json!("#E6194B")));
}

#[test]
fn resubmission_keeps_the_chart_layout() {
    let host = MemoryHost::new();
    let chart = add_chart(
        &host,
        vec![bar_trace(&["#E6194B"])],
        json!({ "barmode": "stack", "height": 320 }),
    );
    let layer = build_layer(&host);

    layer.recolor().apply_recoloring(true);

    let calls = host.charts.render_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].container, chart);
    assert_eq!(calls[0].layout.get("barmode"), Some(&json!("stack")));
    assert_eq!(calls[0].layout.get("height"), Some(&json!(320)));
    assert_eq!(calls[0].options, None);
}

#[test]
fn toggling_twice_restores_preference_and_storage() {
    let host = MemoryHost::new();
    host.store.set(DEFAULT_STORAGE_KEY, "false").unwrap();
    let layer = installed_layer(&host);

    assert!(!layer.recolor().is_active());
    layer.recolor().toggle();
    assert!(layer.recolor().is_active());
    assert_eq!(host.store.get(DEFAULT_STORAGE_KEY).as_deref(), Some("true"));

    layer.recolor().toggle();
    assert!(!layer.recolor().is_active());
    assert_eq!(host.store.get(DEFAULT_STORAGE_KEY).as_deref(), Some("false"));
}

#[test]
fn toggle_updates_body_class_and_pressed_state() {
    let host = MemoryHost::new();
    let layer = installed_layer(&host);
    let body = host.dom.body();
    let button = layer.recolor().toggle_control().expect("toggle installed");

    assert_eq!(host.dom.attribute(button, "aria-pressed").as_deref(), Some("false"));
    assert!(!host.dom.has_class(&body, MODE_CLASS));

    host.dom.click(button);
    assert!(layer.recolor().is_active());
    assert!(host.dom.has_class(&body, MODE_CLASS));
    assert_eq!(host.dom.attribute(button, "aria-pressed").as_deref(), Some("true"));

    host.dom.click(button);
    assert!(!host.dom.has_class(&body, MODE_CLASS));
    assert_eq!(host.dom.attribute(button, "aria-pressed").as_deref(), Some("false"));
}

#[test]
fn controls_are_installed_once_with_labels() {
    let host = MemoryHost::new();
    let layer = installed_layer(&host);
    layer.recolor().install_controls().unwrap();

    let body = host.dom.body();
    let toggles = host.dom.descendants_with_class(body, TOGGLE_CLASS);
    assert_eq!(toggles.len(), 1);
    assert_eq!(host.dom.descendants_with_class(body, INDICATOR_CLASS).len(), 1);
    assert_eq!(
        host.dom.attribute(toggles[0], "aria-label").as_deref(),
        Some("Alternar modo daltonismo")
    );
    assert_eq!(host.dom.descendants_with_class(toggles[0], "icon-normal").len(), 1);
    assert_eq!(host.dom.descendants_with_class(toggles[0], "icon-active").len(), 1);
}

#[test]
fn malformed_stored_value_reads_as_inactive() {
    for stored in ["yes", "TRUE", "1", ""] {
        let host = MemoryHost::new();
        host.store.set(DEFAULT_STORAGE_KEY, stored).unwrap();
        let layer = installed_layer(&host);
        assert!(!layer.recolor().is_active(), "stored {stored:?}");
        assert!(!host.dom.has_class(&host.dom.body(), MODE_CLASS));
    }
}

#[test]
fn stored_preference_recolors_after_load_delay() {
    let host = MemoryHost::new();
    host.store.set(DEFAULT_STORAGE_KEY, "true").unwrap();
    let chart = add_chart(&host, vec![bar_trace(&["#E6194B"])], json!({}));
    let layer = installed_layer(&host);

    assert!(layer.recolor().is_active());
    assert!(host.dom.has_class(&host.dom.body(), MODE_CLASS));
    let button = layer.recolor().toggle_control().unwrap();
    assert_eq!(host.dom.attribute(button, "aria-pressed").as_deref(), Some("true"));

    host.scheduler.advance(Duration::from_millis(999));
    assert_eq!(host.charts.render_count_for(chart), 0);

    host.scheduler.advance(Duration::from_millis(1));
    assert_eq!(host.charts.render_count_for(chart), 1);
    assert_eq!(chart_data(&host, chart)[0].marker_color(), Some(&json!(["#E65100"])));
}

#[test]
fn deferred_recolor_follows_the_current_preference() {
    let host = MemoryHost::new();
    host.store.set(DEFAULT_STORAGE_KEY, "true").unwrap();
    let chart = add_chart(&host, vec![bar_trace(&["#E6194B"])], json!({}));
    let layer = installed_layer(&host);

    // User switches the mode off before the deferred pass runs.
    layer.recolor().toggle();
    host.scheduler.advance(Duration::from_millis(1000));

    assert_eq!(chart_data(&host, chart)[0].marker_color(), Some(&json!(["#E6194B"])));
}

#[test]
fn failing_chart_does_not_stop_the_pass() {
    let host = MemoryHost::new();
    let broken = add_chart(&host, vec![bar_trace(&["#E6194B"])], json!({}));
    let healthy = add_chart(&host, vec![bar_trace(&["#3CB44B"])], json!({}));
    host.charts.fail_renders_for(broken);
    let layer = build_layer(&host);

    let report = layer.recolor().apply_recoloring(true);

    assert_eq!(report.failed, 1);
    assert_eq!(report.recolored, 1);
    assert_eq!(chart_data(&host, healthy)[0].marker_color(), Some(&json!(["#1976D2"])));
    assert_eq!(chart_data(&host, broken)[0].marker_color(), Some(&json!(["#E6194B"])));
}

#[test]
fn charts_without_data_or_colors_are_skipped() {
    let host = MemoryHost::new();
    let _empty = add_chart(&host, Vec::new(), json!({}));
    let _plain = add_chart(&host, vec![trace(json!({ "type": "bar", "y": [1] }))], json!({}));
    let _unrendered = host
        .dom
        .insert_element(host.dom.body(), "div", &["js-plotly-plot"])
        .unwrap();
    let layer = build_layer(&host);

    let report = layer.recolor().apply_recoloring(true);

    assert_eq!(report.skipped, 3);
    assert_eq!(report.recolored, 0);
    assert!(host.charts.render_calls().is_empty());
}

#[test]
fn chart_with_unreadable_layout_is_left_untouched() {
    let host = MemoryHost::new();
    let chart = host
        .dom
        .insert_element(host.dom.body(), "div", &support::CHART_CLASSES)
        .unwrap();
    host.charts.seed_without_layout(chart, vec![bar_trace(&["#E6194B"])]);
    let healthy = add_chart(&host, vec![bar_trace(&["#3CB44B"])], json!({}));
    let layer = build_layer(&host);

    let report = layer.recolor().apply_recoloring(true);

    assert_eq!(
        report,
        RecolorReport {
            recolored: 1,
            skipped: 1,
            failed: 0
        }
    );
    assert_eq!(host.charts.render_count_for(chart), 0);
    assert_eq!(chart_data(&host, chart)[0].marker_color(), Some(&json!(["#E6194B"])));
    assert_eq!(chart_data(&host, healthy)[0].marker_color(), Some(&json!(["#1976D2"])));
}

#[test]
fn recolor_only_rewrites_color_fields() {
    let host = MemoryHost::new();
    let chart = add_chart(
        &host,
        vec![trace(json!({
            "type": "scatter",
            "x": [1, 2, 3],
            "customdata": [[1, "a"], [2, "b"]],
            "marker": { "color": "#E6194B", "size": 8 },
            "line": { "color": "#3CB44B", "width": 2 },
        }))],
        json!({}),
    );
    let layer = build_layer(&host);

    layer.recolor().apply_recoloring(true);

    let data = chart_data(&host, chart);
    assert_eq!(data[0].fields()["x"], json!([1, 2, 3]));
    assert_eq!(data[0].fields()["customdata"], json!([[1, "a"], [2, "b"]]));
    assert_eq!(data[0].fields()["marker"], json!({ "color": "#E65100", "size": 8 }));
    assert_eq!(data[0].fields()["line"], json!({ "color": "#1976D2", "width": 2 }));
}

#[test]
fn storage_write_failure_keeps_the_in_memory_toggle() {
    let host = MemoryHost::new();
    host.store.set_read_only(true);
    let layer = build_layer(&host);

    layer.recolor().toggle();

    assert!(layer.recolor().is_active());
    assert!(host.store.get(DEFAULT_STORAGE_KEY).is_none());
}

#[test]
fn recoloring_an_already_recolored_page_is_stable() {
    let host = MemoryHost::new();
    let chart = add_chart(&host, vec![bar_trace(&["#E6194B", "#3CB44B"])], json!({}));
    let layer = build_layer(&host);

    layer.recolor().apply_recoloring(true);
    let once = chart_data(&host, chart);
    layer.recolor().apply_recoloring(true);

    assert_eq!(chart_data(&host, chart), once);
}
