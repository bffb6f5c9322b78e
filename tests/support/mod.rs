#![allow(dead_code)]

use std::rc::Rc;

use chart_enhance::api::{EnhancementConfig, EnhancementLayer};
use chart_enhance::core::{Layout, Trace};
use chart_enhance::host::memory::{MemoryHost, NodeId};
use chart_enhance::host::{ChartLibrary, Dom};
use serde_json::{Value, json};

pub const CHART_CLASSES: [&str; 2] = ["js-plotly-plot", "plotly-graph-div"];

pub fn trace(value: Value) -> Trace {
    Trace::from_value(value).expect("trace must be a json object")
}

pub fn layout(value: Value) -> Layout {
    Layout::from_value(value)
}

pub fn bar_trace(colors: &[&str]) -> Trace {
    trace(json!({
        "type": "bar",
        "x": ["a", "b", "c"],
        "y": [1, 2, 3],
        "marker": { "color": colors },
    }))
}

/// Adds a chart container under the body and seeds it with data.
pub fn add_chart(host: &MemoryHost, data: Vec<Trace>, layout_value: Value) -> NodeId {
    let chart = host
        .dom
        .insert_element(host.dom.body(), "div", &CHART_CLASSES)
        .expect("insert chart");
    host.charts.seed(chart, data, layout(layout_value));
    chart
}

pub fn chart_data(host: &MemoryHost, chart: NodeId) -> Vec<Trace> {
    host.charts.data(&chart).expect("chart has data")
}

pub fn build_layer(host: &MemoryHost) -> Rc<EnhancementLayer<NodeId>> {
    EnhancementLayer::new(host.context(), EnhancementConfig::default()).expect("layer init")
}

pub fn installed_layer(host: &MemoryHost) -> Rc<EnhancementLayer<NodeId>> {
    chart_enhance::install(host.context(), EnhancementConfig::default()).expect("layer install")
}
