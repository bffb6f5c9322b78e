use chart_enhance::EnhancementConfig;
use chart_enhance::core::{ColorTable, FullscreenLayoutConfig, Layout, Trace, map_color};
use chart_enhance::host::Dom;
use chart_enhance::host::memory::MemoryHost;
use criterion::{Criterion, criterion_group, criterion_main};
use serde_json::json;
use std::hint::black_box;

const PALETTE: [&str; 5] = ["#E6194B", "#3CB44B", "rgb(60, 180, 75)", "#4CAF50", "#777777"];

fn bar_trace(points: usize) -> Trace {
    let colors: Vec<&str> = (0..points).map(|i| PALETTE[i % PALETTE.len()]).collect();
    Trace::from_value(json!({
        "type": "bar",
        "y": (0..points).collect::<Vec<_>>(),
        "marker": { "color": colors },
        "line": { "color": "#E6194B" },
    }))
    .expect("object trace")
}

fn bench_map_color(c: &mut Criterion) {
    c.bench_function("map_color_mixed_palette", |b| {
        b.iter(|| {
            for color in PALETTE {
                let _ = map_color(black_box(color), black_box(true));
            }
        })
    });
}

fn bench_trace_recolor_10k(c: &mut Criterion) {
    let table = ColorTable::default();
    let trace = bar_trace(10_000);

    c.bench_function("trace_recolor_10k_points", |b| {
        b.iter(|| {
            let _ = black_box(&trace).recolored(&table, black_box(true));
        })
    });
}

fn bench_fullscreen_layout(c: &mut Criterion) {
    let config = FullscreenLayoutConfig::default();
    let layout = Layout::from_value(json!({
        "width": 800,
        "height": 450,
        "font": { "size": 12 },
        "title": { "text": "Votos por semana", "font": { "size": 16 } },
        "margin": { "l": 40, "r": 20, "t": 50, "b": 40 },
        "xaxis": { "tickangle": -45 },
    }));

    c.bench_function("fullscreen_layout_derivation", |b| {
        b.iter(|| {
            let _ = black_box(&layout).fullscreen(&config);
        })
    });
}

fn bench_toggle_50_charts(c: &mut Criterion) {
    let host = MemoryHost::new();
    for _ in 0..50 {
        let chart = host
            .dom
            .insert_element(host.dom.body(), "div", &["js-plotly-plot"])
            .expect("insert chart");
        host.charts.seed(
            chart,
            vec![bar_trace(200), bar_trace(200)],
            Layout::default(),
        );
    }
    let layer = chart_enhance::install(host.context(), EnhancementConfig::default())
        .expect("layer install");

    c.bench_function("toggle_50_charts", |b| {
        b.iter(|| {
            let _ = black_box(layer.recolor().toggle());
        })
    });
}

criterion_group!(
    benches,
    bench_map_color,
    bench_trace_recolor_10k,
    bench_fullscreen_layout,
    bench_toggle_50_charts
);
criterion_main!(benches);
