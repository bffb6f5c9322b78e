use chart_enhance::api::{DEFAULT_CHART_MARKERS, DEFAULT_STORAGE_KEY, WatcherConfig, parse_persisted};
use chart_enhance::core::FullscreenLayoutConfig;
use chart_enhance::host::KeyValueStore;
use chart_enhance::host::memory::MemoryHost;
use chart_enhance::{EnhanceError, EnhancementConfig};
use std::time::Duration;

#[test]
fn empty_json_yields_defaults() {
    let config = EnhancementConfig::from_json_str("{}").unwrap();
    assert_eq!(config, EnhancementConfig::default());
    assert_eq!(config.chart_markers, DEFAULT_CHART_MARKERS.map(str::to_owned).to_vec());
    assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    assert_eq!(config.recolor_on_load_delay(), Duration::from_millis(1000));
    assert_eq!(
        config.watcher.rescan_checkpoints().collect::<Vec<_>>(),
        vec![Duration::from_millis(1000), Duration::from_millis(3000)]
    );
    assert_eq!(config.watcher.mutation_rescan_delay(), Duration::from_millis(100));
}

#[test]
fn default_storage_key_reads_existing_saved_preferences() {
    let host = MemoryHost::new();
    host.store.set("bbb26-colorblind-mode", "true").unwrap();
    assert_eq!(DEFAULT_STORAGE_KEY, "bbb26-colorblind-mode");
    assert!(parse_persisted(host.store.get(&EnhancementConfig::default().storage_key).as_deref()));
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let config = EnhancementConfig::from_json_str(
        r#"{
            "storage_key": "my-dashboard",
            "fullscreen_layout": { "font_scale": 1.5 },
            "labels": { "fullscreen_text": "Fullscreen" }
        }"#,
    )
    .unwrap();
    assert_eq!(config.storage_key, "my-dashboard");
    assert_eq!(config.fullscreen_layout.font_scale, 1.5);
    assert_eq!(
        config.fullscreen_layout.margin_floors,
        FullscreenLayoutConfig::default().margin_floors
    );
    assert_eq!(config.labels.fullscreen_text, "Fullscreen");
    assert_eq!(config.labels.close_text, "×");
}

#[test]
fn config_survives_pretty_json() {
    let config = EnhancementConfig::default()
        .with_storage_key("k")
        .with_watcher(WatcherConfig {
            rescan_checkpoints_ms: vec![500],
            mutation_rescan_delay_ms: 50,
        });
    let text = config.to_json_pretty().unwrap();
    assert_eq!(EnhancementConfig::from_json_str(&text).unwrap(), config);
}

#[test]
fn malformed_json_is_an_invalid_config() {
    let err = EnhancementConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, EnhanceError::InvalidConfig(_)));
}

#[test]
fn validation_rejects_unusable_values() {
    let selector_marker = EnhancementConfig::default().with_chart_markers([".js-plotly-plot"]);
    assert!(selector_marker.validate().is_err());

    let blank_key = EnhancementConfig::default().with_storage_key("  ");
    assert!(blank_key.validate().is_err());

    let zero_scale = EnhancementConfig::default().with_fullscreen_layout(FullscreenLayoutConfig {
        font_scale: 0.0,
        ..FullscreenLayoutConfig::default()
    });
    assert!(zero_scale.validate().is_err());

    let negative_floor =
        EnhancementConfig::default().with_fullscreen_layout(FullscreenLayoutConfig {
            title_font_floor: -1.0,
            ..FullscreenLayoutConfig::default()
        });
    assert!(negative_floor.validate().is_err());

    assert!(EnhancementConfig::default().validate().is_ok());
}

#[test]
fn only_exact_true_is_persisted_active() {
    assert!(parse_persisted(Some("true")));
    for value in [None, Some("false"), Some("True"), Some("1"), Some(" true")] {
        assert!(!parse_persisted(value), "{value:?}");
    }
}
