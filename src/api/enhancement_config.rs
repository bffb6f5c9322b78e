use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::FullscreenLayoutConfig;
use crate::error::{EnhanceError, EnhanceResult};
use crate::host::PlotOptions;

/// Classes the charting library puts on containers it has rendered into.
pub const DEFAULT_CHART_MARKERS: [&str; 2] = ["js-plotly-plot", "plotly-graph-div"];

pub const DEFAULT_STORAGE_KEY: &str = "bbb26-colorblind-mode";

/// Timing of the attachment watcher's re-scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatcherConfig {
    /// Re-scan checkpoints measured from installation.
    #[serde(default = "default_rescan_checkpoints_ms")]
    pub rescan_checkpoints_ms: Vec<u64>,
    /// Delay between an insertion notice and the re-scan it triggers.
    #[serde(default = "default_mutation_rescan_delay_ms")]
    pub mutation_rescan_delay_ms: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            rescan_checkpoints_ms: default_rescan_checkpoints_ms(),
            mutation_rescan_delay_ms: default_mutation_rescan_delay_ms(),
        }
    }
}

impl WatcherConfig {
    #[must_use]
    pub fn rescan_checkpoints(&self) -> impl Iterator<Item = Duration> + '_ {
        self.rescan_checkpoints_ms
            .iter()
            .map(|ms| Duration::from_millis(*ms))
    }

    #[must_use]
    pub fn mutation_rescan_delay(&self) -> Duration {
        Duration::from_millis(self.mutation_rescan_delay_ms)
    }

    /// Longest time between a chart appearing and a re-scan covering it.
    #[must_use]
    pub fn max_rescan_delay(&self) -> Duration {
        let checkpoint = self.rescan_checkpoints_ms.iter().copied().max().unwrap_or(0);
        Duration::from_millis(checkpoint.max(self.mutation_rescan_delay_ms))
    }
}

/// Literal strings shown by injected controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    #[serde(default = "default_toggle_aria_label")]
    pub toggle_aria_label: String,
    #[serde(default = "default_toggle_title")]
    pub toggle_title: String,
    #[serde(default = "default_toggle_icon_normal")]
    pub toggle_icon_normal: String,
    #[serde(default = "default_toggle_icon_active")]
    pub toggle_icon_active: String,
    #[serde(default = "default_indicator_text")]
    pub indicator_text: String,
    #[serde(default = "default_fullscreen_text")]
    pub fullscreen_text: String,
    #[serde(default = "default_fullscreen_title")]
    pub fullscreen_title: String,
    #[serde(default = "default_close_text")]
    pub close_text: String,
    #[serde(default = "default_close_title")]
    pub close_title: String,
    #[serde(default = "default_overlay_hint")]
    pub overlay_hint: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            toggle_aria_label: default_toggle_aria_label(),
            toggle_title: default_toggle_title(),
            toggle_icon_normal: default_toggle_icon_normal(),
            toggle_icon_active: default_toggle_icon_active(),
            indicator_text: default_indicator_text(),
            fullscreen_text: default_fullscreen_text(),
            fullscreen_title: default_fullscreen_title(),
            close_text: default_close_text(),
            close_title: default_close_title(),
            overlay_hint: default_overlay_hint(),
        }
    }
}

/// Public installation configuration.
///
/// Serializable so a page can ship overrides as a JSON blob; every field has a
/// default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementConfig {
    #[serde(default = "default_chart_markers")]
    pub chart_markers: Vec<String>,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Delay before recoloring charts when the stored preference is active.
    #[serde(default = "default_recolor_on_load_delay_ms")]
    pub recolor_on_load_delay_ms: u64,
    #[serde(default)]
    pub watcher: WatcherConfig,
    #[serde(default)]
    pub fullscreen_layout: FullscreenLayoutConfig,
    #[serde(default)]
    pub plot_options: PlotOptions,
    #[serde(default)]
    pub labels: Labels,
}

impl Default for EnhancementConfig {
    fn default() -> Self {
        Self {
            chart_markers: default_chart_markers(),
            storage_key: default_storage_key(),
            recolor_on_load_delay_ms: default_recolor_on_load_delay_ms(),
            watcher: WatcherConfig::default(),
            fullscreen_layout: FullscreenLayoutConfig::default(),
            plot_options: PlotOptions::default(),
            labels: Labels::default(),
        }
    }
}

impl EnhancementConfig {
    /// Sets the classes that identify chart containers.
    #[must_use]
    pub fn with_chart_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.chart_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the storage key holding the colorblind preference.
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    #[must_use]
    pub fn with_recolor_on_load_delay_ms(mut self, delay_ms: u64) -> Self {
        self.recolor_on_load_delay_ms = delay_ms;
        self
    }

    #[must_use]
    pub fn with_watcher(mut self, watcher: WatcherConfig) -> Self {
        self.watcher = watcher;
        self
    }

    #[must_use]
    pub fn with_fullscreen_layout(mut self, layout: FullscreenLayoutConfig) -> Self {
        self.fullscreen_layout = layout;
        self
    }

    #[must_use]
    pub fn with_plot_options(mut self, options: PlotOptions) -> Self {
        self.plot_options = options;
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    #[must_use]
    pub fn recolor_on_load_delay(&self) -> Duration {
        Duration::from_millis(self.recolor_on_load_delay_ms)
    }

    pub fn validate(&self) -> EnhanceResult<()> {
        if self.chart_markers.is_empty() {
            return Err(EnhanceError::InvalidConfig(
                "at least one chart marker class is required".to_owned(),
            ));
        }
        if let Some(marker) = self
            .chart_markers
            .iter()
            .find(|marker| !is_class_name(marker))
        {
            return Err(EnhanceError::InvalidConfig(format!(
                "chart marker `{marker}` is not a plain class name"
            )));
        }
        if self.storage_key.trim().is_empty() {
            return Err(EnhanceError::InvalidConfig(
                "storage key must not be empty".to_owned(),
            ));
        }

        let layout = &self.fullscreen_layout;
        if !layout.font_scale.is_finite() || layout.font_scale <= 0.0 {
            return Err(EnhanceError::InvalidConfig(
                "fullscreen font scale must be finite and > 0".to_owned(),
            ));
        }
        let margins = [layout.margin_floors, layout.margin_fallbacks];
        let values = [
            ("font_floor", layout.font_floor),
            ("font_fallback", layout.font_fallback),
            ("title_font_floor", layout.title_font_floor),
            ("title_font_fallback", layout.title_font_fallback),
        ]
        .into_iter()
        .chain(margins.iter().flat_map(|m| {
            [
                ("margin.left", m.left),
                ("margin.right", m.right),
                ("margin.top", m.top),
                ("margin.bottom", m.bottom),
            ]
        }));
        for (name, value) in values {
            if !value.is_finite() || value < 0.0 {
                return Err(EnhanceError::InvalidConfig(format!(
                    "fullscreen `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(input: &str) -> EnhanceResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            EnhanceError::InvalidConfig(format!("failed to parse config json: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> EnhanceResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            EnhanceError::InvalidConfig(format!("failed to serialize config json: {e}"))
        })
    }
}

/// Markers are spliced into CSS selectors by the web host, so only plain
/// class identifiers are accepted.
fn is_class_name(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '-' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn default_chart_markers() -> Vec<String> {
    DEFAULT_CHART_MARKERS
        .iter()
        .map(|marker| (*marker).to_owned())
        .collect()
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_owned()
}

fn default_recolor_on_load_delay_ms() -> u64 {
    1_000
}

fn default_rescan_checkpoints_ms() -> Vec<u64> {
    vec![1_000, 3_000]
}

fn default_mutation_rescan_delay_ms() -> u64 {
    100
}

fn default_toggle_aria_label() -> String {
    "Alternar modo daltonismo".to_owned()
}

fn default_toggle_title() -> String {
    "Modo daltonismo (azul-laranja)".to_owned()
}

fn default_toggle_icon_normal() -> String {
    "👁️".to_owned()
}

fn default_toggle_icon_active() -> String {
    "🔵".to_owned()
}

fn default_indicator_text() -> String {
    "Modo daltonismo ativo".to_owned()
}

fn default_fullscreen_text() -> String {
    "⛶ Expandir".to_owned()
}

fn default_fullscreen_title() -> String {
    "Abrir em tela cheia".to_owned()
}

fn default_close_text() -> String {
    "×".to_owned()
}

fn default_close_title() -> String {
    "Fechar (Esc)".to_owned()
}

fn default_overlay_hint() -> String {
    "Pressione ESC ou clique fora para fechar".to_owned()
}

#[cfg(test)]
mod tests {
    use super::is_class_name;

    #[test]
    fn class_names_reject_selector_syntax() {
        assert!(is_class_name("js-plotly-plot"));
        assert!(is_class_name("_private"));
        assert!(!is_class_name(""));
        assert!(!is_class_name("9lives"));
        assert!(!is_class_name("a, b"));
        assert!(!is_class_name(".dotted"));
    }
}
