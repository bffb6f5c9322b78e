use serde::{Deserialize, Serialize};

/// Render options passed through to the charting library.
///
/// Field names serialize in the library's own camelCase vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotOptions {
    #[serde(default = "default_true")]
    pub responsive: bool,
    #[serde(default = "default_true")]
    pub display_mode_bar: bool,
    #[serde(default = "default_mode_bar_buttons")]
    pub mode_bar_buttons_to_add: Vec<String>,
    #[serde(default, rename = "displaylogo")]
    pub display_logo: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            responsive: true,
            display_mode_bar: true,
            mode_bar_buttons_to_add: default_mode_bar_buttons(),
            display_logo: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_mode_bar_buttons() -> Vec<String> {
    vec![
        "hoverClosestCartesian".to_owned(),
        "hoverCompareCartesian".to_owned(),
    ]
}
