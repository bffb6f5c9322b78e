use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A chart layout as read from the charting library.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout(Map<String, Value>);

/// Minimum margins applied around a fullscreen chart, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginFloors {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// Sizing rules used to derive a fullscreen layout from a chart's own layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FullscreenLayoutConfig {
    /// Multiplier applied to existing font sizes.
    #[serde(default = "default_font_scale")]
    pub font_scale: f64,
    /// Lower bound for the scaled overall font size.
    #[serde(default = "default_font_floor")]
    pub font_floor: f64,
    /// Assumed overall font size when the layout declares none.
    #[serde(default = "default_font_fallback")]
    pub font_fallback: f64,
    /// Lower bound for the scaled title font size.
    #[serde(default = "default_title_font_floor")]
    pub title_font_floor: f64,
    /// Assumed title font size when the layout declares none.
    #[serde(default = "default_title_font_fallback")]
    pub title_font_fallback: f64,
    #[serde(default = "default_margin_floors")]
    pub margin_floors: MarginFloors,
    /// Margins assumed when the layout leaves a side unset or zero.
    #[serde(default = "default_margin_fallbacks")]
    pub margin_fallbacks: MarginFloors,
}

impl Default for FullscreenLayoutConfig {
    fn default() -> Self {
        Self {
            font_scale: default_font_scale(),
            font_floor: default_font_floor(),
            font_fallback: default_font_fallback(),
            title_font_floor: default_title_font_floor(),
            title_font_fallback: default_title_font_fallback(),
            margin_floors: default_margin_floors(),
            margin_fallbacks: default_margin_fallbacks(),
        }
    }
}

fn default_font_scale() -> f64 {
    1.2
}

fn default_font_floor() -> f64 {
    14.0
}

fn default_font_fallback() -> f64 {
    12.0
}

fn default_title_font_floor() -> f64 {
    18.0
}

fn default_title_font_fallback() -> f64 {
    16.0
}

fn default_margin_floors() -> MarginFloors {
    MarginFloors {
        left: 80.0,
        right: 40.0,
        top: 80.0,
        bottom: 70.0,
    }
}

fn default_margin_fallbacks() -> MarginFloors {
    MarginFloors {
        left: 70.0,
        right: 30.0,
        top: 70.0,
        bottom: 60.0,
    }
}

impl Layout {
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Builds a layout from a JSON value. Anything but an object is treated as
    /// an empty layout.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self(fields),
            _ => Self::default(),
        }
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Derives the layout used for the fullscreen clone.
    ///
    /// Works on a deep copy; `self` is never touched. Explicit width/height are
    /// dropped in favor of autosizing, fonts are scaled with floors, and
    /// margins are widened to the configured floors on all four sides.
    #[must_use]
    pub fn fullscreen(&self, config: &FullscreenLayoutConfig) -> Self {
        let mut fields = self.0.clone();

        fields.insert("width".to_owned(), Value::Null);
        fields.insert("height".to_owned(), Value::Null);
        fields.insert("autosize".to_owned(), Value::Bool(true));

        if let Some(Value::Object(font)) = fields.get_mut("font") {
            scale_font_size(
                font,
                config.font_scale,
                config.font_fallback,
                config.font_floor,
            );
        }

        if let Some(Value::Object(title)) = fields.get_mut("title") {
            if let Some(Value::Object(font)) = title.get_mut("font") {
                scale_font_size(
                    font,
                    config.font_scale,
                    config.title_font_fallback,
                    config.title_font_floor,
                );
            }
        }

        let margin = fields
            .entry("margin")
            .or_insert_with(|| Value::Object(Map::new()));
        if !margin.is_object() {
            *margin = Value::Object(Map::new());
        }
        if let Value::Object(margin) = margin {
            let floors = config.margin_floors;
            let fallbacks = config.margin_fallbacks;
            for (side, floor, fallback) in [
                ("l", floors.left, fallbacks.left),
                ("r", floors.right, fallbacks.right),
                ("t", floors.top, fallbacks.top),
                ("b", floors.bottom, fallbacks.bottom),
            ] {
                let current = truthy_number(margin.get(side)).unwrap_or(fallback);
                margin.insert(side.to_owned(), number(current.max(floor)));
            }
        }

        Self(fields)
    }
}

fn scale_font_size(font: &mut Map<String, Value>, scale: f64, fallback: f64, floor: f64) {
    let size = truthy_number(font.get("size")).unwrap_or(fallback);
    font.insert("size".to_owned(), number((size * scale).max(floor)));
}

/// Reads a numeric field the way a loose `value || fallback` would. Numeric
/// strings count as numbers; missing, non-numeric, zero and NaN count as unset.
fn truthy_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|size| *size != 0.0 && !size.is_nan())
}

fn number(value: f64) -> Value {
    serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
}
