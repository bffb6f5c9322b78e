use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ColorTable;

/// One chart trace, kept as the library's open-ended JSON object.
///
/// Only the color-bearing fields are interpreted; everything else is carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace(Map<String, Value>);

impl Trace {
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns `None` for anything other than a JSON object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    #[must_use]
    pub fn marker_color(&self) -> Option<&Value> {
        self.nested("marker", "color")
    }

    #[must_use]
    pub fn marker_colors(&self) -> Option<&Value> {
        self.nested("marker", "colors")
    }

    #[must_use]
    pub fn line_color(&self) -> Option<&Value> {
        self.nested("line", "color")
    }

    /// Whether any of the recolorable fields is present.
    #[must_use]
    pub fn has_color_fields(&self) -> bool {
        self.marker_color().is_some()
            || self.marker_colors().is_some_and(Value::is_array)
            || self.line_color().is_some()
    }

    /// Copy of this trace with `marker.color`, `marker.colors` and
    /// `line.color` passed through `table`.
    #[must_use]
    pub fn recolored(&self, table: &ColorTable, mode_active: bool) -> Self {
        let mut fields = self.0.clone();

        if let Some(Value::Object(marker)) = fields.get_mut("marker") {
            if let Some(color) = marker.get_mut("color") {
                *color = map_color_field(table, color, mode_active);
            }
            if let Some(colors) = marker.get_mut("colors") {
                if colors.is_array() {
                    *colors = map_color_field(table, colors, mode_active);
                }
            }
        }

        if let Some(Value::Object(line)) = fields.get_mut("line") {
            if let Some(color) = line.get_mut("color") {
                *color = table.map_value(color, mode_active);
            }
        }

        Self(fields)
    }

    /// Copy of this trace taking `marker.color`, `marker.colors` and
    /// `line.color` from `colors` wherever `colors` sets them. Fields the
    /// receiver lacks a container object for are not created.
    #[must_use]
    pub fn with_colors_from(&self, colors: &Trace) -> Self {
        let mut fields = self.0.clone();
        for (outer, inner) in COLOR_FIELDS {
            let Some(value) = colors.nested(outer, inner) else {
                continue;
            };
            if let Some(Value::Object(target)) = fields.get_mut(outer) {
                target.insert(inner.to_owned(), value.clone());
            }
        }
        Self(fields)
    }

    fn nested(&self, outer: &str, inner: &str) -> Option<&Value> {
        self.0.get(outer)?.as_object()?.get(inner)
    }
}

/// `(container, field)` paths of every recolorable field.
pub const COLOR_FIELDS: [(&str, &str); 3] = [
    ("marker", "color"),
    ("marker", "colors"),
    ("line", "color"),
];

fn map_color_field(table: &ColorTable, value: &Value, mode_active: bool) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| table.map_value(item, mode_active))
                .collect(),
        ),
        other => table.map_value(other, mode_active),
    }
}

/// Reads a trace list, dropping entries that are not objects.
#[must_use]
pub fn traces_from_value(value: Value) -> Vec<Trace> {
    match value {
        Value::Array(items) => items.into_iter().filter_map(Trace::from_value).collect(),
        _ => Vec::new(),
    }
}

#[must_use]
pub fn traces_to_value(traces: &[Trace]) -> Value {
    Value::Array(
        traces
            .iter()
            .map(|trace| Value::Object(trace.0.clone()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn single_colors_under_marker_colors_are_left_alone() {
        let trace = Trace::from_value(json!({ "marker": { "colors": "#E6194B" } })).unwrap();
        let recolored = trace.recolored(&ColorTable::default(), true);
        assert_eq!(recolored.marker_colors(), Some(&json!("#E6194B")));
        assert!(!trace.has_color_fields());
    }

    #[test]
    fn color_merge_keeps_other_fields() {
        let base = Trace::from_value(json!({
            "x": [1, 2],
            "marker": { "color": "#E6194B", "size": 6 },
        }))
        .unwrap();
        let colors = Trace::from_value(json!({
            "x": ["replaced"],
            "marker": { "color": "#E65100" },
            "line": { "color": "#1976D2" },
        }))
        .unwrap();
        let merged = base.with_colors_from(&colors);
        assert_eq!(merged.fields()["x"], json!([1, 2]));
        assert_eq!(merged.fields()["marker"], json!({ "color": "#E65100", "size": 6 }));
        assert!(merged.line_color().is_none());
    }

    #[test]
    fn non_object_entries_are_dropped() {
        let traces = traces_from_value(json!([{ "type": "bar" }, 3, "x"]));
        assert_eq!(traces.len(), 1);
    }
}
