use std::borrow::Cow;

/// Negative-signal source color (red).
pub const NEGATIVE_SOURCE: &str = "#E6194B";
/// Positive-signal source color (green).
pub const POSITIVE_SOURCE: &str = "#3CB44B";
/// Colorblind-safe substitute for [`NEGATIVE_SOURCE`] (orange).
pub const NEGATIVE_SUBSTITUTE: &str = "#E65100";
/// Colorblind-safe substitute for [`POSITIVE_SOURCE`] (blue).
pub const POSITIVE_SUBSTITUTE: &str = "#1976D2";

/// One recognized source color and its colorblind-safe substitute.
///
/// `hex_aliases` are compared for equality and `rgb_fragments` as substrings,
/// both case-insensitively, so `rgb(230, 25, 75)` and `rgba(230, 25, 75, 0.4)`
/// resolve to the same entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSubstitution {
    pub source: &'static str,
    pub substitute: &'static str,
    pub hex_aliases: &'static [&'static str],
    pub rgb_fragments: &'static [&'static str],
}

impl ColorSubstitution {
    fn matches_source(&self, lowered: &str) -> bool {
        self.hex_aliases
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(lowered))
            || self
                .rgb_fragments
                .iter()
                .any(|fragment| lowered.contains(fragment))
    }

    fn matches_substitute(&self, lowered: &str) -> bool {
        self.substitute.eq_ignore_ascii_case(lowered)
    }
}

const DEFAULT_SUBSTITUTIONS: [ColorSubstitution; 2] = [
    ColorSubstitution {
        source: NEGATIVE_SOURCE,
        substitute: NEGATIVE_SUBSTITUTE,
        hex_aliases: &["#e6194b"],
        rgb_fragments: &["230, 25, 75"],
    },
    ColorSubstitution {
        source: POSITIVE_SOURCE,
        substitute: POSITIVE_SUBSTITUTE,
        hex_aliases: &["#3cb44b", "#4caf50"],
        rgb_fragments: &["60, 180, 75", "76, 175, 80"],
    },
];

/// Red/green to orange/blue substitution table.
///
/// Mapping is total: anything the table does not recognize is returned as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    substitutions: &'static [ColorSubstitution],
}

impl Default for ColorTable {
    fn default() -> Self {
        Self {
            substitutions: &DEFAULT_SUBSTITUTIONS,
        }
    }
}

impl ColorTable {
    #[must_use]
    pub fn substitutions(&self) -> &'static [ColorSubstitution] {
        self.substitutions
    }

    /// Maps `value` toward the colorblind palette when `mode_active`, or back
    /// to the source palette otherwise.
    #[must_use]
    pub fn map<'a>(&self, value: &'a str, mode_active: bool) -> Cow<'a, str> {
        let lowered = value.to_ascii_lowercase();
        let replacement = if mode_active {
            self.substitutions
                .iter()
                .find(|entry| entry.matches_source(&lowered))
                .map(|entry| entry.substitute)
        } else {
            self.substitutions
                .iter()
                .find(|entry| entry.matches_substitute(&lowered))
                .map(|entry| entry.source)
        };

        match replacement {
            Some(color) => Cow::Borrowed(color),
            None => Cow::Borrowed(value),
        }
    }

    /// Maps a JSON color field. Non-string values pass through unchanged.
    #[must_use]
    pub fn map_value(&self, value: &serde_json::Value, mode_active: bool) -> serde_json::Value {
        match value {
            serde_json::Value::String(color) => {
                serde_json::Value::String(self.map(color, mode_active).into_owned())
            }
            other => other.clone(),
        }
    }
}

/// Maps one color through the default table.
#[must_use]
pub fn map_color(value: &str, mode_active: bool) -> Cow<'_, str> {
    ColorTable::default().map(value, mode_active)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba_fragment_is_recognized() {
        assert_eq!(
            map_color("rgba(230, 25, 75, 0.35)", true),
            NEGATIVE_SUBSTITUTE
        );
    }

    #[test]
    fn substitutes_are_left_alone_when_activating() {
        assert_eq!(map_color(NEGATIVE_SUBSTITUTE, true), NEGATIVE_SUBSTITUTE);
        assert_eq!(map_color(POSITIVE_SUBSTITUTE, true), POSITIVE_SUBSTITUTE);
    }

    #[test]
    fn non_string_json_values_pass_through() {
        let table = ColorTable::default();
        let value = serde_json::json!(42);
        assert_eq!(table.map_value(&value, true), value);
    }
}
