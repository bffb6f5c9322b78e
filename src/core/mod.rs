mod color_table;
mod layout;
mod trace;

pub use color_table::{
    ColorSubstitution, ColorTable, NEGATIVE_SOURCE, NEGATIVE_SUBSTITUTE, POSITIVE_SOURCE,
    POSITIVE_SUBSTITUTE, map_color,
};
pub use layout::{FullscreenLayoutConfig, Layout, MarginFloors};
pub use trace::{COLOR_FIELDS, Trace, traces_from_value, traces_to_value};
