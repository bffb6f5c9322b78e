//! chart-enhance: accessibility and presentation add-ons for dashboard charts.
//!
//! The crate never creates charts. It discovers containers an external
//! charting library has already rendered into and layers two behaviors on
//! top: colorblind-safe recoloring and a fullscreen overlay. All page access
//! goes through the [`host`] traits, so the engines run unchanged against the
//! live document (`platform_web`) or the headless [`host::memory`] host.

pub mod api;
pub mod core;
pub mod error;
pub mod host;
pub mod telemetry;

#[cfg(feature = "web-adapter")]
pub mod platform_web;

pub use api::{EnhancementConfig, EnhancementLayer, install};
pub use error::{EnhanceError, EnhanceResult};
