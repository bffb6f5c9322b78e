//! Telemetry helpers for pages embedding `chart-enhance`.
//!
//! Tracing setup stays explicit and opt-in. Hosts can either call
//! `init_default_tracing` or wire their own `tracing` subscriber.

/// Initializes a default `tracing` subscriber when the `telemetry` feature is enabled.
///
/// In the browser build (`web-adapter` on wasm32) events go to the devtools
/// console at the matching severity instead of stdout.
///
/// Returns `true` when initialization succeeds.
/// Returns `false` when the feature is disabled or a global subscriber was
/// already set by the host.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_target(false)
            .without_time()
            .compact();

        #[cfg(all(feature = "web-adapter", target_arch = "wasm32"))]
        let builder = builder
            .with_ansi(false)
            .with_writer(crate::platform_web::ConsoleMakeWriter);

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
