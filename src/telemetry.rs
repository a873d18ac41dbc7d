//! Telemetry helpers for hosts embedding the dashboard engine.
//!
//! Every component logs through `tracing`; installing a subscriber is left to
//! the host. Call `init_default_tracing` for a sensible default or wire your
//! own subscriber and filters.

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns `false` when the `telemetry` feature is disabled or the host already
/// set a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_default_filter("info")
}

/// Same as `init_default_tracing`, with an explicit fallback directive used
/// when `RUST_LOG` is unset or invalid (for example `"bizchart=debug"`).
#[must_use]
pub fn init_tracing_with_default_filter(default_directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive)),
            )
            .with_target(true)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = default_directive;
        false
    }
}
