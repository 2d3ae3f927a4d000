//! Opt-in `tracing` setup for hosts embedding a plot window.
//!
//! The library only emits events: `debug!` for fits, exports and layer
//! changes, `trace!` for pointer gestures and `warn!` for rejected input.
//! Hosts that already install a subscriber can ignore this module.

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "mathplot_rs=info";

/// Installs a compact `fmt` subscriber honouring `RUST_LOG`.
///
/// Returns false when the `telemetry` feature is disabled or a global
/// subscriber is already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter(DEFAULT_FILTER)
}

/// Same as [`init_default_tracing`] with explicit fallback directives.
#[must_use]
pub fn init_tracing_with_filter(fallback: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback;
        false
    }
}
