//! Telemetry helpers for applications embedding `skyplot-rs`.
//!
//! Tracing setup stays explicit and opt-in. Hosts either call one of the
//! helpers below or install their own `tracing` subscriber. The engine emits
//! field load/unload events at `debug`, per-pass point counts at `trace`, and
//! rejected operations at `warn`.

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "skyplot_rs=info,warn";

/// Initializes a compact `tracing` subscriber using [`DEFAULT_FILTER`].
///
/// Returns `true` when initialization succeeds.
/// Returns `false` when no initialization is performed (feature disabled) or if a
/// global subscriber was already set by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter(DEFAULT_FILTER)
}

/// Same as [`init_default_tracing`] with a caller-supplied fallback filter.
///
/// `RUST_LOG` still takes precedence when it is set.
#[must_use]
pub fn init_tracing_with_filter(fallback_filter: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_filter));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_filter;
        false
    }
}
