//! Tracing setup for binaries and tests that embed the service.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,framing=debug";

/// Initializes the tracing subscriber.
///
/// Reads `RUST_LOG` and falls back to [`DEFAULT_FILTER`]. Calling it again
/// after a subscriber is installed is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_err()
    {
        tracing::debug!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_tracing();
        init_tracing();
        tracing::info!(component = "telemetry", "Tracing initialized");
    }
}
