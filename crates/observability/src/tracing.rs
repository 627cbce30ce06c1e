//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// `RUST_LOG` wins when set; otherwise `default_directive` (e.g. `"warn"`,
/// `"shopledger_ledger=debug"`) is used. Logs go to stderr as JSON so they
/// never interleave with command output on stdout.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init_with_default(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_initialization_is_harmless() {
        init_with_default("warn");
        init_with_default("debug");
        ::tracing::info!("still logging");
    }
}
