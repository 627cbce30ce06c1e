//! Tracing/logging setup shared by shopledger binaries.

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Initialize process-wide logging at `info` unless `RUST_LOG` says otherwise.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_with_default("info");
}
