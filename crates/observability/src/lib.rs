//! Tracing and logging setup shared by binaries and tests.

/// Initialize process-wide logging: JSON lines, filtered by `RUST_LOG`
/// (default `info`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Compact, human-readable logging captured by the test harness.
///
/// Safe to call from every test.
pub fn init_for_tests() {
    tracing::init_for_tests();
}

/// Subscriber construction (filters, formatters).
pub mod tracing;
