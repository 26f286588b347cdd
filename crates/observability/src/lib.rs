//! Shared tracing setup for dealerhub binaries.

/// Install the process-wide subscriber with the default `info` filter.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    tracing::init("info");
}

/// Like [`init`] with a different fallback filter when `RUST_LOG` is unset.
pub fn init_with_default(default_directive: &str) {
    tracing::init(default_directive);
}

/// Subscriber construction (filters, formatting, writer).
pub mod tracing;
