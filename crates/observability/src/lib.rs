//! `sawit-observability` — logging setup for host processes.
//!
//! The engine crates emit data-integrity warnings through `tracing`; hosts
//! (dashboard servers, report exporters) call [`init`] once at startup to
//! route them somewhere useful.

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;
